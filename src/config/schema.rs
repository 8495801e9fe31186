//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the key server.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the key server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Where to look for the public key and how to present it.
    pub key: KeyConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Live verification of the public URL.
    pub verification: VerificationConfig,

    #[serde(default)]
    pub admin: AdminConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// What to do when no key file exists at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StartupPolicy {
    /// Log a warning and answer 404 until the file shows up.
    #[default]
    Soft,
    /// Refuse to start.
    Strict,
}

/// Public key discovery settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct KeyConfig {
    /// Friendly name shown to operators. The only identity input.
    pub display_name: String,

    /// Directory candidate paths are resolved against.
    pub base_dir: String,

    /// Candidate locations, highest precedence first.
    pub candidates: Vec<String>,

    /// Behaviour when nothing resolves at startup.
    pub startup_policy: StartupPolicy,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            display_name: "Tesla Serve Key".to_string(),
            base_dir: ".".to_string(),
            candidates: vec![
                ".well-known/appspecific/com.tesla.3p.public-key.pem".to_string(),
                "tesla-public-key.pem".to_string(),
                "tesla_fleet_public_key.pem".to_string(),
            ],
            startup_policy: StartupPolicy::Soft,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of the human format.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Live verification settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct VerificationConfig {
    /// Externally reachable URL of the well-known path, if known.
    pub public_url: Option<String>,

    /// Outbound check timeout in seconds.
    pub timeout_secs: u64,

    /// Maximum characters of body kept in the report preview.
    pub preview_chars: usize,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            public_url: None,
            timeout_secs: 10,
            preview_chars: 200,
        }
    }
}

/// Shipped admin token. Validation refuses it once the admin API is enabled.
pub const ADMIN_API_KEY_PLACEHOLDER: &str = "CHANGE_ME_IN_PRODUCTION";

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable admin API.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,

    /// Admin API bind address.
    pub bind_address: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: ADMIN_API_KEY_PLACEHOLDER.to_string(),
            bind_address: "127.0.0.1:8081".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: ServiceConfig = toml::from_str("").unwrap();
        assert_eq!(config.key.candidates.len(), 3);
        assert_eq!(config.key.startup_policy, StartupPolicy::Soft);
        assert_eq!(config.verification.timeout_secs, 10);
        assert!(!config.admin.enabled);
    }

    #[test]
    fn test_partial_key_section() {
        let config: ServiceConfig = toml::from_str(
            r#"
            [key]
            display_name = "Garage"
            base_dir = "/config"
            startup_policy = "strict"
            "#,
        )
        .unwrap();
        assert_eq!(config.key.display_name, "Garage");
        assert_eq!(config.key.base_dir, "/config");
        assert_eq!(config.key.startup_policy, StartupPolicy::Strict);
        assert_eq!(
            config.key.candidates[0],
            ".well-known/appspecific/com.tesla.3p.public-key.pem"
        );
    }
}
