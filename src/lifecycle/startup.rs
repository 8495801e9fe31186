//! Startup checks.
//!
//! # Responsibilities
//! - Resolve the key once before accepting traffic
//! - Apply the configured [`StartupPolicy`] when nothing is found
//!
//! # Design Decisions
//! - Soft policy (default): warn and let requests answer 404 until the file appears
//! - Strict policy: return an error so the process exits non-zero

use thiserror::Error;

use crate::config::StartupPolicy;
use crate::key::{KeySource, Located};

/// Startup could not proceed.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("no public key found at startup; searched: {searched}")]
    KeyNotFound { searched: String },
}

/// Resolve once and apply `policy`.
///
/// Returns the located key, or `None` when absent under the soft policy.
pub fn check_key_presence(
    keys: &dyn KeySource,
    policy: StartupPolicy,
) -> Result<Option<Located>, SetupError> {
    match keys.locate() {
        Some(located) => {
            tracing::info!(
                candidate = %located.candidate,
                path = %located.path.display(),
                "Public key located"
            );
            Ok(Some(located))
        }
        None => {
            let searched = keys.candidates().describe();
            match policy {
                StartupPolicy::Soft => {
                    tracing::warn!(
                        searched = %searched,
                        "Public key not found; requests will get 404 until it is in place"
                    );
                    Ok(None)
                }
                StartupPolicy::Strict => Err(SetupError::KeyNotFound { searched }),
            }
        }
    }
}
