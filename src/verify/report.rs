//! Outcome of a live verification check.

use serde::Serialize;

/// Marker expected on the first line of the key.
pub const BEGIN_MARKER: &str = "BEGIN PUBLIC KEY";
/// Marker expected on the last line of the key.
pub const END_MARKER: &str = "END PUBLIC KEY";

/// What one check against the public URL found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    pub url: String,
    /// HTTP status, absent if the request never completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub has_begin_marker: bool,
    pub has_end_marker: bool,
    pub passed: bool,
    /// Start of the body, truncated.
    pub preview: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VerificationReport {
    /// Evaluate a completed response.
    pub fn from_response(url: &str, status: u16, body: &str, preview_chars: usize) -> Self {
        let has_begin_marker = body.contains(BEGIN_MARKER);
        let has_end_marker = body.contains(END_MARKER);
        Self {
            url: url.to_string(),
            status: Some(status),
            has_begin_marker,
            has_end_marker,
            passed: status == 200 && has_begin_marker && has_end_marker,
            preview: preview(body, preview_chars),
            error: None,
        }
    }

    /// The request failed before a response arrived (DNS, TLS, timeout...).
    pub fn from_error(url: &str, error: impl std::fmt::Display) -> Self {
        Self {
            url: url.to_string(),
            status: None,
            has_begin_marker: false,
            has_end_marker: false,
            passed: false,
            preview: String::new(),
            error: Some(error.to_string()),
        }
    }

    /// Headers arrived but the body could not be read.
    pub fn from_body_error(url: &str, status: u16, error: impl std::fmt::Display) -> Self {
        Self {
            status: Some(status),
            ..Self::from_error(url, error)
        }
    }

    /// One-line pass/fail summary for operators.
    pub fn summary(&self) -> String {
        if self.passed {
            return format!("PASS: public key served at {} (HTTP 200, PEM markers present)", self.url);
        }
        match (self.status, &self.error) {
            (Some(status), Some(error)) => format!(
                "FAIL: {} returned HTTP {} but the body could not be read: {}",
                self.url, status, error
            ),
            (None, Some(error)) => format!("FAIL: request to {} failed: {}", self.url, error),
            (Some(status), None) if status != 200 => {
                format!("FAIL: {} returned HTTP {}", self.url, status)
            }
            _ => {
                let mut missing = Vec::new();
                if !self.has_begin_marker {
                    missing.push(BEGIN_MARKER);
                }
                if !self.has_end_marker {
                    missing.push(END_MARKER);
                }
                format!(
                    "FAIL: {} returned HTTP 200 but is missing: {}",
                    self.url,
                    missing.join(", ")
                )
            }
        }
    }
}

/// First `max_chars` characters of `body`, with "..." when cut.
pub fn preview(body: &str, max_chars: usize) -> String {
    match body.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEM: &str = "-----BEGIN PUBLIC KEY-----\nABC\n-----END PUBLIC KEY-----\n";
    const URL: &str = "https://example.com/.well-known/appspecific/com.tesla.3p.public-key.pem";

    #[test]
    fn test_pass_requires_200_and_both_markers() {
        assert!(VerificationReport::from_response(URL, 200, PEM, 200).passed);
        assert!(!VerificationReport::from_response(URL, 404, PEM, 200).passed);

        let truncated = "-----BEGIN PUBLIC KEY-----\nABC\n";
        let report = VerificationReport::from_response(URL, 200, truncated, 200);
        assert!(!report.passed);
        assert!(report.has_begin_marker);
        assert!(report.summary().contains(END_MARKER));
    }

    #[test]
    fn test_summaries() {
        let ok = VerificationReport::from_response(URL, 200, PEM, 200);
        assert!(ok.summary().starts_with("PASS"));

        let missing = VerificationReport::from_response(URL, 404, "Public key not found", 200);
        assert_eq!(missing.summary(), format!("FAIL: {} returned HTTP 404", URL));

        let failed = VerificationReport::from_error(URL, "operation timed out");
        assert!(failed.summary().contains("operation timed out"));
        assert_eq!(failed.status, None);
    }

    #[test]
    fn test_body_error_keeps_status() {
        let report = VerificationReport::from_body_error(URL, 200, "connection reset");
        assert_eq!(report.status, Some(200));
        assert!(!report.passed);
        assert_eq!(report.error.as_deref(), Some("connection reset"));
        assert!(report.summary().contains("HTTP 200"));
        assert!(report.summary().contains("connection reset"));
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        assert_eq!(preview("abcdef", 3), "abc...");
        assert_eq!(preview("abc", 3), "abc");
        assert_eq!(preview("ééé", 2), "éé...");
    }

    #[test]
    fn test_serializes_without_empty_fields() {
        let json = serde_json::to_value(VerificationReport::from_response(URL, 200, PEM, 10)).unwrap();
        assert_eq!(json["status"], 200);
        assert!(json.get("error").is_none());
        assert_eq!(json["preview"], "-----BEGIN...");
    }
}
