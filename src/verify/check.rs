//! Live check of the externally reachable key URL.

use std::time::Duration;

use thiserror::Error;

use crate::config::VerificationConfig;
use crate::verify::report::VerificationReport;

/// Bytes of body read before the rest is ignored. A PEM public key is a few hundred.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Fetches the public URL and evaluates the response.
#[derive(Debug, Clone)]
pub struct Verifier {
    client: reqwest::Client,
    preview_chars: usize,
}

impl Verifier {
    pub fn new(timeout: Duration, preview_chars: usize) -> Result<Self, VerifyError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tesla-key-server/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            preview_chars,
        })
    }

    pub fn from_config(config: &VerificationConfig) -> Result<Self, VerifyError> {
        Self::new(Duration::from_secs(config.timeout_secs), config.preview_chars)
    }

    /// GET `url` once. Transport failures become a failed report, not an error.
    pub async fn check(&self, url: &str) -> VerificationReport {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Verification request failed");
                return VerificationReport::from_error(url, e);
            }
        };

        let status = response.status().as_u16();
        let report = match read_capped(response, MAX_BODY_BYTES).await {
            Ok(body) => VerificationReport::from_response(
                url,
                status,
                &String::from_utf8_lossy(&body),
                self.preview_chars,
            ),
            Err(e) => {
                tracing::warn!(url = %url, status, error = %e, "Failed to read verification body");
                VerificationReport::from_body_error(url, status, e)
            }
        };

        if report.passed {
            tracing::info!(url = %url, "Verification passed");
        } else {
            tracing::warn!(url = %url, summary = %report.summary(), "Verification failed");
        }
        report
    }
}

/// Read at most `limit` bytes of the body, dropping the connection after that.
async fn read_capped(
    mut response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, reqwest::Error> {
    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        let room = limit - body.len();
        if chunk.len() >= room {
            body.extend_from_slice(&chunk[..room]);
            tracing::debug!(limit, "Verification body truncated");
            break;
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}
