use thiserror::Error;

use super::types::ErrorEnvelope;

/// Any failure talking to the upstream assistants service
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Non-2xx response; `message` is what the upstream reported
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Upstream request timed out: {0}")]
    Timeout(String),

    #[error("Upstream request failed: {0}")]
    Transport(String),
}

impl UpstreamError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, UpstreamError::Api { status: 404, .. })
    }

    /// Build an API error from a non-2xx response body, preferring the
    /// upstream's own `error.message`.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .map(|envelope| envelope.error.message)
            .ok()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    format!("Upstream returned HTTP {}", status)
                } else {
                    format!("Upstream returned HTTP {}: {}", status, body.trim())
                }
            });

        UpstreamError::Api { status, message }
    }

    pub fn from_reqwest(operation: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout(operation.to_string())
        } else {
            UpstreamError::Transport(format!("{}: {}", operation, err))
        }
    }
}
