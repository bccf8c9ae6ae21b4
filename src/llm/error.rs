//! Classified failures of a single model-provider call.
//!
//! The HTTP layer decides which variant applies; consumers match on the
//! variant instead of inspecting raw payloads.

use serde::Deserialize;

/// Error codes the provider uses to signal throttling.
const RATE_LIMIT_CODES: &[&str] = &["rate_limit_exceeded"];

/// Result alias for provider calls.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    /// The provider is throttling us. `message` is the provider's own text,
    /// which usually carries a wait-time hint.
    #[error("Rate limited (status {status}): {message}")]
    RateLimited { status: u16, message: String },

    /// A structured error payload that is not a rate limit.
    #[error("Provider error (status {status}): {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// Non-success status whose body is not the expected error shape.
    #[error("Provider error (status {status}) with unreadable body")]
    UnparseableError { status: u16, body: String },

    /// Connection failure, timeout, or an unreadable response stream.
    #[error("{message}")]
    Transport { message: String, timed_out: bool },

    /// A success status whose body lacks the expected completion content.
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorPayload,
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<serde_json::Value>,
}

impl ProviderError {
    /// Classify a non-success HTTP response from the provider.
    pub fn from_response(status: u16, body: &str) -> Self {
        let envelope = match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => envelope,
            Err(_) => {
                return ProviderError::UnparseableError {
                    status,
                    body: body.to_string(),
                };
            }
        };

        // Codes are usually strings but some gateways send numbers.
        let code = envelope.error.code.map(|c| match c {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        });
        let message = envelope.error.message.unwrap_or_default();

        let is_rate_limit = code
            .as_deref()
            .is_some_and(|c| RATE_LIMIT_CODES.contains(&c))
            || status == 429;

        if is_rate_limit {
            ProviderError::RateLimited { status, message }
        } else {
            ProviderError::Api {
                status,
                code,
                message,
            }
        }
    }

    /// Map a transport-level `reqwest` failure.
    pub fn from_transport(err: reqwest::Error) -> Self {
        let timed_out = err.is_timeout();
        let message = if timed_out {
            format!("Request to the language model timed out: {}", err)
        } else {
            format!("Request to the language model failed: {}", err)
        };
        ProviderError::Transport { message, timed_out }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ProviderError::RateLimited { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::RateLimited { status, .. }
            | ProviderError::Api { status, .. }
            | ProviderError::UnparseableError { status, .. } => Some(*status),
            ProviderError::Transport { .. } | ProviderError::MalformedResponse(_) => None,
        }
    }
}
