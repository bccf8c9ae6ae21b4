//! Turns classified provider failures into user-facing text.

use crate::llm::ProviderError;
use regex::Regex;
use std::fmt::Display;
use std::sync::LazyLock;

/// Wait-time hint embedded in throttling messages, e.g. `try again in 7.66s`
/// or `try again in 1m5.2s`.
static RETRY_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)try again in (?:(\d+)m)?(\d+(?:\.\d+)?)s").expect("retry hint pattern is valid")
});

pub const HIGH_TRAFFIC: &str =
    "I'm experiencing high traffic right now. Please try again in a moment.";

/// Seconds to wait, rounded up, if the provider said how long.
pub fn retry_after_secs(message: &str) -> Option<u64> {
    let captures = RETRY_HINT.captures(message)?;
    let minutes: f64 = captures
        .get(1)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0.0);
    let seconds: f64 = captures.get(2)?.as_str().parse().ok()?;
    Some((minutes * 60.0 + seconds).ceil() as u64)
}

/// Message for a failed provider call.
pub fn classify(err: &ProviderError) -> String {
    match err {
        ProviderError::RateLimited { message, .. } => match retry_after_secs(message) {
            Some(secs) => format!(
                "It looks like I'm a bit popular right now! Please wait about {} seconds and try again.",
                secs
            ),
            None => HIGH_TRAFFIC.to_string(),
        },
        ProviderError::UnparseableError { status, .. } => {
            format!("An API error occurred (Status Code: {}).", status)
        }
        ProviderError::Api {
            status, message, ..
        } => {
            if message.is_empty() {
                format!("An API error occurred (Status Code: {}).", status)
            } else {
                format!("An API error occurred (Status Code: {}): {}", status, message)
            }
        }
        ProviderError::Transport { .. } | ProviderError::MalformedResponse(_) => unexpected(err),
    }
}

/// Catch-all message for anything that is not a classified provider error.
pub fn unexpected(err: &dyn Display) -> String {
    tracing::error!(error = %err, "Unexpected error during orchestration");
    format!("An unexpected error occurred in the agent logic: {}", err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn rate_limited(message: &str) -> ProviderError {
        ProviderError::RateLimited {
            status: 429,
            message: message.to_string(),
        }
    }

    #[rstest]
    #[case("Rate limit reached. Please try again in 7.66s.", Some(8))]
    #[case("Please try again in 12s", Some(12))]
    #[case("Please try again in 3.0s", Some(3))]
    #[case("Please try again in 1m5.2s. Visit the console.", Some(66))]
    #[case("Slow down.", None)]
    fn test_retry_after(#[case] message: &str, #[case] expected: Option<u64>) {
        assert_eq!(retry_after_secs(message), expected);
    }

    #[test]
    fn test_rate_limit_with_hint() {
        assert_eq!(
            classify(&rate_limited("Limit 6000 TPM. Please try again in 7.66s.")),
            "It looks like I'm a bit popular right now! Please wait about 8 seconds and try again."
        );
    }

    #[test]
    fn test_rate_limit_without_hint() {
        assert_eq!(classify(&rate_limited("quota exhausted")), HIGH_TRAFFIC);
    }

    #[test]
    fn test_unparseable_body() {
        let err = ProviderError::UnparseableError {
            status: 502,
            body: "<html>Bad Gateway</html>".to_string(),
        };
        assert_eq!(classify(&err), "An API error occurred (Status Code: 502).");
    }

    #[test]
    fn test_structured_api_error() {
        let err = ProviderError::Api {
            status: 400,
            code: Some("model_not_found".to_string()),
            message: "The model does not exist".to_string(),
        };
        assert_eq!(
            classify(&err),
            "An API error occurred (Status Code: 400): The model does not exist"
        );
    }

    #[test]
    fn test_transport_is_unexpected() {
        let err = ProviderError::Transport {
            message: "connection refused".to_string(),
            timed_out: false,
        };
        assert_eq!(
            classify(&err),
            "An unexpected error occurred in the agent logic: connection refused"
        );
    }
}
