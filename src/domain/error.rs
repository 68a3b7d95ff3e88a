use thiserror::Error;

/// Maximum number of characters of a response body kept for diagnostics.
pub const BODY_EXCERPT_CHARS: usize = 500;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Scheduler error: {0}")]
    Scheduler(String),

    #[error("I/O error: {0}")]
    Io(String),
}

/// Why a report could not be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// Connection failure or non-success HTTP status.
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// Body was not JSON, or the markup field was missing or empty.
    #[error("Malformed response: {reason}")]
    MalformedResponse { reason: String, excerpt: String },

    #[error("No result rows found in listing markup")]
    EmptyResult,
}

impl ReportError {
    pub fn malformed(reason: impl Into<String>, body: &str) -> Self {
        ReportError::MalformedResponse {
            reason: reason.into(),
            excerpt: excerpt(body),
        }
    }

    /// Short reply shown to end users. Technical detail stays in the logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            ReportError::Network(_) | ReportError::Timeout(_) => {
                "Network request failed, could not fetch the Steam top sellers."
            }
            ReportError::MalformedResponse { .. } => {
                "Could not read the data returned by Steam, please try again later."
            }
            ReportError::EmptyResult => "No top-seller entries were found right now.",
        }
    }
}

/// Delivery of one message to one recipient failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Delivery to {recipient} failed: {reason}")]
pub struct DeliveryError {
    pub recipient: String,
    pub reason: String,
}

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_keeps_short_excerpt() {
        let body = "x".repeat(2000);
        match ReportError::malformed("not json", &body) {
            ReportError::MalformedResponse { excerpt, .. } => {
                assert_eq!(excerpt.chars().count(), BODY_EXCERPT_CHARS)
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_user_messages_hide_detail() {
        let err = ReportError::Network("dns failure for store.steampowered.com".into());
        assert!(!err.user_message().contains("dns"));
        assert_eq!(
            ReportError::Timeout(15).user_message(),
            err.user_message()
        );
    }
}
