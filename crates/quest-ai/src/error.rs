//! Error types for quest-ai

use thiserror::Error;

/// Result type alias using quest-ai CompletionError
pub type Result<T> = std::result::Result<T, CompletionError>;

/// Errors that can occur when calling the completion endpoint.
///
/// Callers treat all variants as one opaque failure; no retry is attempted.
#[derive(Error, Debug)]
pub enum CompletionError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Endpoint returned a non-success status
    #[error("completion API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

impl CompletionError {
    /// Create an API error from a status code and response body.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let e = CompletionError::api(503, "overloaded");
        assert_eq!(
            e.to_string(),
            "completion API error (status 503): overloaded"
        );
    }
}
