//! JSON error responses for the search API

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use quest_ai::CompletionError;

/// Errors surfaced by the search endpoint, with the exact JSON bodies
/// clients expect.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request - `query` missing or not a string.
    InvalidQuery,
    /// 500 Internal Server Error - downstream completion failure.
    Search { details: String },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidQuery => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Query is required and must be a string" })),
            )
                .into_response(),
            ApiError::Search { details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Failed to process search query",
                    "details": details,
                })),
            )
                .into_response(),
        }
    }
}

impl From<CompletionError> for ApiError {
    fn from(err: CompletionError) -> Self {
        Self::Search {
            details: err.to_string(),
        }
    }
}
