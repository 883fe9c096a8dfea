//! Route handlers for the search API
//!
//! `POST /search` runs one stateless search turn: sources first, then the
//! completion with the sources embedded in its prompt. Source lookup
//! failures never surface here; only completion failures produce a 500.

use axum::Json;
use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};

use quest_search::Source;

use crate::api::error::ApiError;
use crate::api::state::AppState;

/// Body of a successful search.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub query: String,
    pub answer: String,
    pub sources: Vec<Source>,
    pub followup_questions: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// POST /search
pub async fn search(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = match body.get("query").and_then(Value::as_str) {
        Some(query) if !query.is_empty() => query,
        _ => return Err(ApiError::InvalidQuery),
    };

    tracing::info!(query, "fetching sources");
    let result = state.sources.search(query, state.max_sources).await;

    tracing::info!(sources = result.sources.len(), "requesting completion");
    let completion = state.completion.complete(query, &result.sources).await?;

    Ok(Json(SearchResponse {
        query: query.to_string(),
        answer: completion.answer,
        sources: result.sources,
        followup_questions: completion.followups.into_questions(),
        timestamp: Utc::now(),
    }))
}

/// GET /search - static descriptor used for discovery, not functional
/// search.
pub async fn describe() -> Json<Value> {
    Json(json!({
        "message": "Search API endpoint. Use POST method to search.",
        "endpoints": {
            "POST": "/search - Search for information with AI-powered answers"
        }
    }))
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
