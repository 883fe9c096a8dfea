//! Source record types

use serde::{Deserialize, Serialize};

/// A single cited web reference attached to an assistant answer.
///
/// Immutable once attached to a message. `id` is the position within one
/// search response, assigned densely starting at 1 in emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub id: u32,
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
}

/// Result of one source lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub sources: Vec<Source>,
    pub total_results: usize,
}

impl SearchResult {
    /// An empty result. Callers treat this as "no sources found", which is a
    /// valid outcome, distinct from a failed lookup.
    pub fn empty() -> Self {
        Self::default()
    }
}
