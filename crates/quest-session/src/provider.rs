//! Provider seams consumed by the orchestrator
//!
//! The orchestrator only sees these traits; the concrete simulated lookup
//! and completion client plug in behind them, as do test doubles.

use async_trait::async_trait;

use quest_ai::{Completion, CompletionClient, Result as CompletionResult};
use quest_search::{SearchResult, SimulatedSources, Source};

/// Source lookup a query is fanned out to before completion.
///
/// Infallible by contract: an implementation that fails internally returns
/// an empty result, and callers treat "no sources" as a valid outcome.
#[async_trait]
pub trait SourceProvider: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> SearchResult;
}

/// Completion backend turning a query plus sources into an answer with
/// follow-up questions.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, query: &str, sources: &[Source]) -> CompletionResult<Completion>;
}

#[async_trait]
impl SourceProvider for SimulatedSources {
    async fn search(&self, query: &str, max_results: usize) -> SearchResult {
        SimulatedSources::search(self, query, max_results)
    }
}

#[async_trait]
impl CompletionProvider for CompletionClient {
    async fn complete(&self, query: &str, sources: &[Source]) -> CompletionResult<Completion> {
        CompletionClient::complete(self, query, sources).await
    }
}
