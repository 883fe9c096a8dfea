//! Application state shared across route handlers

use std::sync::Arc;

use quest_session::{CompletionProvider, SourceProvider};

/// Shared application state. All fields are `Arc`-backed, so cloning per
/// handler task is cheap. The search routes are stateless with respect to
/// the conversation store: they answer queries, they do not record them.
#[derive(Clone)]
pub struct AppState {
    pub sources: Arc<dyn SourceProvider>,
    pub completion: Arc<dyn CompletionProvider>,
    pub max_sources: usize,
}

impl AppState {
    pub fn new(
        sources: Arc<dyn SourceProvider>,
        completion: Arc<dyn CompletionProvider>,
        max_sources: usize,
    ) -> Self {
        Self {
            sources,
            completion,
            max_sources,
        }
    }
}
