//! One user turn: persist the query, reserve the answer slot, call the
//! providers, resolve the slot.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use quest_search::Source;

use crate::conversation::{MessagePatch, NewMessage};
use crate::provider::{CompletionProvider, SourceProvider};
use crate::store::ConversationStore;

/// User-facing content of a failed turn. No partial answer is ever shown.
pub const APOLOGY: &str =
    "I apologize, but I encountered an error while searching. Please try again.";

/// Sources requested per turn.
const DEFAULT_MAX_SOURCES: usize = 6;

/// Outcome of one submit call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// The turn ran to resolution; the answer or the apology is in this
    /// conversation.
    Resolved { conversation_id: String },
    /// Whitespace-only query; nothing was done.
    EmptyQuery,
    /// A prior submission is still in flight; the call was dropped, not
    /// queued.
    InFlight,
}

/// Pending-result handle for one reserved assistant message.
///
/// Keyed by conversation and message id, never by "current": a stale
/// resolution still lands in its own conversation after the user has moved
/// on. The resolving methods take `self` by value, so a slot resolves
/// exactly once.
#[derive(Debug)]
pub struct AnswerSlot {
    conversation_id: String,
    message_id: String,
}

impl AnswerSlot {
    /// Fill the slot with the final answer.
    pub fn resolve(
        self,
        store: &ConversationStore,
        answer: String,
        sources: Vec<Source>,
        followup_questions: Vec<String>,
    ) {
        store.update_message(
            &self.conversation_id,
            &self.message_id,
            MessagePatch {
                content: Some(answer),
                sources: Some(sources),
                followup_questions: Some(followup_questions),
                is_loading: Some(false),
            },
        );
    }

    /// Fill the slot with the fixed apology, keeping whatever sources were
    /// fetched before the failure.
    pub fn resolve_error(self, store: &ConversationStore, sources: Vec<Source>) {
        store.update_message(
            &self.conversation_id,
            &self.message_id,
            MessagePatch {
                content: Some(APOLOGY.to_string()),
                sources: if sources.is_empty() {
                    None
                } else {
                    Some(sources)
                },
                followup_questions: None,
                is_loading: Some(false),
            },
        );
    }
}

/// Coordinates one user turn against the store and the two providers.
///
/// Holds a single-flight latch scoped to this submission surface: a second
/// submit while one is in flight is dropped. Different orchestrators (hence
/// different conversations) may run concurrently without cross-talk because
/// every mutation is addressed by conversation id.
pub struct SearchOrchestrator {
    store: Arc<ConversationStore>,
    sources: Arc<dyn SourceProvider>,
    completion: Arc<dyn CompletionProvider>,
    in_flight: AtomicBool,
    max_sources: usize,
}

impl SearchOrchestrator {
    pub fn new(
        store: Arc<ConversationStore>,
        sources: Arc<dyn SourceProvider>,
        completion: Arc<dyn CompletionProvider>,
    ) -> Self {
        Self {
            store,
            sources,
            completion,
            in_flight: AtomicBool::new(false),
            max_sources: DEFAULT_MAX_SOURCES,
        }
    }

    /// Override the per-turn source cap.
    pub fn with_max_sources(mut self, max_sources: usize) -> Self {
        self.max_sources = max_sources;
        self
    }

    /// The store this orchestrator mutates.
    pub fn store(&self) -> &Arc<ConversationStore> {
        &self.store
    }

    /// Run one turn. The latch is released on every path: success, caught
    /// failure, or a degenerate provider result.
    pub async fn submit(&self, query: &str) -> Submission {
        let query = query.trim();
        if query.is_empty() {
            return Submission::EmptyQuery;
        }
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("submission dropped: a search is already in flight");
            return Submission::InFlight;
        }

        let submission = self.run_turn(query).await;
        self.in_flight.store(false, Ordering::Release);
        submission
    }

    async fn run_turn(&self, query: &str) -> Submission {
        let conversation_id = match self.store.current_conversation() {
            Some(conversation) => conversation.id,
            None => self.store.create_conversation(query),
        };
        self.store
            .add_message(&conversation_id, NewMessage::user(query));

        let Some(message_id) = self
            .store
            .add_message(&conversation_id, NewMessage::assistant_loading())
        else {
            // Single-writer discipline makes this unreachable, but the store
            // contract is a silent no-op, so follow suit.
            tracing::warn!("conversation {conversation_id} vanished before the answer slot");
            return Submission::Resolved { conversation_id };
        };
        let slot = AnswerSlot {
            conversation_id: conversation_id.clone(),
            message_id,
        };

        // Sources first: the completion prompt embeds them.
        let result = self.sources.search(query, self.max_sources).await;
        tracing::debug!(
            query,
            sources = result.sources.len(),
            "sources fetched, requesting completion"
        );

        match self.completion.complete(query, &result.sources).await {
            Ok(completion) => {
                slot.resolve(
                    &self.store,
                    completion.answer,
                    result.sources,
                    completion.followups.into_questions(),
                );
            }
            Err(e) => {
                tracing::warn!("completion failed: {e}");
                slot.resolve_error(&self.store, result.sources);
            }
        }

        Submission::Resolved { conversation_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use quest_ai::{Completion, CompletionError, Followups};
    use quest_search::SimulatedSources;

    struct StaticCompletion {
        answer: &'static str,
    }

    #[async_trait]
    impl CompletionProvider for StaticCompletion {
        async fn complete(
            &self,
            _query: &str,
            _sources: &[Source],
        ) -> quest_ai::Result<Completion> {
            Ok(Completion {
                answer: self.answer.to_string(),
                followups: Followups::Extracted(vec!["What else should I know?".to_string()]),
            })
        }
    }

    struct FailingCompletion;

    #[async_trait]
    impl CompletionProvider for FailingCompletion {
        async fn complete(
            &self,
            _query: &str,
            _sources: &[Source],
        ) -> quest_ai::Result<Completion> {
            Err(CompletionError::api(502, "upstream down"))
        }
    }

    fn orchestrator(completion: Arc<dyn CompletionProvider>) -> SearchOrchestrator {
        SearchOrchestrator::new(
            Arc::new(ConversationStore::in_memory()),
            Arc::new(SimulatedSources::new()),
            completion,
        )
    }

    #[tokio::test]
    async fn test_turn_resolves_placeholder() {
        let orch = orchestrator(Arc::new(StaticCompletion { answer: "42" }));

        let submission = orch.submit("What is quantum computing?").await;
        let Submission::Resolved { conversation_id } = submission else {
            panic!("expected resolution, got {submission:?}");
        };

        let conversation = orch.store().conversation(&conversation_id).unwrap();
        assert_eq!(conversation.title, "What is quantum computing?");
        assert_eq!(conversation.messages.len(), 2);

        let answer = &conversation.messages[1];
        assert!(!answer.is_loading);
        assert_eq!(answer.content, "42");
        assert_eq!(answer.sources.as_ref().unwrap().len(), 3);
        let followups = answer.followup_questions.as_ref().unwrap();
        assert!((1..=5).contains(&followups.len()));
        assert!(conversation.loading_message().is_none());
    }

    #[tokio::test]
    async fn test_empty_query_is_dropped() {
        let orch = orchestrator(Arc::new(StaticCompletion { answer: "x" }));

        assert_eq!(orch.submit("").await, Submission::EmptyQuery);
        assert_eq!(orch.submit("   \n").await, Submission::EmptyQuery);
        assert!(orch.store().conversations().is_empty());
    }

    #[tokio::test]
    async fn test_second_turn_appends_to_current() {
        let orch = orchestrator(Arc::new(StaticCompletion { answer: "x" }));

        orch.submit("first question").await;
        orch.submit("second question").await;

        let list = orch.store().conversations();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].messages.len(), 4);
    }

    #[tokio::test]
    async fn test_new_chat_starts_fresh_conversation() {
        let orch = orchestrator(Arc::new(StaticCompletion { answer: "x" }));

        orch.submit("first question").await;
        orch.store().clear_current_conversation();
        orch.submit("second question").await;

        assert_eq!(orch.store().conversations().len(), 2);
    }

    #[tokio::test]
    async fn test_failure_resolves_with_apology() {
        let orch = orchestrator(Arc::new(FailingCompletion));

        let Submission::Resolved { conversation_id } = orch.submit("what is failure").await
        else {
            panic!("expected resolution");
        };

        let conversation = orch.store().conversation(&conversation_id).unwrap();
        let answer = &conversation.messages[1];
        assert_eq!(answer.content, APOLOGY);
        assert!(!answer.is_loading);
        // The fetched sources are kept, not cleared.
        assert!(!answer.sources.as_ref().unwrap().is_empty());
        assert!(conversation.loading_message().is_none());
    }

    /// Completion double that moves the user to a new conversation while the
    /// call is in flight.
    struct SwitchingCompletion {
        store: Arc<ConversationStore>,
    }

    #[async_trait]
    impl CompletionProvider for SwitchingCompletion {
        async fn complete(
            &self,
            _query: &str,
            _sources: &[Source],
        ) -> quest_ai::Result<Completion> {
            self.store.clear_current_conversation();
            self.store.create_conversation("a different chat");
            Ok(Completion {
                answer: "late answer".to_string(),
                followups: Followups::fallback(),
            })
        }
    }

    #[tokio::test]
    async fn test_stale_resolution_targets_its_own_conversation() {
        let store = Arc::new(ConversationStore::in_memory());
        let orch = SearchOrchestrator::new(
            store.clone(),
            Arc::new(SimulatedSources::new()),
            Arc::new(SwitchingCompletion {
                store: store.clone(),
            }),
        );

        let Submission::Resolved { conversation_id } = orch.submit("original question").await
        else {
            panic!("expected resolution");
        };

        // The answer landed in the original conversation, not the one that
        // became current mid-flight.
        let original = store.conversation(&conversation_id).unwrap();
        assert_eq!(original.messages[1].content, "late answer");
        let current = store.current_conversation().unwrap();
        assert_ne!(current.id, conversation_id);
        assert!(current.messages.is_empty());
    }

    /// Completion double that blocks until released, to hold a turn in
    /// flight.
    struct BlockingCompletion {
        release: Arc<tokio::sync::Notify>,
    }

    #[async_trait]
    impl CompletionProvider for BlockingCompletion {
        async fn complete(
            &self,
            _query: &str,
            _sources: &[Source],
        ) -> quest_ai::Result<Completion> {
            self.release.notified().await;
            Ok(Completion {
                answer: "released".to_string(),
                followups: Followups::fallback(),
            })
        }
    }

    #[tokio::test]
    async fn test_single_flight_guard_drops_second_submit() {
        let release = Arc::new(tokio::sync::Notify::new());
        let orch = Arc::new(SearchOrchestrator::new(
            Arc::new(ConversationStore::in_memory()),
            Arc::new(SimulatedSources::new()),
            Arc::new(BlockingCompletion {
                release: release.clone(),
            }),
        ));

        let background = {
            let orch = orch.clone();
            tokio::spawn(async move { orch.submit("slow question").await })
        };

        // Wait until the first turn has reserved its answer slot.
        while orch.store().conversations().is_empty() {
            tokio::task::yield_now().await;
        }

        assert_eq!(orch.submit("impatient retry").await, Submission::InFlight);

        release.notify_one();
        let submission = background.await.unwrap();
        assert!(matches!(submission, Submission::Resolved { .. }));

        // The guard is released after resolution.
        let submission = orch.submit("next question").await;
        assert!(matches!(submission, Submission::Resolved { .. }));
    }
}
