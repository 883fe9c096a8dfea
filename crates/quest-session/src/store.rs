//! Conversation store with file-backed persistence
//!
//! All mutations go through the operations here; readers receive cloned
//! snapshots. Each operation takes the lock once, so no two mutations to the
//! same conversation can interleave at the sub-operation level.

use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use parking_lot::Mutex;

use crate::conversation::{Conversation, Message, MessagePatch, NewMessage, derive_title};

/// Fixed storage key: one file holding the serialized conversation list.
const STORAGE_FILE: &str = "conversations.json";

#[derive(Default)]
struct StoreState {
    /// Most-recently-created first.
    conversations: Vec<Conversation>,
    /// Id of the current conversation. `None` means the welcome view.
    current: Option<String>,
}

/// Owns every conversation and message record.
///
/// Lookup misses are silent no-ops, never errors; callers that need to know
/// whether an operation took effect re-query state afterward. Persistence is
/// fire-and-forget: a failed write is logged and the in-memory state stays
/// authoritative.
pub struct ConversationStore {
    state: Mutex<StoreState>,
    storage_path: Option<PathBuf>,
}

impl ConversationStore {
    /// Default data directory for the persisted conversation list.
    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quest")
    }

    /// Open a store backed by `dir/conversations.json`, loading any
    /// previously persisted conversations. The current conversation always
    /// starts out unset.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let path = dir.into().join(STORAGE_FILE);
        let conversations = load_conversations(&path);
        Self {
            state: Mutex::new(StoreState {
                conversations,
                current: None,
            }),
            storage_path: Some(path),
        }
    }

    /// A store with no backing file. State lives for the process only.
    pub fn in_memory() -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            storage_path: None,
        }
    }

    /// Create a conversation titled after its first user message, prepend it
    /// to the list, and make it current. Returns the new conversation id.
    pub fn create_conversation(&self, first_message: &str) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();
        let conversation = Conversation {
            id: id.clone(),
            title: derive_title(first_message),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let mut state = self.state.lock();
        state.conversations.insert(0, conversation);
        state.current = Some(id.clone());
        self.persist(&state);
        id
    }

    /// Switch the current conversation. Unknown ids are ignored; UI
    /// navigation races are expected.
    pub fn set_current_conversation(&self, id: &str) {
        let mut state = self.state.lock();
        if state.conversations.iter().any(|c| c.id == id) {
            state.current = Some(id.to_string());
        }
    }

    /// Clear the current conversation without deleting anything ("new
    /// chat").
    pub fn clear_current_conversation(&self) {
        self.state.lock().current = None;
    }

    /// Append a message, allocating its id and timestamp. Returns the new
    /// message id, or `None` when the conversation does not exist.
    pub fn add_message(&self, conversation_id: &str, message: NewMessage) -> Option<String> {
        let mut state = self.state.lock();
        let Some(conversation) = state
            .conversations
            .iter_mut()
            .find(|c| c.id == conversation_id)
        else {
            tracing::warn!("add_message: no conversation {conversation_id}");
            return None;
        };

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();
        conversation.messages.push(Message {
            id: id.clone(),
            role: message.role,
            content: message.content,
            sources: message.sources,
            followup_questions: message.followup_questions,
            timestamp: now,
            is_loading: message.is_loading,
        });
        conversation.updated_at = now;
        self.persist(&state);
        Some(id)
    }

    /// Merge a patch into a message in place. A miss on either id leaves the
    /// message sequence untouched.
    pub fn update_message(&self, conversation_id: &str, message_id: &str, patch: MessagePatch) {
        let mut state = self.state.lock();
        let Some(conversation) = state
            .conversations
            .iter_mut()
            .find(|c| c.id == conversation_id)
        else {
            tracing::warn!("update_message: no conversation {conversation_id}");
            return;
        };
        let Some(message) = conversation
            .messages
            .iter_mut()
            .find(|m| m.id == message_id)
        else {
            tracing::warn!("update_message: no message {message_id} in {conversation_id}");
            return;
        };

        patch.apply(message);
        conversation.updated_at = Utc::now();
        self.persist(&state);
    }

    /// Remove a conversation. Clears the current pointer when it was
    /// current.
    pub fn delete_conversation(&self, id: &str) {
        let mut state = self.state.lock();
        state.conversations.retain(|c| c.id != id);
        if state.current.as_deref() == Some(id) {
            state.current = None;
        }
        self.persist(&state);
    }

    /// Replace a conversation's title. The store does not validate the
    /// title; callers reject empty input before invoking.
    pub fn rename_conversation(&self, id: &str, title: &str) {
        let mut state = self.state.lock();
        if let Some(conversation) = state.conversations.iter_mut().find(|c| c.id == id) {
            conversation.title = title.to_string();
            conversation.updated_at = Utc::now();
            self.persist(&state);
        }
    }

    /// Snapshot of every conversation, most-recently-created first.
    pub fn conversations(&self) -> Vec<Conversation> {
        self.state.lock().conversations.clone()
    }

    /// Snapshot of one conversation.
    pub fn conversation(&self, id: &str) -> Option<Conversation> {
        self.state
            .lock()
            .conversations
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }

    /// Snapshot of the current conversation, if one is set.
    pub fn current_conversation(&self) -> Option<Conversation> {
        let state = self.state.lock();
        let id = state.current.as_deref()?;
        state.conversations.iter().find(|c| c.id == id).cloned()
    }

    /// Id of the unresolved placeholder within a conversation, if any.
    pub fn loading_message_id(&self, conversation_id: &str) -> Option<String> {
        self.state
            .lock()
            .conversations
            .iter()
            .find(|c| c.id == conversation_id)?
            .loading_message()
            .map(|m| m.id.clone())
    }

    /// Durably overwrite the conversation list. The current pointer is not
    /// persisted and resets on every cold start.
    fn persist(&self, state: &StoreState) {
        let Some(ref path) = self.storage_path else {
            return;
        };

        let json = match serde_json::to_string(&state.conversations) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("failed to serialize conversations: {e}");
                return;
            }
        };

        if let Some(dir) = path.parent() {
            if let Err(e) = fs::create_dir_all(dir) {
                tracing::warn!("failed to create data dir {}: {e}", dir.display());
                return;
            }
        }
        if let Err(e) = fs::write(path, json) {
            tracing::warn!("failed to persist conversations to {}: {e}", path.display());
        }
    }
}

fn load_conversations(path: &PathBuf) -> Vec<Conversation> {
    if !path.exists() {
        return Vec::new();
    }

    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str(&content) {
            Ok(conversations) => conversations,
            Err(e) => {
                tracing::warn!("failed to parse {}: {e}", path.display());
                Vec::new()
            }
        },
        Err(e) => {
            tracing::warn!("failed to read {}: {e}", path.display());
            Vec::new()
        }
    }
}
