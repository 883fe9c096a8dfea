//! Conversation and message records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quest_search::Source;

/// Longest derived conversation title, in characters.
const TITLE_MAX: usize = 50;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn's content within a conversation.
///
/// Content is mutable only while an assistant message is resolving; sources
/// are immutable once attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Source>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followup_questions: Option<Vec<String>>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_loading: bool,
}

/// Message fields supplied by callers. The store allocates the id and
/// timestamp on append.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub role: Role,
    pub content: String,
    pub sources: Option<Vec<Source>>,
    pub followup_questions: Option<Vec<String>>,
    pub is_loading: bool,
}

impl NewMessage {
    /// A user message with the given text.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            sources: None,
            followup_questions: None,
            is_loading: false,
        }
    }

    /// An empty assistant placeholder reserving the answer slot while a
    /// search resolves.
    pub fn assistant_loading() -> Self {
        Self {
            role: Role::Assistant,
            content: String::new(),
            sources: None,
            followup_questions: None,
            is_loading: true,
        }
    }
}

/// Partial update merged into an existing message. `None` fields are left
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct MessagePatch {
    pub content: Option<String>,
    pub sources: Option<Vec<Source>>,
    pub followup_questions: Option<Vec<String>>,
    pub is_loading: Option<bool>,
}

impl MessagePatch {
    pub(crate) fn apply(self, message: &mut Message) {
        if let Some(content) = self.content {
            message.content = content;
        }
        if let Some(sources) = self.sources {
            message.sources = Some(sources);
        }
        if let Some(questions) = self.followup_questions {
            message.followup_questions = Some(questions);
        }
        if let Some(is_loading) = self.is_loading {
            message.is_loading = is_loading;
        }
    }
}

/// An ordered, named thread of messages. Append is the only supported
/// insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// The unique unresolved placeholder, if one is pending.
    pub fn loading_message(&self) -> Option<&Message> {
        self.messages.iter().find(|m| m.is_loading)
    }
}

/// Derive a conversation title from its first user message: truncated to 50
/// characters with an ellipsis marker when truncated.
pub(crate) fn derive_title(first_message: &str) -> String {
    if first_message.chars().count() <= TITLE_MAX {
        return first_message.to_string();
    }
    let cut: String = first_message.chars().take(TITLE_MAX).collect();
    format!("{}...", cut.trim())
}
