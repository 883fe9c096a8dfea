//! quest-ai: Chat-completion client for search answers
//!
//! This crate wraps one hosted chat-completions endpoint with a fixed
//! search-assistant prompt, and mines follow-up question suggestions out of
//! the generated text with a safe fallback.

pub mod client;
pub mod error;
pub mod followup;
pub mod prompt;

pub use client::{Completion, CompletionClient};
pub use error::{CompletionError, Result};
pub use followup::{Followups, extract_followups};
