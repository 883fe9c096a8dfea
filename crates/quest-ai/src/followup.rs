//! Follow-up question mining
//!
//! Best-effort structured extraction from unstructured generated text, as a
//! two-stage pipeline: locate a labeled follow-up section, then filter its
//! lines down to plausible questions. The result is tagged so callers can
//! tell mined questions from the fixed fallback set.

use std::sync::LazyLock;

use regex::Regex;

/// Most questions to keep from one answer.
const MAX_QUESTIONS: usize = 5;

/// Candidate lines at or below this many characters are discarded.
const MIN_QUESTION_LEN: usize = 10;

/// Fixed fallback suggestions used when no usable section is found.
const DEFAULT_QUESTIONS: [&str; 4] = [
    "Can you provide more details about this topic?",
    "What are the latest developments in this area?",
    "How does this compare to similar topics?",
    "What are the implications of this information?",
];

/// Heading that introduces a follow-up block, through the end of the block
/// (a blank line or end of text).
static SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)(?:follow[- ]?up questions?|related questions?|you might also ask):\s*(.*?)(?:\n\s*\n|$)",
    )
    .expect("valid follow-up section pattern")
});

/// Separators between candidate questions: line breaks, bullet characters,
/// and `1.`-style numbering.
static SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n|•|\d+\.\s").expect("valid separator pattern"));

/// Follow-up questions derived from one generated answer.
///
/// `Extracted` questions were mined out of the text; `Fallback` is the fixed
/// default set. Neither variant is ever empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Followups {
    Extracted(Vec<String>),
    Fallback(Vec<String>),
}

impl Followups {
    /// The fixed default set.
    pub fn fallback() -> Self {
        Self::Fallback(DEFAULT_QUESTIONS.iter().map(|q| q.to_string()).collect())
    }

    /// The questions, regardless of how they were obtained.
    pub fn questions(&self) -> &[String] {
        match self {
            Self::Extracted(qs) | Self::Fallback(qs) => qs,
        }
    }

    /// Consume into the question list.
    pub fn into_questions(self) -> Vec<String> {
        match self {
            Self::Extracted(qs) | Self::Fallback(qs) => qs,
        }
    }

    /// Whether these are the fixed defaults rather than mined questions.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Mine follow-up questions out of a generated answer.
///
/// Falls back to the default set when no labeled section exists or the
/// section yields no qualifying line, so the result is never empty.
pub fn extract_followups(answer: &str) -> Followups {
    let questions = SECTION
        .captures(answer)
        .and_then(|caps| caps.get(1))
        .map(|section| candidate_questions(section.as_str()))
        .unwrap_or_default();

    if questions.is_empty() {
        Followups::fallback()
    } else {
        Followups::Extracted(questions)
    }
}

/// Stage 2: split a located section into candidate lines and keep the ones
/// that look like questions.
fn candidate_questions(section: &str) -> Vec<String> {
    SEPARATOR
        .split(section)
        .map(|part| part.trim().trim_start_matches(['-', '*', '–']).trim())
        .filter(|part| part.chars().count() > MIN_QUESTION_LEN && part.contains('?'))
        .take(MAX_QUESTIONS)
        .map(str::to_string)
        .collect()
}
