//! Client for one hosted chat-completions endpoint

use serde::{Deserialize, Serialize};

use quest_search::Source;

use crate::{
    error::{CompletionError, Result},
    followup::{self, Followups},
    prompt,
};

/// Endpoint of the hosted deployment this client was built against.
pub const DEFAULT_ENDPOINT: &str = "https://oi-server.onrender.com/chat/completions";

/// Model identifier sent with every request.
pub const DEFAULT_MODEL: &str = "openrouter/anthropic/claude-sonnet-4";

/// Answer substituted when the endpoint returns no content.
const EMPTY_ANSWER: &str = "Sorry, I could not generate a response.";

/// A generated answer plus its derived follow-up questions.
#[derive(Debug, Clone)]
pub struct Completion {
    pub answer: String,
    pub followups: Followups,
}

/// Client for the chat-completions endpoint.
///
/// One request per completion, no streaming, no retry. Transport and API
/// failures surface as a single [`CompletionError`].
pub struct CompletionClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    customer_id: Option<String>,
}

impl CompletionClient {
    /// Create a client against the default endpoint and model.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            customer_id: None,
        }
    }

    /// Create from environment, reading `QUEST_API_KEY` if set.
    pub fn from_env() -> Self {
        let mut client = Self::new();
        client.api_key = std::env::var("QUEST_API_KEY").ok();
        client
    }

    /// Override the endpoint URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the bearer token sent with each request.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the `customerId` header sent with each request.
    pub fn with_customer_id(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    /// Generate an answer for a query, grounded in the supplied sources.
    ///
    /// The sources are rendered into the system prompt as a numbered list;
    /// follow-up questions are mined from the generated text afterwards, so
    /// the returned list is never empty.
    pub async fn complete(&self, query: &str, sources: &[Source]) -> Result<Completion> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(prompt::build_system_prompt(sources)),
                ChatMessage::user(query),
            ],
            temperature: 0.7,
            max_tokens: 2000,
        };

        let answer = self
            .send(&request)
            .await?
            .unwrap_or_else(|| EMPTY_ANSWER.to_string());
        let followups = followup::extract_followups(&answer);

        Ok(Completion { answer, followups })
    }

    /// Generate follow-up questions from a query and answer context.
    ///
    /// Best-effort: any failure degrades to a fixed fallback list rather
    /// than an error.
    pub async fn generate_followups(&self, query: &str, context: &str) -> Vec<String> {
        const GENERATION_FALLBACK: [&str; 4] = [
            "What are the key benefits of this?",
            "How does this work in practice?",
            "What should I know about this topic?",
            "What are the latest trends related to this?",
        ];

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(
                    "Generate 4-5 relevant follow-up questions based on the original query \
                     and context. Each question should explore different aspects or related \
                     topics. Return only the questions, one per line.",
                ),
                ChatMessage::user(format!(
                    "Original query: {query}\n\nContext: {context}\n\nGenerate follow-up questions:"
                )),
            ],
            temperature: 0.8,
            max_tokens: 300,
        };

        match self.send(&request).await {
            Ok(text) => parse_question_lines(text.as_deref().unwrap_or_default()),
            Err(e) => {
                tracing::warn!("follow-up generation failed: {e}");
                GENERATION_FALLBACK.iter().map(|q| q.to_string()).collect()
            }
        }
    }

    /// Issue one request and return the first choice's content, if any.
    async fn send(&self, request: &ChatRequest) -> Result<Option<String>> {
        let mut builder = self.client.post(&self.endpoint).json(request);
        if let Some(ref key) = self.api_key {
            builder = builder.bearer_auth(key);
        }
        if let Some(ref id) = self.customer_id {
            builder = builder.header("customerId", id);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CompletionError::api(status.as_u16(), message));
        }

        let body: ChatResponse = response.json().await?;
        Ok(body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.is_empty()))
    }
}

impl Default for CompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

/// One question per line, stripped of numbering, kept when it looks like a
/// question.
fn parse_question_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| {
            line.trim_start_matches(|c: char| c.is_ascii_digit() || c == '.' || c == ' ')
                .trim()
        })
        .filter(|line| line.chars().count() > 10 && line.contains('?'))
        .take(5)
        .map(str::to_string)
        .collect()
}

// Request/Response types

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

impl ChatMessage {
    fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = ChatRequest {
            model: DEFAULT_MODEL.to_string(),
            messages: vec![ChatMessage::system("sys"), ChatMessage::user("hi")],
            temperature: 0.7,
            max_tokens: 2000,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], DEFAULT_MODEL);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["max_tokens"], 2000);
    }

    #[test]
    fn test_response_parses_with_missing_fields() {
        let body: ChatResponse = serde_json::from_str("{}").unwrap();
        assert!(body.choices.is_empty());

        let body: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"hi"}}]}"#).unwrap();
        assert_eq!(
            body.choices[0].message.as_ref().unwrap().content.as_deref(),
            Some("hi")
        );
    }

    #[test]
    fn test_parse_question_lines() {
        let text = "1. What makes this work?\n2. short?\nNot a question at all\n3. Where is it used most often?";
        assert_eq!(
            parse_question_lines(text),
            &["What makes this work?", "Where is it used most often?"]
        );
    }

    #[test]
    fn test_parse_question_lines_empty() {
        assert!(parse_question_lines("").is_empty());
    }
}
