//! Fixed instruction prompt for the search assistant

use quest_search::Source;

const INSTRUCTIONS: &str = "You are an AI search assistant similar to Perplexity AI. Your role is to:

1. Provide comprehensive, accurate answers based on the user's query
2. When sources are provided, cite them using numbered references [1], [2], etc.
3. Generate 3-5 relevant follow-up questions to help users explore the topic deeper
4. Format your response in clear, readable sections
5. Be conversational but authoritative in tone
6. Focus on current, factual information

Response Format:
- Answer the query thoroughly using provided sources
- Include numbered citations when referencing sources
- End with 3-5 follow-up questions

Sources available: ";

/// Build the system prompt, appending a numbered rendering of the supplied
/// sources. With no sources, the model is told to answer from general
/// knowledge instead.
pub fn build_system_prompt(sources: &[Source]) -> String {
    let rendered = if sources.is_empty() {
        "No external sources provided - use your knowledge base".to_string()
    } else {
        sources
            .iter()
            .enumerate()
            .map(|(i, s)| format!("[{}] {} - {}", i + 1, s.title, s.snippet))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!("{INSTRUCTIONS}{rendered}")
}
