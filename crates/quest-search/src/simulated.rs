//! Template-based source generation keyed on the query text

use chrono::{Duration, Utc};

use crate::types::{SearchResult, Source};

/// Deterministic source lookup backed by templated records.
///
/// Substrings of the lowercased query select which record families to emit:
/// news-flavored records for recency queries, a guide record for how-to
/// queries, a definition record for what-is queries. Two general records are
/// always appended, so every query yields at least two sources before the
/// cap is applied.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedSources;

impl SimulatedSources {
    /// Create a new simulated lookup.
    pub fn new() -> Self {
        Self
    }

    /// Look up sources for a query, capped at `max_results`.
    ///
    /// Never fails. Ids are assigned densely starting at 1 in emission
    /// order, after the cap.
    pub fn search(&self, query: &str, max_results: usize) -> SearchResult {
        let mut sources = generate(query);
        sources.truncate(max_results);
        for (idx, source) in sources.iter_mut().enumerate() {
            source.id = idx as u32 + 1;
        }

        let total_results = sources.len();
        SearchResult {
            sources,
            total_results,
        }
    }
}

fn generate(query: &str) -> Vec<Source> {
    let lower = query.to_lowercase();
    let mut sources = Vec::new();

    if lower.contains("news") || lower.contains("latest") || lower.contains("recent") {
        sources.push(record(
            format!("Latest News: {query} - Breaking Updates"),
            "https://example-news.com/article/latest-updates",
            format!(
                "Recent developments in {query} show significant progress. Key findings \
                 include new insights and important implications for the field."
            ),
            "example-news.com",
            'N',
            0,
        ));
        sources.push(record(
            format!("{query} - Comprehensive Analysis and Trends"),
            "https://research-institute.org/analysis",
            format!(
                "A detailed analysis of {query} reveals important trends and patterns. \
                 Experts weigh in on the current state and future prospects."
            ),
            "research-institute.org",
            'R',
            1,
        ));
    }

    if lower.contains("how to") || lower.contains("tutorial") || lower.contains("guide") {
        sources.push(record(
            format!("Complete Guide: {query} - Step by Step"),
            "https://tutorial-hub.com/guides/complete-guide",
            format!(
                "Learn everything about {query} with our comprehensive guide. Includes \
                 practical tips, examples, and best practices."
            ),
            "tutorial-hub.com",
            'T',
            2,
        ));
    }

    if lower.contains("what is") || lower.contains("definition") || lower.contains("explain") {
        sources.push(record(
            format!("Understanding {query}: Definition and Key Concepts"),
            "https://knowledge-base.org/definitions",
            format!(
                "{query} is defined as a comprehensive topic with multiple aspects. This \
                 article explores the fundamental concepts and applications."
            ),
            "knowledge-base.org",
            'K',
            3,
        ));
    }

    sources.push(record(
        format!("{query} - Expert Insights and Opinions"),
        "https://expert-network.com/insights",
        format!(
            "Industry experts share their perspectives on {query}. Discover professional \
             opinions and evidence-based recommendations."
        ),
        "expert-network.com",
        'E',
        4,
    ));
    sources.push(record(
        format!("{query}: Facts, Statistics, and Data"),
        "https://data-center.org/statistics",
        format!(
            "Comprehensive data and statistics related to {query}. Including charts, \
             trends, and statistical analysis from reliable sources."
        ),
        "data-center.org",
        'D',
        5,
    ));

    sources
}

/// Build one templated record. The id is a placeholder; `search` renumbers
/// after the cap.
fn record(
    title: String,
    url: &str,
    snippet: String,
    domain: &str,
    initial: char,
    age_days: i64,
) -> Source {
    let published = (Utc::now() - Duration::days(age_days))
        .format("%Y-%m-%d")
        .to_string();

    Source {
        id: 0,
        title,
        url: url.to_string(),
        snippet,
        domain: domain.to_string(),
        favicon: Some(format!("https://placehold.co/16x16?text={initial}")),
        published_date: Some(published),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_what_is_branch() {
        let result = SimulatedSources::new().search("What is quantum computing?", 6);

        assert_eq!(result.sources.len(), 3);
        assert_eq!(result.total_results, 3);
        assert!(result.sources[0].title.starts_with("Understanding"));
        assert!(
            result
                .sources
                .iter()
                .all(|s| s.title.starts_with("Understanding")
                    || s.title.contains("What is quantum computing?"))
        );
    }

    #[test]
    fn test_ids_are_dense_from_one() {
        let result = SimulatedSources::new().search("explain relativity", 6);
        let ids: Vec<u32> = result.sources.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_news_branch_emits_two_extra() {
        let result = SimulatedSources::new().search("latest news on fusion", 10);
        assert_eq!(result.sources.len(), 4);
        assert_eq!(result.sources[0].domain, "example-news.com");
        assert_eq!(result.sources[1].domain, "research-institute.org");
    }

    #[test]
    fn test_how_to_branch() {
        let result = SimulatedSources::new().search("how to brew coffee", 10);
        assert_eq!(result.sources.len(), 3);
        assert!(result.sources[0].title.starts_with("Complete Guide:"));
    }

    #[test]
    fn test_generic_query_yields_general_sources_only() {
        let result = SimulatedSources::new().search("rust borrow checker", 10);
        assert_eq!(result.sources.len(), 2);
        assert_eq!(result.sources[0].domain, "expert-network.com");
        assert_eq!(result.sources[1].domain, "data-center.org");
    }

    #[test]
    fn test_branches_combine() {
        let result = SimulatedSources::new().search("what is the latest guide", 10);
        // news (2) + guide (1) + what-is (1) + general (2)
        assert_eq!(result.sources.len(), 6);
    }

    #[test]
    fn test_cap_renumbers_ids() {
        let result = SimulatedSources::new().search("latest news", 2);
        assert_eq!(result.sources.len(), 2);
        assert_eq!(result.total_results, 2);
        let ids: Vec<u32> = result.sources.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_records_carry_metadata() {
        let result = SimulatedSources::new().search("anything", 10);
        for source in &result.sources {
            assert!(source.favicon.as_deref().unwrap().contains("placehold.co"));
            let date = source.published_date.as_deref().unwrap();
            assert_eq!(date.len(), 10, "expected YYYY-MM-DD, got {date}");
        }
    }
}
