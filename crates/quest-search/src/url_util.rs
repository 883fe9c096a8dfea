//! URL helpers for source records

use url::Url;

/// Extract the hostname from a URL, falling back to a placeholder domain
/// when the URL does not parse or has no host.
pub fn extract_domain(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| "unknown-domain.com".to_string())
}

/// Placeholder favicon URL for a domain, using its uppercased initial.
pub fn generate_favicon(domain: &str) -> String {
    let initial = domain
        .chars()
        .next()
        .map(|c| c.to_ascii_uppercase())
        .unwrap_or('?');
    format!("https://placehold.co/16x16?text={initial}")
}

/// Whether the string parses as an absolute URL.
pub fn validate_url(url: &str) -> bool {
    Url::parse(url).is_ok()
}
