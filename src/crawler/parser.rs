//! HTML link extraction
//!
//! Collects the `href` of every anchor element and keeps the values that are
//! well-formed absolute URIs. Parsing goes through html5ever (via `scraper`),
//! which recovers a tree from any input, so broken markup never aborts
//! extraction.

use crate::url::parse_absolute;
use scraper::{Html, Selector};
use std::collections::BTreeSet;

/// Extracts the deduplicated set of absolute links from an HTML document
///
/// Each link is the `href` value as written, minus surrounding whitespace.
/// Relative links, fragment-only links, and malformed URIs are dropped
/// without being reported.
///
/// # Example
///
/// ```
/// use phone_harvest::crawler::extract_links;
///
/// let html = r##"<a href="https://a.example/x">A</a><a href="/rel">R</a><a href="#top">T</a>"##;
/// let links = extract_links(html);
/// assert_eq!(links.len(), 1);
/// assert!(links.contains("https://a.example/x"));
/// ```
pub fn extract_links(html: &str) -> BTreeSet<String> {
    let document = Html::parse_document(html);

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return BTreeSet::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::trim)
        .filter(|href| parse_absolute(href).is_some())
        .map(str::to_string)
        .collect()
}
