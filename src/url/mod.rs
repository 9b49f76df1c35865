//! URL handling module for Phone-Harvest
//!
//! This module provides search URL construction, absolute-URL validation for
//! extracted links, and domain extraction for reporting.

mod domain;

pub use domain::extract_domain;

use crate::HarvestError;
use url::Url;

/// Builds the seed URL for a search query
///
/// The query is form-encoded and appended as `parameter=query`; any query
/// string already present on the endpoint is kept.
///
/// # Example
///
/// ```
/// use phone_harvest::url::build_search_url;
///
/// let url = build_search_url("https://www.bing.com/search", "q", "高校").unwrap();
/// assert_eq!(url.as_str(), "https://www.bing.com/search?q=%E9%AB%98%E6%A0%A1");
/// ```
pub fn build_search_url(endpoint: &str, parameter: &str, query: &str) -> Result<Url, HarvestError> {
    let mut url = Url::parse(endpoint)?;

    if url.cannot_be_a_base() || !url.has_host() {
        return Err(HarvestError::InvalidEndpoint(endpoint.to_string()));
    }

    url.query_pairs_mut().append_pair(parameter, query);
    Ok(url)
}

/// Parses an `href` value, keeping it only if it is a well-formed absolute URI
///
/// An absolute URI here has both a scheme and a host. Relative paths,
/// fragment-only references, scheme-only forms such as `mailto:` or
/// `javascript:`, and values containing interior whitespace or control
/// characters are rejected.
pub fn parse_absolute(href: &str) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return None;
    }

    let url = Url::parse(href).ok()?;

    if url.cannot_be_a_base() || url.host_str().map_or(true, str::is_empty) {
        return None;
    }

    Some(url)
}
