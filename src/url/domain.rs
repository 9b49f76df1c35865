use url::Url;

/// Extracts the lowercase host of a URL
///
/// Used when summarising a crawl, to count how many distinct sites
/// contributed links or matches.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use phone_harvest::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}
