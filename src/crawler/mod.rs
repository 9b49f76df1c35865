//! Crawler module for page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - Single-attempt HTTP fetching with a per-fetch timeout
//! - HTML parsing and absolute link extraction
//! - Bounded concurrent fan-out with a join barrier
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::{CrawlReport, CrawlSettings, Crawler, LinkReport, SearchQuery};
pub use fetcher::{
    build_http_client, is_text_content_type, FetchError, HttpFetcher, PageContent, PageFetch,
};
pub use parser::extract_links;
pub use scheduler::{FetchPool, JoinOutcome};

use crate::config::Config;
use crate::HarvestError;

/// Runs a complete crawl for `query` with an HTTP fetcher
///
/// This is the main entry point for a one-shot crawl. It will:
/// 1. Build the HTTP client from the user agent configuration
/// 2. Fetch the search-results page for the query
/// 3. Extract absolute links from it
/// 4. Fetch and scan every link concurrently
/// 5. Return the merged report
pub async fn crawl(config: &Config, query: &SearchQuery) -> Result<CrawlReport, HarvestError> {
    Crawler::from_config(config)?.run(query).await
}
