//! HTTP fetcher implementation
//!
//! This module handles every HTTP request the crawler makes:
//! - Building the shared HTTP client with a proper user agent string
//! - Single-attempt GET requests bounded by a per-fetch timeout
//! - Rejecting non-success statuses and non-text content
//! - Classifying failures into values the orchestrator can inspect
//!
//! There is no retry logic: each URL is fetched at most once per run.

use crate::config::UserAgentConfig;
use crate::state::LinkState;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Upper bound on connection establishment, independent of the fetch timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Content types accepted besides `text/*`
const ACCEPTED_MARKUP_TYPES: [&str; 2] = ["application/xhtml+xml", "application/xml"];

/// Body of a successfully fetched page
///
/// Owned by the task that fetched it and dropped once scanned.
#[derive(Debug, Clone)]
pub struct PageContent {
    /// The URL that was requested
    pub url: String,

    /// Final URL after redirects
    pub final_url: String,

    /// HTTP status code
    pub status_code: u16,

    /// Content-Type header value, if any
    pub content_type: Option<String>,

    /// Decoded page text
    pub body: String,
}

/// Why a single fetch failed
///
/// Every variant carries the URL so a logged error always identifies the
/// offending link.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("non-text content from {url}: {content_type}")]
    ContentMismatch { url: String, content_type: String },

    #[error("could not connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// The URL whose fetch failed
    pub fn url(&self) -> &str {
        match self {
            Self::Timeout { url, .. }
            | Self::Status { url, .. }
            | Self::ContentMismatch { url, .. }
            | Self::Connect { url, .. }
            | Self::Request { url, .. }
            | Self::Body { url, .. } => url,
        }
    }

    /// Maps this failure onto the link state it leaves the link in
    pub fn state(&self) -> LinkState {
        match self {
            Self::Timeout { .. } => LinkState::TimedOut,
            Self::Status { status, .. }
                if *status == StatusCode::NOT_FOUND.as_u16()
                    || *status == StatusCode::GONE.as_u16() =>
            {
                LinkState::DeadLink
            }
            Self::Status { .. } => LinkState::HttpError,
            Self::ContentMismatch { .. } => LinkState::ContentMismatch,
            Self::Connect { .. } => LinkState::Unreachable,
            Self::Request { .. } | Self::Body { .. } => LinkState::Failed,
        }
    }

    fn from_reqwest(url: &str, timeout: Duration, error: reqwest::Error) -> Self {
        let url = url.to_string();
        if error.is_timeout() {
            Self::Timeout { url, timeout }
        } else if error.is_connect() {
            Self::Connect { url, source: error }
        } else {
            Self::Request { url, source: error }
        }
    }
}

/// Something that can fetch a page body
///
/// The crawler is generic over this seam; [`HttpFetcher`] is the production
/// implementation. Implementations must make a single attempt and report
/// failures as values.
pub trait PageFetch: Send + Sync + 'static {
    /// Fetches `url`, giving up after `timeout`
    fn fetch(
        &self,
        url: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<PageContent, FetchError>> + Send;
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use phone_harvest::config::UserAgentConfig;
/// use phone_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .connect_timeout(CONNECT_TIMEOUT)
        .gzip(true)
        .brotli(true)
        .build()
}

/// `reqwest`-backed page fetcher
///
/// Holds one pooled client shared by every fetch of a run.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a freshly built client
    pub fn new(user_agent: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(user_agent)?))
    }

    /// Wraps an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl PageFetch for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<PageContent, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, timeout, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        if let Some(content_type) = &content_type {
            if !is_text_content_type(content_type) {
                return Err(FetchError::ContentMismatch {
                    url: url.to_string(),
                    content_type: content_type.clone(),
                });
            }
        }

        let final_url = response.url().to_string();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                    timeout,
                }
            } else {
                FetchError::Body {
                    url: url.to_string(),
                    source: e,
                }
            }
        })?;

        Ok(PageContent {
            url: url.to_string(),
            final_url,
            status_code: status.as_u16(),
            content_type,
            body,
        })
    }
}

/// Returns true if a Content-Type header denotes scannable text
pub fn is_text_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence.starts_with("text/") || ACCEPTED_MARKUP_TYPES.contains(&essence.as_str())
}
