//! Phone-Harvest: a concurrent phone-number crawler
//!
//! This crate fetches a search-results page for a query, follows every absolute
//! link found on it concurrently, and collects the phone-number patterns found
//! on each linked page into a deduplicated, per-URL result set.

pub mod config;
pub mod crawler;
pub mod output;
pub mod phone;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Phone-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Search query is empty")]
    EmptyQuery,

    #[error("Seed page unreachable: {0}")]
    SeedFetch(#[source] crawler::FetchError),

    #[error("Crawl cancelled before fan-out started")]
    Cancelled,

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Invalid search endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Phone-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlReport, Crawler, FetchError, SearchQuery};
pub use phone::PhoneMatcher;
pub use state::{CrawlPhase, LinkState};
pub use storage::{ResultSnapshot, ResultStore};
