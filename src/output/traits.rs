//! Output handler traits and types
//!
//! This module defines the trait interface every report writer implements.

use crate::crawler::CrawlReport;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for output handlers
///
/// An output handler renders a finished crawl somewhere: a terminal, a file,
/// a buffer in tests.
pub trait OutputHandler {
    /// Writes the report
    fn emit(&mut self, report: &CrawlReport) -> OutputResult<()>;

    /// Short name used in log messages
    fn name(&self) -> &str;
}
