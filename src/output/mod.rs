//! Output module for rendering crawl results
//!
//! This module handles:
//! - The plain-text findings report written to stdout
//! - Markdown reports written to a file
//! - Crawl statistics

mod markdown;
mod report;
pub mod stats;
mod traits;

pub use markdown::{format_markdown_report, generate_markdown_report, MarkdownReport};
pub use report::{format_text_report, TextReport};
pub use stats::{format_statistics, print_statistics, CrawlStatistics};
pub use traits::{OutputError, OutputHandler, OutputResult};

use crate::crawler::CrawlReport;
use crate::Result;

/// Emits a report through every handler, stopping at the first failure
pub fn emit_all(handlers: &mut [Box<dyn OutputHandler + '_>], report: &CrawlReport) -> Result<()> {
    for handler in handlers.iter_mut() {
        tracing::debug!("Writing {} output", handler.name());
        handler.emit(report)?;
    }
    Ok(())
}
