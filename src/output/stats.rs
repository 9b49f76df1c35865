//! Statistics derived from a finished crawl
//!
//! This module provides functionality for summarising a crawl report and
//! printing the summary.

use crate::crawler::CrawlReport;
use crate::state::LinkState;
use crate::url::extract_domain;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::time::Duration;
use url::Url;

/// Crawl statistics summary
#[derive(Debug, Clone, Default)]
pub struct CrawlStatistics {
    /// Links extracted from the seed page
    pub links_extracted: usize,

    /// Links whose page was fetched
    pub succeeded: usize,

    /// Links that ended in a soft failure
    pub failed: usize,

    /// Count of links by final state
    pub links_by_state: BTreeMap<LinkState, usize>,

    /// Pages with at least one phone number
    pub pages_with_matches: usize,

    /// Distinct phone numbers across all pages
    pub distinct_numbers: usize,

    /// Distinct hosts among the reported links
    pub unique_domains: usize,

    /// Wall-clock duration of the run
    pub duration: Duration,
}

impl CrawlStatistics {
    /// Computes statistics from a crawl report
    pub fn from_report(report: &CrawlReport) -> Self {
        let unique_domains = report
            .links
            .iter()
            .filter_map(|link| Url::parse(&link.url).ok())
            .filter_map(|url| extract_domain(&url))
            .collect::<BTreeSet<_>>()
            .len();

        Self {
            links_extracted: report.links_extracted,
            succeeded: report.succeeded(),
            failed: report.failed(),
            links_by_state: report.count_by_state(),
            pages_with_matches: report.results.len(),
            distinct_numbers: report.distinct_numbers(),
            unique_domains,
            duration: report.duration,
        }
    }

    /// Percentage of extracted links whose page was fetched
    pub fn success_rate(&self) -> f64 {
        if self.links_extracted == 0 {
            return 0.0;
        }
        (self.succeeded as f64 / self.links_extracted as f64) * 100.0
    }
}

/// Formats statistics as indented plain text
pub fn format_statistics(stats: &CrawlStatistics) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Crawl Statistics ===\n");
    let _ = writeln!(out, "Overview:");
    let _ = writeln!(out, "  Links extracted: {}", stats.links_extracted);
    let _ = writeln!(out, "  Unique domains: {}", stats.unique_domains);
    let _ = writeln!(out, "  Pages with matches: {}", stats.pages_with_matches);
    let _ = writeln!(out, "  Distinct numbers: {}", stats.distinct_numbers);
    let _ = writeln!(out, "  Duration: {:.2}s", stats.duration.as_secs_f64());
    let _ = writeln!(out);

    if !stats.links_by_state.is_empty() {
        let _ = writeln!(out, "Links by State:");
        let mut by_count: Vec<_> = stats.links_by_state.iter().collect();
        by_count.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
        for (state, count) in by_count {
            let _ = writeln!(out, "  {}: {}", state.label(), count);
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(
        out,
        "Success Rate: {:.1}% ({} / {} links fetched)",
        stats.success_rate(),
        stats.succeeded,
        stats.links_extracted
    );

    out
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &CrawlStatistics) {
    print!("{}", format_statistics(stats));
}
