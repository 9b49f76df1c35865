//! Markdown report generation
//!
//! This module generates a human-readable markdown report of a crawl,
//! including run information, statistics, findings, and failed links.

use crate::crawler::CrawlReport;
use crate::output::stats::CrawlStatistics;
use crate::output::traits::{OutputError, OutputHandler, OutputResult};
use crate::state::LinkState;
use std::fmt::Write as _;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Generates a markdown report and writes it to `output_path`
pub fn generate_markdown_report(report: &CrawlReport, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_report(report);

    let mut file = File::create(output_path).map_err(|e| {
        OutputError::Write(format!("cannot create {}: {}", output_path.display(), e))
    })?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl report as markdown
pub fn format_markdown_report(report: &CrawlReport) -> String {
    let stats = CrawlStatistics::from_report(report);
    let mut md = String::new();

    md.push_str("# Phone-Harvest Crawl Report\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    if let Some(query) = &report.query {
        let _ = writeln!(md, "- **Query**: {}", query);
    }
    let _ = writeln!(md, "- **Seed**: {}", report.seed_url);
    let _ = writeln!(md, "- **Started**: {}", report.started_at.to_rfc3339());
    let _ = writeln!(
        md,
        "- **Duration**: {:.2} seconds",
        report.duration.as_secs_f64()
    );
    let _ = writeln!(md, "- **Status**: {}\n", report.phase);

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    let _ = writeln!(md, "- **Links Extracted**: {}", stats.links_extracted);
    let _ = writeln!(md, "- **Unique Domains**: {}", stats.unique_domains);
    let _ = writeln!(md, "- **Pages With Matches**: {}", stats.pages_with_matches);
    let _ = writeln!(md, "- **Distinct Numbers**: {}", stats.distinct_numbers);
    let _ = writeln!(md, "- **Success Rate**: {:.2}%\n", stats.success_rate());

    // State breakdown
    md.push_str("## Link State Breakdown\n\n");
    md.push_str("| State | Count |\n");
    md.push_str("|-------|-------|\n");
    for state in LinkState::all_states() {
        let count = stats.links_by_state.get(&state).copied().unwrap_or(0);
        let _ = writeln!(md, "| {} | {} |", state.label(), count);
    }
    md.push('\n');

    // Findings
    md.push_str("## Findings\n\n");
    if report.results.is_empty() {
        md.push_str("_No phone numbers found._\n\n");
    } else {
        for (url, numbers) in &report.results {
            let _ = writeln!(md, "### <{}>\n", url);
            for number in numbers {
                let _ = writeln!(md, "- `{}`", number);
            }
            md.push('\n');
        }
    }

    // Failures
    let failures: Vec<_> = report.failures().collect();
    if !failures.is_empty() {
        md.push_str("## Failed Links\n\n");
        md.push_str("| URL | State | Cause |\n");
        md.push_str("|-----|-------|-------|\n");
        for (url, error) in failures {
            let _ = writeln!(
                md,
                "| {} | {} | {} |",
                escape_cell(url),
                error.state().label(),
                escape_cell(&error.to_string())
            );
        }
        md.push('\n');
    }

    // Tasks that never reported
    if !report.lost_links.is_empty() {
        md.push_str("## Lost Links\n\n");
        md.push_str("_Fetch tasks for these links ended without reporting._\n\n");
        for url in &report.lost_links {
            let _ = writeln!(md, "- <{}>", url);
        }
        md.push('\n');
    }

    md
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

/// Writes the markdown report to a file
pub struct MarkdownReport {
    path: PathBuf,
}

impl MarkdownReport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutputHandler for MarkdownReport {
    fn emit(&mut self, report: &CrawlReport) -> OutputResult<()> {
        generate_markdown_report(report, &self.path)?;
        tracing::info!("Markdown report written to {}", self.path.display());
        Ok(())
    }

    fn name(&self) -> &str {
        "markdown"
    }
}
