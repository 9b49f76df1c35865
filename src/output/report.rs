//! Plain-text findings report
//!
//! One block per URL with at least one match:
//!
//! ```text
//! URL: https://a.example/x
//!  - Phone: 021-12345678
//! ```

use crate::crawler::CrawlReport;
use crate::output::traits::{OutputHandler, OutputResult};
use crate::storage::ResultSnapshot;
use std::fmt::Write as _;
use std::io::Write;

/// Formats the findings of a snapshot, URLs and numbers in sorted order
///
/// URLs without matches never appear, so an empty snapshot yields an empty
/// string.
pub fn format_text_report(results: &ResultSnapshot) -> String {
    let mut out = String::new();
    for (url, numbers) in results {
        if numbers.is_empty() {
            continue;
        }
        let _ = writeln!(out, "URL: {}", url);
        for number in numbers {
            let _ = writeln!(out, " - Phone: {}", number);
        }
    }
    out
}

/// Writes the findings report to any `Write` sink
pub struct TextReport<W: Write> {
    writer: W,
}

impl<W: Write> TextReport<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputHandler for TextReport<W> {
    fn emit(&mut self, report: &CrawlReport) -> OutputResult<()> {
        self.writer
            .write_all(format_text_report(&report.results).as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "text"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn snapshot(entries: &[(&str, &[&str])]) -> ResultSnapshot {
        entries
            .iter()
            .map(|(url, numbers)| {
                (
                    url.to_string(),
                    numbers.iter().map(|n| n.to_string()).collect::<BTreeSet<_>>(),
                )
            })
            .collect()
    }

    #[test]
    fn test_single_entry() {
        let results = snapshot(&[("https://a.example/x", &["021-12345678"])]);
        assert_eq!(
            format_text_report(&results),
            "URL: https://a.example/x\n - Phone: 021-12345678\n"
        );
    }

    #[test]
    fn test_sorted_output() {
        let results = snapshot(&[
            ("https://b.example/", &["0755-7654321", "021-12345678"]),
            ("https://a.example/", &["010-87654321"]),
        ]);
        assert_eq!(
            format_text_report(&results),
            "URL: https://a.example/\n - Phone: 010-87654321\n\
             URL: https://b.example/\n - Phone: 021-12345678\n - Phone: 0755-7654321\n"
        );
    }

    #[test]
    fn test_empty_entries_omitted() {
        let results = snapshot(&[("https://a.example/", &[])]);
        assert_eq!(format_text_report(&results), "");
        assert_eq!(format_text_report(&ResultSnapshot::new()), "");
    }
}
