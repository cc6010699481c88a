//! Crawl run summary
//!
//! Counters collected by the crawl loop and a plain-text rendering for the
//! operator.

use crate::state::CrawlOutcome;
use chrono::{DateTime, Utc};

/// Summary of one crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// How the run ended
    pub outcome: CrawlOutcome,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// URLs fetched (or attempted) during this run
    pub pages_visited: u64,

    /// Fetches that failed (network error, timeout, non-2xx)
    pub fetch_failures: u64,

    /// Pages that had an article and produced a document
    pub content_pages: u64,

    /// Documents written to batch files during this run
    pub documents_written: usize,

    /// Batch files written during this run
    pub batches_written: usize,

    /// Links admitted to the frontier during this run
    pub links_admitted: u64,

    /// URLs still waiting when the run stopped
    pub frontier_remaining: usize,

    /// Documents extracted but not persisted (aborted runs only)
    pub documents_lost: usize,
}

impl CrawlReport {
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    /// Share of visited pages that were fetched successfully, in percent
    pub fn success_rate(&self) -> f64 {
        if self.pages_visited == 0 {
            0.0
        } else {
            let ok = self.pages_visited - self.fetch_failures;
            (ok as f64 / self.pages_visited as f64) * 100.0
        }
    }
}

/// Formats a report as the text shown at the end of a crawl
pub fn format_report(report: &CrawlReport) -> String {
    let mut out = String::new();
    out.push_str("=== Crawl Summary ===\n\n");
    out.push_str(&format!("Outcome: {}\n", report.outcome));
    out.push_str(&format!(
        "Started: {}\n",
        report.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!("Duration: {} seconds\n\n", report.duration_seconds()));

    out.push_str("Pages:\n");
    out.push_str(&format!("  Visited: {}\n", report.pages_visited));
    out.push_str(&format!("  Fetch failures: {}\n", report.fetch_failures));
    out.push_str(&format!("  Content pages: {}\n", report.content_pages));
    out.push_str(&format!("  Links admitted: {}\n", report.links_admitted));
    out.push_str(&format!(
        "  Still in frontier: {}\n\n",
        report.frontier_remaining
    ));

    out.push_str("Output:\n");
    out.push_str(&format!("  Documents written: {}\n", report.documents_written));
    out.push_str(&format!("  Batch files written: {}\n", report.batches_written));
    if report.documents_lost > 0 {
        out.push_str(&format!("  Documents lost: {}\n", report.documents_lost));
    }
    out.push('\n');

    out.push_str(&format!(
        "Success Rate: {:.1}% ({} / {} pages fetched)\n",
        report.success_rate(),
        report.pages_visited - report.fetch_failures,
        report.pages_visited
    ));

    if report.outcome.is_resumable() {
        out.push_str("\nRun again without --fresh to resume from the last checkpoint.\n");
    }
    out
}

/// Prints a report to stdout
pub fn print_report(report: &CrawlReport) {
    print!("{}", format_report(report));
}
