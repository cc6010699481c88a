//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching
//! - HTML parsing, content extraction and link discovery
//! - Frontier management under the admission policy
//! - Overall crawl coordination

mod coordinator;
pub mod extractor;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::{run_crawl, Coordinator, DynBatchWriter};
pub use extractor::extract_content;
pub use fetcher::{build_http_client, fetch_page, FetchResult};
pub use frontier::FrontierManager;
pub use parser::{parse_page, ParsedPage};

use crate::config::Config;
use crate::output::CrawlReport;
use crate::ScribeError;

/// Runs a complete crawl, resuming from a checkpoint when one applies
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Open the output directory and checkpoint
/// 2. Resume the saved frontier or seed it with the base URL
/// 3. Fetch pages and follow admitted links until the frontier drains
/// 4. Write documents in batches and return the run summary
pub async fn crawl(config: Config) -> Result<CrawlReport, ScribeError> {
    run_crawl(config, false).await
}
