//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that ties together:
//! - Resuming from (or starting over without) a checkpoint
//! - Popping URLs from the frontier and fetching them
//! - Extracting content and offering discovered links
//! - Batching documents to disk and checkpointing after each batch
//! - Cooperative cancellation

use crate::config::{scope_fingerprint, Config};
use crate::crawler::frontier::FrontierManager;
use crate::crawler::{build_http_client, fetch_page, parse_page, FetchResult};
use crate::document::Document;
use crate::output::{BatchAccumulator, BatchWriter, CrawlReport, FileBatchWriter, FlushError};
use crate::state::{CrawlOutcome, CrawlState};
use crate::storage::{
    Checkpoint, CheckpointMeta, RunStatus, SqliteCheckpoint, CHECKPOINT_FILE,
};
use crate::url::AdmissionPolicy;
use crate::{FrontierError, ScribeError};
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Boxed batch sink used by the coordinator
pub type DynBatchWriter = Box<dyn BatchWriter + Send>;

#[derive(Debug, Default)]
struct RunCounters {
    pages_visited: u64,
    fetch_failures: u64,
    content_pages: u64,
    links_admitted: u64,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    client: Client,
    frontier: FrontierManager,
    batches: BatchAccumulator<DynBatchWriter>,
    checkpoint: Option<Box<dyn Checkpoint + Send>>,
    fingerprint: String,
    cancel: Arc<AtomicBool>,
    counters: RunCounters,
    last_report: Option<CrawlReport>,
}

impl Coordinator {
    /// Creates a coordinator writing batch files to the configured directory
    ///
    /// When checkpointing is enabled, a `running` checkpoint with the same
    /// scope is resumed unless `fresh` is set. Otherwise the frontier is
    /// seeded with the base URL and batch files left by an earlier crawl
    /// are removed, since numbering starts again at 1.
    pub fn new(config: Config, fresh: bool) -> Result<Self, ScribeError> {
        let writer = FileBatchWriter::new(&config.output.directory, &config.output.file_prefix)?;

        let mut checkpoint: Option<Box<dyn Checkpoint + Send>> = if config.output.checkpoint {
            let path = Path::new(&config.output.directory).join(CHECKPOINT_FILE);
            Some(Box::new(SqliteCheckpoint::new(&path)?))
        } else {
            None
        };

        let resume = match checkpoint.as_mut() {
            Some(store) => resume_point(&mut **store, &scope_fingerprint(&config.crawler), fresh)?,
            None => None,
        };

        if resume.is_none() {
            let removed = writer.remove_batches()?;
            if removed > 0 {
                tracing::warn!(
                    "Removed {} batch files left by an earlier crawl in {}",
                    removed,
                    writer.directory().display()
                );
            }
        }

        Self::assemble(config, Box::new(writer), checkpoint, resume)
    }

    /// Creates a coordinator around a custom batch sink, without a checkpoint
    pub fn with_writer(config: Config, writer: DynBatchWriter) -> Result<Self, ScribeError> {
        Self::assemble(config, writer, None, None)
    }

    fn assemble(
        config: Config,
        writer: DynBatchWriter,
        checkpoint: Option<Box<dyn Checkpoint + Send>>,
        resume: Option<(CrawlState, u32)>,
    ) -> Result<Self, ScribeError> {
        let policy = AdmissionPolicy::from_config(&config.crawler)?;
        let fingerprint = scope_fingerprint(&config.crawler);
        let client = build_http_client(&config)?;

        let (frontier, batches) = match resume {
            Some((state, next_batch)) => (
                FrontierManager::with_state(policy, state),
                BatchAccumulator::starting_at(writer, config.output.batch_size, next_batch),
            ),
            None => {
                let mut frontier = FrontierManager::new(policy);
                frontier.seed();
                tracing::info!("Seeded frontier with {}", frontier.policy().base_url());
                (
                    frontier,
                    BatchAccumulator::new(writer, config.output.batch_size),
                )
            }
        };

        Ok(Self {
            config,
            client,
            frontier,
            batches,
            checkpoint,
            fingerprint,
            cancel: Arc::new(AtomicBool::new(false)),
            counters: RunCounters::default(),
            last_report: None,
        })
    }

    /// Flag that stops the crawl at the next iteration when set
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Requests cancellation; the current page finishes first
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    pub fn frontier(&self) -> &FrontierManager {
        &self.frontier
    }

    /// Report of the last finished run, including aborted ones
    pub fn last_report(&self) -> Option<&CrawlReport> {
        self.last_report.as_ref()
    }

    /// Runs the crawl loop until the frontier drains or cancellation is requested
    ///
    /// Fetch failures are logged and skipped. A batch that cannot be written
    /// aborts the run with [`ScribeError::Persistence`]; the checkpoint then
    /// still describes the last batch that reached the disk.
    pub async fn run(&mut self) -> Result<CrawlReport, ScribeError> {
        let started_at = Utc::now();
        self.counters = RunCounters::default();
        tracing::info!("Starting crawl of {}", self.frontier.policy().base_url());

        let outcome = match self.crawl_loop().await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!("Aborting crawl: {}", err);
                let lost = err.pending;
                self.last_report = Some(self.report(CrawlOutcome::Aborted, started_at, lost));
                return Err(err.into());
            }
        };

        if let Err(err) = self.batches.flush() {
            tracing::error!("Aborting crawl: {}", err);
            let lost = err.pending;
            self.last_report = Some(self.report(CrawlOutcome::Aborted, started_at, lost));
            return Err(err.into());
        }

        let status = match outcome {
            CrawlOutcome::Drained => RunStatus::Completed,
            _ => RunStatus::Running,
        };
        self.save_checkpoint(status)?;

        match outcome {
            CrawlOutcome::Drained => tracing::info!("Frontier is empty, crawl complete"),
            _ => tracing::info!(
                "Crawl cancelled with {} URLs left in frontier",
                self.frontier.state().frontier_len()
            ),
        }

        let report = self.report(outcome, started_at, 0);
        self.last_report = Some(report.clone());
        Ok(report)
    }

    async fn crawl_loop(&mut self) -> Result<CrawlOutcome, FlushError> {
        let delay = Duration::from_millis(self.config.crawler.request_delay_ms);

        loop {
            if self.cancel.load(Ordering::SeqCst) {
                return Ok(CrawlOutcome::Cancelled);
            }

            let url = match self.frontier.pop() {
                Ok(url) => url,
                Err(FrontierError::EmptyFrontier) => return Ok(CrawlOutcome::Drained),
            };

            if self.frontier.is_visited(&url) || !self.frontier.admits(&url) {
                continue;
            }

            self.frontier.mark_visited(&url);
            self.counters.pages_visited += 1;
            tracing::info!("Visiting {}", url);

            self.process_url(&url).await?;

            if self.counters.pages_visited % 50 == 0 {
                tracing::info!(
                    "Progress: {} pages visited, {} in frontier, {} documents written",
                    self.counters.pages_visited,
                    self.frontier.state().frontier_len(),
                    self.batches.documents_written()
                );
            }

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }

    /// Fetches one URL, offers its links and buffers its document
    async fn process_url(&mut self, url: &str) -> Result<(), FlushError> {
        let body = match fetch_page(&self.client, url).await {
            FetchResult::Success { body, .. } => body,
            failure => {
                self.counters.fetch_failures += 1;
                tracing::warn!(
                    "Failed to fetch {}: {}",
                    url,
                    failure.failure_reason().unwrap_or_default()
                );
                return Ok(());
            }
        };

        let parsed = parse_page(&body);

        // Links first, so a checkpoint taken at the flush below includes them
        match Url::parse(url) {
            Ok(page_url) => {
                let admitted = self.frontier.offer(parsed.hrefs.as_slice(), &page_url);
                self.counters.links_admitted += admitted as u64;
                tracing::debug!("Admitted {} of {} links from {}", admitted, parsed.hrefs.len(), url);
            }
            Err(e) => tracing::debug!("Cannot resolve links against {}: {}", url, e),
        }

        let Some(content) = parsed.content else {
            tracing::debug!("No article on {}", url);
            return Ok(());
        };
        self.counters.content_pages += 1;

        let document = Document::new(url, parsed.title, content);
        if let Some(receipt) = self.batches.add(document)? {
            tracing::debug!("Batch {} written to {}", receipt.batch_number, receipt.path.display());
            if let Err(e) = self.save_checkpoint(RunStatus::Running) {
                tracing::warn!("Failed to save checkpoint: {}", e);
            }
        }

        Ok(())
    }

    fn save_checkpoint(&mut self, status: RunStatus) -> Result<(), ScribeError> {
        let Some(store) = self.checkpoint.as_mut() else {
            return Ok(());
        };

        let meta = CheckpointMeta {
            scope_fingerprint: self.fingerprint.clone(),
            status,
            next_batch: self.batches.batch_number(),
        };
        store.save(self.frontier.state(), &meta)?;
        tracing::debug!(
            "Checkpoint saved: {} visited, {} in frontier",
            self.frontier.state().visited_len(),
            self.frontier.state().frontier_len()
        );
        Ok(())
    }

    fn report(
        &self,
        outcome: CrawlOutcome,
        started_at: DateTime<Utc>,
        documents_lost: usize,
    ) -> CrawlReport {
        CrawlReport {
            outcome,
            started_at,
            finished_at: Utc::now(),
            pages_visited: self.counters.pages_visited,
            fetch_failures: self.counters.fetch_failures,
            content_pages: self.counters.content_pages,
            documents_written: self.batches.documents_written(),
            batches_written: self.batches.batches_written(),
            links_admitted: self.counters.links_admitted,
            frontier_remaining: self.frontier.state().frontier_len(),
            documents_lost,
        }
    }
}

/// Returns the state and next batch number to continue from, if any
///
/// `fresh` clears the stored checkpoint instead.
fn resume_point<C: Checkpoint + ?Sized>(
    store: &mut C,
    fingerprint: &str,
    fresh: bool,
) -> Result<Option<(CrawlState, u32)>, ScribeError> {
    if fresh {
        store.clear()?;
        return Ok(None);
    }

    let Some(record) = store.load()? else {
        return Ok(None);
    };

    if record.resumable_for(fingerprint) {
        tracing::info!(
            "Resuming crawl saved at {}: {} visited, {} in frontier, next batch {}",
            record.updated_at,
            record.state.visited_len(),
            record.state.frontier_len(),
            record.meta.next_batch
        );
        Ok(Some((record.state, record.meta.next_batch)))
    } else {
        if record.meta.status == RunStatus::Running {
            tracing::info!("Checkpoint belongs to a different crawl scope, starting over");
        } else {
            tracing::info!("Previous crawl completed, starting a new one");
        }
        Ok(None)
    }
}

/// Runs a crawl with the file writer and checkpoint described by `config`
///
/// # Example
///
/// ```no_run
/// use docscribe::config::load_config;
/// use docscribe::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("docscribe.toml"))?;
/// let report = run_crawl(config, false).await?;
/// println!("{} documents written", report.documents_written);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config, fresh: bool) -> Result<CrawlReport, ScribeError> {
    let mut coordinator = Coordinator::new(config, fresh)?;
    coordinator.run().await
}
