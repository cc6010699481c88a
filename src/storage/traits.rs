//! Checkpoint traits and error types
//!
//! This module defines the interface the crawl loop uses to persist and
//! restore its state between runs.

use crate::state::CrawlState;
use crate::storage::{CheckpointMeta, CheckpointRecord};
use thiserror::Error;

/// Errors that can occur during checkpoint operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt checkpoint: {0}")]
    Corrupt(String),
}

/// Result type for checkpoint operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Persistent snapshot of a crawl's progress
///
/// Snapshots are only taken right after a batch has been written (and at the
/// end of a run), so everything recorded as visited has its document on disk.
pub trait Checkpoint {
    /// Returns the last snapshot, or `None` if nothing was saved yet
    fn load(&self) -> StorageResult<Option<CheckpointRecord>>;

    /// Replaces the stored snapshot with the given state
    fn save(&mut self, state: &CrawlState, meta: &CheckpointMeta) -> StorageResult<()>;

    /// Deletes the stored snapshot
    fn clear(&mut self) -> StorageResult<()>;
}
