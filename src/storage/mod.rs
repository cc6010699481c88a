//! Storage module for resumable crawls
//!
//! This module keeps an on-disk checkpoint of the crawl state:
//! - Visited URLs and the frontier in pop order
//! - The number of the next batch file
//! - The crawl scope the snapshot belongs to

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteCheckpoint;
pub use traits::{Checkpoint, StorageError, StorageResult};

use crate::state::CrawlState;

/// File name of the checkpoint database inside the output directory
pub const CHECKPOINT_FILE: &str = ".docscribe-checkpoint.db";

/// Status of the run a checkpoint belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Stopped before the frontier drained; can be resumed
    Running,
    /// The frontier drained
    Completed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Run-level values stored alongside the crawl state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointMeta {
    /// Fingerprint of the crawl scope (see `config::scope_fingerprint`)
    pub scope_fingerprint: String,
    pub status: RunStatus,
    /// Number of the next batch file to write
    pub next_batch: u32,
}

/// A loaded checkpoint
#[derive(Debug, Clone)]
pub struct CheckpointRecord {
    pub meta: CheckpointMeta,
    pub state: CrawlState,
    /// RFC 3339 timestamp of the save
    pub updated_at: String,
}

impl CheckpointRecord {
    /// Returns true if a crawl with this fingerprint should continue from here
    pub fn resumable_for(&self, scope_fingerprint: &str) -> bool {
        self.meta.status == RunStatus::Running && self.meta.scope_fingerprint == scope_fingerprint
    }
}
