//! State tracking module for Docscribe
//!
//! This module defines the per-run crawl state (visited set and frontier)
//! and the ways a crawl can end.

mod crawl_state;

pub use crawl_state::CrawlState;

use std::fmt;

/// How a crawl run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// The frontier emptied; every reachable page was visited
    Drained,

    /// An external cancellation stopped the loop after an orderly flush
    Cancelled,

    /// A batch file could not be written
    Aborted,
}

impl CrawlOutcome {
    /// Returns true if the crawl can be continued from its checkpoint
    pub fn is_resumable(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Aborted)
    }
}

impl fmt::Display for CrawlOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Drained => "drained",
            Self::Cancelled => "cancelled",
            Self::Aborted => "aborted",
        };
        write!(f, "{}", s)
    }
}
