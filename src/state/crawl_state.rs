//! Visited set and frontier for a single crawl run
//!
//! The two sets are kept disjoint: a URL is either waiting in the frontier,
//! visited, or unknown. Once visited it never leaves the visited set.
use crate::FrontierError;
use std::collections::{HashSet, VecDeque};

/// Owned crawl state; one value per crawl run
#[derive(Debug, Clone, Default)]
pub struct CrawlState {
    visited: HashSet<String>,

    /// Frontier URLs in discovery order
    queue: VecDeque<String>,

    /// Membership index for `queue`
    queued: HashSet<String>,
}

impl CrawlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a state from persisted parts
    ///
    /// Frontier entries that are already visited or repeated are dropped so the
    /// invariants hold even for a hand-edited checkpoint.
    pub fn from_parts(
        visited: impl IntoIterator<Item = String>,
        frontier: impl IntoIterator<Item = String>,
    ) -> Self {
        let mut state = Self {
            visited: visited.into_iter().collect(),
            ..Self::default()
        };
        for url in frontier {
            state.push(url);
        }
        state
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn is_queued(&self, url: &str) -> bool {
        self.queued.contains(url)
    }

    /// Adds a URL to the frontier
    ///
    /// Returns false (and changes nothing) if the URL is already visited or
    /// already queued.
    pub fn push(&mut self, url: String) -> bool {
        if self.visited.contains(&url) || self.queued.contains(&url) {
            return false;
        }
        self.queued.insert(url.clone());
        self.queue.push_back(url);
        true
    }

    /// Removes and returns the oldest frontier URL
    pub fn pop(&mut self) -> Result<String, FrontierError> {
        let url = self.queue.pop_front().ok_or(FrontierError::EmptyFrontier)?;
        self.queued.remove(&url);
        Ok(url)
    }

    /// Records a URL as visited; returns false if it already was
    pub fn mark_visited(&mut self, url: &str) -> bool {
        if self.visited.contains(url) {
            return false;
        }
        if self.queued.remove(url) {
            self.queue.retain(|queued| queued != url);
        }
        self.visited.insert(url.to_string());
        true
    }

    pub fn visited(&self) -> impl Iterator<Item = &str> {
        self.visited.iter().map(String::as_str)
    }

    /// Frontier URLs in the order they will be popped
    pub fn frontier(&self) -> impl Iterator<Item = &str> {
        self.queue.iter().map(String::as_str)
    }

    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }

    pub fn frontier_len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_drained(&self) -> bool {
        self.queue.is_empty()
    }
}
