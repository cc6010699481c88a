//! Frontier manager
//!
//! Owns the crawl state and applies the admission policy to every link
//! discovered on a page. The frontier is FIFO, so a crawl from the same site
//! visits pages in the same, breadth-first order every time.

use crate::state::CrawlState;
use crate::url::{resolve_link, AdmissionPolicy};
use crate::FrontierError;
use url::Url;

/// Frontier and visited-set manager for one crawl run
#[derive(Debug, Clone)]
pub struct FrontierManager {
    state: CrawlState,
    policy: AdmissionPolicy,
}

impl FrontierManager {
    /// Creates an empty frontier; call [`seed`](Self::seed) to add the start URL
    pub fn new(policy: AdmissionPolicy) -> Self {
        Self::with_state(policy, CrawlState::new())
    }

    /// Creates a frontier around an existing (resumed) state
    pub fn with_state(policy: AdmissionPolicy, state: CrawlState) -> Self {
        Self { state, policy }
    }

    /// Queues the policy's base URL; returns false if it was already known
    pub fn seed(&mut self) -> bool {
        let base = self.policy.base_url().as_str().to_string();
        self.state.push(base)
    }

    /// Removes the next URL from the frontier
    ///
    /// `Err(FrontierError::EmptyFrontier)` means the crawl is done.
    pub fn pop(&mut self) -> Result<String, FrontierError> {
        self.state.pop()
    }

    /// Moves a URL into the visited set; idempotent
    pub fn mark_visited(&mut self, url: &str) {
        self.state.mark_visited(url);
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.state.is_visited(url)
    }

    /// Returns true if the URL passes the admission policy
    pub fn admits(&self, url: &str) -> bool {
        self.policy.admits_str(url)
    }

    /// Offers links discovered on `page_url` to the frontier
    ///
    /// Each href is resolved against the page URL and admitted only if it is
    /// unknown to the crawl and passes every admission rule. Rejected links are
    /// dropped without error. Returns the number of links admitted.
    pub fn offer<S: AsRef<str>>(&mut self, candidates: &[S], page_url: &Url) -> usize {
        let mut admitted = 0;

        for href in candidates {
            let Some(absolute) = resolve_link(href.as_ref(), page_url) else {
                continue;
            };

            if !self.policy.admits(&absolute) {
                tracing::trace!("Rejected link: {}", absolute);
                continue;
            }

            if self.state.push(absolute.to_string()) {
                admitted += 1;
            }
        }

        admitted
    }

    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    pub fn policy(&self) -> &AdmissionPolicy {
        &self.policy
    }
}
