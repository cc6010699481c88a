//! Docscribe: a documentation-site harvester
//!
//! This crate crawls a single documentation site, extracts the prose and code
//! blocks of every content page, and writes them to numbered batch files that
//! a retrieval pipeline can load back.

pub mod config;
pub mod crawler;
pub mod document;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Docscribe operations
#[derive(Debug, Error)]
pub enum ScribeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Checkpoint error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error(
        "Failed to write batch {batch_number} ({lost_documents} documents not persisted): {source}"
    )]
    Persistence {
        batch_number: u32,
        lost_documents: usize,
        source: output::OutputError,
    },

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<output::FlushError> for ScribeError {
    fn from(err: output::FlushError) -> Self {
        Self::Persistence {
            batch_number: err.batch_number,
            lost_documents: err.pending,
            source: err.source,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Frontier errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrontierError {
    /// No URL is left to visit. This ends the traversal; it is not reported as a failure.
    #[error("frontier is empty")]
    EmptyFrontier,
}

/// Result type alias for Docscribe operations
pub type Result<T> = std::result::Result<T, ScribeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use document::{CodeBlock, Document, PageContent};
pub use state::{CrawlOutcome, CrawlState};
pub use crate::url::{resolve_link, AdmissionPolicy, AdmissionRule};
