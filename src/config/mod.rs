//! Configuration module for Docscribe
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional; command-line values override the file.
//!
//! # Example
//!
//! ```no_run
//! use docscribe::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("docscribe.toml")).unwrap();
//! println!("Batch size: {}", config.output.batch_size);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, UserAgentConfig, DEFAULT_EXCLUDED_PATHS,
};

// Re-export parser functions
pub use parser::{load_config, read_config, resolve_config, scope_fingerprint, ConfigOverrides};
pub use validation::validate;
