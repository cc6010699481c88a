use crate::config::types::{Config, CrawlerConfig};
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;
use url::Url;

/// Values supplied on the command line that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub output_directory: Option<String>,
}

/// Reads and parses a configuration file without validating it
///
/// Every key has a default, so an empty file yields [`Config::default`].
pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Loads, parses and validates a configuration file
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use docscribe::config::load_config;
///
/// let config = load_config(Path::new("docscribe.toml")).unwrap();
/// println!("Crawling: {}", config.crawler.base_url);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let config = read_config(path)?;
    validate(&config)?;
    Ok(config)
}

/// Builds the effective configuration from an optional file plus overrides
///
/// Validation runs after the overrides are applied, so a file without a
/// `base-url` is fine as long as one is given on the command line.
pub fn resolve_config(
    path: Option<&Path>,
    overrides: ConfigOverrides,
) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => Config::default(),
    };

    if let Some(base_url) = overrides.base_url {
        config.crawler.base_url = base_url;
    }
    if let Some(directory) = overrides.output_directory {
        config.output.directory = directory;
    }

    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 fingerprint of the crawl scope
///
/// Two configurations with the same base URL and excluded paths produce the
/// same fingerprint; a checkpoint is only resumed when the fingerprints match.
/// The base URL is hashed in its parsed form, the form the admission policy
/// compares against.
pub fn scope_fingerprint(config: &CrawlerConfig) -> String {
    let base_url = Url::parse(&config.base_url)
        .map(String::from)
        .unwrap_or_else(|_| config.base_url.clone());

    let mut hasher = Sha256::new();
    hasher.update(base_url.as_bytes());
    for segment in &config.excluded_paths {
        hasher.update([0u8]);
        hasher.update(segment.as_bytes());
    }
    hex::encode(hasher.finalize())
}
