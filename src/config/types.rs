use serde::Deserialize;

/// Locale path segments skipped by default (translated copies of the docs)
pub const DEFAULT_EXCLUDED_PATHS: &[&str] = &[
    "/az/", "/bn/", "/de/", "/es/", "/fa/", "/fr/", "/he/", "/hu/", "/id/", "/it/", "/ja/",
    "/ko/", "/nl/", "/pl/", "/pt/", "/ru/", "/tr/", "/uk/", "/ur/", "/vi/", "/yo/", "/zh/",
    "/zh-hant/", "/em/",
];

/// Main configuration structure for Docscribe
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawl scope and fetch behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Base URL; only URLs starting with it are crawled
    pub base_url: String,

    /// Path infixes that exclude a URL from the crawl
    pub excluded_paths: Vec<String>,

    /// Whole-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,

    /// Pause between consecutive fetches (milliseconds)
    pub request_delay_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            excluded_paths: DEFAULT_EXCLUDED_PATHS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            request_delay_ms: 0,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// URL with information about the crawler (optional)
    pub contact_url: String,

    /// Email address for crawler-related contact (optional)
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "docscribe".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: String::new(),
            contact_email: String::new(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the user agent header: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        let contacts: Vec<String> = [
            (!self.contact_url.is_empty()).then(|| format!("+{}", self.contact_url)),
            (!self.contact_email.is_empty()).then(|| self.contact_email.clone()),
        ]
        .into_iter()
        .flatten()
        .collect();

        if contacts.is_empty() {
            format!("{}/{}", self.crawler_name, self.crawler_version)
        } else {
            format!(
                "{}/{} ({})",
                self.crawler_name,
                self.crawler_version,
                contacts.join("; ")
            )
        }
    }
}

/// Batch output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory receiving the batch files (created if absent)
    pub directory: String,

    /// Batch files are named `<file-prefix>_batch_<N>.txt`
    pub file_prefix: String,

    /// Number of documents per batch file
    pub batch_size: usize,

    /// Keep a resumable checkpoint of the crawl state in the output directory
    pub checkpoint: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "docs".to_string(),
            file_prefix: "docs".to_string(),
            batch_size: 10,
            checkpoint: true,
        }
    }
}
