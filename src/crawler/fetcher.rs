//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent and timeouts
//! - GET requests to fetch page content
//! - Error classification
//!
//! Every failure is a per-URL outcome; nothing here is retried.

use crate::config::Config;
use reqwest::Client;
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body, treated as HTML whatever the Content-Type says
        body: String,
    },

    /// The server answered with a non-2xx status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, body decoding, etc.)
    NetworkError {
        /// Error description
        error: String,
        /// True if the request hit the configured timeout
        timed_out: bool,
    },
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Human-readable reason for a failed fetch
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            Self::Success { .. } => None,
            Self::HttpError { status_code } => Some(format!("HTTP {}", status_code)),
            Self::NetworkError { error, timed_out } => Some(if *timed_out {
                format!("timeout ({})", error)
            } else {
                error.clone()
            }),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// The user agent comes from `[user-agent]`; the request and connect timeouts
/// from `[crawler]`. Redirects follow reqwest's default policy.
///
/// # Example
///
/// ```no_run
/// use docscribe::config::Config;
/// use docscribe::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(Duration::from_secs(config.crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.crawler.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and classifies the outcome
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx | Success |
/// | any other status | HttpError |
/// | timeout | NetworkError (timed_out) |
/// | connect / body error | NetworkError |
pub async fn fetch_page(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(e),
    };

    let status = response.status();
    let final_url = response.url().to_string();

    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            body,
        },
        Err(e) => classify_error(e),
    }
}

fn classify_error(e: reqwest::Error) -> FetchResult {
    if e.is_timeout() {
        FetchResult::NetworkError {
            error: "Request timeout".to_string(),
            timed_out: true,
        }
    } else if e.is_connect() {
        FetchResult::NetworkError {
            error: format!("Connection failed: {}", e),
            timed_out: false,
        }
    } else {
        FetchResult::NetworkError {
            error: e.to_string(),
            timed_out: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&Config::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_failure_reason() {
        let ok = FetchResult::Success {
            final_url: "https://example.com/".to_string(),
            status_code: 200,
            body: String::new(),
        };
        assert!(ok.is_success());
        assert_eq!(ok.failure_reason(), None);

        let http = FetchResult::HttpError { status_code: 404 };
        assert_eq!(http.failure_reason(), Some("HTTP 404".to_string()));

        let timeout = FetchResult::NetworkError {
            error: "Request timeout".to_string(),
            timed_out: true,
        };
        assert_eq!(
            timeout.failure_reason(),
            Some("timeout (Request timeout)".to_string())
        );
    }

    // Network behavior is covered by the wiremock tests in tests/crawl_tests.rs
}
