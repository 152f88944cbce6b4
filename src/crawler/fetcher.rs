//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the tracker:
//! - Building the HTTP client with a browser user agent and a fixed timeout
//! - GET requests for listing pages
//! - Error classification into [`FetchError`]
//!
//! There is no retry here. A failed fetch ends the traversal that issued it
//! and the next poll cycle tries again.

use crate::config::Config;
use crate::FetchError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - Value of the `User-Agent` header
/// * `timeout` - Upper bound on a whole request, connect through body
///
/// # Example
///
/// ```no_run
/// use disclosure_tracker::config::DEFAULT_USER_AGENT;
/// use disclosure_tracker::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(DEFAULT_USER_AGENT, Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches listing pages
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(user_agent, timeout)?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Self::new(&config.source.user_agent, config.request_timeout())
    }

    /// Fetches a page and returns its body
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | 2xx | `Ok(body)` |
    /// | other status | `FetchError::HttpStatus(code)` |
    /// | request or body read timed out | `FetchError::Timeout` |
    /// | anything else (DNS, refused, TLS, decode) | `FetchError::Network` |
    pub async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(classify_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        response.text().await.map_err(classify_error)
    }
}

fn classify_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Network(error.to_string())
    }
}
