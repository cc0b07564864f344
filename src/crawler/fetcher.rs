//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client with the user agent and timeout
//! - GET requests to fetch page content
//! - Error classification (timeout, transport, non-200 status)
//!
//! There is no retry logic; a failed fetch simply drops that URL.

use crate::config::UserAgentConfig;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct RawDocument {
    /// The URL that was requested
    pub url: String,
    /// HTTP status code (always 200 for documents returned by `HttpFetcher`)
    pub status_code: u16,
    /// Page body content
    pub body: String,
}

/// Reasons a fetch did not produce a document
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("HTTP {status_code} for {url}")]
    Status { url: String, status_code: u16 },

    #[error("Failed to read body of {url}: {message}")]
    Body { url: String, message: String },
}

/// Retrieves raw page content for a URL
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<RawDocument, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// The timeout bounds the whole request, so one hung server cannot stall
/// the crawl. Redirects follow reqwest's default policy.
///
/// # Example
///
/// ```no_run
/// use mezzofy_crawler::config::UserAgentConfig;
/// use mezzofy_crawler::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// reqwest-backed fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher with its own client
    pub fn from_config(config: &UserAgentConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config, timeout)?))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    /// Fetches a URL; anything but HTTP 200 with a readable body is an error
    async fn fetch(&self, url: &str) -> Result<RawDocument, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                url: url.to_string(),
                status_code: status.as_u16(),
            });
        }

        match response.text().await {
            Ok(body) => Ok(RawDocument {
                url: url.to_string(),
                status_code: status.as_u16(),
                body,
            }),
            Err(e) if e.is_timeout() => Err(FetchError::Timeout {
                url: url.to_string(),
            }),
            Err(e) => Err(FetchError::Body {
                url: url.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Transport {
            url: url.to_string(),
            message: "Connection refused".to_string(),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
