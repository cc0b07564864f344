//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `Fetcher` trait
//! - HTML parsing behind the `Document` trait
//! - Page metadata and keyword extraction
//! - The breadth-first frontier and overall crawl coordination

mod coordinator;
mod document;
mod extractor;
mod fetcher;
mod frontier;

pub use coordinator::{discover_links, CancellationFlag, Coordinator, CrawlSettings, CrawlSummary};
pub use document::{Document, HtmlDocument};
pub use extractor::{Extractor, SNIPPET_MAX_CHARS};
pub use fetcher::{build_http_client, FetchError, Fetcher, HttpFetcher, RawDocument};
pub use frontier::Frontier;

use crate::config::Config;
use crate::storage::open_storage;
use crate::CrawlError;

/// Runs a single crawl with the configured store and HTTP fetcher
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `start_url` - Seed URL; the configured default when `None`
/// * `max_pages` - Page budget; the configured default when `None`
///
/// # Example
///
/// ```no_run
/// use mezzofy_crawler::config::Config;
/// use mezzofy_crawler::crawler::crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let summary = crawl(&Config::default(), None, Some(5)).await?;
/// println!("visited {}, saved {}", summary.visited, summary.saved);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(
    config: &Config,
    start_url: Option<&str>,
    max_pages: Option<usize>,
) -> Result<CrawlSummary, CrawlError> {
    let store = open_storage(&config.storage);
    Coordinator::from_config(config, store)?
        .crawl(start_url, max_pages)
        .await
}
