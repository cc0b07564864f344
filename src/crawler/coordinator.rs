//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that ties everything together:
//! - Validating the start URL and page budget
//! - Admitting URLs from the frontier (breadth-first)
//! - Fetching, extracting and storing relevant pages
//! - Feeding in-scope links back into the frontier
//!
//! One dispatcher owns the [`Frontier`]; page tasks run on a `JoinSet`
//! bounded by the configured worker count and report discovered links back
//! to the dispatcher. Admission (visited test-and-set plus the page budget)
//! and enqueue membership checks therefore never race. With one worker the
//! traversal is a plain sequential BFS.

use crate::config::{Config, CrawlerConfig};
use crate::crawler::document::{Document, HtmlDocument};
use crate::crawler::extractor::Extractor;
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::frontier::Frontier;
use crate::storage::{Page, PageStore};
use crate::url::{resolve_link, ScopeValidator};
use crate::CrawlError;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use url::Url;

/// Counts reported at the end of a crawl
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlSummary {
    /// URLs admitted for visiting, including ones whose fetch failed
    pub visited: usize,
    /// Relevant pages successfully persisted
    pub saved: usize,
}

/// Immutable inputs shared by every page task of a crawl
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    pub scope: ScopeValidator,
    pub extractor: Extractor,
    pub default_start_url: String,
    pub default_max_pages: usize,
    pub workers: usize,
}

impl CrawlSettings {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            scope: ScopeValidator::new(&config.root_domain),
            extractor: Extractor::new(&config.keywords, &config.source),
            default_start_url: config.default_start_url.clone(),
            default_max_pages: config.max_pages,
            workers: config.workers.max(1),
        }
    }
}

/// Stops a running crawl from another task
///
/// Once cancelled, the crawl admits no new URLs, lets in-flight pages
/// finish, and returns the counts so far.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What a page task reports back to the dispatcher
#[derive(Debug, Default)]
struct PageOutcome {
    saved: bool,
    links: Vec<String>,
}

/// Main crawler coordinator structure
#[derive(Clone)]
pub struct Coordinator {
    settings: Arc<CrawlSettings>,
    fetcher: Arc<dyn Fetcher>,
    store: Arc<dyn PageStore>,
    cancel: CancellationFlag,
}

impl Coordinator {
    pub fn new(
        settings: CrawlSettings,
        fetcher: Arc<dyn Fetcher>,
        store: Arc<dyn PageStore>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            fetcher,
            store,
            cancel: CancellationFlag::new(),
        }
    }

    /// Creates a coordinator that fetches over HTTP
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to crawl
    /// * `Err(CrawlError::Client)` - The HTTP client could not be built
    pub fn from_config(config: &Config, store: Arc<dyn PageStore>) -> Result<Self, CrawlError> {
        let timeout = Duration::from_secs(config.crawler.fetch_timeout_secs);
        let fetcher = HttpFetcher::from_config(&config.user_agent, timeout)?;

        Ok(Self::new(
            CrawlSettings::from_config(&config.crawler),
            Arc::new(fetcher),
            store,
        ))
    }

    /// Replaces the cancellation flag
    pub fn with_cancellation(mut self, cancel: CancellationFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// The flag that stops this coordinator's crawls
    pub fn cancellation(&self) -> CancellationFlag {
        self.cancel.clone()
    }

    /// The store relevant pages are written to
    pub fn store(&self) -> &Arc<dyn PageStore> {
        &self.store
    }

    /// Runs one crawl
    ///
    /// A missing or blank `start_url` falls back to the configured default,
    /// and a missing `max_pages` to the configured budget. An out-of-scope
    /// start URL is rejected before anything is fetched; every other failure
    /// (fetch errors, storage errors) only affects the page it happened on.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlSummary)` - Visited and saved counts
    /// * `Err(CrawlError::InvalidInput)` - The start URL is not in scope
    pub async fn crawl(
        &self,
        start_url: Option<&str>,
        max_pages: Option<usize>,
    ) -> Result<CrawlSummary, CrawlError> {
        let start = self.resolve_start_url(start_url)?;
        let max_pages = max_pages.unwrap_or(self.settings.default_max_pages);
        let workers = self.settings.workers.max(1);

        tracing::info!(
            "Starting crawl at {} (max pages: {}, workers: {})",
            start,
            max_pages,
            workers
        );
        let start_time = Instant::now();

        let mut frontier = Frontier::new(start);
        let mut tasks = JoinSet::new();
        let mut saved = 0;

        loop {
            while tasks.len() < workers
                && frontier.visited_count() < max_pages
                && !self.cancel.is_cancelled()
            {
                let Some(url) = frontier.next() else {
                    break;
                };
                tracing::debug!("Visiting {}", url);
                tasks.spawn(visit_page(self.clone(), url));
            }

            // Nothing in flight and nothing admissible: the crawl is over.
            let Some(joined) = tasks.join_next().await else {
                break;
            };

            match joined {
                Ok(outcome) => {
                    if outcome.saved {
                        saved += 1;
                    }
                    for link in outcome.links {
                        frontier.enqueue(link);
                    }
                }
                Err(e) => tracing::error!("Page task failed: {}", e),
            }
        }

        if self.cancel.is_cancelled() {
            tracing::info!("Crawl cancelled");
        }

        let summary = CrawlSummary {
            visited: frontier.visited_count(),
            saved,
        };
        tracing::info!(
            "Crawl completed: {} visited, {} saved, {} left in frontier, in {:?}",
            summary.visited,
            summary.saved,
            frontier.pending_count(),
            start_time.elapsed()
        );

        Ok(summary)
    }

    fn resolve_start_url(&self, start_url: Option<&str>) -> Result<String, CrawlError> {
        let raw = match start_url.map(str::trim) {
            Some(url) if !url.is_empty() => url,
            _ => self.settings.default_start_url.as_str(),
        };

        let url = Url::parse(raw)
            .map_err(|e| CrawlError::InvalidInput(format!("start_url '{}': {}", raw, e)))?;

        if !self.settings.scope.is_url_in_scope(&url) {
            return Err(CrawlError::InvalidInput(format!(
                "start_url must be {}",
                self.settings.scope.root_domain()
            )));
        }

        Ok(url.to_string())
    }
}

/// Fetches one admitted URL, stores it if relevant, and returns its links
async fn visit_page(coordinator: Coordinator, url: String) -> PageOutcome {
    let raw = match coordinator.fetcher.fetch(&url).await {
        Ok(raw) => raw,
        Err(e) => {
            tracing::debug!("Skipping {}: {}", url, e);
            return PageOutcome::default();
        }
    };

    let (page, links) = analyze(&coordinator.settings, &url, &raw.body);

    let saved = page.is_relevant() && save_page(coordinator.store.as_ref(), &page);

    PageOutcome { saved, links }
}

/// Parses a body into its page record and in-scope links
///
/// Kept synchronous: the parsed DOM is not `Send` and must be dropped before
/// the task awaits again.
fn analyze(settings: &CrawlSettings, url: &str, body: &str) -> (Page, Vec<String>) {
    let doc = HtmlDocument::parse(body);
    let page = settings.extractor.extract(url, &doc);
    let links = discover_links(&settings.scope, url, &doc);
    (page, links)
}

fn save_page(store: &dyn PageStore, page: &Page) -> bool {
    match store.insert(page) {
        Ok(id) => {
            tracing::debug!(
                "Saved {} as page {} (keywords: {})",
                page.url,
                id,
                page.keywords_matched.join(", ")
            );
            true
        }
        Err(e) => {
            tracing::warn!("Failed to save {}: {}", page.url, e);
            false
        }
    }
}

/// Resolves a document's anchors against `page_url` and keeps in-scope ones
///
/// Fragment-only and `mailto:` hrefs are dropped without resolving.
pub fn discover_links(scope: &ScopeValidator, page_url: &str, doc: &dyn Document) -> Vec<String> {
    let Ok(base) = Url::parse(page_url) else {
        return Vec::new();
    };

    doc.anchor_hrefs()
        .iter()
        .filter_map(|href| resolve_link(href, &base))
        .filter(|url| scope.is_url_in_scope(url))
        .map(String::from)
        .collect()
}
