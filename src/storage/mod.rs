//! Storage module for persisting crawled pages
//!
//! This module handles:
//! - The `Page` record and its stored form, `PageRecord`
//! - SQLite persistence and search queries
//! - Degrading to an always-unavailable store when no database can be used

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{PageStore, StorageError, StorageResult, UnavailableStorage};

use crate::config::StorageConfig;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Metadata extracted from one crawled page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub snippet: Option<String>,
    /// Matched keywords, sorted and deduplicated
    pub keywords_matched: Vec<String>,
    pub source: String,
}

impl Page {
    /// Creates a page with no extracted fields
    pub fn new(url: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            description: None,
            image: None,
            snippet: None,
            keywords_matched: Vec::new(),
            source: source.into(),
        }
    }

    /// Only relevant pages are persisted
    pub fn is_relevant(&self) -> bool {
        !self.keywords_matched.is_empty()
    }
}

/// A page as stored, with the storage-assigned ID and timestamps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub id: i64,
    #[serde(flatten)]
    pub page: Page,
    pub created_at: String,
    pub updated_at: String,
}

/// Search filter for page queries
///
/// The search term is matched case-insensitively against the title,
/// description, snippet and matched keywords; any one field matching is
/// enough. The term is treated as a regular expression, or as a literal
/// substring if it is not a valid one.
#[derive(Debug, Clone, Default)]
pub struct PageFilter {
    pattern: Option<Regex>,
}

impl PageFilter {
    /// Matches every page
    pub fn all() -> Self {
        Self::default()
    }

    /// Builds a filter from an optional search term; blank terms match all
    pub fn search(query: Option<&str>) -> Self {
        let query = match query.map(str::trim) {
            Some(q) if !q.is_empty() => q,
            _ => return Self::all(),
        };

        let pattern = RegexBuilder::new(query)
            .case_insensitive(true)
            .build()
            .or_else(|_| {
                RegexBuilder::new(&regex::escape(query))
                    .case_insensitive(true)
                    .build()
            })
            .ok();

        Self { pattern }
    }

    /// Returns true if the page satisfies the filter
    pub fn matches(&self, page: &Page) -> bool {
        let Some(pattern) = &self.pattern else {
            return true;
        };

        [&page.title, &page.description, &page.snippet]
            .into_iter()
            .flatten()
            .any(|field| pattern.is_match(field))
            || page.keywords_matched.iter().any(|k| pattern.is_match(k))
    }
}

/// Opens the configured page store
///
/// Falls back to [`UnavailableStorage`] when no database path is configured
/// or the database cannot be opened, so crawling and listing keep working
/// without persistence.
pub fn open_storage(config: &StorageConfig) -> Arc<dyn PageStore> {
    let Some(path) = config.database_path.as_deref() else {
        tracing::warn!("No database configured; crawled pages will not be persisted");
        return Arc::new(UnavailableStorage::new("no database configured"));
    };

    match SqliteStorage::new(Path::new(path)) {
        Ok(storage) => {
            tracing::info!("Using page database at {}", path);
            Arc::new(storage)
        }
        Err(e) => {
            tracing::warn!("Failed to open database {}: {}; continuing without persistence", path, e);
            Arc::new(UnavailableStorage::new(e.to_string()))
        }
    }
}
