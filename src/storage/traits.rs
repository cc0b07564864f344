//! Storage traits and error types
//!
//! This module defines the trait interface for page stores and
//! associated error types.

use crate::storage::{Page, PageFilter, PageRecord};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for page store implementations
///
/// The store is append-only from the crawler's point of view: pages are
/// inserted, never updated or deleted. URLs are not required to be unique.
/// Implementations assign `created_at` / `updated_at`.
pub trait PageStore: Send + Sync {
    /// Persists a page and returns its record ID
    fn insert(&self, page: &Page) -> StorageResult<i64>;

    /// Returns up to `limit` stored pages matching `filter`, newest first
    fn query(&self, filter: &PageFilter, limit: usize) -> StorageResult<Vec<PageRecord>>;

    /// Counts all stored pages
    fn count(&self) -> StorageResult<u64>;
}

/// Store used when no database is configured or it cannot be opened
///
/// Every operation fails with [`StorageError::Unavailable`]; callers decide
/// how to degrade (the crawler skips the write, the API returns no pages).
#[derive(Debug, Clone)]
pub struct UnavailableStorage {
    reason: String,
}

impl UnavailableStorage {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl PageStore for UnavailableStorage {
    fn insert(&self, _page: &Page) -> StorageResult<i64> {
        Err(StorageError::Unavailable(self.reason.clone()))
    }

    fn query(&self, _filter: &PageFilter, _limit: usize) -> StorageResult<Vec<PageRecord>> {
        Err(StorageError::Unavailable(self.reason.clone()))
    }

    fn count(&self) -> StorageResult<u64> {
        Err(StorageError::Unavailable(self.reason.clone()))
    }
}
