//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the PageStore trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{PageStore, StorageError, StorageResult};
use crate::storage::{Page, PageFilter, PageRecord};
use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const SELECT_PAGES: &str = "SELECT id, url, title, description, image, snippet, keywords_matched,
     source, created_at, updated_at FROM pages ORDER BY id DESC";

/// SQLite storage backend
///
/// The connection sits behind a mutex: SQLite serializes writers anyway, and
/// crawl workers only hold the lock for the duration of one statement.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Opens (or creates) the database at `path` and initializes the schema
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::Poisoned)
    }
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<PageRecord> {
    let keywords_json: String = row.get(6)?;
    let keywords_matched: Vec<String> = serde_json::from_str(&keywords_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?;

    Ok(PageRecord {
        id: row.get(0)?,
        page: Page {
            url: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            image: row.get(4)?,
            snippet: row.get(5)?,
            keywords_matched,
            source: row.get(7)?,
        },
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

impl PageStore for SqliteStorage {
    fn insert(&self, page: &Page) -> StorageResult<i64> {
        let keywords_json = serde_json::to_string(&page.keywords_matched)?;
        let now = Utc::now().to_rfc3339();

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO pages (url, title, description, image, snippet, keywords_matched,
             source, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
            params![
                page.url,
                page.title,
                page.description,
                page.image,
                page.snippet,
                keywords_json,
                page.source,
                now
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    fn query(&self, filter: &PageFilter, limit: usize) -> StorageResult<Vec<PageRecord>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let conn = self.lock()?;
        let mut stmt = conn.prepare(SELECT_PAGES)?;
        let rows = stmt.query_map([], row_to_record)?;

        // Regex matching happens here rather than in SQL; SQLite has no
        // built-in REGEXP.
        let mut pages = Vec::new();
        for row in rows {
            let record = row?;
            if filter.matches(&record.page) {
                pages.push(record);
                if pages.len() >= limit {
                    break;
                }
            }
        }

        Ok(pages)
    }

    fn count(&self) -> StorageResult<u64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM pages", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
