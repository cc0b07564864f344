//! Crawl frontier
//!
//! This module holds the per-crawl traversal state:
//! - A FIFO queue of discovered URLs (breadth-first order)
//! - The set of URLs already admitted for visiting
//! - Pending-queue membership, so each URL is enqueued at most once
//!
//! The frontier lives for one crawl invocation and is owned by the crawl
//! dispatcher; nothing is persisted.

use std::collections::{HashSet, VecDeque};

/// URLs waiting to be visited plus the ones already visited
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<String>,
    pending: HashSet<String>,
    visited: HashSet<String>,
}

impl Frontier {
    /// Creates a frontier seeded with the start URL
    pub fn new(seed: impl Into<String>) -> Self {
        let mut frontier = Self::default();
        frontier.enqueue(seed.into());
        frontier
    }

    /// Admits the earliest-enqueued unvisited URL
    ///
    /// The URL is marked visited before it is returned (test-and-set), so
    /// it counts as visited even if fetching it later fails.
    pub fn next(&mut self) -> Option<String> {
        while let Some(url) = self.queue.pop_front() {
            self.pending.remove(&url);
            if self.visited.insert(url.clone()) {
                return Some(url);
            }
        }
        None
    }

    /// Queues a URL unless it was already visited or is already pending
    ///
    /// Returns true if the URL was added.
    pub fn enqueue(&mut self, url: String) -> bool {
        if self.visited.contains(&url) || self.pending.contains(&url) {
            return false;
        }
        self.pending.insert(url.clone());
        self.queue.push_back(url);
        true
    }

    /// Whether `url` has been admitted for visiting
    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Whether `url` is waiting in the queue
    pub fn is_pending(&self, url: &str) -> bool {
        self.pending.contains(url)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
