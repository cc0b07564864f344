//! URL handling module
//!
//! This module decides which URLs belong to the crawl (scheme and host
//! suffix checks), extracts domains, and resolves discovered links.

mod domain;
mod matcher;

use url::Url;

// Re-export main functions
pub use domain::{extract_domain, resolve_link};
pub use matcher::matches_domain_suffix;

/// Decides whether a URL is in scope for a crawl
///
/// A URL is in scope when its scheme is `http` or `https` and its host is
/// the configured root domain or one of its subdomains. The check looks at
/// the parsed host only, so a root domain appearing in the path or as a
/// prefix of some other host does not count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeValidator {
    root_domain: String,
}

impl ScopeValidator {
    /// Creates a validator for the given root domain (e.g. "mezzofy.com")
    pub fn new(root_domain: impl Into<String>) -> Self {
        Self {
            root_domain: root_domain.into().trim().to_lowercase(),
        }
    }

    /// The root domain this validator checks against
    pub fn root_domain(&self) -> &str {
        &self.root_domain
    }

    /// Returns true if `url` parses and is in scope. Never panics.
    ///
    /// # Examples
    ///
    /// ```
    /// use mezzofy_crawler::url::ScopeValidator;
    ///
    /// let scope = ScopeValidator::new("mezzofy.com");
    /// assert!(scope.is_in_scope("https://sub.mezzofy.com"));
    /// assert!(!scope.is_in_scope("https://evil.com/mezzofy.com"));
    /// assert!(!scope.is_in_scope("https://mezzofy.com.evil.com"));
    /// ```
    pub fn is_in_scope(&self, url: &str) -> bool {
        match Url::parse(url) {
            Ok(parsed) => self.is_url_in_scope(&parsed),
            Err(_) => false,
        }
    }

    /// Same as [`is_in_scope`](Self::is_in_scope) for an already parsed URL
    pub fn is_url_in_scope(&self, url: &Url) -> bool {
        if !matches!(url.scheme(), "http" | "https") {
            return false;
        }

        extract_domain(url)
            .map(|host| matches_domain_suffix(&self.root_domain, &host))
            .unwrap_or(false)
    }
}
