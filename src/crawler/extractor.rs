//! Page metadata extraction
//!
//! Turns a parsed document into a [`Page`]: title, meta description,
//! Open Graph image, a first-paragraph snippet, and the configured keywords
//! that appear anywhere in the page text.

use crate::crawler::document::Document;
use crate::storage::Page;
use std::collections::BTreeSet;

/// Maximum snippet length, in characters
pub const SNIPPET_MAX_CHARS: usize = 240;

/// Extracts [`Page`] records with a fixed keyword list and source tag
#[derive(Debug, Clone)]
pub struct Extractor {
    keywords: Vec<String>,
    source: String,
}

impl Extractor {
    /// Keywords are matched case-insensitively
    pub fn new<I, S>(keywords: I, source: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            source: source.into(),
        }
    }

    /// Builds the page record for `url`. Pure: the same document always
    /// yields the same page.
    pub fn extract(&self, url: &str, doc: &dyn Document) -> Page {
        Page {
            url: url.to_string(),
            title: doc.title_text().and_then(non_empty_trimmed),
            description: doc.meta_attr("name", "description", "content"),
            image: doc.meta_attr("property", "og:image", "content"),
            snippet: doc.first_paragraph_text().and_then(snippet),
            keywords_matched: self.match_keywords(&doc.visible_text()),
            source: self.source.clone(),
        }
    }

    /// Keywords occurring as substrings of `text`, sorted and deduplicated
    pub fn match_keywords(&self, text: &str) -> Vec<String> {
        let text = text.to_lowercase();

        self.keywords
            .iter()
            .filter(|keyword| text.contains(keyword.as_str()))
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

fn non_empty_trimmed(text: String) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn snippet(text: String) -> Option<String> {
    non_empty_trimmed(text).map(|t| t.chars().take(SNIPPET_MAX_CHARS).collect())
}
