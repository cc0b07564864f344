//! Parsed-document abstraction
//!
//! The extractor and link discovery only need five queries from a parsed
//! page. `Document` exposes exactly those, and `HtmlDocument` answers them
//! from a `scraper` DOM. Parsing never fails: html5ever recovers from
//! malformed markup the way browsers do.

use scraper::{ElementRef, Html, Node, Selector};

/// Elements whose text content is never rendered
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "template"];

/// Queries the crawler runs against a parsed page
pub trait Document {
    /// Text of the `<title>` element, untrimmed
    fn title_text(&self) -> Option<String>;

    /// Reads `read_attr` from the first `<meta>` whose `attr` equals `value`
    fn meta_attr(&self, attr: &str, value: &str, read_attr: &str) -> Option<String>;

    /// `href` values of all anchors, in document order
    fn anchor_hrefs(&self) -> Vec<String>;

    /// Text of the first `<p>` element, untrimmed
    fn first_paragraph_text(&self) -> Option<String>;

    /// All rendered text joined with single spaces
    fn visible_text(&self) -> String;
}

/// A page parsed with `scraper`
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    fn select_first(&self, selector: &str) -> Option<ElementRef<'_>> {
        let selector = Selector::parse(selector).ok()?;
        self.html.select(&selector).next()
    }
}

impl Document for HtmlDocument {
    fn title_text(&self) -> Option<String> {
        self.select_first("title")
            .map(|element| element.text().collect::<String>())
    }

    fn meta_attr(&self, attr: &str, value: &str, read_attr: &str) -> Option<String> {
        let selector = Selector::parse("meta").ok()?;

        self.html
            .select(&selector)
            .find(|element| element.value().attr(attr) == Some(value))
            .and_then(|element| element.value().attr(read_attr))
            .map(str::to_string)
    }

    fn anchor_hrefs(&self) -> Vec<String> {
        let Ok(selector) = Selector::parse("a[href]") else {
            return Vec::new();
        };

        self.html
            .select(&selector)
            .filter_map(|element| element.value().attr("href"))
            .map(str::to_string)
            .collect()
    }

    fn first_paragraph_text(&self) -> Option<String> {
        self.select_first("p")
            .map(|element| element.text().collect::<String>())
    }

    fn visible_text(&self) -> String {
        let mut parts = Vec::new();

        for node in self.html.root_element().descendants() {
            let Node::Text(text) = node.value() else {
                continue;
            };

            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .map(|element| HIDDEN_ELEMENTS.contains(&element.name()))
                    .unwrap_or(false)
            });

            if !hidden {
                parts.push(&**text);
            }
        }

        parts.join(" ")
    }
}
