use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host (e.g. `mailto:` or `data:` URLs), it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use mezzofy_crawler::url::extract_domain;
///
/// let url = Url::parse("https://WWW.Mezzofy.com/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("www.mezzofy.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Resolves a link href against the page it was found on
///
/// Returns None without resolving when the href is empty, a same-page
/// fragment (`#...`) or a `mailto:` link. Otherwise applies standard
/// relative-reference resolution; hrefs that cannot be resolved are dropped.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use mezzofy_crawler::url::resolve_link;
///
/// let base = Url::parse("https://www.mezzofy.com/products/").unwrap();
/// assert_eq!(
///     resolve_link("pricing", &base).unwrap().as_str(),
///     "https://www.mezzofy.com/products/pricing"
/// );
/// assert!(resolve_link("#top", &base).is_none());
/// ```
pub fn resolve_link(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') || href.starts_with("mailto:") {
        return None;
    }

    base.join(href).ok()
}
