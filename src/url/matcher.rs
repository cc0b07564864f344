/// Checks if a host lies within a root domain
///
/// The host matches when it equals the root domain or is a dotted
/// subdomain of it:
/// - "mezzofy.com" matches "mezzofy.com"
/// - "www.mezzofy.com" and "api.v2.mezzofy.com" match "mezzofy.com"
/// - "notmezzofy.com" and "mezzofy.com.evil.com" do not
///
/// Both arguments are expected to be lowercase.
///
/// # Examples
///
/// ```
/// use mezzofy_crawler::url::matches_domain_suffix;
///
/// assert!(matches_domain_suffix("mezzofy.com", "mezzofy.com"));
/// assert!(matches_domain_suffix("mezzofy.com", "blog.mezzofy.com"));
/// assert!(!matches_domain_suffix("mezzofy.com", "notmezzofy.com"));
/// assert!(!matches_domain_suffix("mezzofy.com", "mezzofy.com.evil.com"));
/// ```
pub fn matches_domain_suffix(root: &str, host: &str) -> bool {
    if root.is_empty() {
        return false;
    }

    match host.strip_suffix(root) {
        Some("") => true,
        Some(prefix) => prefix.ends_with('.'),
        None => false,
    }
}
