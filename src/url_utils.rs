//! URL Utility Functions
//!
//! Validation and resolution of URLs found in page markup.

use url::Url;

/// Check if a string is an absolute http(s) URL with a host.
///
/// # Returns
/// * The parsed URL when valid
#[must_use]
pub fn parse_absolute_url(s: &str) -> Option<Url> {
    let s = s.trim();
    if !s.starts_with("http://") && !s.starts_with("https://") {
        return None;
    }
    Url::parse(s).ok().filter(|url| url.host().is_some())
}

/// Resolve an `href` found on a page against the page URL.
///
/// Returns `None` for empty hrefs, in-page anchors, non-navigational schemes
/// (`javascript:`, `mailto:`, `tel:`, `data:`) and anything that does not end
/// up as an absolute http(s) URL.
#[must_use]
pub fn resolve_href(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        return None;
    }

    let resolved = base.join(href).ok()?;
    matches!(resolved.scheme(), "http" | "https").then_some(resolved)
}

/// Whether two URLs address the same document (fragments ignored).
#[must_use]
pub fn same_document(a: &Url, b: &Url) -> bool {
    let mut a = a.clone();
    let mut b = b.clone();
    a.set_fragment(None);
    b.set_fragment(None);
    a == b
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/news/story.html").unwrap()
    }

    #[test]
    fn test_parse_absolute_url() {
        assert!(parse_absolute_url("https://example.com/a").is_some());
        assert!(parse_absolute_url("  http://example.com  ").is_some());
        assert!(parse_absolute_url("/relative").is_none());
        assert!(parse_absolute_url("ftp://example.com").is_none());
        assert!(parse_absolute_url("").is_none());
    }

    #[test]
    fn test_resolve_relative_href() {
        let url = resolve_href("amp/story.html", &base()).unwrap();
        assert_eq!(url.as_str(), "https://example.com/news/amp/story.html");

        let url = resolve_href("/print?id=1", &base()).unwrap();
        assert_eq!(url.as_str(), "https://example.com/print?id=1");
    }

    #[test]
    fn test_resolve_rejects_special_schemes() {
        assert!(resolve_href("javascript:print()", &base()).is_none());
        assert!(resolve_href("mailto:a@example.com", &base()).is_none());
        assert!(resolve_href("#print", &base()).is_none());
        assert!(resolve_href("   ", &base()).is_none());
    }

    #[test]
    fn test_same_document_ignores_fragment() {
        let a = Url::parse("https://example.com/a#top").unwrap();
        let b = Url::parse("https://example.com/a").unwrap();
        let c = Url::parse("https://example.com/a?amp=1").unwrap();

        assert!(same_document(&a, &b));
        assert!(!same_document(&a, &c));
    }
}
