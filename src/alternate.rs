//! Alternate-Version Locator
//!
//! Finds a linked AMP or print rendition of a page. Those versions usually
//! carry the same article with far less chrome, so the pipeline extracts them
//! too and keeps whichever yields longer text.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

use crate::dom::{self, Document};
use crate::url_utils::{resolve_href, same_document};

/// `amp` as a whole path segment, file stem or query key/value
/// (`/amp/...`, `?amp`, `?amp=1`, `story.amp.html`)
#[allow(clippy::expect_used)]
static AMP_HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(^|[/?&=._-])amp([/?&=._-]|$)").expect("valid regex"));

/// `print` as a whole path segment, file stem or query key/value
/// (`/print/...`, `?output=print`, `print.html`); never `blueprint` or `sprint`
#[allow(clippy::expect_used)]
static PRINT_HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(^|[/?&=._-])print([/?&=._-]|$)").expect("valid regex"));

/// Kind of alternate rendition found on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlternateKind {
    /// Accelerated Mobile Pages version
    Amp,
    /// Printer-friendly version
    Print,
}

/// An alternate rendition of the page being processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlternateLink {
    pub kind: AlternateKind,
    pub url: Url,
}

/// Locate the alternate version of a page, if it links one.
///
/// Checked in priority order: `<link rel="amphtml">`, AMP-looking anchors,
/// `<link rel="alternate" media="print">`, print-looking anchors. Relative
/// hrefs are resolved against `page_url`; links pointing back at the page
/// itself are ignored. Anchors only qualify on the page's own host, while a
/// declared `<link>` may point anywhere.
#[must_use]
pub fn locate(doc: &Document, page_url: &Url) -> Option<AlternateLink> {
    let resolve = |href: String| {
        resolve_href(&href, page_url).filter(|url| !same_document(url, page_url))
    };

    let amp = first_href(doc, "link[rel]", |rel, _| has_rel_token(rel, "amphtml"))
        .and_then(resolve)
        .or_else(|| first_anchor(doc, &AMP_HREF_RE, page_url));
    if let Some(url) = amp {
        return Some(AlternateLink { kind: AlternateKind::Amp, url });
    }

    let print = first_href(doc, "link[rel]", |rel, media| {
        has_rel_token(rel, "alternate") && media.to_ascii_lowercase().contains("print")
    })
    .and_then(resolve)
    .or_else(|| first_anchor(doc, &PRINT_HREF_RE, page_url));

    print.map(|url| AlternateLink { kind: AlternateKind::Print, url })
}

/// Parse `html` and locate its alternate version. The parsed tree is dropped
/// before returning, so callers can hold the result across await points.
#[must_use]
pub fn locate_in_html(html: &str, page_url: &Url) -> Option<AlternateLink> {
    let doc = dom::parse(html);
    locate(&doc, page_url)
}

fn has_rel_token(rel: &str, token: &str) -> bool {
    rel.split_whitespace().any(|t| t.eq_ignore_ascii_case(token))
}

/// First `link` whose `rel` and `media`/`type` satisfy `accept`.
fn first_href<F>(doc: &Document, selector: &str, accept: F) -> Option<String>
where
    F: Fn(&str, &str) -> bool,
{
    for link in doc.select(selector).iter() {
        let rel = dom::get_attribute(&link, "rel").unwrap_or_default();
        let media = format!(
            "{} {}",
            dom::get_attribute(&link, "media").unwrap_or_default(),
            dom::get_attribute(&link, "type").unwrap_or_default()
        );
        if !accept(&rel, &media) {
            continue;
        }
        if let Some(href) = dom::get_attribute(&link, "href").filter(|h| !h.trim().is_empty()) {
            return Some(href);
        }
    }
    None
}

/// First anchor matching `pattern` that resolves to another document on the
/// same host as `page_url`.
fn first_anchor(doc: &Document, pattern: &Regex, page_url: &Url) -> Option<Url> {
    doc.select("a[href]")
        .iter()
        .filter_map(|a| dom::get_attribute(&a, "href"))
        .filter(|href| pattern.is_match(href))
        .filter_map(|href| resolve_href(&href, page_url))
        .find(|url| url.host_str() == page_url.host_str() && !same_document(url, page_url))
}
