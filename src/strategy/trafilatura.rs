//! Rule-based extraction in the manner of trafilatura.
//!
//! First tries the prioritized container rules in [`super::rules`]. When no
//! container qualifies, falls back to collecting the page's top-level text
//! blocks (headings, paragraphs, lists, quotes, code, tables) into a
//! synthetic container.

use std::collections::HashSet;

use dom_query::Selection;

use crate::dom::{self, Document, NodeRef};
use crate::error::{Error, Result};

use super::rules;
use super::{Container, ExtractionStrategy, StrategyKind};

/// Blocks gathered by the fallback scraper.
const BASELINE_SELECTOR: &str = "h2, h3, h4, h5, p, pre, blockquote, ul, ol, table";
const BASELINE_TAGS: &[&str] = &["h2", "h3", "h4", "h5", "p", "pre", "blockquote", "ul", "ol", "table"];

/// Content-container rules with a text-block fallback.
#[derive(Debug, Clone)]
pub struct TrafilaturaStrategy {
    min_container_len: usize,
}

impl TrafilaturaStrategy {
    /// `min_container_len` is the text length a rule match needs to be used.
    #[must_use]
    pub fn new(min_container_len: usize) -> Self {
        Self { min_container_len }
    }
}

impl Default for TrafilaturaStrategy {
    fn default() -> Self {
        Self::new(250)
    }
}

impl ExtractionStrategy for TrafilaturaStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Trafilatura
    }

    fn extract(&self, doc: &Document) -> Result<Container> {
        let body = doc.select("body");
        if body.is_empty() {
            return Err(Error::StrategyError("document has no body".into()));
        }

        if let Some(found) = rules::find_content(&body, self.min_container_len) {
            return Ok(Container::from_selection(&found));
        }

        tracing::debug!("no content container matched, scraping text blocks");
        baseline(doc)
    }
}

/// Whether a block sits inside another collected block.
fn nested_in_block(node: &NodeRef) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        match dom::node_tag(&parent).as_deref() {
            Some("body") | None => return false,
            Some(tag) if BASELINE_TAGS.contains(&tag) => return true,
            Some(_) => {}
        }
        current = parent.parent();
    }
    false
}

/// Collect outermost text blocks in document order, dropping empty ones and
/// exact text repeats.
fn baseline(doc: &Document) -> Result<Container> {
    let mut seen = HashSet::new();
    let mut html = String::new();

    for node in doc.select("body").select(BASELINE_SELECTOR).nodes() {
        if nested_in_block(node) {
            continue;
        }
        let text = dom::normalized_text(node);
        if text.is_empty() || !seen.insert(text) {
            continue;
        }
        html.push_str(&dom::outer_html(&Selection::from(*node)));
    }

    if html.is_empty() {
        return Err(Error::StrategyError("no text blocks found".into()));
    }
    Ok(Container::from_html(&html))
}
