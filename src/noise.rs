//! Noise Filter
//!
//! Removes boilerplate elements (navigation, ads, share widgets, captions...)
//! before any extraction strategy runs. Matching is data driven: a list of
//! denylist tokens tested as case-insensitive substrings of `id`, `class`,
//! `name` and `data-*` attribute values, plus a list of tag names removed
//! outright.

use dom_query::Selection;

use crate::dom::{self, Document, NodeRef};
use crate::options::{Options, DEFAULT_NOISE_TAGS, DEFAULT_NOISE_TOKENS};

/// Document roots are never removed, whatever their attributes say.
const PROTECTED_TAGS: &[&str] = &["html", "head", "body"];

/// Attribute-token and tag-name boilerplate filter.
#[derive(Debug, Clone)]
pub struct NoiseFilter {
    tokens: Vec<String>,
    tags: Vec<String>,
}

impl Default for NoiseFilter {
    fn default() -> Self {
        Self::new(DEFAULT_NOISE_TOKENS.iter().copied(), DEFAULT_NOISE_TAGS.iter().copied())
    }
}

impl NoiseFilter {
    /// Build a filter from denylist tokens and tag names. Both are lowercased;
    /// empty entries are dropped.
    pub fn new<T, G>(tokens: T, tags: G) -> Self
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
        G: IntoIterator,
        G::Item: AsRef<str>,
    {
        let normalize = |s: &str| s.trim().to_lowercase();
        Self {
            tokens: tokens
                .into_iter()
                .map(|t| normalize(t.as_ref()))
                .filter(|t| !t.is_empty())
                .collect(),
            tags: tags
                .into_iter()
                .map(|t| normalize(t.as_ref()))
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    /// Filter configured by `options.noise_tokens` and `options.noise_tags`.
    #[must_use]
    pub fn from_options(options: &Options) -> Self {
        Self::new(&options.noise_tokens, &options.noise_tags)
    }

    /// Whether an attribute value contains any denylist token.
    #[must_use]
    pub fn is_noise_value(&self, value: &str) -> bool {
        if value.is_empty() {
            return false;
        }
        let value = value.to_lowercase();
        self.tokens.iter().any(|token| value.contains(token.as_str()))
    }

    /// Whether an element should be removed.
    #[must_use]
    pub fn matches(&self, node: &NodeRef) -> bool {
        let Some(tag) = dom::node_tag(node) else {
            return false;
        };
        if PROTECTED_TAGS.contains(&tag.as_str()) {
            return false;
        }
        if self.tags.iter().any(|t| *t == tag) {
            return true;
        }

        dom::node_attributes(node).iter().any(|(name, value)| {
            let name = name.to_ascii_lowercase();
            let inspected = matches!(name.as_str(), "id" | "class" | "name") || name.starts_with("data-");
            inspected && self.is_noise_value(value)
        })
    }

    /// Return a filtered copy of `doc`. The original document is untouched.
    #[must_use]
    pub fn apply(&self, doc: &Document) -> Document {
        let filtered = dom::clone_document(doc);
        self.strip(&filtered);
        filtered
    }

    /// Remove matching elements from `doc` in place. Returns the number removed.
    pub fn strip(&self, doc: &Document) -> usize {
        let mut removed = 0;
        // Reverse document order: descendants go before their ancestors
        let nodes = doc.select("*").nodes().to_vec();
        for node in nodes.into_iter().rev() {
            if self.matches(&node) {
                Selection::from(node).remove();
                removed += 1;
            }
        }
        tracing::trace!(removed, "noise filter applied");
        removed
    }
}
