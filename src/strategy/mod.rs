//! Extraction strategies.
//!
//! A strategy looks at a noise-filtered document and returns the subtree it
//! believes holds the article, as an owned [`Container`]. Strategies are
//! interchangeable trait objects; the candidate selector only ever sees their
//! [`StrategyKind`] and the container they produced.
//!
//! # Module Structure
//!
//! - `readability`: dom_smoothie's readability port (feature `readability`)
//! - `trafilatura`: prioritized content-container rules with a paragraph
//!   scraping fallback
//! - `rules`: the container rules used by the trafilatura strategy

use std::fmt;

use dom_query::Selection;

use crate::dom::{self, Document};
use crate::error::Result;
use crate::options::Options;

#[cfg(feature = "readability")]
pub mod readability;
pub mod rules;
pub mod trafilatura;

#[cfg(feature = "readability")]
pub use readability::ReadabilityStrategy;
pub use trafilatura::TrafilaturaStrategy;

/// Identifies which strategy produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// Readability-style scoring of the whole document
    Readability,
    /// Rule-based container lookup in the manner of trafilatura
    Trafilatura,
    /// Any other strategy plugged in by the caller
    Custom(&'static str),
}

impl StrategyKind {
    /// Lower ranks win exact score ties. Readability goes first; everything
    /// else falls back to insertion order.
    #[must_use]
    pub fn tie_break_rank(self) -> u8 {
        match self {
            Self::Readability => 0,
            Self::Trafilatura | Self::Custom(_) => 1,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Readability => "readability",
            Self::Trafilatura => "trafilatura",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The content subtree chosen by a strategy, held as its own small document.
/// Its root is the `<body>` of that document.
pub struct Container {
    doc: Document,
}

impl Container {
    /// Wrap an HTML fragment.
    #[must_use]
    pub fn from_html(html: &str) -> Self {
        Self { doc: dom::parse(html) }
    }

    /// Copy a subtree of another document.
    #[must_use]
    pub fn from_selection(sel: &Selection) -> Self {
        Self::from_html(&dom::outer_html(sel))
    }

    /// Root element of the container.
    #[must_use]
    pub fn root(&self) -> Selection<'_> {
        self.doc.select("body")
    }

    /// Inner HTML of the root, mostly useful for debugging.
    #[must_use]
    pub fn html(&self) -> String {
        self.root().inner_html().to_string()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("html_len", &self.html().len())
            .finish()
    }
}

/// A content-extraction heuristic.
///
/// `extract` receives the noise-filtered document and must not assume it may
/// keep references into it: the returned container owns its nodes.
pub trait ExtractionStrategy: Send + Sync {
    /// Which strategy this is; drives tie-breaking.
    fn kind(&self) -> StrategyKind;

    /// Find the content container. Failing is allowed and only skips this
    /// strategy's candidate.
    fn extract(&self, doc: &Document) -> Result<Container>;
}

/// Strategies enabled by `options`, in tie-break insertion order.
#[must_use]
pub fn default_strategies(options: &Options) -> Vec<Box<dyn ExtractionStrategy>> {
    let mut strategies: Vec<Box<dyn ExtractionStrategy>> = Vec::new();

    #[cfg(feature = "readability")]
    if options.use_readability {
        strategies.push(Box::new(ReadabilityStrategy));
    }

    if options.use_trafilatura {
        strategies.push(Box::new(TrafilaturaStrategy::new(options.min_container_len)));
    }

    strategies
}
