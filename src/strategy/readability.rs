//! Readability extraction via `dom_smoothie`.

use dom_smoothie::Readability;

use crate::dom::{self, Document};
use crate::error::{Error, Result};

use super::{Container, ExtractionStrategy, StrategyKind};

/// Mozilla Readability scoring, as implemented by `dom_smoothie`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadabilityStrategy;

impl ExtractionStrategy for ReadabilityStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Readability
    }

    fn extract(&self, doc: &Document) -> Result<Container> {
        // Readability mutates the tree it scores
        let mut reader = Readability::with_document(dom::clone_document(doc), None, None)
            .map_err(|e| Error::StrategyError(format!("readability setup: {e}")))?;
        let article = reader
            .parse()
            .map_err(|e| Error::StrategyError(format!("readability: {e}")))?;

        let content = article.content.to_string();
        if content.trim().is_empty() {
            return Err(Error::StrategyError("readability returned no content".into()));
        }
        Ok(Container::from_html(&content))
    }
}
