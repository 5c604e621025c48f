//! Candidate Extractor
//!
//! Runs every configured strategy over the noise-filtered document and turns
//! each container it returns into a scored [`Candidate`]. A failing strategy
//! is logged and skipped; it never fails the page.

use crate::dom::{self, Document};
use crate::strategy::{Container, ExtractionStrategy, StrategyKind};

/// One strategy's proposal for the page content, with its metrics.
///
/// The metrics are computed once, when the candidate is built, so they always
/// agree with the container.
#[derive(Debug)]
pub struct Candidate {
    strategy: StrategyKind,
    container: Container,
    text: String,
    text_len: usize,
    link_density: f64,
    has_heading: bool,
    score: f64,
}

impl Candidate {
    /// Measure `container` and score it.
    ///
    /// `score = text_len * (1 - link_density)`, multiplied by `heading_boost`
    /// when the container holds an h2-h5 heading.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(strategy: StrategyKind, container: Container, heading_boost: f64) -> Self {
        let (text, link_chars, has_heading) = {
            let root = container.root();
            let link_chars: usize = root
                .select("a")
                .nodes()
                .iter()
                .map(|a| dom::normalized_text(a).chars().count())
                .sum();
            (dom::selection_text(&root), link_chars, root.select("h2, h3, h4, h5").exists())
        };
        let text_len = text.chars().count();
        let link_density = (link_chars as f64 / text_len.max(1) as f64).clamp(0.0, 1.0);

        let mut score = text_len as f64 * (1.0 - link_density);
        if has_heading {
            score *= heading_boost;
        }

        Self {
            strategy,
            container,
            text,
            text_len,
            link_density,
            has_heading,
            score,
        }
    }

    #[must_use]
    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }

    #[must_use]
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Whitespace-normalized text of the container.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of [`Self::text`] in characters.
    #[must_use]
    pub fn text_len(&self) -> usize {
        self.text_len
    }

    /// Share of the text that sits inside links, in `[0, 1]`.
    #[must_use]
    pub fn link_density(&self) -> f64 {
        self.link_density
    }

    #[must_use]
    pub fn has_heading(&self) -> bool {
        self.has_heading
    }

    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }
}

/// Run `strategies` in order over `doc` (already noise-filtered).
///
/// The result keeps strategy order, which selection relies on for ties.
/// Strategies that fail contribute nothing.
#[must_use]
pub fn extract_candidates(
    doc: &Document,
    strategies: &[Box<dyn ExtractionStrategy>],
    heading_boost: f64,
) -> Vec<Candidate> {
    strategies
        .iter()
        .filter_map(|strategy| {
            let kind = strategy.kind();
            match strategy.extract(doc) {
                Ok(container) => {
                    let candidate = Candidate::new(kind, container, heading_boost);
                    tracing::debug!(
                        strategy = %kind,
                        text_len = candidate.text_len(),
                        link_density = candidate.link_density(),
                        score = candidate.score(),
                        "candidate extracted"
                    );
                    Some(candidate)
                }
                Err(e) => {
                    tracing::debug!(strategy = %kind, error = %e, "strategy produced no candidate");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};

    fn candidate(html: &str) -> Candidate {
        Candidate::new(StrategyKind::Trafilatura, Container::from_html(html), 1.15)
    }

    #[test]
    fn test_metrics_plain_text() {
        let c = candidate("<p>abcdefghij</p>");
        assert_eq!(c.text(), "abcdefghij");
        assert_eq!(c.text_len(), 10);
        assert!(c.link_density().abs() < f64::EPSILON);
        assert!(!c.has_heading());
        assert!((c.score() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_link_density_lowers_score() {
        let c = candidate(r#"<p>abcde <a href="/x">fghij</a></p>"#);
        // "abcde fghij" is 11 chars, 5 of them linked
        assert_eq!(c.text_len(), 11);
        assert!((c.link_density() - 5.0 / 11.0).abs() < 1e-9);
        assert!((c.score() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_heading_boost_applied() {
        let c = candidate("<h3>Title</h3><p>Body</p>");
        assert!(c.has_heading());
        // "Title Body"
        assert!((c.score() - 10.0 * 1.15).abs() < 1e-9);
    }

    #[test]
    fn test_h1_and_h6_do_not_boost() {
        assert!(!candidate("<h1>Top</h1><h6>Small</h6>").has_heading());
    }

    #[test]
    fn test_empty_container() {
        let c = candidate("");
        assert_eq!(c.text_len(), 0);
        assert!(c.link_density().abs() < f64::EPSILON);
        assert!(c.score().abs() < f64::EPSILON);
    }

    #[test]
    fn test_multibyte_length_counts_chars() {
        assert_eq!(candidate("<p>日本語の本文</p>").text_len(), 6);
    }

    struct Failing;

    impl ExtractionStrategy for Failing {
        fn kind(&self) -> StrategyKind {
            StrategyKind::Custom("failing")
        }

        fn extract(&self, _doc: &Document) -> Result<Container> {
            Err(Error::StrategyError("boom".into()))
        }
    }

    struct Fixed(&'static str);

    impl ExtractionStrategy for Fixed {
        fn kind(&self) -> StrategyKind {
            StrategyKind::Custom(self.0)
        }

        fn extract(&self, _doc: &Document) -> Result<Container> {
            Ok(Container::from_html("<p>fixed text</p>"))
        }
    }

    #[test]
    fn test_failing_strategy_is_skipped() {
        let strategies: Vec<Box<dyn ExtractionStrategy>> =
            vec![Box::new(Failing), Box::new(Fixed("a")), Box::new(Fixed("b"))];
        let doc = dom::parse("<p>irrelevant</p>");

        let candidates = extract_candidates(&doc, &strategies, 1.15);
        let kinds: Vec<StrategyKind> = candidates.iter().map(Candidate::strategy).collect();
        assert_eq!(kinds, vec![StrategyKind::Custom("a"), StrategyKind::Custom("b")]);
    }
}
