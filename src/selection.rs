//! Candidate Selector
//!
//! Picks the winning candidate of one page version, then arbitrates between
//! the primary page and its alternate (AMP/print) version.

use serde::Serialize;

use crate::candidate::Candidate;

/// Which rendition of the page the content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageVersion {
    Primary,
    Alternate,
}

/// The winning candidate and the version it was extracted from.
#[derive(Debug)]
pub struct SelectionResult {
    pub candidate: Candidate,
    pub version: PageVersion,
}

/// Pick the best candidate among `candidates`.
///
/// Candidates shorter than `min_text_len` characters are discarded. The
/// highest score wins; exact ties go to the strategy with the lower
/// tie-break rank (readability first), then to the earlier candidate.
#[must_use]
pub fn select_best(candidates: Vec<Candidate>, min_text_len: usize) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;

    for candidate in candidates {
        if candidate.text_len() < min_text_len {
            tracing::trace!(
                strategy = %candidate.strategy(),
                text_len = candidate.text_len(),
                "candidate below minimum length"
            );
            continue;
        }

        let replace = match &best {
            None => true,
            Some(current) => beats(&candidate, current),
        };
        if replace {
            best = Some(candidate);
        }
    }

    best
}

#[allow(clippy::float_cmp)]
fn beats(challenger: &Candidate, current: &Candidate) -> bool {
    if challenger.score() != current.score() {
        return challenger.score() > current.score();
    }
    challenger.strategy().tie_break_rank() < current.strategy().tie_break_rank()
}

/// Arbitrate between the primary winner and the alternate winner.
///
/// The alternate is used only when its text is strictly longer than the
/// primary's, or when the primary produced nothing.
#[must_use]
pub fn choose_version(primary: Option<Candidate>, alternate: Option<Candidate>) -> Option<SelectionResult> {
    match (primary, alternate) {
        (Some(primary), Some(alternate)) if alternate.text_len() > primary.text_len() => {
            tracing::debug!(
                primary_len = primary.text_len(),
                alternate_len = alternate.text_len(),
                "alternate version is longer, using it"
            );
            Some(SelectionResult { candidate: alternate, version: PageVersion::Alternate })
        }
        (Some(primary), _) => Some(SelectionResult { candidate: primary, version: PageVersion::Primary }),
        (None, Some(alternate)) => Some(SelectionResult { candidate: alternate, version: PageVersion::Alternate }),
        (None, None) => None,
    }
}
