//! Error types for rs-pagetext.
//!
//! This module defines the error types returned by extraction operations.
//! Per-URL failures never escape [`crate::process`]; they are folded into an
//! error report through [`Error::reason`].

use crate::fetch::FetchError;

/// Reason token every per-URL failure starts with.
pub const CONTENT_NOT_FOUND: &str = "content_not_found";

/// Error type for extraction operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The page (or its alternate version) could not be fetched.
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// HTML parsing failed or produced an unusable document.
    #[error("HTML parsing failed: {0}")]
    ParseError(String),

    /// No strategy produced a usable content container.
    #[error("No extractable content found")]
    NoContent,

    /// A single extraction strategy failed. Absorbed by the candidate extractor.
    #[error("Extraction strategy failed: {0}")]
    StrategyError(String),

    /// The caller submitted no URLs.
    #[error("no URLs submitted")]
    EmptyInput,

    /// Options failed validation.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Reason text written to the `ERROR:` line of a failed report.
    ///
    /// Always starts with [`CONTENT_NOT_FOUND`]; the specific kind follows in
    /// parentheses when one is known.
    #[must_use]
    pub fn reason(&self) -> String {
        match self {
            Self::NoContent => CONTENT_NOT_FOUND.to_string(),
            Self::Fetch(e) => format!("{CONTENT_NOT_FOUND} (fetch_error: {e})"),
            Self::ParseError(msg) => format!("{CONTENT_NOT_FOUND} (parse_error: {msg})"),
            Self::StrategyError(msg) => format!("{CONTENT_NOT_FOUND} (strategy_error: {msg})"),
            Self::EmptyInput => format!("{CONTENT_NOT_FOUND} (no_urls)"),
            Self::Config(msg) => format!("{CONTENT_NOT_FOUND} (config_error: {msg})"),
        }
    }
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;
