//! Configuration options for content extraction.
//!
//! The `Options` struct controls extraction behavior: which strategies run,
//! the scoring constants, the noise denylist and the fetch budget. It can be
//! built in code or deserialized (e.g. from TOML); missing fields take their
//! defaults.

use serde::Deserialize;

use crate::error::{Error, Result};

/// Denylist tokens matched (case-insensitive substring) against `id`, `class`,
/// `name` and `data-*` attribute values.
pub const DEFAULT_NOISE_TOKENS: &[&str] = &[
    "nav", "menu", "header", "footer", "sidebar", "toc", "share", "sns", "ad",
    "sponsor", "recommend", "related", "comment", "profile", "tag", "category",
    "breadcrumb", "pager", "pagination", "cta",
];

/// Elements removed by tag name regardless of attributes.
pub const DEFAULT_NOISE_TAGS: &[&str] = &[
    "caption", "figcaption", "header", "footer", "nav", "aside",
    "script", "style", "noscript", "template",
];

/// Browser-like user agent; many sites serve stripped pages to unknown bots.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Configuration options for content extraction.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use rs_pagetext::Options;
///
/// let options = Options {
///     prefer_alt: false,
///     heading_boost: 1.3,
///     ..Options::default()
/// };
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Options {
    /// Look for an AMP/print version and use it when it yields longer text.
    ///
    /// Default: `true`
    pub prefer_alt: bool,

    /// Score multiplier for candidates containing an h2-h5 heading. Must be > 1.
    ///
    /// Default: `1.15`
    pub heading_boost: f64,

    /// Candidates with fewer characters than this are discarded before
    /// selection. If none remain, the page has no content.
    ///
    /// Default: `50`
    pub min_text_len: usize,

    /// Minimum text length for a rule-matched container in the trafilatura
    /// strategy. Thinner matches escalate to their parent or are skipped.
    ///
    /// Default: `250`
    pub min_container_len: usize,

    /// Attribute denylist used by the noise filter.
    pub noise_tokens: Vec<String>,

    /// Tags removed unconditionally by the noise filter.
    pub noise_tags: Vec<String>,

    /// Drop repeated URLs from the input, keeping the first occurrence.
    ///
    /// Default: `true`
    pub dedupe_urls: bool,

    /// Number of URL pipelines run at once.
    ///
    /// Default: `min(8, max(2, available cores))`
    pub concurrency: usize,

    /// Run the readability strategy (needs the `readability` feature).
    ///
    /// Default: `true`
    pub use_readability: bool,

    /// Run the rule-based trafilatura strategy.
    ///
    /// Default: `true`
    pub use_trafilatura: bool,

    /// HTTP fetch settings.
    pub fetch: FetchOptions,
}

/// Settings for [`crate::fetch::HttpFetcher`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchOptions {
    /// Per-request timeout for the primary page.
    ///
    /// Default: `20`
    pub timeout_secs: u64,

    /// Per-request timeout for alternate versions.
    ///
    /// Default: `15`
    pub alt_timeout_secs: u64,

    /// Retries after the first attempt. Always finite.
    ///
    /// Default: `3`
    pub max_retries: usize,

    /// Base delay of the exponential backoff between retries.
    ///
    /// Default: `600`
    pub backoff_ms: u64,

    /// `User-Agent` header.
    pub user_agent: String,

    /// `Accept-Language` header.
    ///
    /// Default: `"ja,en;q=0.8"`
    pub accept_language: String,
}

impl Default for Options {
    fn default() -> Self {
        let cores = std::thread::available_parallelism().map_or(2, std::num::NonZeroUsize::get);
        Self {
            prefer_alt: true,
            heading_boost: 1.15,
            min_text_len: 50,
            min_container_len: 250,
            noise_tokens: DEFAULT_NOISE_TOKENS.iter().map(ToString::to_string).collect(),
            noise_tags: DEFAULT_NOISE_TAGS.iter().map(ToString::to_string).collect(),
            dedupe_urls: true,
            concurrency: cores.clamp(2, 8),
            use_readability: true,
            use_trafilatura: true,
            fetch: FetchOptions::default(),
        }
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            alt_timeout_secs: 15,
            max_retries: 3,
            backoff_ms: 600,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: "ja,en;q=0.8".to_string(),
        }
    }
}

impl Options {
    /// Check the invariants the pipeline relies on.
    pub fn validate(&self) -> Result<()> {
        if !self.heading_boost.is_finite() || self.heading_boost <= 1.0 {
            return Err(Error::Config(format!(
                "heading_boost must be greater than 1, got {}",
                self.heading_boost
            )));
        }
        if self.concurrency == 0 {
            return Err(Error::Config("concurrency must be at least 1".into()));
        }
        if !self.readability_enabled() && !self.use_trafilatura {
            return Err(Error::Config("at least one extraction strategy must be enabled".into()));
        }
        Ok(())
    }

    /// Whether the readability strategy will actually run.
    #[must_use]
    pub fn readability_enabled(&self) -> bool {
        cfg!(feature = "readability") && self.use_readability
    }
}
