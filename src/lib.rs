//! # rs-pagetext
//!
//! Readable-content extraction for web pages, rendered as structured plain
//! text.
//!
//! Each submitted URL is fetched, stripped of navigation, ads and other
//! boilerplate, and handed to several content-extraction strategies. The best
//! candidate wins (an AMP or print version of the page is used instead when
//! it yields longer text), and its headings, paragraphs, lists, quotes, code
//! and tables are serialized in document order.
//!
//! ## Quick Start
//!
//! ```rust
//! use rs_pagetext::{Extractor, Options};
//!
//! let html = r#"<html><head><title>My Article</title></head><body>
//!   <nav>Home | About</nav>
//!   <article><h2>Intro</h2><p>Main content here, long enough to be worth keeping around.</p></article>
//! </body></html>"#;
//!
//! let extractor = Extractor::new(Options::default())?;
//! let report = extractor.extract_html("https://example.com/post", html, None);
//! assert!(report.is_ok());
//! println!("{}", report.render());
//! # Ok::<(), rs_pagetext::Error>(())
//! ```
//!
//! ## Output
//!
//! ```text
//! BEGIN
//! URL: https://example.com/post
//! Title: My Article
//! H2/H3/H4/H5: Intro
//! Body:
//! Intro
//! Main content here, long enough to be worth keeping around.
//! END
//! ```

mod error;
mod options;

/// DOM operations adapter over `dom_query`.
pub mod dom;

/// Character encoding detection and transcoding.
pub mod encoding;

/// URL validation and resolution.
pub mod url_utils;

/// Page fetching: the `Fetcher` trait, HTTP and in-memory implementations.
pub mod fetch;

/// Boilerplate removal by attribute tokens and tag names.
pub mod noise;

/// AMP and print version discovery.
pub mod alternate;

/// Content-extraction strategies.
pub mod strategy;

/// Candidate metrics and the candidate extractor.
pub mod candidate;

/// Candidate and page-version selection.
pub mod selection;

/// Structural serialization of the winning container.
pub mod serializer;

/// Per-URL reports and the text template.
pub mod report;

/// The end-to-end pipeline.
pub mod pipeline;

// Public API - re-exports
pub use error::{Error, Result, CONTENT_NOT_FOUND};
pub use fetch::{FetchError, FetchedPage, Fetcher, HttpFetcher, MemoryFetcher};
pub use options::{FetchOptions, Options};
pub use pipeline::{parse_url_list, Extractor, PageDocument};
pub use report::{render_reports, ExtractionReport, Status};
pub use serializer::Block;
pub use strategy::{Container, ExtractionStrategy, StrategyKind};

/// Process `urls` with default options, returning the rendered reports.
///
/// `prefer_alt` enables AMP/print alternate versions. Per-URL failures are
/// rendered as error reports; only an empty URL list is an error.
///
/// # Example
///
/// ```rust
/// use rs_pagetext::{process, MemoryFetcher};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let fetcher = MemoryFetcher::new();
/// let out = process(&fetcher, &["https://example.com/missing"], true).await?;
/// assert!(out.contains("ERROR: content_not_found"));
/// # Ok::<(), rs_pagetext::Error>(())
/// # }).unwrap();
/// ```
#[allow(clippy::missing_errors_doc)]
pub async fn process<F, S>(fetcher: &F, urls: &[S], prefer_alt: bool) -> Result<String>
where
    F: Fetcher + ?Sized,
    S: AsRef<str>,
{
    let options = Options {
        prefer_alt,
        ..Options::default()
    };
    Extractor::new(options)?.process(fetcher, urls).await
}
