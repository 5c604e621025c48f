//! Report Builder
//!
//! Drives one URL through fetch, alternate lookup, noise filtering,
//! candidate extraction, selection and serialization, and runs a batch of
//! URLs concurrently while keeping input order.
//!
//! Parsed documents never cross an await point: the alternate link is located
//! on a throwaway parse, both pages are fetched, then the whole extraction
//! runs synchronously.

use std::collections::HashSet;

use futures::stream::{self, StreamExt};
use url::Url;

use crate::alternate;
use crate::candidate::{extract_candidates, Candidate};
use crate::dom::{self, Document};
use crate::error::{Error, Result};
use crate::fetch::{FetchedPage, Fetcher};
use crate::noise::NoiseFilter;
use crate::options::Options;
use crate::report::{render_reports, ExtractionReport};
use crate::selection::{choose_version, select_best, PageVersion};
use crate::serializer::{page_title, serialize};
use crate::strategy::{default_strategies, ExtractionStrategy};

/// The HTML of one page version (primary or alternate) and its parsed tree.
///
/// Carries no URL: reports always name the submitted URL, whichever version
/// wins.
pub struct PageDocument {
    html: String,
    doc: Document,
}

impl PageDocument {
    /// Parse `html`. Empty or whitespace-only input is a parse error.
    pub fn parse(html: impl Into<String>) -> Result<Self> {
        let html = html.into();
        if html.trim().is_empty() {
            return Err(Error::ParseError("empty document".into()));
        }
        let doc = dom::parse(&html);
        Ok(Self { html, doc })
    }

    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Normalized `<title>`, falling back to the first `<h1>`.
    #[must_use]
    pub fn title(&self) -> String {
        page_title(&self.doc)
    }
}

/// Split raw input into URLs: one per line, trimmed, blank lines skipped.
///
/// # Example
///
/// ```rust
/// use rs_pagetext::parse_url_list;
///
/// let urls = parse_url_list("  http://a\n\nhttp://b  ");
/// assert_eq!(urls, vec!["http://a", "http://b"]);
/// ```
#[must_use]
pub fn parse_url_list(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Configured extraction pipeline.
pub struct Extractor {
    options: Options,
    strategies: Vec<Box<dyn ExtractionStrategy>>,
    noise: NoiseFilter,
}

impl Extractor {
    /// Pipeline with the built-in strategies enabled by `options`.
    pub fn new(options: Options) -> Result<Self> {
        let strategies = default_strategies(&options);
        Self::with_strategies(options, strategies)
    }

    /// Pipeline with caller-supplied strategies, in tie-break order.
    pub fn with_strategies(options: Options, strategies: Vec<Box<dyn ExtractionStrategy>>) -> Result<Self> {
        options.validate()?;
        if strategies.is_empty() {
            return Err(Error::Config("no extraction strategies".into()));
        }
        let noise = NoiseFilter::from_options(&options);
        Ok(Self { options, strategies, noise })
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Extract one page offline. `alt_html` is the alternate version's HTML,
    /// considered only when `prefer_alt` is enabled.
    #[must_use]
    pub fn extract_html(&self, url: &str, html: &str, alt_html: Option<&str>) -> ExtractionReport {
        match self.try_extract(url, html, alt_html) {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(url, reason = %e.reason(), "extraction failed");
                ExtractionReport::error(url, &e)
            }
        }
    }

    fn try_extract(&self, url: &str, html: &str, alt_html: Option<&str>) -> Result<ExtractionReport> {
        let primary = PageDocument::parse(html)?;
        let primary_best = self.winner(&primary);

        let alternate = alt_html
            .filter(|_| self.options.prefer_alt)
            .and_then(|alt| match PageDocument::parse(alt) {
                Ok(page) => Some(page),
                Err(e) => {
                    tracing::debug!(url, error = %e, "alternate version unusable");
                    None
                }
            });
        let alternate_best = alternate.as_ref().and_then(|page| self.winner(page));

        let selected = choose_version(primary_best, alternate_best).ok_or(Error::NoContent)?;
        let title = match (selected.version, &alternate) {
            (PageVersion::Alternate, Some(page)) => page.title(),
            _ => primary.title(),
        };

        let content = serialize(selected.candidate.container());
        if content.blocks.is_empty() {
            return Err(Error::NoContent);
        }

        tracing::debug!(
            url,
            strategy = %selected.candidate.strategy(),
            version = ?selected.version,
            blocks = content.blocks.len(),
            "content serialized"
        );
        Ok(ExtractionReport::ok(url, title, content))
    }

    /// Best candidate of one page version, if any survives selection.
    fn winner(&self, page: &PageDocument) -> Option<Candidate> {
        let filtered = self.noise.apply(page.document());
        let candidates = extract_candidates(&filtered, &self.strategies, self.options.heading_boost);
        select_best(candidates, self.options.min_text_len)
    }

    /// Trim, drop blanks and (when configured) duplicates. Rejects an empty list.
    fn prepare_urls<S: AsRef<str>>(&self, urls: &[S]) -> Result<Vec<String>> {
        let mut seen = HashSet::new();
        let prepared: Vec<String> = urls
            .iter()
            .map(|u| u.as_ref().trim())
            .filter(|u| !u.is_empty())
            .filter(|u| !self.options.dedupe_urls || seen.insert(u.to_string()))
            .map(str::to_string)
            .collect();

        if prepared.is_empty() {
            return Err(Error::EmptyInput);
        }
        Ok(prepared)
    }

    /// Process `urls` and return one report per URL, in input order.
    pub async fn process_reports<F, S>(&self, fetcher: &F, urls: &[S]) -> Result<Vec<ExtractionReport>>
    where
        F: Fetcher + ?Sized,
        S: AsRef<str>,
    {
        let urls = self.prepare_urls(urls)?;
        tracing::info!(count = urls.len(), concurrency = self.options.concurrency, "processing urls");

        let reports = stream::iter(urls.iter())
            .map(|url| self.process_url(fetcher, url))
            .buffered(self.options.concurrency)
            .collect::<Vec<_>>()
            .await;
        Ok(reports)
    }

    /// Process `urls` and render the reports.
    pub async fn process<F, S>(&self, fetcher: &F, urls: &[S]) -> Result<String>
    where
        F: Fetcher + ?Sized,
        S: AsRef<str>,
    {
        let reports = self.process_reports(fetcher, urls).await?;
        Ok(render_reports(&reports))
    }

    /// Process newline-separated raw input.
    pub async fn process_input<F>(&self, fetcher: &F, raw: &str) -> Result<String>
    where
        F: Fetcher + ?Sized,
    {
        self.process(fetcher, &parse_url_list(raw)).await
    }

    async fn process_url<F>(&self, fetcher: &F, url: &str) -> ExtractionReport
    where
        F: Fetcher + ?Sized,
    {
        let page = match fetcher.fetch(url).await {
            Ok(page) => page,
            Err(e) => {
                let e = Error::from(e);
                tracing::warn!(url, reason = %e.reason(), "fetch failed");
                return ExtractionReport::error(url, &e);
            }
        };

        let alt_html = if self.options.prefer_alt {
            fetch_alternate(fetcher, &page).await
        } else {
            None
        };

        let report = self.extract_html(url, &page.html, alt_html.as_deref());
        tracing::info!(url, ok = report.is_ok(), "url processed");
        report
    }
}

/// Locate and fetch the alternate version of `page`. Every failure here is
/// non-fatal and yields `None`.
async fn fetch_alternate<F>(fetcher: &F, page: &FetchedPage) -> Option<String>
where
    F: Fetcher + ?Sized,
{
    let base = Url::parse(&page.url).ok()?;
    let link = alternate::locate_in_html(&page.html, &base)?;
    tracing::debug!(url = %page.url, alternate = %link.url, kind = ?link.kind, "alternate version found");

    match fetcher.fetch_alternate(link.url.as_str()).await {
        Ok(alt) => Some(alt.html),
        Err(e) => {
            tracing::debug!(alternate = %link.url, error = %e, "alternate fetch failed");
            None
        }
    }
}
