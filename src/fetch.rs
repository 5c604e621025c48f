//! Page fetching.
//!
//! The pipeline only depends on the [`Fetcher`] trait. [`HttpFetcher`] is the
//! production implementation (reqwest, per-request timeout, bounded retries
//! with exponential backoff, charset-aware decoding). [`MemoryFetcher`] serves
//! canned pages and is used for offline runs and tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, CONTENT_TYPE};
use tokio::time::sleep;

use crate::encoding::decode_html;
use crate::options::FetchOptions;
use crate::url_utils::parse_absolute_url;

/// Why a page could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("http status {0}")]
    Status(u16),

    #[error("failed to read body: {0}")]
    Body(String),

    #[error("http client error: {0}")]
    Client(String),
}

impl FetchError {
    /// Transient failures worth another attempt.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout | Self::Connect(_) | Self::Body(_) => true,
            Self::Status(code) => matches!(code, 429 | 500 | 502 | 503 | 504),
            Self::InvalidUrl(_) | Self::Client(_) => false,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else if e.is_body() || e.is_decode() {
            Self::Body(e.to_string())
        } else if let Some(status) = e.status() {
            Self::Status(status.as_u16())
        } else {
            Self::Client(e.to_string())
        }
    }
}

/// A fetched HTML page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// Final URL after redirects; relative links resolve against it.
    pub url: String,
    /// Decoded document.
    pub html: String,
}

/// Source of HTML pages.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch a submitted page.
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;

    /// Fetch an alternate (AMP/print) version. Implementations may apply a
    /// tighter budget than for the primary page.
    async fn fetch_alternate(&self, url: &str) -> Result<FetchedPage, FetchError> {
        self.fetch(url).await
    }
}

/// HTTP fetcher with bounded retries.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    options: FetchOptions,
}

impl HttpFetcher {
    /// Build a fetcher from `options`.
    pub fn new(options: &FetchOptions) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        let language = HeaderValue::from_str(&options.accept_language)
            .map_err(|e| FetchError::Client(format!("accept-language: {e}")))?;
        headers.insert(ACCEPT_LANGUAGE, language);

        let client = reqwest::Client::builder()
            .user_agent(options.user_agent.as_str())
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client, options: options.clone() })
    }

    /// Delay before retry number `attempt` (1-based): `backoff_ms * 2^(attempt-1)`.
    #[must_use]
    pub fn backoff(&self, attempt: usize) -> Duration {
        let exp = u32::try_from(attempt.saturating_sub(1)).unwrap_or(u32::MAX).min(16);
        Duration::from_millis(self.options.backoff_ms.saturating_mul(1u64 << exp))
    }

    async fn get_with_retry(&self, url: &str, timeout: Duration) -> Result<FetchedPage, FetchError> {
        let target = parse_absolute_url(url).ok_or_else(|| FetchError::InvalidUrl(url.to_string()))?;
        let max_retries = self.options.max_retries;
        let mut attempt = 0;

        loop {
            match self.get_once(target.clone(), timeout).await {
                Ok(page) => {
                    tracing::debug!(url, attempt, bytes = page.html.len(), "http.fetched");
                    return Ok(page);
                }
                Err(e) if e.is_retryable() && attempt < max_retries => {
                    attempt += 1;
                    let delay = self.backoff(attempt);
                    tracing::warn!(
                        url,
                        attempt,
                        max_retries,
                        backoff_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %e,
                        "http.retrying"
                    );
                    sleep(delay).await;
                }
                Err(e) => {
                    tracing::warn!(url, attempt, error = %e, "http.error");
                    return Err(e);
                }
            }
        }
    }

    async fn get_once(&self, url: url::Url, timeout: Duration) -> Result<FetchedPage, FetchError> {
        let response = self.client.get(url).timeout(timeout).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?;

        Ok(FetchedPage {
            url: final_url,
            html: decode_html(&bytes, content_type.as_deref()),
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        self.get_with_retry(url, Duration::from_secs(self.options.timeout_secs))
            .await
    }

    async fn fetch_alternate(&self, url: &str) -> Result<FetchedPage, FetchError> {
        self.get_with_retry(url, Duration::from_secs(self.options.alt_timeout_secs))
            .await
    }
}

/// In-memory fetcher serving canned pages. Unknown URLs answer 404.
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    pages: HashMap<String, Result<String, FetchError>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MemoryFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` for `url`.
    #[must_use]
    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), Ok(html.into()));
        self
    }

    /// Fail every request for `url` with `error`.
    #[must_use]
    pub fn with_error(mut self, url: impl Into<String>, error: FetchError) -> Self {
        self.pages.insert(url.into(), Err(error));
        self
    }

    /// URLs requested so far, in request order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Fetcher for MemoryFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
        match self.pages.get(url) {
            Some(Ok(html)) => Ok(FetchedPage { url: url.to_string(), html: html.clone() }),
            Some(Err(e)) => Err(e.clone()),
            None => Err(FetchError::Status(404)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_retryable_errors() {
        assert!(FetchError::Timeout.is_retryable());
        assert!(FetchError::Connect("refused".into()).is_retryable());
        assert!(FetchError::Status(429).is_retryable());
        assert!(FetchError::Status(503).is_retryable());
        assert!(!FetchError::Status(404).is_retryable());
        assert!(!FetchError::Status(501).is_retryable());
        assert!(!FetchError::InvalidUrl("x".into()).is_retryable());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(FetchError::Status(404).to_string(), "http status 404");
    }

    #[test]
    fn test_backoff_is_exponential() {
        let fetcher = HttpFetcher::new(&FetchOptions::default()).unwrap();
        assert_eq!(fetcher.backoff(1), Duration::from_millis(600));
        assert_eq!(fetcher.backoff(2), Duration::from_millis(1200));
        assert_eq!(fetcher.backoff(3), Duration::from_millis(2400));
    }

    #[tokio::test]
    async fn test_invalid_url_is_not_requested() {
        let fetcher = HttpFetcher::new(&FetchOptions::default()).unwrap();
        let err = fetcher.fetch("not a url").await.unwrap_err();
        assert_eq!(err, FetchError::InvalidUrl("not a url".into()));
    }

    fn fast_fetcher(max_retries: usize, timeout_secs: u64) -> HttpFetcher {
        HttpFetcher::new(&FetchOptions {
            max_retries,
            timeout_secs,
            backoff_ms: 1,
            ..FetchOptions::default()
        })
        .unwrap()
    }

    async fn request_count(server: &MockServer) -> usize {
        server.received_requests().await.unwrap_or_default().len()
    }

    #[tokio::test]
    async fn test_persistent_503_retries_then_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/busy"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = fast_fetcher(2, 5)
            .fetch(&format!("{}/busy", server.uri()))
            .await
            .unwrap_err();

        assert_eq!(err, FetchError::Status(503));
        assert_eq!(request_count(&server).await, 3);
    }

    #[tokio::test]
    async fn test_404_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = fast_fetcher(3, 5)
            .fetch(&format!("{}/gone", server.uri()))
            .await
            .unwrap_err();

        assert_eq!(err, FetchError::Status(404));
        assert_eq!(request_count(&server).await, 1);
    }

    #[tokio::test]
    async fn test_transient_failure_recovers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(502))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html; charset=utf-8")
                    .set_body_string("<p>caf\u{e9}</p>"),
            )
            .mount(&server)
            .await;

        let url = format!("{}/flaky", server.uri());
        let page = fast_fetcher(3, 5).fetch(&url).await.unwrap();

        assert_eq!(page.html, "<p>caf\u{e9}</p>");
        assert_eq!(page.url, url);
        assert_eq!(request_count(&server).await, 2);
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<p>late</p>")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let err = fast_fetcher(0, 1)
            .fetch(&format!("{}/slow", server.uri()))
            .await
            .unwrap_err();

        assert_eq!(err, FetchError::Timeout);
        assert_eq!(request_count(&server).await, 1);
    }

    #[tokio::test]
    async fn test_memory_fetcher() {
        let fetcher = MemoryFetcher::new()
            .with_page("https://a.example/", "<p>a</p>")
            .with_error("https://b.example/", FetchError::Timeout);

        let page = fetcher.fetch("https://a.example/").await.unwrap();
        assert_eq!(page.html, "<p>a</p>");
        assert_eq!(fetcher.fetch("https://b.example/").await.unwrap_err(), FetchError::Timeout);
        assert_eq!(fetcher.fetch_alternate("https://c.example/").await.unwrap_err(), FetchError::Status(404));

        assert_eq!(
            fetcher.requests(),
            vec!["https://a.example/", "https://b.example/", "https://c.example/"]
        );
    }
}
