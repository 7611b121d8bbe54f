//! Concurrent documentation fetcher.
//!
//! Fetches every configured page with a fixed concurrency cap and folds the
//! successful ones into a [`DocIndex`]. A failed page is logged and skipped;
//! it never fails the batch.

use std::time::Duration;

use futures::StreamExt;
use reqwest::Client;
use tracing::{debug, info, warn};
use url::Url;

use super::extract::extract_text;
use super::types::{DocIndex, DocPage, DocSource, FetchFailure};

pub const DEFAULT_MAX_CONCURRENT: usize = 10;
/// Hard ceiling on in-flight requests, whatever the config asks for.
pub const MAX_CONCURRENT_CAP: usize = 10;
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Everything one scrape run needs to know about what to fetch and how.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub sources: Vec<DocSource>,
    pub max_concurrent: usize,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl ScrapeConfig {
    pub fn new(sources: Vec<DocSource>) -> Self {
        Self {
            sources,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Per-page fetch error. Recovered by skipping the page.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("timeout fetching {0}")]
    Timeout(String),
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },
    #[error("no text extracted from {0}")]
    NoContent(String),
}

/// Result of fetching a whole source list.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub index: DocIndex,
    pub failures: Vec<FetchFailure>,
}

impl FetchOutcome {
    pub fn succeeded(&self) -> usize {
        self.index.len()
    }
}

pub struct DocFetcher {
    client: Client,
    max_concurrent: usize,
}

impl DocFetcher {
    pub fn new(config: &ScrapeConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            max_concurrent: config.max_concurrent.clamp(1, MAX_CONCURRENT_CAP),
        })
    }

    /// Fetch and extract a single page.
    pub async fn fetch_page(&self, source: &DocSource) -> Result<DocPage, FetchError> {
        let url = Url::parse(&source.url)
            .ok()
            .filter(|u| matches!(u.scheme(), "http" | "https"))
            .ok_or_else(|| FetchError::InvalidUrl(source.url.clone()))?;

        debug!(url = %source.url, "fetching page");

        let resp = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(source.url.clone())
            } else {
                FetchError::Request {
                    url: source.url.clone(),
                    source: e,
                }
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: source.url.clone(),
                status: status.as_u16(),
            });
        }

        let html = resp.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(source.url.clone())
            } else {
                FetchError::Request {
                    url: source.url.clone(),
                    source: e,
                }
            }
        })?;

        let text = extract_text(&html);
        if text.is_empty() {
            return Err(FetchError::NoContent(source.url.clone()));
        }

        info!(url = %source.url, chars = text.chars().count(), "page fetched");

        Ok(DocPage {
            url: source.url.clone(),
            topic: source.topic.clone(),
            subtopic: source.subtopic.clone(),
            text,
        })
    }

    /// Fetch every source and wait for all of them to settle.
    ///
    /// Up to `max_concurrent` requests are in flight at once. Results are
    /// applied in source order, so when two sources share a key the later
    /// one wins regardless of which response arrived first.
    pub async fn fetch_all(&self, sources: &[DocSource]) -> FetchOutcome {
        let results: Vec<(&DocSource, Result<DocPage, FetchError>)> =
            futures::stream::iter(sources)
                .map(|source| async move { (source, self.fetch_page(source).await) })
                .boxed()
                .buffered(self.max_concurrent)
                .collect()
                .await;

        let mut outcome = FetchOutcome::default();
        for (source, result) in results {
            match result {
                Ok(page) => outcome.index.insert(page),
                Err(e) => {
                    warn!(
                        url = %source.url,
                        topic = %source.topic,
                        subtopic = %source.subtopic,
                        "skipping page: {}",
                        e
                    );
                    outcome.failures.push(FetchFailure {
                        url: source.url.clone(),
                        topic: source.topic.clone(),
                        subtopic: source.subtopic.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
        outcome
    }
}
