pub mod cache;
pub mod extract;
pub mod fetch;
pub mod sources;
pub mod types;

use std::path::Path;
use std::time::Instant;

use tracing::info;

pub use cache::{load_index, write_index, CacheError, CacheWrite};
pub use fetch::{DocFetcher, FetchError, FetchOutcome, ScrapeConfig};
pub use types::{DocIndex, DocPage, DocSource, FetchFailure, ScrapeReport};

#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// One scrape run: fetch every configured page, wait for all of them, then
/// replace the cache file.
///
/// Page failures are skipped and reported. A cache write failure is fatal
/// and leaves the previous cache in place.
pub async fn scrape_run(config: &ScrapeConfig, cache_path: &Path) -> Result<ScrapeReport, ScrapeError> {
    let started_at = chrono::Utc::now();
    let started = Instant::now();

    info!(
        sources = config.sources.len(),
        max_concurrent = config.max_concurrent,
        "scrape run starting"
    );

    let fetcher = DocFetcher::new(config)?;
    let outcome = fetcher.fetch_all(&config.sources).await;
    let written = write_index(cache_path, &outcome.index).await?;

    let report = ScrapeReport {
        succeeded: config.sources.len() - outcome.failures.len(),
        skipped: outcome.failures.len(),
        failures: outcome.failures,
        cache_path: cache_path.to_path_buf(),
        digest: written.digest,
        started_at,
        elapsed: started.elapsed(),
    };

    info!(
        succeeded = report.succeeded,
        skipped = report.skipped,
        pages = outcome.index.len(),
        bytes = written.bytes,
        digest = %report.digest,
        path = %cache_path.display(),
        elapsed_ms = report.elapsed.as_millis() as u64,
        "scrape run complete"
    );

    Ok(report)
}
