//! URL-mode import through a fetch collaborator.
//!
//! The pipeline never talks to the network itself. A [`Fetcher`] turns a
//! detected product URL into the platform's JSON payload; everything after
//! that is the same pure import used for files.

use async_trait::async_trait;
use catalog_ingest::{ImportOptions, RawDocument, UrlDetection, detect_url};
use catalog_model::{Platform, Product};
use futures::stream::{self, StreamExt};
use thiserror::Error;
use tracing::debug;

use crate::batch::{BatchOptions, BatchOutcome};
use crate::error::{PipelineError, Result};
use crate::pipeline::import_raw_document;
use crate::registry::registry;

/// A product URL the orchestrator has attributed to a platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub platform: Platform,
    pub detection: UrlDetection,
}

/// Collaborator failure, surfaced per item as a fetch error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FetchFailure {
    pub message: String,
}

impl FetchFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Retrieves the raw JSON payload for a product URL.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> std::result::Result<String, FetchFailure>;
}

/// Detect, fetch and import each URL.
///
/// At most `fetch_limit` fetches are in flight; results keep input order.
/// Timeouts and fetcher failures become per-item fetch errors.
#[tracing::instrument(skip_all, fields(items = urls.len(), limit = options.fetch_limit))]
pub async fn fetch_and_import<F>(
    urls: &[String],
    fetcher: &F,
    options: &BatchOptions,
    import_options: &ImportOptions,
) -> BatchOutcome<Product>
where
    F: Fetcher + ?Sized,
{
    let items: Vec<(usize, Result<Product>)> = stream::iter(urls.iter().enumerate())
        .map(|(index, url)| async move {
            (
                index,
                fetch_one(url, fetcher, options, import_options).await,
            )
        })
        .buffered(options.fetch_limit.max(1))
        .collect()
        .await;
    BatchOutcome::from_results(items)
}

async fn fetch_one<F>(
    url: &str,
    fetcher: &F,
    options: &BatchOptions,
    import_options: &ImportOptions,
) -> Result<Product>
where
    F: Fetcher + ?Sized,
{
    let request = request_for(url)?;
    let fetched = tokio::time::timeout(options.fetch_timeout, fetcher.fetch(&request)).await;
    let text = match fetched {
        Ok(Ok(text)) => text,
        Ok(Err(failure)) => {
            return Err(PipelineError::Fetch {
                url: url.to_string(),
                reason: failure.message,
            });
        }
        Err(_) => {
            return Err(PipelineError::Fetch {
                url: url.to_string(),
                reason: format!("timed out after {} ms", options.fetch_timeout.as_millis()),
            });
        }
    };
    debug!(url, bytes = text.len(), "fetched document");
    let document = RawDocument::from_json(request.platform, &text)?;
    import_raw_document(&document, import_options)
}

fn request_for(url: &str) -> Result<FetchRequest> {
    let detection = detect_url(url);
    let Some(platform) = detection.platform else {
        return Err(PipelineError::detection(format!(
            "no platform recognized for {url}"
        )));
    };
    if !registry().get(platform).can_import_url() {
        return Err(PipelineError::detection(format!(
            "{platform} products cannot be imported from a URL"
        )));
    }
    Ok(FetchRequest {
        url: url.to_string(),
        platform,
        detection,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_urls_fail_detection() {
        let err = request_for("not a url").unwrap_err();
        assert_eq!(err.kind(), "detection");
        assert!(request_for("https://shop.example.com/products/widget").is_ok());
    }
}
