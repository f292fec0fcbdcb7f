//! Batch orchestration over ordered inputs.
//!
//! Every input index lands in exactly one of `results` or `errors`, both
//! kept in input order. A failing item never stops the ones after it.

use std::time::Duration;

use catalog_ingest::ImportOptions;
use catalog_model::{Product, TargetPlatform};
use catalog_output::ExportOptions;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::PipelineError;
use crate::pipeline::{ExportResult, SourceDocument, export_product, import_document, transcode};

/// Limits for URL batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchOptions {
    /// Fetches in flight at once.
    pub fetch_limit: usize,
    /// Per-item fetch deadline.
    pub fetch_timeout: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            fetch_limit: 4,
            fetch_timeout: Duration::from_secs(30),
        }
    }
}

impl BatchOptions {
    #[must_use]
    pub fn with_fetch_limit(mut self, limit: usize) -> Self {
        self.fetch_limit = limit;
        self
    }

    #[must_use]
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }
}

/// Index-correlated successes and failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome<T> {
    pub results: Vec<(usize, T)>,
    pub errors: Vec<(usize, PipelineError)>,
}

impl<T> Default for BatchOutcome<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            errors: Vec::new(),
        }
    }
}

impl<T> BatchOutcome<T> {
    /// Split per-item results, which must already be in input order.
    pub fn from_results<I>(items: I) -> Self
    where
        I: IntoIterator<Item = (usize, Result<T, PipelineError>)>,
    {
        let mut outcome = Self::default();
        for (index, item) in items {
            match item {
                Ok(value) => outcome.results.push((index, value)),
                Err(err) => {
                    warn!(index, kind = err.kind(), error = %err, "batch item failed");
                    outcome.errors.push((index, err));
                }
            }
        }
        info!(
            succeeded = outcome.success_count(),
            failed = outcome.error_count(),
            "batch finished"
        );
        outcome
    }

    pub fn success_count(&self) -> usize {
        self.results.len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn total(&self) -> usize {
        self.success_count() + self.error_count()
    }

    /// True when nothing failed.
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    /// Successful values in input order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.results.iter().map(|(_, value)| value)
    }
}

/// Import each document independently.
#[tracing::instrument(skip_all, fields(items = documents.len()))]
pub fn import_batch(
    documents: &[SourceDocument],
    options: &ImportOptions,
) -> BatchOutcome<Product> {
    BatchOutcome::from_results(
        documents
            .iter()
            .enumerate()
            .map(|(index, document)| (index, import_document(document, options))),
    )
}

/// Convert, validate and export each product independently.
#[tracing::instrument(skip_all, fields(items = products.len(), platform = %target))]
pub fn export_batch(
    products: &[Product],
    target: TargetPlatform,
    options: &ExportOptions,
) -> BatchOutcome<ExportResult> {
    BatchOutcome::from_results(
        products
            .iter()
            .enumerate()
            .map(|(index, product)| (index, export_product(product, target, options))),
    )
}

/// Import and export each document independently.
#[tracing::instrument(skip_all, fields(items = documents.len(), platform = %target))]
pub fn transcode_batch(
    documents: &[SourceDocument],
    target: TargetPlatform,
    import_options: &ImportOptions,
    export_options: &ExportOptions,
) -> BatchOutcome<ExportResult> {
    BatchOutcome::from_results(documents.iter().enumerate().map(|(index, document)| {
        (
            index,
            transcode(document, target, import_options, export_options),
        )
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_add_up() {
        let outcome: BatchOutcome<u8> = BatchOutcome::from_results([
            (0, Ok(1)),
            (1, Err(PipelineError::detection("unknown"))),
            (2, Ok(3)),
        ]);
        assert_eq!(outcome.success_count(), 2);
        assert_eq!(outcome.error_count(), 1);
        assert_eq!(outcome.total(), 3);
        assert!(!outcome.is_complete());
        assert_eq!(outcome.values().copied().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: BatchOptions = serde_json::from_str(r#"{"fetch_limit": 8}"#).unwrap();
        assert_eq!(options.fetch_limit, 8);
        assert_eq!(options.fetch_timeout, Duration::from_secs(30));
    }
}
