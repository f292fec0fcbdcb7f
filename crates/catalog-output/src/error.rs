//! Error types for CSV export.

use catalog_model::TargetPlatform;
use thiserror::Error;

/// Errors that can occur while exporting products.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    /// Batch export was called with nothing to export.
    #[error("at least one product is required for a {target} export")]
    EmptyBatch { target: TargetPlatform },

    /// Two products in one batch would write the same identifying key.
    #[error("duplicate {column} '{key}' in {target} batch (products {first} and {second})")]
    DuplicateKey {
        target: TargetPlatform,
        column: &'static str,
        key: String,
        first: usize,
        second: usize,
    },

    /// Product reached the exporter without any variant.
    #[error("product '{title}' has no variants to export")]
    NoVariants { title: String },

    /// CSV writer failed.
    #[error("failed to write CSV: {message}")]
    Csv { message: String },
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv {
            message: err.to_string(),
        }
    }
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
