//! Error types for detection and import.

use catalog_model::{ModelError, Platform};
use thiserror::Error;

/// Errors that can occur while detecting or importing a source document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    // === Detection Errors ===
    /// CSV headers belong to a different platform than the one declared.
    #[error("CSV headers do not match {expected} (detected: {detected})")]
    FingerprintMismatch { expected: Platform, detected: String },

    /// Raw document is tagged with a different platform than requested.
    #[error("expected a {expected} document, got {actual}")]
    DocumentMismatch { expected: Platform, actual: Platform },

    /// Platform has no CSV export format to read.
    #[error("{platform} is not a supported CSV source")]
    UnsupportedCsvSource { platform: Platform },

    /// Platform has no typed raw document.
    #[error("{platform} has no raw document importer")]
    UnsupportedRawSource { platform: Platform },

    // === Input Errors ===
    /// Input has no bytes at all.
    #[error("CSV file is empty")]
    EmptyInput,

    /// Input exceeds the upload limit.
    #[error("CSV file is {size} bytes, above the {max_size} byte limit")]
    TooLarge { size: usize, max_size: usize },

    /// Input is not valid UTF-8.
    #[error("CSV must be UTF-8 encoded (invalid byte at offset {offset})")]
    InvalidEncoding { offset: usize },

    /// Platform needs to be told which unit its weight column uses.
    #[error("source_weight_unit is required for {platform} CSV imports")]
    MissingWeightUnit { platform: Platform },

    /// Weight unit string is not one of g, kg, lb, oz.
    #[error("source_weight_unit must be one of g, kg, lb, oz (got '{value}')")]
    UnknownWeightUnit { value: String },

    // === Parse Errors ===
    /// CSV reader rejected the input.
    #[error("failed to parse CSV{}: {message}", .line.map(|line| format!(" at line {line}")).unwrap_or_default())]
    Csv { line: Option<u64>, message: String },

    /// Required platform headers are absent.
    #[error("missing required {platform} CSV headers: {}", .missing.join(", "))]
    MissingHeaders {
        platform: Platform,
        missing: Vec<String>,
    },

    /// Header row present but no data rows.
    #[error("CSV must include at least one data row")]
    NoDataRows,

    /// Rows parsed but no product could be assembled.
    #[error("no {platform} products found: {reason}")]
    NoProducts { platform: Platform, reason: String },

    /// JSON document could not be decoded.
    #[error("failed to decode {platform} document: {message}")]
    Json { platform: Platform, message: String },

    /// Canonical product payload could not be decoded.
    #[error("invalid canonical product JSON: {message}")]
    CanonicalJson { message: String },

    /// Required identity field is absent from a raw document.
    #[error("{platform} document is missing required field '{field}'")]
    MissingField {
        platform: Platform,
        field: &'static str,
    },

    /// Importer output violates a structural invariant.
    #[error("imported product is malformed: {source}")]
    Structure {
        #[source]
        source: ModelError,
    },
}

impl IngestError {
    /// True for errors that mean "this is not the platform you said it was".
    pub fn is_detection(&self) -> bool {
        matches!(
            self,
            Self::FingerprintMismatch { .. }
                | Self::DocumentMismatch { .. }
                | Self::UnsupportedCsvSource { .. }
                | Self::UnsupportedRawSource { .. }
        )
    }
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(csv::Position::line);
        Self::Csv {
            line,
            message: err.to_string(),
        }
    }
}

impl From<ModelError> for IngestError {
    fn from(source: ModelError) -> Self {
        Self::Structure { source }
    }
}

/// Result type for ingest operations.
pub type Result<T> = std::result::Result<T, IngestError>;
