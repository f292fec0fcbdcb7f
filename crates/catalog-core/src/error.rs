//! Pipeline error kinds.

use catalog_ingest::IngestError;
use catalog_output::ExportError;
use catalog_transform::ConversionError;
use catalog_validate::ValidationError;
use thiserror::Error;

/// Every way a single item can fail on its way through a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// Source platform could not be determined, or does not offer the
    /// requested operation.
    #[error("detection failed: {reason}")]
    Detection { reason: String },

    /// Collaborator failed or timed out while fetching a document.
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// Document could not be read into a canonical product.
    #[error(transparent)]
    Parse {
        #[from]
        source: ParseError,
    },

    /// Product breaks a fatal rule of the export target.
    #[error(transparent)]
    Validation {
        #[from]
        source: ValidationError,
    },

    /// Requested weight unit is not accepted by the target.
    #[error(transparent)]
    Conversion {
        #[from]
        source: ConversionError,
    },

    /// Exporter could not lay out the product.
    #[error(transparent)]
    Export {
        #[from]
        source: ExportError,
    },
}

/// Import failure that is not a detection problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(transparent)]
pub struct ParseError(#[from] pub IngestError);

impl PipelineError {
    /// Stable lowercase label for this kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Detection { .. } => "detection",
            Self::Fetch { .. } => "fetch",
            Self::Parse { .. } => "parse",
            Self::Validation { .. } => "validation",
            Self::Conversion { .. } => "conversion",
            Self::Export { .. } => "export",
        }
    }

    pub fn detection(reason: impl Into<String>) -> Self {
        Self::Detection {
            reason: reason.into(),
        }
    }
}

impl From<IngestError> for PipelineError {
    fn from(err: IngestError) -> Self {
        if err.is_detection() {
            Self::Detection {
                reason: err.to_string(),
            }
        } else {
            Self::Parse {
                source: ParseError(err),
            }
        }
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
