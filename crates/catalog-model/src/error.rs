//! Error types for the canonical product model.

use thiserror::Error;

/// Errors raised by structural checks, enum parsing and product edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A product must own at least one variant.
    #[error("product has no variants")]
    NoVariants,

    /// Media ordering invariant does not hold.
    #[error("{scope} media at index {index}: {reason}")]
    MediaOrder {
        scope: String,
        index: usize,
        reason: String,
    },

    /// Inventory quantity below zero.
    #[error("variant {index} has negative quantity {quantity}")]
    NegativeQuantity { index: usize, quantity: i64 },

    /// Platform tag not recognized.
    #[error("unknown platform '{value}'")]
    UnknownPlatform { value: String },

    /// Platform is known but cannot be exported to.
    #[error("platform '{value}' is not an export target")]
    NotATarget { value: String },

    /// Weight unit tag not recognized.
    #[error("unknown weight unit '{value}' (expected g, kg, lb or oz)")]
    UnknownWeightUnit { value: String },

    /// Edit referenced a variant that does not exist.
    #[error("variant index {index} out of range ({count} variants)")]
    VariantIndex { index: usize, count: usize },

    /// Edit could not be applied.
    #[error("invalid edit: {reason}")]
    InvalidEdit { reason: String },

    /// Canonical JSON payload could not be decoded.
    #[error("invalid canonical product JSON: {message}")]
    Json { message: String },
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json {
            message: err.to_string(),
        }
    }
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ModelError::NegativeQuantity {
            index: 2,
            quantity: -4,
        };
        assert_eq!(err.to_string(), "variant 2 has negative quantity -4");
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<u8>("nope").unwrap_err();
        let err: ModelError = json_err.into();
        assert!(matches!(err, ModelError::Json { .. }));
    }
}
