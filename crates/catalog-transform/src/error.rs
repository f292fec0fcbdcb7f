//! Error types for unit conversion.

use catalog_model::{TargetPlatform, WeightUnit};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// Requested unit is outside the target's allowed set.
    #[error("weight unit '{unit}' is not supported by {target} (allowed: {allowed})")]
    UnitNotAllowed {
        target: TargetPlatform,
        unit: WeightUnit,
        allowed: String,
    },

    /// Requested unit string could not be parsed.
    #[error("unknown weight unit '{value}' (expected g, kg, lb or oz)")]
    UnknownUnit { value: String },
}

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, ConversionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConversionError::UnitNotAllowed {
            target: TargetPlatform::WooCommerce,
            unit: WeightUnit::Lb,
            allowed: "kg".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "weight unit 'lb' is not supported by woocommerce (allowed: kg)"
        );
    }
}
