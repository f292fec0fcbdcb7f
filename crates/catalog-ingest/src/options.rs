//! Import options.

use catalog_model::WeightUnit;
use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};

/// Options accepted by every importer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    /// Unit of the weight column. Required for BigCommerce, Wix and
    /// Squarespace CSV files, which do not say; ignored elsewhere.
    pub source_weight_unit: Option<WeightUnit>,
}

impl ImportOptions {
    #[must_use]
    pub fn with_weight_unit(mut self, unit: WeightUnit) -> Self {
        self.source_weight_unit = Some(unit);
        self
    }

    /// Build options from a raw unit string; blank means "not given".
    pub fn from_unit_str(value: Option<&str>) -> Result<Self> {
        let source_weight_unit = match value.map(str::trim).filter(|value| !value.is_empty()) {
            None => None,
            Some(value) => Some(parse_weight_unit(value)?),
        };
        Ok(Self { source_weight_unit })
    }
}

/// Parse a CSV source weight unit; only the canonical codes are accepted.
pub fn parse_weight_unit(value: &str) -> Result<WeightUnit> {
    match value.trim().to_ascii_lowercase().as_str() {
        "g" => Ok(WeightUnit::G),
        "kg" => Ok(WeightUnit::Kg),
        "lb" => Ok(WeightUnit::Lb),
        "oz" => Ok(WeightUnit::Oz),
        _ => Err(IngestError::UnknownWeightUnit {
            value: value.to_string(),
        }),
    }
}
