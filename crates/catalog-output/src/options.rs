//! Export options.

use std::fmt;
use std::str::FromStr;

use catalog_model::WeightUnit;
use serde::{Deserialize, Serialize};

/// BigCommerce CSV dialect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CsvFormat {
    /// Product import/export v3 (`Item` column).
    #[default]
    Modern,
    /// Bulk edit template (`Product Type`/`Code` columns).
    Legacy,
}

impl CsvFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Modern => "modern",
            Self::Legacy => "legacy",
        }
    }
}

impl fmt::Display for CsvFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognized `csv_format` value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("csv_format must be 'modern' or 'legacy' (got '{value}')")]
pub struct UnknownCsvFormat {
    pub value: String,
}

impl FromStr for CsvFormat {
    type Err = UnknownCsvFormat;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "modern" => Ok(Self::Modern),
            "legacy" => Ok(Self::Legacy),
            _ => Err(UnknownCsvFormat {
                value: value.to_string(),
            }),
        }
    }
}

/// Options accepted by every exporter; each target reads the fields it
/// understands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Mapped onto the target's visibility column.
    pub publish: bool,
    /// Requested weight unit; resolved against the target before export.
    pub weight_unit: Option<WeightUnit>,
    /// BigCommerce only.
    pub csv_format: CsvFormat,
    /// Squarespace only: the store page the products belong to.
    pub product_page: Option<String>,
    /// Squarespace only: URL slug for the product; defaults to its slug.
    pub squarespace_product_url: Option<String>,
}

impl ExportOptions {
    #[must_use]
    pub fn published(mut self, publish: bool) -> Self {
        self.publish = publish;
        self
    }

    #[must_use]
    pub fn with_weight_unit(mut self, unit: WeightUnit) -> Self {
        self.weight_unit = Some(unit);
        self
    }

    #[must_use]
    pub fn with_csv_format(mut self, format: CsvFormat) -> Self {
        self.csv_format = format;
        self
    }

    #[must_use]
    pub fn with_product_page(mut self, page: impl Into<String>) -> Self {
        self.product_page = Some(page.into());
        self
    }

    #[must_use]
    pub fn with_product_url(mut self, url: impl Into<String>) -> Self {
        self.squarespace_product_url = Some(url.into());
        self
    }
}
