//! CSV exporters for storefront bulk-import formats.
//!
//! Each exporter turns a validated, unit-converted [`Product`] into rows
//! in the exact header order its platform expects. Shopify and Squarespace
//! write one row per variant; WooCommerce, Wix and BigCommerce write one
//! row per product.
//!
//! # Example
//!
//! ```ignore
//! use catalog_output::{ExportOptions, export_product};
//!
//! let table = export_product(&product, TargetPlatform::Shopify, &ExportOptions::default())?;
//! std::fs::write("shopify.csv", table.to_csv()?)?;
//! ```
//!
//! [`Product`]: catalog_model::Product

pub mod error;
pub mod export;
pub mod format;
pub mod options;
pub mod platforms;
pub mod table;

// === Error Types ===
pub use error::{ExportError, Result};

// === Export ===
pub use export::{export_batch, export_filename, export_product};

// === Options ===
pub use options::{CsvFormat, ExportOptions, UnknownCsvFormat};

// === Tables ===
pub use table::{CsvRow, ExportTable};
