//! Canonical product model for the catalog transcoder.
//!
//! Every importer produces a [`Product`] and every exporter consumes one.
//! The types here carry only structural invariants; platform rules live in
//! the ingest, validate and output crates.
//!
//! # Example
//!
//! ```ignore
//! use catalog_model::{Product, Variant};
//!
//! let product = Product {
//!     title: "Widget".to_string(),
//!     variants: vec![Variant::default()],
//!     ..Product::default()
//! }
//! .normalized();
//! product.check_structure()?;
//! let json = product.to_json_pretty()?;
//! ```

pub mod edit;
pub mod error;
pub mod media;
pub mod platform;
pub mod product;
pub mod text;
pub mod unit;

// === Error Types ===
pub use error::{ModelError, Result};

// === Canonical Entities ===
pub use media::{Media, MediaType, check_order, media_from_urls};
pub use product::{
    CsvProvenance, Inventory, Money, OptionDef, OptionValue, Price, Product, SelectionPolicy, Seo,
    SourceRef, Taxonomy, Variant, Weight, merge_option_defs,
};

// === Edits ===
pub use edit::ProductEdit;

// === Enumerations ===
pub use platform::{Platform, TargetPlatform};
pub use unit::WeightUnit;

// Re-exported so downstream crates agree on one decimal type.
pub use rust_decimal::Decimal;
