//! Platform detection and source importers.
//!
//! Two import modes feed the canonical model:
//!
//! - **CSV mode** reads a platform's own product export
//!   ([`import_csv`], [`import_csv_batch`]).
//! - **URL mode** normalizes a typed platform document that a fetch layer
//!   has already retrieved ([`import_raw`], [`import_raw_json`]).
//!
//! Every importer returns a normalized [`catalog_model::Product`] that has
//! passed [`catalog_model::Product::check_structure`].
//!
//! # Example
//!
//! ```ignore
//! use catalog_ingest::{ImportOptions, detect_csv, import_csv};
//! use catalog_model::{Platform, WeightUnit};
//!
//! let bytes = std::fs::read("products.csv")?;
//! let platform = detect_csv(&bytes).unwrap_or(Platform::Shopify);
//! let options = ImportOptions::default().with_weight_unit(WeightUnit::Kg);
//! let product = import_csv(&bytes, platform, &options)?;
//! ```

pub mod canonical;
pub mod csv_import;
pub mod detect;
pub mod error;
pub mod options;
pub mod raw;

// === Error Types ===
pub use error::{IngestError, Result};

// === Detection ===
pub use detect::{
    CsvLayout, UrlDetection, detect_csv, detect_csv_headers, detect_csv_layout, detect_url,
};

// === Importers ===
pub use canonical::import_canonical_json;
pub use csv_import::{CSV_SOURCES, MAX_CSV_BYTES, import_csv, import_csv_batch, requires_weight_unit};
pub use raw::{RawDocument, import_raw, import_raw_json};

// === Options ===
pub use options::{ImportOptions, parse_weight_unit};
