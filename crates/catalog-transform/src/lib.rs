//! Weight conversion for catalog exports.
//!
//! Provides the fixed-ratio unit converter and the per-target unit policy
//! that decides which unit an export emits.
//!
//! # Example
//!
//! ```ignore
//! use catalog_model::{TargetPlatform, WeightUnit};
//! use catalog_transform::{convert, convert_product};
//!
//! let pounds = convert(value, WeightUnit::Kg, WeightUnit::Lb);
//! let converted = convert_product(&product, TargetPlatform::Squarespace, Some(WeightUnit::Lb))?;
//! ```

mod error;
mod policy;
mod product;
mod units;

// === Error Types ===
pub use error::{ConversionError, Result};

// === Conversion ===
pub use product::{ConvertedProduct, convert_product};
pub use units::{SIGNIFICANT_DIGITS, convert, convert_weight, round_significant};

// === Policy ===
pub use policy::{WeightPolicy, convert_for_target, resolve_weight_unit};
