//! CSV-mode importers.
//!
//! Every platform parser turns a [`CsvTable`] into keyed products in file
//! order. [`import_csv`] keeps the first, [`import_csv_batch`] keeps them
//! all; both record how the product was picked in its provenance.

mod bigcommerce;
pub mod fields;
mod shopify;
mod squarespace;
pub mod table;
mod wix;
mod woocommerce;

use catalog_model::{CsvProvenance, Platform, Product, SelectionPolicy, WeightUnit};
use tracing::debug;

use crate::detect::detect_csv_layout;
use crate::error::{IngestError, Result};
use crate::options::ImportOptions;

pub use self::table::{CsvTable, MAX_CSV_BYTES, Row, decode_csv_bytes};

/// A parsed product and the key that identifies it within its file.
#[derive(Debug, Clone)]
pub(crate) struct ParsedProduct {
    pub key: String,
    pub product: Product,
}

/// Platforms with a CSV export format.
pub const CSV_SOURCES: [Platform; 5] = [
    Platform::Shopify,
    Platform::BigCommerce,
    Platform::Wix,
    Platform::Squarespace,
    Platform::WooCommerce,
];

/// Platforms whose CSV weight column does not name a unit.
pub fn requires_weight_unit(platform: Platform) -> bool {
    matches!(
        platform,
        Platform::BigCommerce | Platform::Wix | Platform::Squarespace
    )
}

/// Import the first product of a CSV export.
#[tracing::instrument(skip_all, fields(platform = %platform, bytes = bytes.len()))]
pub fn import_csv(bytes: &[u8], platform: Platform, options: &ImportOptions) -> Result<Product> {
    let parsed = parse_products(bytes, platform, options)?;
    let detected = parsed.len();
    let Some(first) = parsed.into_iter().next() else {
        return Err(IngestError::NoProducts {
            platform,
            reason: "file holds no products".to_string(),
        });
    };
    debug!(key = %first.key, detected, "selected first product");
    finish(first, platform, SelectionPolicy::FirstProduct, detected)
}

/// Import every product of a CSV export, in file order.
#[tracing::instrument(skip_all, fields(platform = %platform, bytes = bytes.len()))]
pub fn import_csv_batch(
    bytes: &[u8],
    platform: Platform,
    options: &ImportOptions,
) -> Result<Vec<Product>> {
    let parsed = parse_products(bytes, platform, options)?;
    let detected = parsed.len();
    debug!(detected, "importing every product");
    parsed
        .into_iter()
        .map(|item| finish(item, platform, SelectionPolicy::BatchAll, detected))
        .collect()
}

fn parse_products(
    bytes: &[u8],
    platform: Platform,
    options: &ImportOptions,
) -> Result<Vec<ParsedProduct>> {
    // 1. Source must have a CSV format
    if !CSV_SOURCES.contains(&platform) {
        return Err(IngestError::UnsupportedCsvSource { platform });
    }

    // 2. Size limits
    if bytes.is_empty() {
        return Err(IngestError::EmptyInput);
    }
    if bytes.len() > MAX_CSV_BYTES {
        return Err(IngestError::TooLarge {
            size: bytes.len(),
            max_size: MAX_CSV_BYTES,
        });
    }

    // 3. Weight unit for exports that do not state one
    let unit = options.source_weight_unit;
    if requires_weight_unit(platform) && unit.is_none() {
        return Err(IngestError::MissingWeightUnit { platform });
    }

    // 4. Decode and tabulate
    let text = decode_csv_bytes(bytes)?;
    let table = CsvTable::parse(text)?;
    debug!(rows = table.len(), columns = table.headers().len(), "parsed CSV table");

    // 5. Fingerprint must match the declared platform
    let layout = match detect_csv_layout(table.headers()) {
        Some((detected, layout)) if detected == platform => layout,
        other => {
            return Err(IngestError::FingerprintMismatch {
                expected: platform,
                detected: other.map_or_else(
                    || "unknown".to_string(),
                    |(detected, _)| detected.to_string(),
                ),
            });
        }
    };

    // 6. Platform parser
    let unit = unit.unwrap_or(WeightUnit::G);
    let parsed = match platform {
        Platform::Shopify => shopify::parse(&table)?,
        Platform::Squarespace => squarespace::parse(&table, unit)?,
        Platform::WooCommerce => woocommerce::parse(&table)?,
        Platform::Wix => wix::parse(&table, unit)?,
        Platform::BigCommerce => bigcommerce::parse(&table, layout, unit)?,
        Platform::Amazon | Platform::AliExpress => {
            return Err(IngestError::UnsupportedCsvSource { platform });
        }
    };
    debug!(products = parsed.len(), ?layout, "grouped rows into products");
    Ok(parsed)
}

fn finish(
    parsed: ParsedProduct,
    platform: Platform,
    selection_policy: SelectionPolicy,
    detected_product_count: usize,
) -> Result<Product> {
    let mut product = parsed.product.normalized();
    product.provenance = Some(CsvProvenance {
        source_platform: platform,
        selection_policy,
        detected_product_count,
        selected_product_key: parsed.key,
    });
    product.check_structure()?;
    Ok(product)
}
