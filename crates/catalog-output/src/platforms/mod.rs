//! One exporter per target platform.
//!
//! Shopify and Squarespace write one row per variant; WooCommerce, Wix and
//! BigCommerce write one row per product and pack variant data into
//! delimited sub-fields.

pub mod bigcommerce;
pub mod shopify;
pub mod squarespace;
pub mod wix;
pub mod woocommerce;

use catalog_model::{Product, TargetPlatform};

use crate::error::{ExportError, Result};
use crate::options::{CsvFormat, ExportOptions};

/// Header list the target writes with these options.
pub fn columns(target: TargetPlatform, options: &ExportOptions) -> &'static [&'static str] {
    match target {
        TargetPlatform::Shopify => shopify::COLUMNS,
        TargetPlatform::Squarespace => squarespace::COLUMNS,
        TargetPlatform::WooCommerce => woocommerce::COLUMNS,
        TargetPlatform::Wix => wix::COLUMNS,
        TargetPlatform::BigCommerce => match options.csv_format {
            CsvFormat::Modern => bigcommerce::MODERN_COLUMNS,
            CsvFormat::Legacy => bigcommerce::LEGACY_COLUMNS,
        },
    }
}

/// Column that identifies a product in a batch, with its value for `product`.
pub fn identity(
    product: &Product,
    target: TargetPlatform,
    options: &ExportOptions,
) -> (&'static str, String) {
    match target {
        TargetPlatform::Shopify => ("Handle", shopify::handle(product)),
        TargetPlatform::Squarespace => ("Product URL", squarespace::product_url(product, options)),
        TargetPlatform::WooCommerce => ("SKU", woocommerce::parent_sku(product)),
        TargetPlatform::Wix => ("handle", wix::handle(product)),
        TargetPlatform::BigCommerce => match options.csv_format {
            CsvFormat::Modern => ("SKU", bigcommerce::product_sku(product)),
            CsvFormat::Legacy => ("Code", bigcommerce::product_sku(product)),
        },
    }
}

pub(crate) fn require_variants(product: &Product) -> Result<()> {
    if product.variants.is_empty() {
        return Err(ExportError::NoVariants {
            title: product.title.clone(),
        });
    }
    Ok(())
}
