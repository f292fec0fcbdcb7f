//! Export entry points.

use std::collections::HashMap;

use catalog_model::{Product, TargetPlatform};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::{ExportError, Result};
use crate::options::ExportOptions;
use crate::platforms::{self, bigcommerce, shopify, squarespace, wix, woocommerce};
use crate::table::ExportTable;

/// Export one product to `target`.
///
/// The product must already be validated and have its weights converted;
/// exporters only lay out fields.
#[tracing::instrument(skip_all, fields(platform = %target, variants = product.variants.len()))]
pub fn export_product(
    product: &Product,
    target: TargetPlatform,
    options: &ExportOptions,
) -> Result<ExportTable> {
    let table = match target {
        TargetPlatform::Shopify => shopify::export(product, options)?,
        TargetPlatform::Squarespace => squarespace::export(product, options)?,
        TargetPlatform::WooCommerce => woocommerce::export(product, options)?,
        TargetPlatform::Wix => wix::export(product, options)?,
        TargetPlatform::BigCommerce => bigcommerce::export(product, options)?,
    };
    debug!(rows = table.len(), "exported product");
    Ok(table)
}

/// Export many products into one table, rows concatenated in input order.
///
/// Rejects an empty batch and products that would share the target's
/// identifying column.
#[tracing::instrument(skip_all, fields(platform = %target, products = products.len()))]
pub fn export_batch(
    products: &[Product],
    target: TargetPlatform,
    options: &ExportOptions,
) -> Result<ExportTable> {
    if products.is_empty() {
        return Err(ExportError::EmptyBatch { target });
    }

    let mut seen: HashMap<String, usize> = HashMap::new();
    for (index, product) in products.iter().enumerate() {
        let (column, key) = platforms::identity(product, target, options);
        if let Some(&first) = seen.get(&key) {
            return Err(ExportError::DuplicateKey {
                target,
                column,
                key,
                first,
                second: index,
            });
        }
        seen.insert(key, index);
    }

    let mut table = ExportTable::new(target, platforms::columns(target, options));
    for product in products {
        table.append(export_product(product, target, options)?);
    }
    info!(rows = table.len(), "exported batch");
    Ok(table)
}

/// `<target>-<YYYYMMDDTHHMMSSZ>.csv`
pub fn export_filename(target: TargetPlatform, at: DateTime<Utc>) -> String {
    format!("{target}-{}.csv", at.format("%Y%m%dT%H%M%SZ"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_model::Variant;
    use chrono::TimeZone;

    fn named(title: &str) -> Product {
        Product {
            title: title.to_string(),
            variants: vec![Variant::default()],
            ..Product::default()
        }
    }

    #[test]
    fn filename_uses_utc_stamp() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(
            export_filename(TargetPlatform::WooCommerce, at),
            "woocommerce-20240309T070501Z.csv"
        );
    }

    #[test]
    fn empty_batch_is_rejected() {
        let err = export_batch(&[], TargetPlatform::Wix, &ExportOptions::default()).unwrap_err();
        assert_eq!(
            err,
            ExportError::EmptyBatch {
                target: TargetPlatform::Wix
            }
        );
    }

    #[test]
    fn duplicate_handles_are_rejected() {
        let products = [named("Mug"), named("Plate"), named("mug")];
        let err = export_batch(&products, TargetPlatform::Shopify, &ExportOptions::default())
            .unwrap_err();
        assert_eq!(
            err,
            ExportError::DuplicateKey {
                target: TargetPlatform::Shopify,
                column: "Handle",
                key: "mug".to_string(),
                first: 0,
                second: 2,
            }
        );
    }

    #[test]
    fn batch_concatenates_rows() {
        let products = [named("Mug"), named("Plate")];
        let table =
            export_batch(&products, TargetPlatform::WooCommerce, &ExportOptions::default())
                .unwrap();
        assert_eq!(table.column("Name"), vec!["Mug", "Plate"]);
        assert_eq!(table.column("SKU"), vec!["SRC:mug", "SRC:plate"]);
    }

    #[test]
    fn product_without_variants_fails() {
        let product = Product {
            title: "Empty".into(),
            ..Product::default()
        };
        assert!(matches!(
            export_product(&product, TargetPlatform::Squarespace, &ExportOptions::default()),
            Err(ExportError::NoVariants { .. })
        ));
    }
}
