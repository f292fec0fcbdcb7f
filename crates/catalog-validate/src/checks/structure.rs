//! Structural invariant checks.
//!
//! Importers normalize their output, so these only fire for values that
//! were hand-built or edited outside [`Product::apply`].

use catalog_model::{ModelError, Product, TargetPlatform, check_order};

use crate::issue::Finding;

pub(super) fn check(product: &Product, target: TargetPlatform) -> Vec<Finding> {
    let mut findings = Vec::new();

    if let Err(err) = check_order("product", &product.media) {
        findings.extend(media_finding(err));
    }
    for (index, variant) in product.variants.iter().enumerate() {
        if let Err(err) = check_order(&format!("variant {index}"), &variant.media) {
            findings.extend(media_finding(err));
        }
        if let Some(quantity) = variant.inventory.quantity
            && quantity < 0
        {
            findings.push(Finding::NegativeQuantity {
                variant: index,
                quantity,
            });
        }
    }

    // WooCommerce variations are matched to their parent by SKU or by
    // attribute values; a variation with neither cannot be placed.
    if target == TargetPlatform::WooCommerce && product.variants.len() > 1 {
        for (index, variant) in product.variants.iter().enumerate() {
            let has_options = variant
                .option_values
                .iter()
                .any(|option| !option.value.trim().is_empty());
            if variant.sku_str().is_none() && !has_options {
                findings.push(Finding::UnresolvableSku { variant: index });
            }
        }
    }

    findings
}

fn media_finding(err: ModelError) -> Option<Finding> {
    match err {
        ModelError::MediaOrder {
            scope,
            index,
            reason,
        } => Some(Finding::MediaOrder {
            scope,
            index,
            reason,
        }),
        _ => None,
    }
}
