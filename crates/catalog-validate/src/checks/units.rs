//! Weight-unit compatibility checks.

use catalog_model::{Product, TargetPlatform};
use catalog_transform::WeightPolicy;

use crate::issue::Finding;

pub(super) fn check(product: &Product, target: TargetPlatform) -> Vec<Finding> {
    let policy = WeightPolicy::for_target(target);
    let product_weight = product
        .weight
        .map(|weight| ("weight.unit".to_string(), weight.unit));
    let variant_weights = product
        .variants
        .iter()
        .enumerate()
        .filter_map(|(index, variant)| {
            variant
                .weight
                .map(|weight| (format!("variants[{index}].weight.unit"), weight.unit))
        });

    product_weight
        .into_iter()
        .chain(variant_weights)
        .filter(|(_, unit)| !policy.allows(*unit))
        .map(|(path, unit)| Finding::UnitNotAllowed {
            path,
            unit,
            allowed: policy.allowed_label(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_model::{Decimal, Variant, Weight, WeightUnit};

    fn weighted(unit: WeightUnit) -> Product {
        Product {
            title: "Anvil".into(),
            variants: vec![Variant {
                weight: Some(Weight::new(Decimal::ONE, unit)),
                ..Variant::default()
            }],
            ..Product::default()
        }
    }

    #[test]
    fn pounds_rejected_by_woocommerce() {
        let findings = check(&weighted(WeightUnit::Lb), TargetPlatform::WooCommerce);
        assert_eq!(
            findings,
            vec![Finding::UnitNotAllowed {
                path: "variants[0].weight.unit".into(),
                unit: WeightUnit::Lb,
                allowed: "kg".into(),
            }]
        );
    }

    #[test]
    fn grams_accepted_by_shopify() {
        assert!(check(&weighted(WeightUnit::G), TargetPlatform::Shopify).is_empty());
    }
}
