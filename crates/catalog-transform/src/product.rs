//! Product-level unit conversion ahead of export.

use catalog_model::{Product, TargetPlatform, WeightUnit};
use tracing::debug;

use crate::error::Result;
use crate::policy::WeightPolicy;
use crate::units::convert_weight;

/// A product whose weights are all expressed in `unit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedProduct {
    pub product: Product,
    pub unit: WeightUnit,
}

/// Resolve the target unit and return a copy of `product` with every
/// product and variant weight converted to it.
///
/// Fails only when `requested` is outside the target's allowed set.
#[tracing::instrument(skip_all, fields(platform = %target, requested = ?requested))]
pub fn convert_product(
    product: &Product,
    target: TargetPlatform,
    requested: Option<WeightUnit>,
) -> Result<ConvertedProduct> {
    let unit = WeightPolicy::for_target(target).resolve(requested)?;
    let mut converted = product.clone();
    let mut changed = 0usize;
    if let Some(weight) = converted.weight.as_mut()
        && weight.unit != unit
    {
        *weight = convert_weight(*weight, unit);
        changed += 1;
    }
    for variant in &mut converted.variants {
        if let Some(weight) = variant.weight.as_mut()
            && weight.unit != unit
        {
            *weight = convert_weight(*weight, unit);
            changed += 1;
        }
    }
    debug!(unit = %unit, changed, "converted product weights");
    Ok(ConvertedProduct {
        product: converted,
        unit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_model::{Decimal, Variant, Weight};

    fn product_with(weights: &[(&str, WeightUnit)]) -> Product {
        Product {
            title: "Kettlebell".into(),
            variants: weights
                .iter()
                .map(|(value, unit)| Variant {
                    weight: Some(Weight::new(value.parse::<Decimal>().unwrap(), *unit)),
                    ..Variant::default()
                })
                .collect(),
            ..Product::default()
        }
    }

    #[test]
    fn converts_every_variant() {
        let product = product_with(&[("2.5", WeightUnit::Kg), ("8", WeightUnit::Oz)]);
        let converted =
            convert_product(&product, TargetPlatform::Squarespace, Some(WeightUnit::Lb)).unwrap();
        assert_eq!(converted.unit, WeightUnit::Lb);
        let values: Vec<String> = converted
            .product
            .variants
            .iter()
            .map(|variant| variant.weight.unwrap().value.to_string())
            .collect();
        assert_eq!(values, vec!["5.5115566".to_string(), "0.5".to_string()]);
        // Input is untouched.
        assert_eq!(product.variants[0].weight.unwrap().unit, WeightUnit::Kg);
    }

    #[test]
    fn default_unit_needs_no_conversion() {
        let product = product_with(&[("2.5", WeightUnit::Kg)]);
        let converted = convert_product(&product, TargetPlatform::WooCommerce, None).unwrap();
        assert_eq!(converted.product, product);
        assert_eq!(converted.unit, WeightUnit::Kg);
    }

    #[test]
    fn rejected_unit_fails() {
        let product = product_with(&[("1", WeightUnit::Kg)]);
        assert!(convert_product(&product, TargetPlatform::Wix, Some(WeightUnit::G)).is_err());
    }
}
