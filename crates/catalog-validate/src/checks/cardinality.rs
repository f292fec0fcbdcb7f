//! Option and variant count limits.

use catalog_model::{Product, TargetPlatform};

use crate::issue::Finding;
use crate::limits::TargetLimits;

pub(super) fn check(product: &Product, target: TargetPlatform) -> Vec<Finding> {
    let limits = TargetLimits::for_target(target);
    let mut findings = Vec::new();

    let option_count = product.option_names(usize::MAX).len();
    if option_count > limits.max_options {
        findings.push(Finding::TooManyOptions {
            count: option_count,
            max: limits.max_options,
        });
    }
    if product.variants.len() > limits.max_variants {
        findings.push(Finding::TooManyVariants {
            count: product.variants.len(),
            max: limits.max_variants,
        });
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_model::{OptionDef, Variant};

    fn with_options(count: usize) -> Product {
        Product {
            title: "Poster".into(),
            options: (0..count)
                .map(|index| OptionDef {
                    name: format!("Axis {index}"),
                    values: vec!["a".into()],
                })
                .collect(),
            variants: vec![Variant::default()],
            ..Product::default()
        }
    }

    #[test]
    fn four_options_exceed_shopify_but_not_wix() {
        let product = with_options(4);
        assert_eq!(
            check(&product, TargetPlatform::Shopify),
            vec![Finding::TooManyOptions { count: 4, max: 3 }]
        );
        assert!(check(&product, TargetPlatform::Wix).is_empty());
    }

    #[test]
    fn variant_limit() {
        let product = Product {
            title: "Poster".into(),
            variants: vec![Variant::default(); 101],
            ..Product::default()
        };
        assert_eq!(
            check(&product, TargetPlatform::Squarespace),
            vec![Finding::TooManyVariants {
                count: 101,
                max: 100
            }]
        );
        assert!(check(&product, TargetPlatform::BigCommerce).is_empty());
    }
}
