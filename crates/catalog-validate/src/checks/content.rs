//! Advisory content checks. None of these block export.

use std::collections::BTreeSet;

use catalog_model::{Product, TargetPlatform};

use crate::issue::Finding;

pub(super) fn check(product: &Product, target: TargetPlatform) -> Vec<Finding> {
    let mut findings = Vec::new();

    for (index, variant) in product.variants.iter().enumerate() {
        if product.effective_price(Some(variant)).is_none() {
            findings.push(Finding::MissingPrice { variant: index });
        }
        // WooCommerce variation SKUs are synthesized on export.
        if target != TargetPlatform::WooCommerce && variant.sku_str().is_none() {
            findings.push(Finding::MissingSku { variant: index });
        }
    }

    let seo_description = product.seo.description.as_deref().unwrap_or_default();
    if seo_description.trim().is_empty() {
        findings.push(Finding::MissingSeoDescription);
    }

    if product.all_image_urls().is_empty() {
        findings.push(Finding::MissingMedia);
    }

    if target == TargetPlatform::Shopify {
        let images = product.product_image_urls().len();
        let rows = product.variants.len().max(1);
        if images > rows {
            findings.push(Finding::ImageOverflow { images, rows });
        }
    }

    let currencies: BTreeSet<String> = product
        .variants
        .iter()
        .filter_map(|variant| product.effective_price(Some(variant)))
        .filter_map(|price| price.current.currency.clone())
        .collect();
    if currencies.len() > 1 {
        findings.push(Finding::CurrencyMixed {
            currencies: currencies.into_iter().collect(),
        });
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_model::{Decimal, Price, Seo, Variant, media_from_urls};

    fn priced(currency: &str) -> Variant {
        Variant {
            sku: Some(format!("SKU-{currency}")),
            price: Some(Price::new(Decimal::TEN, Some(currency))),
            ..Variant::default()
        }
    }

    #[test]
    fn bare_product_collects_advisories() {
        let product = Product {
            title: "Cap".into(),
            variants: vec![Variant::default()],
            ..Product::default()
        };
        let codes: Vec<&str> = check(&product, TargetPlatform::Wix)
            .iter()
            .map(Finding::rule_code)
            .collect();
        assert_eq!(
            codes,
            vec!["missing_price", "missing_sku", "missing_seo_description", "missing_media"]
        );
        let codes: Vec<&str> = check(&product, TargetPlatform::WooCommerce)
            .iter()
            .map(Finding::rule_code)
            .collect();
        assert!(!codes.contains(&"missing_sku"));
    }

    #[test]
    fn shopify_image_overflow_and_mixed_currency() {
        let product = Product {
            title: "Cap".into(),
            seo: Seo {
                title: None,
                description: Some("A cap".into()),
            },
            media: media_from_urls(["https://a.test/1.jpg", "https://a.test/2.jpg"], None),
            variants: vec![priced("USD")],
            ..Product::default()
        };
        assert_eq!(
            check(&product, TargetPlatform::Shopify),
            vec![Finding::ImageOverflow { images: 2, rows: 1 }]
        );

        let mixed = Product {
            variants: vec![priced("USD"), priced("EUR")],
            ..product
        };
        assert_eq!(
            check(&mixed, TargetPlatform::Shopify),
            vec![Finding::CurrencyMixed {
                currencies: vec!["EUR".into(), "USD".into()]
            }]
        );
    }
}
