//! Required-field presence checks.

use catalog_model::Product;

use crate::issue::Finding;

pub(super) fn check(product: &Product) -> Vec<Finding> {
    let mut findings = Vec::new();
    if product.title.trim().is_empty() {
        findings.push(Finding::MissingTitle);
    }
    if product.variants.is_empty() {
        findings.push(Finding::MissingVariants);
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_model::Variant;

    #[test]
    fn blank_title_and_no_variants() {
        let product = Product {
            title: "   ".into(),
            ..Product::default()
        };
        assert_eq!(
            check(&product),
            vec![Finding::MissingTitle, Finding::MissingVariants]
        );
    }

    #[test]
    fn complete_product_passes() {
        let product = Product {
            title: "Mug".into(),
            variants: vec![Variant::default()],
            ..Product::default()
        };
        assert!(check(&product).is_empty());
    }
}
