//! End-to-end rule coverage over realistic products.

use catalog_model::{
    Decimal, Inventory, OptionValue, Price, Product, Seo, TargetPlatform, Variant, Weight,
    WeightUnit, media_from_urls,
};
use catalog_validate::{Severity, validate};

fn shirt() -> Product {
    let sizes = ["S", "M", "L"];
    Product {
        title: "Linen Shirt".into(),
        seo: Seo {
            title: Some("Linen Shirt".into()),
            description: Some("Breathable linen shirt".into()),
        },
        media: media_from_urls(["https://cdn.test/shirt.jpg"], None),
        variants: sizes
            .iter()
            .map(|size| Variant {
                sku: Some(format!("SHIRT-{size}")),
                option_values: vec![OptionValue {
                    name: "Size".into(),
                    value: (*size).into(),
                }],
                price: Some(Price::new(Decimal::new(4500, 2), Some("usd"))),
                inventory: Inventory::counted(5),
                weight: Some(Weight::new(Decimal::new(25, 2), WeightUnit::Kg)),
                ..Variant::default()
            })
            .collect(),
        ..Product::default()
    }
    .normalized()
}

#[test]
fn clean_product_passes_every_target() {
    let product = shirt();
    for target in TargetPlatform::ALL {
        let report = validate(&product, target);
        assert!(report.is_clean(), "{target}: {:?}", report.findings);
    }
}

#[test]
fn unconverted_units_are_fatal_only_where_disallowed() {
    let mut product = shirt();
    for variant in &mut product.variants {
        variant.weight = Some(Weight::new(Decimal::ONE, WeightUnit::Oz));
    }
    assert_eq!(validate(&product, TargetPlatform::Shopify).fatal_count(), 0);
    let report = validate(&product, TargetPlatform::Wix);
    assert_eq!(report.fatal_count(), 3);
    assert!(
        report
            .findings
            .iter()
            .all(|finding| finding.rule_code() == "unit_not_allowed")
    );
}

#[test]
fn fatal_report_becomes_error() {
    let product = Product {
        title: String::new(),
        ..Product::default()
    };
    let err = validate(&product, TargetPlatform::BigCommerce)
        .into_result()
        .unwrap_err();
    let codes: Vec<&str> = err.fatals().map(|finding| finding.rule_code()).collect();
    assert_eq!(codes, vec!["missing_title", "missing_variants"]);
    assert!(
        err.findings
            .iter()
            .any(|finding| finding.severity() == Severity::Advisory)
    );
}

#[test]
fn findings_serialize_with_rule_code() {
    let report = validate(&Product::default(), TargetPlatform::Wix);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["target"], "wix");
    assert_eq!(json["findings"][0]["code"], "missing_title");
}
