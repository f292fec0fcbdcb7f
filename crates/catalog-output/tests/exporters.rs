//! Row grouping and CSV layout across every target.

use catalog_model::{
    Inventory, Media, OptionValue, Platform, Price, Product, SourceRef, Taxonomy, TargetPlatform,
    Variant, Weight, WeightUnit,
};
use catalog_output::{CsvFormat, ExportOptions, export_product};
use proptest::prelude::*;

fn tote_variant(color: &str, sku: &str, inventory: Inventory) -> Variant {
    Variant {
        sku: Some(sku.to_string()),
        option_values: vec![OptionValue {
            name: "Color".into(),
            value: color.into(),
        }],
        price: Some(Price::new("25".parse().unwrap(), None).with_compare_at(Some("30".parse().unwrap()))),
        inventory,
        weight: Some(Weight::new("0.4".parse().unwrap(), WeightUnit::Kg)),
        ..Variant::default()
    }
}

fn tote(variants: Vec<Variant>) -> Product {
    Product {
        source: SourceRef {
            platform: Some(Platform::Shopify),
            slug: Some("canvas-tote".into()),
            ..SourceRef::default()
        },
        title: "Canvas Tote".into(),
        description: Some("Sturdy tote".into()),
        brand: Some("Acme".into()),
        tags: vec!["bags".into(), "Canvas".into()],
        taxonomy: Taxonomy::from_path("Bags > Totes"),
        media: vec![Media::image("https://cdn.example.com/tote.jpg")],
        requires_shipping: true,
        variants,
        ..Product::default()
    }
    .normalized()
}

#[test]
fn bigcommerce_legacy_csv() {
    let product = tote(vec![tote_variant("Natural", "TOTE-1", Inventory::counted(12))]);
    let options = ExportOptions::default()
        .published(true)
        .with_csv_format(CsvFormat::Legacy);
    let csv = export_product(&product, TargetPlatform::BigCommerce, &options)
        .unwrap()
        .to_csv()
        .unwrap();
    insta::assert_snapshot!(csv, @r#"
    Product Type,Code,Name,Brand,Description,Calculated Price,Sale Price,Weight,Stock Level,Track Inventory,Product Visible,Category Details,Images,Page Title,META Keywords,META Description,Product URL,Variants
    P,TOTE-1,Canvas Tote,Acme,Sturdy tote,30,25,0.4,12,by product,Y,Bags/Totes,Product Image URL: https://cdn.example.com/tote.jpg,,"bags,Canvas",,/canvas-tote/,[S]SKU=TOTE-1|Color=Natural|Price=30|Sale Price=25|Stock=12|Weight=0.4
    "#);
}

#[test]
fn squarespace_csv() {
    let product = tote(vec![
        tote_variant("Natural", "TOTE-N", Inventory::counted(12)),
        tote_variant("Black", "TOTE-B", Inventory::untracked(None)),
    ]);
    let options = ExportOptions::default().published(true);
    let csv = export_product(&product, TargetPlatform::Squarespace, &options)
        .unwrap()
        .to_csv()
        .unwrap();
    insta::assert_snapshot!(csv, @r#"
    Product ID [Non Editable],Variant ID [Non Editable],Product Type [Non Editable],Product Page,Product URL,Title,Description,SKU,Option Name 1,Option Value 1,Option Name 2,Option Value 2,Option Name 3,Option Value 3,Price,Sale Price,On Sale,Stock,Categories,Tags,Weight,Length,Width,Height,Visible,Hosted Image URLs
    ,,PHYSICAL,,canvas-tote,Canvas Tote,Sturdy tote,TOTE-N,Color,Natural,,,,,30,25,Yes,12,,"bags,Canvas",0.4,,,,Yes,https://cdn.example.com/tote.jpg
    ,,,,,,,TOTE-B,Color,Black,,,,,30,25,Yes,Unlimited,,,0.4,,,,,
    "#);
}

#[test]
fn woocommerce_weight_column_keeps_converted_value() {
    let product = tote(vec![tote_variant("Natural", "TOTE-1", Inventory::counted(3))]);
    let table =
        export_product(&product, TargetPlatform::WooCommerce, &ExportOptions::default()).unwrap();
    assert_eq!(table.column("Weight (kg)"), vec!["0.4"]);
    assert_eq!(table.column("SKU"), vec!["SH:canvas-tote"]);
}

fn tee() -> Product {
    let size = |value: &str, sku: &str, price: &str| Variant {
        sku: Some(sku.to_string()),
        option_values: vec![OptionValue {
            name: "Size".into(),
            value: value.into(),
        }],
        price: Some(Price::new(price.parse().unwrap(), None)),
        inventory: Inventory::counted(4),
        ..Variant::default()
    };
    Product {
        title: "Logo Tee".into(),
        variants: vec![size("S", "TEE-S", "10"), size("XL", "TEE-XL", "15")],
        ..Product::default()
    }
    .normalized()
}

#[test]
fn single_row_targets_keep_every_variant() {
    let product = tee();
    for target in [TargetPlatform::Wix, TargetPlatform::WooCommerce, TargetPlatform::BigCommerce] {
        for format in [CsvFormat::Modern, CsvFormat::Legacy] {
            let options = ExportOptions::default().with_csv_format(format);
            let table = export_product(&product, target, &options).unwrap();
            assert_eq!(table.len(), 1);
            let row = table.rows()[0].cells().join("\n");
            for needle in ["TEE-S", "TEE-XL", "10", "15"] {
                assert!(row.contains(needle), "{target:?} {format:?} lacks {needle}");
            }
        }
    }
}

fn expected_rows(target: TargetPlatform, variants: usize) -> usize {
    match target {
        TargetPlatform::Shopify | TargetPlatform::Squarespace => variants,
        TargetPlatform::WooCommerce | TargetPlatform::Wix | TargetPlatform::BigCommerce => 1,
    }
}

proptest! {
    #[test]
    fn row_count_follows_grouping(
        variants in 1usize..12,
        target in prop::sample::select(TargetPlatform::ALL.to_vec()),
        legacy in any::<bool>(),
    ) {
        let product = tote(
            (0..variants)
                .map(|index| {
                    tote_variant(&format!("Color {index}"), &format!("TOTE-{index}"), Inventory::counted(1))
                })
                .collect(),
        );
        let format = if legacy { CsvFormat::Legacy } else { CsvFormat::Modern };
        let options = ExportOptions::default().with_csv_format(format);
        let table = export_product(&product, target, &options).unwrap();
        prop_assert_eq!(table.len(), expected_rows(target, variants));
        for row in table.rows() {
            prop_assert_eq!(row.cells().len(), table.columns().len());
        }
    }
}
