//! A CSV export carried through import, conversion and export.

use catalog_core::{SourceDocument, export_product, import_document};
use catalog_ingest::ImportOptions;
use catalog_model::{Platform, TargetPlatform, WeightUnit};
use catalog_output::ExportOptions;

const SQUARESPACE: &str = "\
Product Type [Non Editable],Product URL,Title,Description,SKU,Price,Stock,Weight,Visible,Hosted Image URLs
PHYSICAL,/shop/p/kettlebell,Kettlebell,Cast iron,KB-8,40.00,5,2.5,Yes,https://img.test/kb.jpg
";

#[test]
fn squarespace_kilograms_reach_woocommerce_and_pounds() {
    let document = SourceDocument::Csv {
        platform: Some(Platform::Squarespace),
        bytes: SQUARESPACE.as_bytes().to_vec(),
    };
    let options = ImportOptions::default().with_weight_unit(WeightUnit::Kg);
    let product = import_document(&document, &options).unwrap();
    let weight = product.variants[0].weight.unwrap();
    assert_eq!(weight.value.to_string(), "2.5");
    assert_eq!(weight.unit, WeightUnit::Kg);

    let woo = export_product(&product, TargetPlatform::WooCommerce, &ExportOptions::default())
        .unwrap();
    assert_eq!(woo.unit, WeightUnit::Kg);
    assert_eq!(woo.table.column("Weight (kg)"), vec!["2.5"]);

    let pounds = ExportOptions::default().with_weight_unit(WeightUnit::Lb);
    let squarespace = export_product(&product, TargetPlatform::Squarespace, &pounds).unwrap();
    assert_eq!(squarespace.unit, WeightUnit::Lb);
    assert_eq!(squarespace.table.column("Weight"), vec!["5.5115566"]);

    // The imported product itself is untouched by either export.
    assert_eq!(product.variants[0].weight.unwrap().unit, WeightUnit::Kg);
}

#[test]
fn pounds_are_refused_where_only_kilograms_import() {
    let document = SourceDocument::Csv {
        platform: Some(Platform::Squarespace),
        bytes: SQUARESPACE.as_bytes().to_vec(),
    };
    let product = import_document(
        &document,
        &ImportOptions::default().with_weight_unit(WeightUnit::Kg),
    )
    .unwrap();
    let pounds = ExportOptions::default().with_weight_unit(WeightUnit::Lb);
    let err = export_product(&product, TargetPlatform::WooCommerce, &pounds).unwrap_err();
    assert_eq!(err.kind(), "conversion");
}
