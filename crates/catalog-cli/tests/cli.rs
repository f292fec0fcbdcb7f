//! End-to-end tests for the CLI commands.

use std::fs;
use std::path::{Path, PathBuf};

use catalog_cli::cli::{ConvertArgs, DetectArgs, ExportArgs, ImportArgs};
use catalog_cli::commands::{run_convert, run_detect, run_export, run_import, run_platforms};
use catalog_model::{Platform, TargetPlatform, WeightUnit};
use catalog_output::CsvFormat;

const SHOPIFY_CSV: &str = "\
Handle,Title,Body (HTML),Vendor,Option1 Name,Option1 Value,Variant SKU,Variant Price,Variant Grams
mug,Mug,<p>Stoneware</p>,Acme,Title,Default Title,MUG-1,12.00,400
bowl,Bowl,<p>Deep bowl</p>,Acme,Title,Default Title,BOWL-1,18.00,650
";

fn export_args(to: TargetPlatform, files: Vec<PathBuf>) -> ExportArgs {
    ExportArgs {
        to,
        publish: true,
        weight_unit: None,
        csv_format: CsvFormat::Modern,
        product_page: None,
        product_url: None,
        output: None,
        output_dir: None,
        files,
    }
}

fn import_all(dir: &Path) -> PathBuf {
    let csv = dir.join("shopify.csv");
    fs::write(&csv, SHOPIFY_CSV).unwrap();
    let json = dir.join("products.json");
    run_import(&ImportArgs {
        from: None,
        weight_unit: None,
        all: true,
        output: Some(json.clone()),
        file: csv,
    })
    .unwrap();
    json
}

#[test]
fn detect_reads_csv_headers() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("export.csv");
    fs::write(&csv, SHOPIFY_CSV).unwrap();
    let detection = run_detect(&DetectArgs {
        input: csv.display().to_string(),
    })
    .unwrap();
    assert_eq!(detection.platform, Some(Platform::Shopify));
    assert_eq!(detection.render(), "shopify");
}

#[test]
fn detect_unknown_url() {
    let detection = run_detect(&DetectArgs {
        input: "https://example.org/about".to_string(),
    })
    .unwrap();
    assert_eq!(detection.platform, None);
    assert_eq!(detection.render(), "unknown");
}

#[test]
fn import_then_export_to_directory() {
    let dir = tempfile::tempdir().unwrap();
    let json = import_all(dir.path());
    let imported: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json).unwrap()).unwrap();
    assert_eq!(imported.as_array().map(Vec::len), Some(2));

    let out_dir = dir.path().join("out");
    let mut args = export_args(TargetPlatform::WooCommerce, vec![json]);
    args.output_dir = Some(out_dir.clone());
    let summary = run_export(&args).unwrap();

    assert_eq!(summary.exit_code(), 0);
    assert_eq!(summary.success_count(), 2);
    assert_eq!(summary.row_count(), 2);
    let written = summary.written.clone().unwrap();
    assert!(written.starts_with(&out_dir));
    let name = written.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("woocommerce-") && name.ends_with(".csv"));

    let csv = fs::read_to_string(&written).unwrap();
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.contains("0.4"));
    assert!(csv.contains("0.65"));
}

#[test]
fn unreadable_product_gives_partial_exit() {
    let dir = tempfile::tempdir().unwrap();
    let json = import_all(dir.path());
    let broken = dir.path().join("broken.json");
    fs::write(&broken, "{ not json").unwrap();

    let mut args = export_args(TargetPlatform::Shopify, vec![json, broken]);
    args.output = Some(dir.path().join("shopify.csv"));
    let summary = run_export(&args).unwrap();

    assert_eq!(summary.items.len(), 3);
    assert_eq!(summary.success_count(), 2);
    assert!(summary.items[2].outcome.is_err());
    assert_eq!(summary.exit_code(), 2);
    assert!(dir.path().join("shopify.csv").is_file());
}

#[test]
fn unit_rejected_by_target_fails_every_item() {
    let dir = tempfile::tempdir().unwrap();
    let json = import_all(dir.path());
    let mut args = export_args(TargetPlatform::WooCommerce, vec![json]);
    args.weight_unit = Some(WeightUnit::Lb);
    args.output = Some(dir.path().join("woo.csv"));
    let summary = run_export(&args).unwrap();

    assert_eq!(summary.success_count(), 0);
    assert_eq!(summary.exit_code(), 1);
    assert!(summary.csv.is_none());
    assert!(!dir.path().join("woo.csv").exists());
}

#[test]
fn convert_formats_result() {
    let line = run_convert(&ConvertArgs {
        value: "2.5".to_string(),
        from: WeightUnit::Kg,
        to: WeightUnit::Lb,
    })
    .unwrap();
    assert_eq!(line, "5.5115566 lb");
}

#[test]
fn convert_rejects_garbage() {
    let err = run_convert(&ConvertArgs {
        value: "heavy".to_string(),
        from: WeightUnit::Kg,
        to: WeightUnit::G,
    })
    .unwrap_err();
    assert!(err.to_string().contains("heavy"));
}

#[test]
fn platforms_lists_every_source() {
    let table = run_platforms();
    for platform in Platform::ALL {
        assert!(table.contains(platform.as_str()), "{platform} missing");
    }
}
