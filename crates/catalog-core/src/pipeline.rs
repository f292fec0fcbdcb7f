//! Single-item pipelines: import, then convert, validate and export.

use catalog_ingest::{ImportOptions, RawDocument, detect_csv, import_canonical_json};
use catalog_model::{Platform, Product, TargetPlatform, WeightUnit};
use catalog_output::{ExportOptions, ExportTable};
use catalog_transform::convert_product;
use catalog_validate::{ValidationReport, validate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::registry::registry;

/// A source document awaiting import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceDocument {
    /// CSV export bytes; the platform is detected from headers when absent.
    Csv {
        platform: Option<Platform>,
        bytes: Vec<u8>,
    },
    /// Platform API payload as JSON text.
    RawJson { platform: Platform, text: String },
    /// Already-decoded platform payload.
    Raw { document: RawDocument },
    /// Canonical product JSON.
    Canonical { text: String },
}

/// Export of one product with everything learned on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResult {
    /// The product as exported, weights in `unit`.
    pub product: Product,
    pub table: ExportTable,
    /// Advisory findings; fatal ones fail the export instead.
    pub report: ValidationReport,
    /// Weight unit every exported weight is expressed in.
    pub unit: WeightUnit,
}

/// Import one document into a canonical product.
#[tracing::instrument(skip_all)]
pub fn import_document(document: &SourceDocument, options: &ImportOptions) -> Result<Product> {
    match document {
        SourceDocument::Csv { platform, bytes } => {
            let platform = match platform {
                Some(platform) => *platform,
                None => detect_csv(bytes)
                    .ok_or_else(|| PipelineError::detection("CSV headers match no known platform"))?,
            };
            let importer = registry().get(platform).import_csv.ok_or_else(|| {
                PipelineError::detection(format!("{platform} has no CSV importer"))
            })?;
            Ok(importer(bytes, platform, options)?)
        }
        SourceDocument::RawJson { platform, text } => {
            let document = RawDocument::from_json(*platform, text)?;
            import_raw_document(&document, options)
        }
        SourceDocument::Raw { document } => import_raw_document(document, options),
        SourceDocument::Canonical { text } => Ok(import_canonical_json(text)?),
    }
}

pub(crate) fn import_raw_document(document: &RawDocument, options: &ImportOptions) -> Result<Product> {
    let platform = document.platform();
    let importer = registry()
        .get(platform)
        .import_url
        .ok_or_else(|| PipelineError::detection(format!("{platform} has no URL importer")))?;
    Ok(importer(document, options)?)
}

/// Convert, validate and export one product.
///
/// Conversion runs first so unit checks see the emitted unit; any fatal
/// finding stops the export.
#[tracing::instrument(skip_all, fields(platform = %target))]
pub fn export_product(
    product: &Product,
    target: TargetPlatform,
    options: &ExportOptions,
) -> Result<ExportResult> {
    let converted = convert_product(product, target, options.weight_unit)?;
    let report = validate(&converted.product, target).into_result()?;
    let table = catalog_output::export_product(&converted.product, target, options)?;
    debug!(
        rows = table.len(),
        advisories = report.advisory_count(),
        "product exported"
    );
    Ok(ExportResult {
        product: converted.product,
        table,
        report,
        unit: converted.unit,
    })
}

/// Import then export one document.
pub fn transcode(
    document: &SourceDocument,
    target: TargetPlatform,
    import_options: &ImportOptions,
    export_options: &ExportOptions,
) -> Result<ExportResult> {
    let product = import_document(document, import_options)?;
    export_product(&product, target, export_options)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHOPIFY_CSV: &str = "\
Handle,Title,Body (HTML),Option1 Name,Option1 Value,Variant SKU,Variant Price,Variant Grams
mug,Mug,,Title,Default Title,MUG-1,12.00,400
";

    #[test]
    fn csv_platform_is_detected() {
        let document = SourceDocument::Csv {
            platform: None,
            bytes: SHOPIFY_CSV.as_bytes().to_vec(),
        };
        let product = import_document(&document, &ImportOptions::default()).unwrap();
        assert_eq!(product.source.platform, Some(Platform::Shopify));
        assert_eq!(product.title, "Mug");
    }

    #[test]
    fn raw_csv_source_without_importer_is_detection_error() {
        let document = SourceDocument::Csv {
            platform: Some(Platform::Amazon),
            bytes: b"a,b\n1,2\n".to_vec(),
        };
        let err = import_document(&document, &ImportOptions::default()).unwrap_err();
        assert_eq!(err.kind(), "detection");
    }

    #[test]
    fn malformed_raw_json_is_parse_error() {
        let document = SourceDocument::RawJson {
            platform: Platform::Shopify,
            text: "{not json".to_string(),
        };
        let err = import_document(&document, &ImportOptions::default()).unwrap_err();
        assert_eq!(err.kind(), "parse");
    }

    #[test]
    fn export_rejects_disallowed_unit() {
        let document = SourceDocument::RawJson {
            platform: Platform::Shopify,
            text: r#"{"product": {"title": "Lamp"}}"#.to_string(),
        };
        let options = ExportOptions::default().with_weight_unit(WeightUnit::G);
        let err = transcode(
            &document,
            TargetPlatform::Wix,
            &ImportOptions::default(),
            &options,
        )
        .unwrap_err();
        assert_eq!(err.kind(), "conversion");
    }
}
