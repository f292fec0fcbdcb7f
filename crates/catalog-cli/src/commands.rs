//! Subcommand implementations.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use catalog_core::{
    ExportResult, PipelineError, SourceDocument, export_batch, import_document, registry,
};
use catalog_ingest::{ImportOptions, detect_csv, detect_url, import_csv_batch};
use catalog_model::text::format_decimal;
use catalog_model::{Decimal, Platform, Product, TargetPlatform};
use catalog_output::{ExportError, ExportOptions, export_filename};
use catalog_transform::convert;
use chrono::Utc;
use tracing::{info, warn};

use crate::cli::{ConvertArgs, DetectArgs, ExportArgs, ImportArgs, ImportRawArgs};
use crate::summary::platforms_table;

/// What `detect` found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub platform: Option<Platform>,
    pub product_id: Option<String>,
    pub slug: Option<String>,
}

impl Detection {
    pub fn render(&self) -> String {
        let mut out = self.platform.map_or("unknown", Platform::as_str).to_string();
        if let Some(id) = &self.product_id {
            out.push_str(&format!("\nproduct id: {id}"));
        }
        if let Some(slug) = &self.slug {
            out.push_str(&format!("\nslug: {slug}"));
        }
        out
    }
}

/// A file that exists is read as CSV; anything else is treated as a URL.
pub fn run_detect(args: &DetectArgs) -> Result<Detection> {
    let path = Path::new(&args.input);
    if path.is_file() {
        let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
        return Ok(Detection {
            platform: detect_csv(&bytes),
            product_id: None,
            slug: None,
        });
    }
    let detection = detect_url(&args.input);
    Ok(Detection {
        platform: detection.platform,
        product_id: detection.product_id,
        slug: detection.slug,
    })
}

pub fn run_import(args: &ImportArgs) -> Result<()> {
    let options = ImportOptions::from_unit_str(args.weight_unit.as_deref())?;
    let bytes = fs::read(&args.file).with_context(|| format!("read {}", args.file.display()))?;
    let platform = match args.from {
        Some(platform) => platform,
        None => detect_csv(&bytes).ok_or_else(|| {
            anyhow!(
                "could not detect the platform of {}; pass --from",
                args.file.display()
            )
        })?,
    };
    let json = if args.all {
        let products = import_csv_batch(&bytes, platform, &options)?;
        info!(count = products.len(), platform = %platform, "imported products");
        serde_json::to_string_pretty(&products)?
    } else {
        let document = SourceDocument::Csv {
            platform: Some(platform),
            bytes,
        };
        import_document(&document, &options)?.to_json_pretty()?
    };
    write_output(args.output.as_deref(), &json)
}

pub fn run_import_raw(args: &ImportRawArgs) -> Result<()> {
    let options = ImportOptions::from_unit_str(args.weight_unit.as_deref())?;
    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("read {}", args.file.display()))?;
    let document = SourceDocument::RawJson {
        platform: args.from,
        text,
    };
    let product = import_document(&document, &options)?;
    write_output(args.output.as_deref(), &product.to_json_pretty()?)
}

/// One product of an export run.
#[derive(Debug, Clone)]
pub struct ExportItem {
    pub index: usize,
    /// Product title, or the file it came from when it could not be read.
    pub label: String,
    pub outcome: std::result::Result<ExportResult, PipelineError>,
}

/// Everything an export run produced.
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub target: TargetPlatform,
    pub items: Vec<ExportItem>,
    /// Combined CSV, when at least one product exported.
    pub csv: Option<String>,
    /// File the CSV went to; `None` means stdout.
    pub written: Option<PathBuf>,
    /// Products exported individually but clashed when combined.
    pub batch_error: Option<ExportError>,
}

impl ExportSummary {
    pub fn success_count(&self) -> usize {
        self.items.iter().filter(|item| item.outcome.is_ok()).count()
    }

    pub fn row_count(&self) -> usize {
        self.items
            .iter()
            .filter_map(|item| item.outcome.as_ref().ok())
            .map(|result| result.table.len())
            .sum()
    }

    /// 0 when everything exported, 2 when only some did, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        let succeeded = self.success_count();
        if self.batch_error.is_some() || succeeded == 0 {
            1
        } else if succeeded < self.items.len() {
            2
        } else {
            0
        }
    }
}

pub fn export_options(args: &ExportArgs) -> ExportOptions {
    let mut options = ExportOptions::default()
        .published(args.publish)
        .with_csv_format(args.csv_format);
    if let Some(unit) = args.weight_unit {
        options = options.with_weight_unit(unit);
    }
    if let Some(page) = &args.product_page {
        options = options.with_product_page(page.clone());
    }
    if let Some(url) = &args.product_url {
        options = options.with_product_url(url.clone());
    }
    options
}

pub fn run_export(args: &ExportArgs) -> Result<ExportSummary> {
    let options = export_options(args);
    let target = args.to;

    let mut entries: Vec<(String, std::result::Result<Product, PipelineError>)> = Vec::new();
    for path in &args.files {
        let text =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        entries.extend(load_products(path, &text));
    }

    let products: Vec<Product> = entries
        .iter()
        .filter_map(|(_, loaded)| loaded.as_ref().ok().cloned())
        .collect();
    let outcome = export_batch(&products, target, &options);
    let mut exported: BTreeMap<usize, std::result::Result<ExportResult, PipelineError>> = outcome
        .results
        .into_iter()
        .map(|(index, result)| (index, Ok(result)))
        .chain(outcome.errors.into_iter().map(|(index, err)| (index, Err(err))))
        .collect();

    let mut items = Vec::with_capacity(entries.len());
    let mut product_index = 0usize;
    for (index, (label, loaded)) in entries.into_iter().enumerate() {
        let outcome = match loaded {
            Ok(_) => {
                let result = exported
                    .remove(&product_index)
                    .ok_or_else(|| anyhow!("missing export result for product {index}"))?;
                product_index += 1;
                result
            }
            Err(err) => Err(err),
        };
        items.push(ExportItem {
            index,
            label,
            outcome,
        });
    }

    let mut summary = ExportSummary {
        target,
        items,
        csv: None,
        written: None,
        batch_error: None,
    };
    let converted: Vec<Product> = summary
        .items
        .iter()
        .filter_map(|item| item.outcome.as_ref().ok())
        .map(|result| result.product.clone())
        .collect();
    if converted.is_empty() {
        warn!(target = %target, "nothing to export");
        return Ok(summary);
    }
    match catalog_output::export_batch(&converted, target, &options) {
        Ok(table) => {
            let csv = table.to_csv()?;
            summary.written = write_csv(args, target, &csv)?;
            summary.csv = Some(csv);
        }
        Err(err) => {
            warn!(error = %err, "combined export failed");
            summary.batch_error = Some(err);
        }
    }
    Ok(summary)
}

/// Products in one canonical JSON file: a single object or an array.
fn load_products(
    path: &Path,
    text: &str,
) -> Vec<(String, std::result::Result<Product, PipelineError>)> {
    let file_label = path.display().to_string();
    let import = |text: String| {
        import_document(&SourceDocument::Canonical { text }, &ImportOptions::default())
    };
    let labelled = |result: std::result::Result<Product, PipelineError>, fallback: String| {
        let label = result
            .as_ref()
            .map_or(fallback, |product| product.title.clone());
        (label, result)
    };
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(serde_json::Value::Array(values)) => values
            .iter()
            .enumerate()
            .map(|(position, value)| {
                labelled(
                    import(value.to_string()),
                    format!("{file_label}[{position}]"),
                )
            })
            .collect(),
        _ => vec![labelled(import(text.to_string()), file_label)],
    }
}

fn write_csv(args: &ExportArgs, target: TargetPlatform, csv: &str) -> Result<Option<PathBuf>> {
    let path = match (&args.output, &args.output_dir) {
        (Some(path), _) => path.clone(),
        (None, Some(dir)) => {
            fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
            dir.join(export_filename(target, Utc::now()))
        }
        (None, None) => {
            print!("{csv}");
            return Ok(None);
        }
    };
    fs::write(&path, csv).with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), "wrote CSV");
    Ok(Some(path))
}

pub fn run_convert(args: &ConvertArgs) -> Result<String> {
    let value: Decimal = args
        .value
        .trim()
        .parse()
        .with_context(|| format!("'{}' is not a number", args.value))?;
    if value.is_sign_negative() && !value.is_zero() {
        bail!("weight cannot be negative");
    }
    let converted = convert(value, args.from, args.to);
    Ok(format!("{} {}", format_decimal(converted), args.to))
}

pub fn run_platforms() -> String {
    platforms_table(registry().iter()).to_string()
}

fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("write {}", path.display()))?;
            info!(path = %path.display(), "wrote output");
        }
        None => println!("{content}"),
    }
    Ok(())
}
