//! CLI argument definitions for the catalog transcoder.

use std::path::PathBuf;

use catalog_model::{Platform, TargetPlatform, WeightUnit};
use catalog_output::CsvFormat;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "catalog",
    version,
    about = "Catalog transcoder - move product data between storefront platforms",
    long_about = "Move product data between ecommerce platforms.\n\n\
                  Imports Shopify, BigCommerce, Wix, Squarespace and WooCommerce CSV exports\n\
                  or platform API documents into one canonical product model, then writes\n\
                  bulk-import CSV files for any storefront target."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Detect the platform behind a product URL or CSV export.
    Detect(DetectArgs),

    /// Import a CSV export into canonical product JSON.
    Import(ImportArgs),

    /// Import a platform API document (JSON) into canonical product JSON.
    #[command(name = "import-raw")]
    ImportRaw(ImportRawArgs),

    /// Validate, convert and export canonical products to a target CSV.
    Export(ExportArgs),

    /// Convert a weight between units.
    Convert(ConvertArgs),

    /// List platforms and what each supports.
    Platforms,
}

#[derive(Args)]
pub struct DetectArgs {
    /// Product URL, or path to a CSV export.
    #[arg(value_name = "URL|CSV_FILE")]
    pub input: String,
}

#[derive(Args)]
pub struct ImportArgs {
    /// Source platform (detected from the header row when omitted).
    #[arg(long = "from", value_name = "PLATFORM")]
    pub from: Option<Platform>,

    /// Unit of the weight column (required for bigcommerce, wix and squarespace).
    #[arg(long = "weight-unit", value_name = "UNIT")]
    pub weight_unit: Option<String>,

    /// Import every product in the file instead of the first.
    #[arg(long = "all")]
    pub all: bool,

    /// Write JSON here instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// CSV export to read.
    #[arg(value_name = "CSV_FILE")]
    pub file: PathBuf,
}

#[derive(Args)]
pub struct ImportRawArgs {
    /// Platform the document came from.
    #[arg(long = "from", value_name = "PLATFORM")]
    pub from: Platform,

    /// Fallback unit for weights the document does not label.
    #[arg(long = "weight-unit", value_name = "UNIT")]
    pub weight_unit: Option<String>,

    /// Write JSON here instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Platform API response to read.
    #[arg(value_name = "JSON_FILE")]
    pub file: PathBuf,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Target storefront.
    #[arg(long = "to", value_name = "TARGET")]
    pub to: TargetPlatform,

    /// Mark exported products as published/visible.
    #[arg(long = "publish")]
    pub publish: bool,

    /// Weight unit to emit (must be accepted by the target).
    #[arg(long = "weight-unit", value_name = "UNIT")]
    pub weight_unit: Option<WeightUnit>,

    /// BigCommerce CSV dialect.
    #[arg(long = "csv-format", value_name = "FORMAT", default_value = "modern")]
    pub csv_format: CsvFormat,

    /// Squarespace store page the products belong to.
    #[arg(long = "product-page", value_name = "PAGE")]
    pub product_page: Option<String>,

    /// Squarespace product URL slug.
    #[arg(long = "product-url", value_name = "SLUG")]
    pub product_url: Option<String>,

    /// Write the CSV to this file.
    #[arg(long = "output", short = 'o', value_name = "PATH", conflicts_with = "output_dir")]
    pub output: Option<PathBuf>,

    /// Write the CSV into this directory under a timestamped name.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Canonical product JSON files (a file may hold one product or an array).
    #[arg(value_name = "PRODUCT_JSON", required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Args)]
pub struct ConvertArgs {
    /// Weight value.
    #[arg(value_name = "VALUE", allow_hyphen_values = true)]
    pub value: String,

    /// Unit of VALUE.
    #[arg(value_name = "FROM")]
    pub from: WeightUnit,

    /// Unit to convert to.
    #[arg(value_name = "TO")]
    pub to: WeightUnit,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn export_arguments_parse() {
        let cli = Cli::try_parse_from([
            "catalog",
            "export",
            "--to",
            "squarespace",
            "--weight-unit",
            "lb",
            "--publish",
            "a.json",
            "b.json",
        ])
        .unwrap();
        let Command::Export(args) = cli.command else {
            panic!("expected export");
        };
        assert_eq!(args.to, TargetPlatform::Squarespace);
        assert_eq!(args.weight_unit, Some(WeightUnit::Lb));
        assert_eq!(args.csv_format, CsvFormat::Modern);
        assert_eq!(args.files.len(), 2);
    }

    #[test]
    fn marketplace_is_not_a_target() {
        assert!(Cli::try_parse_from(["catalog", "export", "--to", "amazon", "a.json"]).is_err());
    }
}
