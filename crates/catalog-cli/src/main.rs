//! Catalog transcoder CLI.

use catalog_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use catalog_cli::commands::{
    run_convert, run_detect, run_export, run_import, run_import_raw, run_platforms,
};
use catalog_cli::logging::{LogConfig, LogFormat, init_logging};
use catalog_cli::summary::render_export_summary;
use clap::{ColorChoice, Parser};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match cli.command {
        Command::Detect(args) => match run_detect(&args) {
            Ok(detection) => {
                println!("{}", detection.render());
                if detection.platform.is_some() { 0 } else { 1 }
            }
            Err(error) => report(&error),
        },
        Command::Import(args) => run_import(&args).map_or_else(|error| report(&error), |()| 0),
        Command::ImportRaw(args) => {
            run_import_raw(&args).map_or_else(|error| report(&error), |()| 0)
        }
        Command::Export(args) => match run_export(&args) {
            Ok(summary) => {
                let rendered = render_export_summary(&summary);
                // The CSV owns stdout when no output path was given.
                if summary.written.is_none() && summary.csv.is_some() {
                    eprint!("{rendered}");
                } else {
                    print!("{rendered}");
                }
                summary.exit_code()
            }
            Err(error) => report(&error),
        },
        Command::Convert(args) => match run_convert(&args) {
            Ok(line) => {
                println!("{line}");
                0
            }
            Err(error) => report(&error),
        },
        Command::Platforms => {
            println!("{}", run_platforms());
            0
        }
    };
    std::process::exit(exit_code);
}

fn report(error: &anyhow::Error) -> i32 {
    eprintln!("error: {error:#}");
    1
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
