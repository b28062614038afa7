pub mod classify;
pub mod cli;
pub mod column;
pub mod compare;
pub mod data;
pub mod error;
pub mod frequency;
pub mod io_utils;
pub mod options;
pub mod output;
pub mod reader;
pub mod report;
pub mod sheet;
pub mod stats;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    cli::{Cli, Commands, CompareArgs, SheetsArgs},
    options::CompareOptions,
    reader::ReadOptions,
};

pub use crate::{
    compare::{compare_datasets, compare_datasets_at},
    data::{CellValue, Column, Dataset, Sheet},
    report::ComparisonReport,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("sheet_compare", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Compare(args) => handle_compare(&args),
        Commands::Sheets(args) => handle_sheets(&args),
    }
}

/// Config file first, then command-line overrides.
pub fn resolve_options(args: &CompareArgs) -> Result<CompareOptions> {
    let mut options = match &args.config {
        Some(path) => CompareOptions::load(path)
            .with_context(|| format!("Loading comparison options from {path:?}"))?,
        None => CompareOptions::default(),
    };
    if !args.force_text.is_empty() {
        options.force_text = args
            .force_text
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .map(|c| c.to_string())
            .collect();
    }
    if let Some(tolerance) = args.tolerance {
        options.tolerance = tolerance;
    }
    if let Some(sample_rows) = args.sample_rows {
        options.sample_rows = sample_rows;
    }
    if let Some(cap) = args.max_text_differences {
        options.max_text_differences = cap;
    }
    if args.compare_std {
        options.compare_std = true;
    }
    options.validate()?;
    debug!("Comparison options: {options:?}");
    Ok(options)
}

fn handle_compare(args: &CompareArgs) -> Result<()> {
    let options = resolve_options(args)?;
    let read_options = ReadOptions {
        delimiter: args.delimiter,
        encoding: io_utils::resolve_encoding(args.input_encoding.as_deref())?,
    };
    info!(
        "Comparing '{}' against '{}' ({} tolerance)",
        args.actual.display(),
        args.expected.display(),
        options.tolerance
    );
    let actual = reader::read_dataset(&args.actual, &read_options)
        .with_context(|| format!("Reading actual dataset {:?}", args.actual))?;
    let expected = reader::read_dataset(&args.expected, &read_options)
        .with_context(|| format!("Reading expected dataset {:?}", args.expected))?;

    let report = compare_datasets(&actual, &expected, &options);
    drop(actual);
    drop(expected);

    let destination = match (&args.output, &args.report_dir) {
        (Some(path), _) => Some(path.clone()),
        (None, Some(dir)) => Some(output::report_path_in(dir, &args.actual, &args.expected)),
        (None, None) => None,
    };
    match &destination {
        Some(path) => {
            output::write_json(&report, Some(path))?;
            info!("Report written to {path:?}");
        }
        None if !args.table => output::write_json(&report, None)?,
        None => {}
    }
    if args.table {
        print!("{}", output::render_summary(&report));
    }

    if args.fail_on_difference && report.has_discrepancies() {
        bail!(
            "Datasets differ: {} different column(s), {} error column(s), {} failed sheet(s)",
            report.summary.different_columns,
            report.summary.error_columns,
            report.sheets_failed
        );
    }
    Ok(())
}

fn handle_sheets(args: &SheetsArgs) -> Result<()> {
    let read_options = ReadOptions {
        delimiter: args.delimiter,
        encoding: io_utils::resolve_encoding(args.input_encoding.as_deref())?,
    };
    let dataset = reader::read_dataset(&args.input, &read_options)
        .with_context(|| format!("Reading dataset {:?}", args.input))?;
    print!("{}", output::render_sheet_listing(&dataset));
    info!("Listed {} sheet(s) from {:?}", dataset.sheets.len(), args.input);
    Ok(())
}
