use std::{num::NonZeroUsize, path::PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::options::ToleranceProfile;

#[derive(Debug, Parser)]
#[command(author, version, about = "Compare two spreadsheet datasets column by column", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compare an actual dataset against an expected one and emit a JSON report
    Compare(CompareArgs),
    /// List the sheets of a dataset with their row and column counts
    Sheets(SheetsArgs),
}

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Actual dataset: workbook, CSV/TSV file, or directory of CSV/TSV files
    #[arg(short = 'a', long = "actual")]
    pub actual: PathBuf,
    /// Expected (baseline) dataset
    #[arg(short = 'e', long = "expected")]
    pub expected: PathBuf,
    /// YAML file with comparison options
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
    /// Column always compared as text; replaces the configured set when given
    #[arg(long = "force-text", action = clap::ArgAction::Append)]
    pub force_text: Vec<String>,
    /// Tolerance profile for numeric statistics
    #[arg(long, value_enum)]
    pub tolerance: Option<ToleranceProfile>,
    /// Rows sampled to decide numeric vs text (0 means full scan)
    #[arg(long = "sample-rows")]
    pub sample_rows: Option<usize>,
    /// Maximum value-count differences reported per text column
    #[arg(long = "max-text-differences")]
    pub max_text_differences: Option<NonZeroUsize>,
    /// Also test the standard deviation against the tolerance
    #[arg(long = "compare-std")]
    pub compare_std: bool,
    /// Write the JSON report to this file (stdout if omitted)
    #[arg(short = 'o', long = "output", conflicts_with = "report_dir")]
    pub output: Option<PathBuf>,
    /// Write the JSON report into this directory using a derived file name
    #[arg(long = "report-dir")]
    pub report_dir: Option<PathBuf>,
    /// Print a per-sheet summary table to stdout
    #[arg(long = "table")]
    pub table: bool,
    /// Exit with an error when any column differs or any sheet or column fails
    #[arg(long = "fail-on-difference")]
    pub fail_on_difference: bool,
    /// CSV delimiter character for delimited inputs
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of delimited inputs (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct SheetsArgs {
    /// Dataset to inspect
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// CSV delimiter character for delimited inputs
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of delimited inputs (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
