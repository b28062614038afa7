//! Turns input paths into [`Dataset`] values.
//!
//! Workbooks (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`) are read through
//! `calamine`, one sheet per worksheet with the first row as header. A CSV/TSV
//! file is a single sheet named [`SINGLE_FILE_SHEET`], so two files always line
//! up; a directory contributes one sheet per CSV/TSV file, named after its stem. A sheet that cannot be decoded is logged and read as
//! empty so the comparison can still report on it; failing to open the input at
//! all is an error.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow, bail};
use calamine::{Data, Range, Reader, open_workbook_auto};
use chrono::{NaiveDate, TimeDelta};
use encoding_rs::{Encoding, UTF_8};
use log::{debug, warn};

use crate::{
    data::{CellValue, Column, Dataset, Sheet},
    io_utils,
};

pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];
pub const DELIMITED_EXTENSIONS: &[&str] = &["csv", "tsv"];

/// Sheet name given to a lone CSV/TSV input.
pub const SINGLE_FILE_SHEET: &str = "Sheet1";

/// Field contents read as null cells in delimited input.
pub const NULL_PLACEHOLDERS: &[&str] = &["", "NA", "N/A", "null", "NULL", "NaN", "nan", "#N/A"];

const MILLIS_PER_DAY: f64 = 86_400_000.0;

#[derive(Debug, Clone, Copy)]
pub struct ReadOptions {
    pub delimiter: Option<u8>,
    pub encoding: &'static Encoding,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            encoding: UTF_8,
        }
    }
}

pub fn read_dataset(path: &Path, options: &ReadOptions) -> Result<Dataset> {
    let name = dataset_name(path);
    if path.is_dir() {
        let sheets = read_csv_directory(path, options)?;
        return Ok(Dataset::new(name, sheets));
    }
    if !path.exists() {
        bail!("Input {path:?} does not exist");
    }
    let extension = lowercase_extension(path);
    let sheets = match extension.as_deref() {
        Some(ext) if WORKBOOK_EXTENSIONS.contains(&ext) => read_workbook(path)?,
        Some(ext) if DELIMITED_EXTENSIONS.contains(&ext) => {
            vec![read_csv_sheet(SINGLE_FILE_SHEET, path, options)?]
        }
        _ => bail!(
            "Unsupported input {path:?}: expected a workbook ({}), a CSV/TSV file, or a directory",
            WORKBOOK_EXTENSIONS.join(", ")
        ),
    };
    debug!("Read {} sheet(s) from {path:?}", sheets.len());
    Ok(Dataset::new(name, sheets))
}

fn dataset_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

fn sheet_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn read_workbook(path: &Path) -> Result<Vec<Sheet>> {
    let mut workbook =
        open_workbook_auto(path).map_err(|err| anyhow!("Opening workbook {path:?}: {err}"))?;
    let names = workbook.sheet_names().to_vec();
    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let sheet = match workbook.worksheet_range(&name) {
            Ok(range) => sheet_from_range(&name, &range),
            Err(err) => {
                warn!("Could not parse sheet '{name}' from {path:?}: {err}");
                Sheet::empty(&name)
            }
        };
        sheets.push(sheet);
    }
    Ok(sheets)
}

/// Builds a sheet from a worksheet range whose first row holds the headers.
pub fn sheet_from_range(name: &str, range: &Range<Data>) -> Sheet {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Sheet::empty(name);
    };
    let headers = header
        .iter()
        .enumerate()
        .map(|(idx, cell)| header_name(idx, cell_value(cell)))
        .collect::<Vec<_>>();
    let mut values = vec![Vec::new(); headers.len()];
    for row in rows {
        for (idx, column) in values.iter_mut().enumerate() {
            column.push(row.get(idx).map_or(CellValue::Null, cell_value));
        }
    }
    let columns = headers
        .into_iter()
        .zip(values)
        .map(|(header, cells)| Column::new(header, cells))
        .collect();
    Sheet::new(name, columns)
}

pub fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) if s.is_empty() => CellValue::Null,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::text(if *b { "True" } else { "False" }),
        Data::DateTime(dt) => excel_serial_to_text(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
        _ => CellValue::Null,
    }
}

/// Renders an Excel serial date (1900 system) as `YYYY-MM-DD HH:MM:SS`.
fn excel_serial_to_text(serial: f64) -> CellValue {
    let rendered = NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|epoch| epoch.and_hms_opt(0, 0, 0))
        .zip(TimeDelta::try_milliseconds((serial * MILLIS_PER_DAY).round() as i64))
        .and_then(|(epoch, offset)| epoch.checked_add_signed(offset))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string());
    match rendered {
        Some(text) => CellValue::Text(text),
        None => CellValue::Number(serial),
    }
}

fn header_name(idx: usize, value: CellValue) -> String {
    match value {
        CellValue::Null => format!("Unnamed: {idx}"),
        other => other.as_display(),
    }
}

fn read_csv_directory(dir: &Path, options: &ReadOptions) -> Result<Vec<Sheet>> {
    let mut files = fs::read_dir(dir)
        .with_context(|| format!("Listing directory {dir:?}"))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && lowercase_extension(path)
                    .is_some_and(|ext| DELIMITED_EXTENSIONS.contains(&ext.as_str()))
        })
        .collect::<Vec<PathBuf>>();
    files.sort();
    files
        .iter()
        .map(|path| read_csv_sheet(&sheet_name(path), path, options))
        .collect()
}

fn read_csv_sheet(name: &str, path: &Path, options: &ReadOptions) -> Result<Sheet> {
    let delimiter = io_utils::resolve_input_delimiter(path, options.delimiter);
    let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)?;
    match parse_csv(&mut reader, options.encoding) {
        Ok(columns) => Ok(Sheet::new(name, columns)),
        Err(err) => {
            warn!("Could not parse sheet '{name}' from {path:?}: {err:#}");
            Ok(Sheet::empty(name))
        }
    }
}

fn parse_csv<R: std::io::Read>(
    reader: &mut csv::Reader<R>,
    encoding: &'static Encoding,
) -> Result<Vec<Column>> {
    let headers = io_utils::reader_headers(reader, encoding)?;
    let mut values = vec![Vec::new(); headers.len()];
    for (row_idx, record) in reader.byte_records().enumerate() {
        let record = record.with_context(|| format!("Reading row {}", row_idx + 2))?;
        let decoded = io_utils::decode_record(&record, encoding)
            .with_context(|| format!("Decoding row {}", row_idx + 2))?;
        for (idx, column) in values.iter_mut().enumerate() {
            column.push(parse_field(decoded.get(idx).map_or("", String::as_str)));
        }
    }
    Ok(headers
        .into_iter()
        .enumerate()
        .zip(values)
        .map(|((idx, header), cells)| {
            let name = if header.trim().is_empty() {
                format!("Unnamed: {idx}")
            } else {
                header
            };
            Column::new(name, cells)
        })
        .collect())
}

/// Placeholders become nulls, numeric text becomes a number, anything else stays text.
pub fn parse_field(raw: &str) -> CellValue {
    let trimmed = raw.trim();
    if NULL_PLACEHOLDERS.contains(&trimmed) {
        return CellValue::Null;
    }
    match trimmed.parse::<f64>() {
        Ok(number) => CellValue::Number(number),
        Err(_) => CellValue::Text(raw.to_string()),
    }
}
