#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;
use sheet_compare::{CellValue, Column, Sheet};
use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, contents).expect("write temp file contents");
        path
    }

    /// Writes an `.xlsx` workbook with one worksheet per sheet, headers in the first row.
    pub fn write_workbook(&self, name: &str, sheets: &[Sheet]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut workbook = Workbook::new();
        for sheet in sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(sheet.name.as_str()).expect("sheet name");
            for (col_idx, column) in sheet.columns.iter().enumerate() {
                let col = col_idx as u16;
                worksheet
                    .write_string(0, col, column.name.as_str())
                    .expect("header cell");
                for (row_idx, value) in column.values.iter().enumerate() {
                    let row = row_idx as u32 + 1;
                    match value {
                        CellValue::Number(n) => {
                            worksheet.write_number(row, col, *n).expect("number cell");
                        }
                        CellValue::Text(s) => {
                            worksheet.write_string(row, col, s.as_str()).expect("text cell");
                        }
                        CellValue::Null => {}
                    }
                }
            }
        }
        workbook.save(&path).expect("save workbook");
        path
    }
}

pub fn numbers(name: &str, values: &[f64]) -> Column {
    Column::new(name, values.iter().copied().map(CellValue::Number).collect())
}

pub fn texts(name: &str, values: &[&str]) -> Column {
    Column::new(name, values.iter().map(|v| CellValue::text(*v)).collect())
}
