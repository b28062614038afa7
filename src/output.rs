use std::{
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::{
    data::Dataset,
    io_utils,
    report::ComparisonReport,
    table::{Align, format_count, format_percent, render_table},
};

/// `report_<actual-stem>_VS_<expected-stem>.json`
pub fn report_file_name(actual: &Path, expected: &Path) -> String {
    format!("report_{}_VS_{}.json", stem(actual), stem(expected))
}

fn stem(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy())
        .and_then(|name| name.split('.').next().map(str::to_string))
        .unwrap_or_else(|| "dataset".to_string())
}

pub fn report_path_in(dir: &Path, actual: &Path, expected: &Path) -> PathBuf {
    dir.join(report_file_name(actual, expected))
}

pub fn write_json(report: &ComparisonReport, path: Option<&Path>) -> Result<()> {
    let mut writer = io_utils::open_output(path)?;
    serde_json::to_writer_pretty(&mut writer, report).context("Serializing report to JSON")?;
    writeln!(writer)?;
    writer.flush().context("Flushing report output")?;
    Ok(())
}

pub fn render_summary(report: &ComparisonReport) -> String {
    let headers = ["sheet", "status", "total", "matching", "different", "error"]
        .map(String::from)
        .to_vec();
    let rows = report
        .sheets
        .iter()
        .map(|sheet| {
            vec![
                sheet.sheet_name.clone(),
                sheet.status.as_str().to_string(),
                format_count(sheet.total_columns),
                format_count(sheet.matching_columns),
                format_count(sheet.different_columns),
                format_count(sheet.error_columns),
            ]
        })
        .collect::<Vec<_>>();
    let align = [
        Align::Left,
        Align::Left,
        Align::Right,
        Align::Right,
        Align::Right,
        Align::Right,
    ];
    let mut rendered = format!(
        "{} vs {} ({})\n",
        report.actual_name, report.expected_name, report.comparison_time
    );
    if let Some(warning) = &report.warning {
        rendered.push_str(&format!("warning: {warning}\n"));
    }
    rendered.push_str(&render_table(&headers, &rows, &align));
    rendered.push_str(&format!(
        "columns compared: {}, success rate: {}\n",
        format_count(report.summary.total_columns_compared),
        format_percent(report.summary.success_rate)
    ));
    rendered
}

pub fn render_sheet_listing(dataset: &Dataset) -> String {
    let headers = ["sheet", "rows", "columns"].map(String::from).to_vec();
    let rows = dataset
        .sheets
        .iter()
        .map(|sheet| {
            let row_count = match sheet.row_count() {
                Ok(count) => format_count(count),
                Err(_) => "ragged".to_string(),
            };
            vec![
                sheet.name.clone(),
                row_count,
                format_count(sheet.columns.len()),
            ]
        })
        .collect::<Vec<_>>();
    render_table(&headers, &rows, &[Align::Left, Align::Right, Align::Right])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        compare::compare_datasets_at,
        data::{CellValue, Column, Sheet},
        options::CompareOptions,
    };

    #[test]
    fn report_file_name_uses_leading_stems() {
        assert_eq!(
            report_file_name(Path::new("/tmp/run.v2.xlsx"), Path::new("baseline.xlsx")),
            "report_run_VS_baseline.json"
        );
    }

    #[test]
    fn summary_lists_each_sheet_and_success_rate() {
        let sheet = Sheet::new(
            "Claims",
            vec![Column::new("Amount", vec![CellValue::Number(1.0)])],
        );
        let dataset = Dataset::new("a.xlsx", vec![sheet]);
        let report = compare_datasets_at(
            &dataset,
            &dataset,
            &CompareOptions::default(),
            "2026-01-01 00:00:00".to_string(),
        );
        let rendered = render_summary(&report);
        assert!(rendered.starts_with("a.xlsx vs a.xlsx (2026-01-01 00:00:00)"));
        assert!(rendered.contains("Claims  processed"));
        assert!(rendered.contains("success rate: 100.00%"));
    }

    #[test]
    fn summary_shows_warning_and_failed_sheet_statuses() {
        let actual = Dataset::new(
            "a.xlsx",
            vec![
                Sheet::empty("Blank"),
                Sheet::new(
                    "Broken",
                    vec![
                        Column::new("x", vec![CellValue::Number(1.0)]),
                        Column::new("y", vec![]),
                    ],
                ),
            ],
        );
        let expected = Dataset::new(
            "e.xlsx",
            vec![
                Sheet::new("Blank", vec![Column::new("x", vec![CellValue::Number(1.0)])]),
                Sheet::new("Broken", vec![Column::new("x", vec![CellValue::Number(1.0)])]),
            ],
        );
        let report = compare_datasets_at(
            &actual,
            &expected,
            &CompareOptions::default(),
            "2026-01-01 00:00:00".to_string(),
        );
        let rendered = render_summary(&report);
        assert!(rendered.contains("Blank   warning"));
        assert!(rendered.contains("Broken  error"));
    }
}
