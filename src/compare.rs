//! Top-level dataset comparison.
//!
//! Sheets are aligned by exact name, visited in sorted order, and compared
//! one at a time. The returned [`ComparisonReport`] is fully resolved; for a
//! fixed timestamp it is a pure function of the two datasets and the options.

use std::collections::BTreeSet;

use chrono::Utc;
use log::{debug, info};

use crate::{
    data::Dataset,
    options::CompareOptions,
    report::{ComparisonReport, SheetStatus, Summary},
    sheet::compare_sheet,
};

pub const NO_COMMON_SHEETS_WARNING: &str = "No common sheets found between files";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Sheet names present in both datasets, sorted.
pub fn common_sheets<'a>(actual: &'a Dataset, expected: &Dataset) -> Vec<&'a str> {
    let expected_names = expected.sheet_names().collect::<BTreeSet<_>>();
    actual
        .sheet_names()
        .filter(|name| expected_names.contains(name))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn compare_datasets(
    actual: &Dataset,
    expected: &Dataset,
    options: &CompareOptions,
) -> ComparisonReport {
    let timestamp = Utc::now().format(TIMESTAMP_FORMAT).to_string();
    compare_datasets_at(actual, expected, options, timestamp)
}

pub fn compare_datasets_at(
    actual: &Dataset,
    expected: &Dataset,
    options: &CompareOptions,
    comparison_time: String,
) -> ComparisonReport {
    let sheets = common_sheets(actual, expected);
    debug!("Common sheets: {:?}", sheets);

    let mut report = ComparisonReport {
        actual_name: actual.name.clone(),
        expected_name: expected.name.clone(),
        comparison_time,
        tolerance: options.tolerance.to_string(),
        total_sheets: sheets.len(),
        sheets_processed: 0,
        sheets_failed: 0,
        sheets_skipped: 0,
        warning: None,
        sheets: Vec::with_capacity(sheets.len()),
        summary: Summary::default(),
    };

    if sheets.is_empty() {
        info!(
            "No common sheets between '{}' and '{}'",
            actual.name, expected.name
        );
        report.warning = Some(NO_COMMON_SHEETS_WARNING.to_string());
        return report;
    }

    for name in sheets {
        let (Some(left), Some(right)) = (actual.sheet(name), expected.sheet(name)) else {
            continue;
        };
        let result = compare_sheet(left, right, options);
        match result.status {
            SheetStatus::Processed => report.sheets_processed += 1,
            SheetStatus::Error => report.sheets_failed += 1,
            SheetStatus::Warning => report.sheets_skipped += 1,
        }
        report.sheets.push(result);
    }

    report.summary = Summary::from_sheets(&report.sheets);
    info!(
        "Compared {} sheet(s): {} processed, {} failed, {} skipped; success rate {:.2}%",
        report.total_sheets,
        report.sheets_processed,
        report.sheets_failed,
        report.sheets_skipped,
        report.summary.success_rate
    );
    report
}
