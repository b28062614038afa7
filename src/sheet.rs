use itertools::Itertools;
use log::{debug, info, warn};

use crate::{
    column::compare_column,
    data::{Column, Sheet},
    error::CompareError,
    options::CompareOptions,
    report::{ColumnResult, ColumnType, SheetResult},
};

pub const EMPTY_SHEET_MESSAGE: &str = "One or both sheets are empty";
pub const NO_COMMON_COLUMNS_MESSAGE: &str = "No common columns found in this sheet";

/// Column names present in both sheets, in the actual sheet's order, each once.
pub fn common_columns<'a>(actual: &'a Sheet, expected: &Sheet) -> Vec<&'a str> {
    actual
        .column_names()
        .filter(|name| expected.column(name).is_some())
        .unique()
        .collect()
}

/// Compares two sheets of the same name.
///
/// Column failures are absorbed by the column orchestrator and counted here;
/// a failure of the sheet itself yields a `status=error` result with no columns.
pub fn compare_sheet(actual: &Sheet, expected: &Sheet, options: &CompareOptions) -> SheetResult {
    match try_compare_sheet(actual, expected, options) {
        Ok(result) => {
            info!(
                "Sheet '{}': {:?} ({} matching, {} different, {} error of {} column(s))",
                result.sheet_name,
                result.status,
                result.matching_columns,
                result.different_columns,
                result.error_columns,
                result.total_columns
            );
            result
        }
        Err(err) => {
            warn!("Sheet '{}' failed: {err}", actual.name);
            SheetResult::failed(&actual.name, format!("Sheet processing failed: {err}"))
        }
    }
}

fn try_compare_sheet(
    actual: &Sheet,
    expected: &Sheet,
    options: &CompareOptions,
) -> Result<SheetResult, CompareError> {
    let actual_rows = actual.row_count()?;
    let expected_rows = expected.row_count()?;
    if actual_rows == 0 || expected_rows == 0 {
        return Ok(SheetResult::warning(&actual.name, EMPTY_SHEET_MESSAGE));
    }

    let columns = common_columns(actual, expected);
    debug!("Sheet '{}' common columns: {:?}", actual.name, columns);
    if columns.is_empty() {
        return Ok(SheetResult::warning(&actual.name, NO_COMMON_COLUMNS_MESSAGE));
    }

    let mut result = SheetResult::new(&actual.name);
    for name in columns {
        let column = match lookup_pair(actual, expected, name) {
            Ok((left, right)) => compare_column(name, &left.values, &right.values, options),
            Err(err) => {
                warn!("Column '{name}' in sheet '{}' failed: {err}", actual.name);
                ColumnResult::failed(name, ColumnType::Unknown, format!("Column processing failed: {err}"))
            }
        };
        result.push(column);
    }
    Ok(result)
}

fn lookup_pair<'a>(
    actual: &'a Sheet,
    expected: &'a Sheet,
    name: &str,
) -> Result<(&'a Column, &'a Column), CompareError> {
    let left = actual.column(name).ok_or_else(|| CompareError::MissingColumn {
        column: name.to_string(),
        side: "actual",
    })?;
    let right = expected.column(name).ok_or_else(|| CompareError::MissingColumn {
        column: name.to_string(),
        side: "expected",
    })?;
    Ok((left, right))
}
