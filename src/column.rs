use log::{debug, warn};

use crate::{
    classify::{ComparisonMode, classify},
    data::CellValue,
    error::CompareError,
    frequency::compare_value_counts,
    options::CompareOptions,
    report::{ColumnResult, ColumnStatus, ColumnType},
    stats::compare_numeric,
};

/// Compares one column pair and always yields a result.
///
/// Empty and all-null columns are settled before classification. Any failure
/// inside the chosen comparator becomes a `status=error` result for this
/// column alone.
pub fn compare_column(
    name: &str,
    actual: &[CellValue],
    expected: &[CellValue],
    options: &CompareOptions,
) -> ColumnResult {
    if let Some(result) = short_circuit(name, actual, expected) {
        return result;
    }

    let mode = classify(name, actual, expected, options);
    debug!("Column '{name}' compared as {mode:?}");
    match run_comparator(name, mode, actual, expected, options) {
        Ok(result) => result,
        Err(err) => {
            warn!("Column '{name}' failed: {err}");
            let column_type = match err {
                // numeric conversion falls back to reporting the column as text
                CompareError::NumericConversion { .. } => ColumnType::Text,
                _ => ColumnType::Unknown,
            };
            ColumnResult::failed(name, column_type, err.to_string())
        }
    }
}

fn short_circuit(name: &str, actual: &[CellValue], expected: &[CellValue]) -> Option<ColumnResult> {
    let result = match (actual.is_empty(), expected.is_empty()) {
        (true, true) => ColumnResult::short_circuit(
            name,
            ColumnType::Empty,
            ColumnStatus::Matching,
            "Both columns are empty",
        ),
        (true, false) | (false, true) => ColumnResult::short_circuit(
            name,
            ColumnType::Empty,
            ColumnStatus::Different,
            format!(
                "One column is empty (actual: {} rows, expected: {} rows)",
                actual.len(),
                expected.len()
            ),
        ),
        (false, false) => {
            let actual_null = actual.iter().all(CellValue::is_null);
            let expected_null = expected.iter().all(CellValue::is_null);
            match (actual_null, expected_null) {
                (true, true) => ColumnResult::short_circuit(
                    name,
                    ColumnType::Null,
                    ColumnStatus::Matching,
                    "Both columns contain only null values",
                ),
                (true, false) | (false, true) => ColumnResult::short_circuit(
                    name,
                    ColumnType::Null,
                    ColumnStatus::Different,
                    "One column contains only null values",
                ),
                (false, false) => return None,
            }
        }
    };
    Some(result)
}

fn run_comparator(
    name: &str,
    mode: ComparisonMode,
    actual: &[CellValue],
    expected: &[CellValue],
    options: &CompareOptions,
) -> Result<ColumnResult, CompareError> {
    match mode {
        ComparisonMode::Text => {
            let differences = compare_value_counts(actual, expected, options.max_text_differences);
            Ok(ColumnResult::compared(name, ColumnType::Text, differences, None))
        }
        ComparisonMode::Numeric => {
            let comparison = compare_numeric(actual, expected, options)?;
            Ok(ColumnResult::compared(
                name,
                ColumnType::Numeric,
                comparison.differences,
                Some(comparison.statistics),
            ))
        }
    }
}
