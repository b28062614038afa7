use crate::{data::CellValue, options::CompareOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonMode {
    Numeric,
    Text,
}

/// Chooses how a column pair is compared.
///
/// Force-text names win outright. Otherwise both sides' first
/// `options.sample_rows` values (all values when it is 0), with nulls dropped,
/// must be non-empty and consist only of numbers for a numeric comparison.
pub fn classify(
    column: &str,
    actual: &[CellValue],
    expected: &[CellValue],
    options: &CompareOptions,
) -> ComparisonMode {
    if options.is_force_text(column) {
        return ComparisonMode::Text;
    }
    if sample_is_numeric(actual, options.sample_rows)
        && sample_is_numeric(expected, options.sample_rows)
    {
        ComparisonMode::Numeric
    } else {
        ComparisonMode::Text
    }
}

fn sample_is_numeric(values: &[CellValue], sample_rows: usize) -> bool {
    let window = if sample_rows == 0 {
        values
    } else {
        &values[..values.len().min(sample_rows)]
    };
    let mut seen = false;
    for value in window.iter().filter(|v| !v.is_null()) {
        if !value.is_number() {
            return false;
        }
        seen = true;
    }
    seen
}
