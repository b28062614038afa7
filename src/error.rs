use thiserror::Error;

/// Failures raised inside a single column or sheet comparison.
///
/// These never escape the engine: the column orchestrator and the sheet
/// comparator turn them into `status=error` results carrying the message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompareError {
    #[error(
        "Sheet '{sheet}' is ragged: column '{column}' has {found} row(s), expected {expected}"
    )]
    RaggedSheet {
        sheet: String,
        column: String,
        expected: usize,
        found: usize,
    },
    #[error("Failed to convert to numeric values ({side} side has no numeric values)")]
    NumericConversion { side: &'static str },
    #[error("Column '{column}' is missing from the {side} sheet")]
    MissingColumn { column: String, side: &'static str },
}
