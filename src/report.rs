//! Report model: the nested column, sheet, and dataset results of one comparison.
//!
//! Every type here is a plain value. Counters on [`SheetResult`] and
//! [`Summary`] are derived from the contained results, never tracked separately.

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Numeric,
    Text,
    Empty,
    Null,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnStatus {
    Matching,
    Different,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetStatus {
    Processed,
    Warning,
    Error,
}

impl SheetStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SheetStatus::Processed => "processed",
            SheetStatus::Warning => "warning",
            SheetStatus::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Statistic {
    Sum,
    Mean,
    Min,
    Max,
    Std,
}

/// Marker emitted instead of a delta when either statistic is not finite.
pub const NON_FINITE_MARKER: &str = "NaN/Inf detected";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatDelta {
    Value(f64),
    NonFinite,
}

impl Serialize for StatDelta {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            StatDelta::Value(value) => serializer.serialize_f64(*value),
            StatDelta::NonFinite => serializer.serialize_str(NON_FINITE_MARKER),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCountDifference {
    pub value: String,
    pub count_in_actual: usize,
    pub count_in_expected: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticDifference {
    pub statistic: Statistic,
    pub value_actual: f64,
    pub value_expected: f64,
    pub difference: StatDelta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Difference {
    ValueCount(ValueCountDifference),
    Statistic(StatisticDifference),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatisticPair {
    pub actual: f64,
    pub expected: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Statistics {
    pub sum: StatisticPair,
    pub mean: StatisticPair,
    pub min: StatisticPair,
    pub max: StatisticPair,
    pub std: StatisticPair,
}

impl Statistics {
    pub fn pairs(&self) -> [(Statistic, StatisticPair); 5] {
        [
            (Statistic::Sum, self.sum),
            (Statistic::Mean, self.mean),
            (Statistic::Min, self.min),
            (Statistic::Max, self.max),
            (Statistic::Std, self.std),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnResult {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub status: ColumnStatus,
    pub differences: Vec<Difference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<Statistics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ColumnResult {
    /// Builds a non-error result; the status follows from whether differences were found.
    pub fn compared(
        name: impl Into<String>,
        column_type: ColumnType,
        differences: Vec<Difference>,
        statistics: Option<Statistics>,
    ) -> Self {
        let status = if differences.is_empty() {
            ColumnStatus::Matching
        } else {
            ColumnStatus::Different
        };
        Self {
            name: name.into(),
            column_type,
            status,
            differences,
            statistics,
            note: None,
            error: None,
        }
    }

    pub fn short_circuit(
        name: impl Into<String>,
        column_type: ColumnType,
        status: ColumnStatus,
        note: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            column_type,
            status,
            differences: Vec::new(),
            statistics: None,
            note: Some(note.into()),
            error: None,
        }
    }

    pub fn failed(name: impl Into<String>, column_type: ColumnType, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type,
            status: ColumnStatus::Error,
            differences: Vec::new(),
            statistics: None,
            note: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetResult {
    pub sheet_name: String,
    pub status: SheetStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub total_columns: usize,
    pub matching_columns: usize,
    pub different_columns: usize,
    pub error_columns: usize,
    pub columns: Vec<ColumnResult>,
}

impl SheetResult {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            status: SheetStatus::Processed,
            message: None,
            total_columns: 0,
            matching_columns: 0,
            different_columns: 0,
            error_columns: 0,
            columns: Vec::new(),
        }
    }

    pub fn warning(sheet_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: SheetStatus::Warning,
            message: Some(message.into()),
            ..Self::new(sheet_name)
        }
    }

    pub fn failed(sheet_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: SheetStatus::Error,
            message: Some(message.into()),
            ..Self::new(sheet_name)
        }
    }

    pub fn push(&mut self, column: ColumnResult) {
        match column.status {
            ColumnStatus::Matching => self.matching_columns += 1,
            ColumnStatus::Different => self.different_columns += 1,
            ColumnStatus::Error => self.error_columns += 1,
        }
        self.total_columns += 1;
        self.columns.push(column);
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Summary {
    pub total_columns_compared: usize,
    pub matching_columns: usize,
    pub different_columns: usize,
    pub error_columns: usize,
    pub success_rate: f64,
}

impl Summary {
    pub fn from_sheets(sheets: &[SheetResult]) -> Self {
        let mut summary = sheets.iter().fold(Summary::default(), |mut acc, sheet| {
            acc.total_columns_compared += sheet.total_columns;
            acc.matching_columns += sheet.matching_columns;
            acc.different_columns += sheet.different_columns;
            acc.error_columns += sheet.error_columns;
            acc
        });
        if summary.total_columns_compared > 0 {
            let completed = (summary.matching_columns + summary.different_columns) as f64;
            let rate = completed / summary.total_columns_compared as f64 * 100.0;
            summary.success_rate = (rate * 100.0).round() / 100.0;
        }
        summary
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub actual_name: String,
    pub expected_name: String,
    pub comparison_time: String,
    pub tolerance: String,
    pub total_sheets: usize,
    pub sheets_processed: usize,
    pub sheets_failed: usize,
    pub sheets_skipped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub sheets: Vec<SheetResult>,
    pub summary: Summary,
}

impl ComparisonReport {
    /// True when any column differs or failed, or any sheet failed.
    pub fn has_discrepancies(&self) -> bool {
        self.sheets_failed > 0
            || self.summary.different_columns > 0
            || self.summary.error_columns > 0
    }
}
