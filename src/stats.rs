use crate::{
    data::CellValue,
    error::CompareError,
    options::CompareOptions,
    report::{Difference, StatDelta, Statistic, StatisticDifference, StatisticPair, Statistics},
};

const DISPLAY_SCALE: f64 = 1e4;

#[derive(Debug, Clone, PartialEq)]
pub struct NumericComparison {
    pub statistics: Statistics,
    pub differences: Vec<Difference>,
}

/// Aggregates over the values of one column that survived numeric coercion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStats {
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
}

impl ColumnStats {
    /// Returns `None` for an empty sample.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let (&first, rest) = values.split_first()?;
        let count = values.len();
        let (sum, min, max) = rest
            .iter()
            .fold((first, first, first), |(sum, min, max), &v| {
                (sum + v, min.min(v), max.max(v))
            });
        let mean = sum / count as f64;
        let std_dev = if count < 2 {
            0.0
        } else {
            let squares: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
            (squares / (count as f64 - 1.0)).sqrt()
        };
        Some(Self {
            count,
            sum,
            mean,
            min,
            max,
            std_dev,
        })
    }

    fn get(&self, statistic: Statistic) -> f64 {
        match statistic {
            Statistic::Sum => self.sum,
            Statistic::Mean => self.mean,
            Statistic::Min => self.min,
            Statistic::Max => self.max,
            Statistic::Std => self.std_dev,
        }
    }
}

pub fn coerce_numeric(values: &[CellValue]) -> Vec<f64> {
    values.iter().filter_map(CellValue::to_number).collect()
}

/// Compares two columns by aggregate statistics under the configured tolerance.
///
/// Values that do not coerce to a number are dropped. A side left with no
/// values at all is a conversion failure rather than a statistic mismatch.
pub fn compare_numeric(
    actual: &[CellValue],
    expected: &[CellValue],
    options: &CompareOptions,
) -> Result<NumericComparison, CompareError> {
    let actual_stats = ColumnStats::from_values(&coerce_numeric(actual))
        .ok_or(CompareError::NumericConversion { side: "actual" })?;
    let expected_stats = ColumnStats::from_values(&coerce_numeric(expected))
        .ok_or(CompareError::NumericConversion { side: "expected" })?;

    let pair = |statistic| StatisticPair {
        actual: actual_stats.get(statistic),
        expected: expected_stats.get(statistic),
    };
    let statistics = Statistics {
        sum: pair(Statistic::Sum),
        mean: pair(Statistic::Mean),
        min: pair(Statistic::Min),
        max: pair(Statistic::Max),
        std: pair(Statistic::Std),
    };

    let epsilon = options.epsilon();
    let differences = statistics
        .pairs()
        .into_iter()
        .filter(|(statistic, _)| options.compare_std || *statistic != Statistic::Std)
        .filter_map(|(statistic, values)| check_statistic(statistic, values, epsilon))
        .map(Difference::Statistic)
        .collect();

    Ok(NumericComparison {
        statistics,
        differences,
    })
}

fn check_statistic(
    statistic: Statistic,
    values: StatisticPair,
    epsilon: f64,
) -> Option<StatisticDifference> {
    let StatisticPair { actual, expected } = values;
    if !actual.is_finite() || !expected.is_finite() {
        return Some(StatisticDifference {
            statistic,
            value_actual: actual,
            value_expected: expected,
            difference: StatDelta::NonFinite,
        });
    }
    if !exceeds_tolerance(statistic, actual, expected, epsilon) {
        return None;
    }
    Some(StatisticDifference {
        statistic,
        value_actual: round_for_display(actual),
        value_expected: round_for_display(expected),
        difference: StatDelta::Value(round_for_display(expected - actual)),
    })
}

/// Sum, mean and std switch to a relative test once either magnitude exceeds 1;
/// min and max are always tested absolutely.
pub fn exceeds_tolerance(statistic: Statistic, actual: f64, expected: f64, epsilon: f64) -> bool {
    let delta = (actual - expected).abs();
    match statistic {
        Statistic::Sum | Statistic::Mean | Statistic::Std => {
            let scale = actual.abs().max(expected.abs());
            if scale > 1.0 {
                delta / scale > epsilon
            } else {
                delta > epsilon
            }
        }
        Statistic::Min | Statistic::Max => delta > epsilon,
    }
}

/// Rounds to four decimals for the emitted report only.
pub fn round_for_display(value: f64) -> f64 {
    let scaled = value * DISPLAY_SCALE;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / DISPLAY_SCALE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ToleranceProfile;

    fn numbers(values: &[f64]) -> Vec<CellValue> {
        values.iter().copied().map(CellValue::Number).collect()
    }

    fn flagged(result: &NumericComparison) -> Vec<Statistic> {
        result
            .differences
            .iter()
            .map(|d| match d {
                Difference::Statistic(s) => s.statistic,
                other => panic!("unexpected difference {other:?}"),
            })
            .collect()
    }

    #[test]
    fn column_stats_match_hand_computed_values() {
        let stats = ColumnStats::from_values(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(stats.count, 8);
        assert_eq!(stats.sum, 40.0);
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 9.0);
        assert!((stats.std_dev - 2.138_089_935_299_395).abs() < 1e-12);
        assert_eq!(ColumnStats::from_values(&[3.0]).unwrap().std_dev, 0.0);
        assert!(ColumnStats::from_values(&[]).is_none());
    }

    #[test]
    fn identical_columns_match_with_statistics_attached() {
        let values = numbers(&[1.0, 2.5, 3.0]);
        let result = compare_numeric(&values, &values, &CompareOptions::default()).unwrap();
        assert!(result.differences.is_empty());
        assert_eq!(result.statistics.sum.actual, 6.5);
        assert_eq!(result.statistics.sum.expected, 6.5);
    }

    #[test]
    fn relative_tolerance_absorbs_tiny_drift_on_large_sums() {
        let options = CompareOptions::default();
        let result =
            compare_numeric(&numbers(&[1_000_000.0]), &numbers(&[1_000_000.05]), &options).unwrap();
        assert!(!flagged(&result).contains(&Statistic::Sum));
        assert!(!flagged(&result).contains(&Statistic::Mean));

        let result =
            compare_numeric(&numbers(&[1_000_000.0]), &numbers(&[2_000_000.0]), &options).unwrap();
        assert!(flagged(&result).contains(&Statistic::Sum));
    }

    #[test]
    fn strict_profile_flags_drift_relaxed_accepts() {
        let strict = CompareOptions {
            tolerance: ToleranceProfile::Strict,
            ..CompareOptions::default()
        };
        let actual = numbers(&[1_000_000.0]);
        let expected = numbers(&[1_000_000.05]);
        let result = compare_numeric(&actual, &expected, &strict).unwrap();
        assert!(flagged(&result).contains(&Statistic::Sum));
    }

    #[test]
    fn min_and_max_use_absolute_tolerance() {
        assert!(exceeds_tolerance(Statistic::Min, 1000.0, 1000.01, 1e-6));
        assert!(!exceeds_tolerance(Statistic::Sum, 1000.0, 1000.0000001, 1e-6));
        assert!(exceeds_tolerance(Statistic::Mean, 0.5, 0.500002, 1e-6));
    }

    #[test]
    fn emitted_values_are_rounded_but_tolerance_uses_raw_values() {
        let result = compare_numeric(
            &numbers(&[0.123_456_78]),
            &numbers(&[0.123_466_78]),
            &CompareOptions::default(),
        )
        .unwrap();
        let Difference::Statistic(first) = &result.differences[0] else {
            panic!("expected statistic difference");
        };
        assert_eq!(first.statistic, Statistic::Sum);
        assert_eq!(first.value_actual, 0.1235);
        assert_eq!(first.value_expected, 0.1235);
        assert_eq!(first.difference, StatDelta::Value(0.0));
    }

    #[test]
    fn infinite_values_emit_marker() {
        let result = compare_numeric(
            &numbers(&[f64::INFINITY, 1.0]),
            &numbers(&[1.0, 1.0]),
            &CompareOptions::default(),
        )
        .unwrap();
        let markers = result
            .differences
            .iter()
            .filter(|d| matches!(d, Difference::Statistic(s) if s.difference == StatDelta::NonFinite))
            .count();
        // sum, mean and max are infinite on the actual side
        assert_eq!(markers, 3);
    }

    #[test]
    fn text_values_are_coerced_or_dropped() {
        let actual = vec![CellValue::Number(1.0), CellValue::text("2"), CellValue::text("n/a")];
        let expected = numbers(&[1.0, 2.0]);
        let result = compare_numeric(&actual, &expected, &CompareOptions::default()).unwrap();
        assert!(result.differences.is_empty());
    }

    #[test]
    fn side_without_numbers_is_a_conversion_error() {
        let err = compare_numeric(
            &[CellValue::text("x")],
            &numbers(&[1.0]),
            &CompareOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err, CompareError::NumericConversion { side: "actual" });
    }

    #[test]
    fn std_is_only_tested_when_enabled() {
        let actual = numbers(&[1.0, 3.0]);
        let expected = numbers(&[0.0, 4.0]);
        let baseline = compare_numeric(&actual, &expected, &CompareOptions::default()).unwrap();
        assert!(!flagged(&baseline).contains(&Statistic::Std));

        let extended = CompareOptions {
            compare_std: true,
            ..CompareOptions::default()
        };
        let result = compare_numeric(&actual, &expected, &extended).unwrap();
        assert!(flagged(&result).contains(&Statistic::Std));
    }
}
