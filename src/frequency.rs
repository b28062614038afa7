use std::{collections::BTreeMap, num::NonZeroUsize};

use itertools::{EitherOrBoth, Itertools};

use crate::{
    data::CellValue,
    report::{Difference, ValueCountDifference},
};

/// Counts each stringified value; nulls are counted under the missing token.
pub fn value_counts(values: &[CellValue]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for value in values {
        *counts.entry(value.as_display()).or_insert(0) += 1;
    }
    counts
}

/// Compares the value-frequency tables of two columns.
///
/// The union of values is walked in sorted order and the first `cap`
/// mismatched counts are returned, so truncation is reproducible.
pub fn compare_value_counts(
    actual: &[CellValue],
    expected: &[CellValue],
    cap: NonZeroUsize,
) -> Vec<Difference> {
    let left = value_counts(actual);
    let right = value_counts(expected);
    left.iter()
        .merge_join_by(right.iter(), |(a, _), (b, _)| a.cmp(b))
        .filter_map(|entry| {
            let (value, count_in_actual, count_in_expected) = match entry {
                EitherOrBoth::Both((value, a), (_, b)) => (value, *a, *b),
                EitherOrBoth::Left((value, a)) => (value, *a, 0),
                EitherOrBoth::Right((value, b)) => (value, 0, *b),
            };
            (count_in_actual != count_in_expected).then(|| {
                Difference::ValueCount(ValueCountDifference {
                    value: value.clone(),
                    count_in_actual,
                    count_in_expected,
                })
            })
        })
        .take(cap.get())
        .collect()
}
