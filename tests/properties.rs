use proptest::prelude::*;
use sheet_compare::{
    CellValue, Column, Dataset, Sheet, compare_datasets_at, options::CompareOptions,
};

fn cell_strategy() -> impl Strategy<Value = CellValue> {
    prop_oneof![
        4 => (-1_000.0f64..1_000.0).prop_map(CellValue::Number),
        2 => "[a-c]{0,2}".prop_map(CellValue::Text),
        1 => Just(CellValue::Null),
    ]
}

fn sheet_strategy(name: &'static str) -> impl Strategy<Value = Sheet> {
    (0usize..6, proptest::sample::subsequence(vec!["a", "b", "c", "UW_Year"], 0..=4))
        .prop_flat_map(move |(rows, names)| {
            let columns = names
                .into_iter()
                .map(|column| {
                    proptest::collection::vec(cell_strategy(), rows)
                        .prop_map(move |values| Column::new(column, values))
                })
                .collect::<Vec<_>>();
            columns.prop_map(move |columns| Sheet::new(name, columns))
        })
}

fn dataset_strategy(name: &'static str) -> impl Strategy<Value = Dataset> {
    (
        proptest::option::of(sheet_strategy("Claims")),
        proptest::option::of(sheet_strategy("Premium")),
    )
        .prop_map(move |(claims, premium)| {
            Dataset::new(name, claims.into_iter().chain(premium).collect())
        })
}

proptest! {
    #[test]
    fn summary_partitions_column_results(
        actual in dataset_strategy("actual"),
        expected in dataset_strategy("expected"),
    ) {
        let report = compare_datasets_at(
            &actual,
            &expected,
            &CompareOptions::default(),
            "2026-01-01 00:00:00".to_string(),
        );
        let summary = &report.summary;
        prop_assert_eq!(
            summary.matching_columns + summary.different_columns + summary.error_columns,
            summary.total_columns_compared
        );
        for sheet in &report.sheets {
            prop_assert_eq!(sheet.total_columns, sheet.columns.len());
            prop_assert_eq!(
                sheet.matching_columns + sheet.different_columns + sheet.error_columns,
                sheet.total_columns
            );
        }
        let per_sheet: usize = report.sheets.iter().map(|s| s.matching_columns).sum();
        prop_assert_eq!(per_sheet, summary.matching_columns);
        prop_assert_eq!(
            report.total_sheets,
            report.sheets_processed + report.sheets_failed + report.sheets_skipped
        );
        prop_assert!(summary.success_rate >= 0.0 && summary.success_rate <= 100.0);
    }

    #[test]
    fn repeated_comparison_is_byte_identical(
        actual in dataset_strategy("actual"),
        expected in dataset_strategy("expected"),
    ) {
        let options = CompareOptions::default();
        let first = compare_datasets_at(&actual, &expected, &options, "t".to_string());
        let second = compare_datasets_at(&actual, &expected, &options, "t".to_string());
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
