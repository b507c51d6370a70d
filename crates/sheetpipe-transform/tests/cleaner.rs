//! Tests for the column cleaner.

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};
use proptest::prelude::*;
use sheetpipe_transform::{CleanOptions, TransformError, clean_frame};

fn frame(columns: &[(&str, &[&str])]) -> DataFrame {
    let columns: Vec<Column> = columns
        .iter()
        .map(|(name, values)| Series::new((*name).into(), *values).into_column())
        .collect();
    DataFrame::new(columns).unwrap()
}

fn names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

#[test]
fn cleans_numbered_headers_and_drops_empty_column() {
    let df = frame(&[("1. col one", &["aa"]), ("col b", &["bc"]), ("", &["x"])]);
    let clean = clean_frame(&df, &CleanOptions::default()).unwrap();
    assert_eq!(names(&clean), vec!["col_one", "col_b"]);
    let first = clean.column("col_one").unwrap().str().unwrap();
    let second = clean.column("col_b").unwrap().str().unwrap();
    assert_eq!(first.get(0), Some("aa"));
    assert_eq!(second.get(0), Some("bc"));
}

#[test]
fn trims_fields_and_nulls_empty_strings() {
    let df = frame(&[("a", &["  padded ", "", "   ", "kept"])]);
    let clean = clean_frame(&df, &CleanOptions::default()).unwrap();
    let values: Vec<Option<&str>> = clean.column("a").unwrap().str().unwrap().into_iter().collect();
    assert_eq!(values, vec![Some("padded"), None, None, Some("kept")]);
}

#[test]
fn snake_case_option_splits_camel_headers() {
    let df = frame(&[("CustomerName", &["x"]), ("orderID", &["1"])]);
    let options = CleanOptions::default().with_snake_case_camel(true);
    let clean = clean_frame(&df, &options).unwrap();
    assert_eq!(names(&clean), vec!["customer_name", "order_id"]);
}

#[test]
fn colliding_clean_names_fail() {
    let df = frame(&[("Col A", &["1"]), ("col_a", &["2"])]);
    let err = clean_frame(&df, &CleanOptions::default()).unwrap_err();
    match err {
        TransformError::DuplicateColumns(names) => assert_eq!(names, vec!["col_a"]),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn clean_frame_is_a_no_op_on_clean_input() {
    let df = frame(&[("col_one", &["aa"]), ("col_b", &["bc"])]);
    let clean = clean_frame(&df, &CleanOptions::default()).unwrap();
    assert!(clean.equals_missing(&df));
}

fn header() -> impl Strategy<Value = String> {
    prop_oneof![
        "[ -~]{0,12}",
        "[0-9]{1,3}[. )]{1,2}[A-Za-z ]{1,10}",
        "[A-Z][a-z]{1,5}[A-Z][a-z]{1,5}",
    ]
}

proptest! {
    #[test]
    fn cleanup_is_idempotent(
        headers in prop::collection::btree_set(header(), 1..6),
        cell in "[ -~]{0,8}",
        snake in any::<bool>(),
    ) {
        let columns: Vec<Column> = headers
            .iter()
            .map(|name| Series::new(name.as_str().into(), &[cell.as_str(), ""]).into_column())
            .collect();
        let df = DataFrame::new(columns).unwrap();
        let options = CleanOptions::default().with_snake_case_camel(snake);
        if let Ok(once) = clean_frame(&df, &options) {
            let twice = clean_frame(&once, &options).unwrap();
            prop_assert_eq!(names(&once), names(&twice));
            prop_assert!(once.equals_missing(&twice));
        }
    }
}
