//! Tests for type casting.

use std::collections::BTreeMap;

use polars::prelude::{Column, DataFrame, DataType, IntoColumn, NamedFrom, Series, TimeUnit};
use sheetpipe_model::{CastType, DeclaredType};
use sheetpipe_transform::{TransformError, cast_columns, intermediate_dtype};

fn frame(columns: Vec<Column>) -> DataFrame {
    DataFrame::new(columns).unwrap()
}

fn text(name: &str, values: &[Option<&str>]) -> Column {
    Series::new(name.into(), values).into_column()
}

fn casts(entries: &[(&str, DeclaredType)]) -> BTreeMap<String, CastType> {
    entries
        .iter()
        .map(|(name, kind)| ((*name).to_string(), kind.cast_type()))
        .collect()
}

#[test]
fn int_columns_keep_their_text() {
    let df = frame(vec![text("n", &[Some("1"), Some("2"), Some("32")])]);
    let out = cast_columns(&df, &casts(&[("n", DeclaredType::Int)])).unwrap();
    let values: Vec<Option<&str>> = out.column("n").unwrap().str().unwrap().into_iter().collect();
    assert_eq!(values, vec![Some("1"), Some("2"), Some("32")]);
}

#[test]
fn int_columns_reject_non_integer_text() {
    let df = frame(vec![text(
        "n",
        &[Some("7"), Some("abc"), None, Some("1,000"), Some(" -4 ")],
    )]);
    let error = cast_columns(&df, &casts(&[("n", DeclaredType::Int)])).unwrap_err();
    match error {
        TransformError::InvalidValues {
            column,
            target,
            values,
        } => {
            assert_eq!(column, "n");
            assert_eq!(target, CastType::Int);
            assert_eq!(values, vec!["1,000".to_string(), "abc".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn booleans_accept_any_case() {
    let df = frame(vec![text(
        "flag",
        &[Some("true"), Some("False"), Some("TRUE"), None],
    )]);
    let out = cast_columns(&df, &casts(&[("flag", DeclaredType::Boolean)])).unwrap();
    let values: Vec<Option<bool>> = out
        .column("flag")
        .unwrap()
        .bool()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(values, vec![Some(true), Some(false), Some(true), None]);
}

#[test]
fn native_booleans_pass_through() {
    let df = frame(vec![
        Series::new("flag".into(), &[true, false, true]).into_column(),
    ]);
    let out = cast_columns(&df, &casts(&[("flag", DeclaredType::Boolean)])).unwrap();
    assert_eq!(out.column("flag").unwrap().dtype(), &DataType::Boolean);
}

#[test]
fn non_boolean_values_are_named() {
    let df = frame(vec![text("flag", &[Some("yes"), Some("no"), Some("true")])]);
    let err = cast_columns(&df, &casts(&[("flag", DeclaredType::Boolean)])).unwrap_err();
    match err {
        TransformError::NotBooleanCompatible { column, values } => {
            assert_eq!(column, "flag");
            assert_eq!(values, vec!["no".to_string(), "yes".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn numeric_becomes_float() {
    let df = frame(vec![text("amount", &[Some("1.5"), None, Some(" 2 ")])]);
    let out = cast_columns(&df, &casts(&[("amount", DeclaredType::Numeric)])).unwrap();
    let values: Vec<Option<f64>> = out
        .column("amount")
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(values, vec![Some(1.5), None, Some(2.0)]);
}

#[test]
fn invalid_numeric_values_are_named() {
    let df = frame(vec![text("amount", &[Some("1.5"), Some("n/a")])]);
    let err = cast_columns(&df, &casts(&[("amount", DeclaredType::Numeric)])).unwrap_err();
    assert!(err.to_string().contains("n/a"), "{err}");
}

#[test]
fn dates_and_timestamps_become_datetimes() {
    let df = frame(vec![
        text("day", &[Some("2024-01-15"), None]),
        text("at", &[Some("2024-01-15 10:30:00"), Some("1/16/2024 08:00:00")]),
    ]);
    let out = cast_columns(
        &df,
        &casts(&[
            ("day", DeclaredType::Date),
            ("at", DeclaredType::TimestampNtz),
        ]),
    )
    .unwrap();
    let expected = DataType::Datetime(TimeUnit::Microseconds, None);
    assert_eq!(out.column("day").unwrap().dtype(), &expected);
    assert_eq!(out.column("at").unwrap().dtype(), &expected);
    assert_eq!(out.column("day").unwrap().null_count(), 1);
}

#[test]
fn casting_an_absent_column_fails() {
    let df = frame(vec![text("a", &[Some("x")])]);
    let err = cast_columns(&df, &casts(&[("b", DeclaredType::Varchar)])).unwrap_err();
    match err {
        TransformError::MissingColumns { columns, .. } => assert_eq!(columns, vec!["b"]),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn every_cast_type_has_an_intermediate_dtype() {
    for kind in DeclaredType::ALL {
        let dtype = intermediate_dtype(kind.cast_type());
        assert!(!matches!(dtype, DataType::Null), "{kind} has no dtype");
    }
}
