use polars::prelude::{Column, DataFrame, IntoColumn};

use crate::error::Result;

/// Copy of `column` under a new name.
pub(crate) fn renamed(column: &Column, name: &str) -> Column {
    column
        .as_materialized_series()
        .clone()
        .with_name(name.into())
        .into_column()
}

pub(crate) fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

pub(crate) fn rebuild(columns: Vec<Column>) -> Result<DataFrame> {
    if columns.is_empty() {
        return Ok(DataFrame::empty());
    }
    Ok(DataFrame::new(columns)?)
}
