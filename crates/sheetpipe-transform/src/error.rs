use polars::prelude::PolarsError;
use sheetpipe_model::CastType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error(
        "the following columns were not found in the sheet while {stage}: {}; the sheet or sheets.yml needs to be cleaned",
        .columns.join(", ")
    )]
    MissingColumns {
        stage: &'static str,
        columns: Vec<String>,
    },
    #[error("cleanup produced duplicate column names: {}", .0.join(", "))]
    DuplicateColumns(Vec<String>),
    #[error(
        "column '{column}' is declared boolean but holds values that are not true/false: {}",
        .values.join(", ")
    )]
    NotBooleanCompatible { column: String, values: Vec<String> },
    #[error("column '{column}' cannot be cast to {target}: {}", .values.join(", "))]
    InvalidValues {
        column: String,
        target: CastType,
        values: Vec<String>,
    },
    #[error(transparent)]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, TransformError>;
