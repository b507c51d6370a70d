//! Casting configured columns to their declared types.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::{Column, DataFrame, DataType, IntoColumn, NamedFrom, Series, TimeUnit};
use sheetpipe_model::CastType;
use tracing::debug;

use crate::datetime::{parse_date, parse_timestamp};
use crate::error::{Result, TransformError};
use crate::frame::{column_names, rebuild};

/// In-memory representation of each cast type.
pub fn intermediate_dtype(cast: CastType) -> DataType {
    match cast {
        CastType::Int | CastType::Varchar => DataType::String,
        CastType::Decimal { .. } => DataType::Float64,
        CastType::Boolean => DataType::Boolean,
        CastType::TimestampNtz | CastType::Date => {
            DataType::Datetime(TimeUnit::Microseconds, None)
        }
    }
}

/// Cast every column named in `casts`; other columns pass through untouched.
pub fn cast_columns(df: &DataFrame, casts: &BTreeMap<String, CastType>) -> Result<DataFrame> {
    if casts.is_empty() {
        return Ok(df.clone());
    }
    let present = column_names(df);
    let missing: Vec<String> = casts
        .keys()
        .filter(|name| !present.contains(name))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(TransformError::MissingColumns {
            stage: "casting",
            columns: missing,
        });
    }
    let mut columns = Vec::with_capacity(df.width());
    for column in df.get_columns() {
        match casts.get(column.name().as_str()) {
            Some(cast) => {
                debug!(column = %column.name(), %cast, "casting column");
                columns.push(cast_column(column, *cast)?);
            }
            None => columns.push(column.clone()),
        }
    }
    rebuild(columns)
}

fn cast_column(column: &Column, cast: CastType) -> Result<Column> {
    let name = column.name().as_str();
    match cast {
        CastType::Int => check_int(column, name),
        CastType::Varchar => as_string_column(column),
        CastType::Decimal { .. } => cast_decimal(column, name, cast),
        CastType::Boolean => cast_boolean(column, name),
        CastType::TimestampNtz => cast_datetime(column, name, cast, parse_timestamp),
        CastType::Date => cast_datetime(column, name, cast, parse_date),
    }
}

fn as_string_column(column: &Column) -> Result<Column> {
    if column.dtype() == &DataType::String {
        Ok(column.clone())
    } else {
        Ok(column.cast(&DataType::String)?)
    }
}

fn text_values(column: &Column) -> Result<Vec<Option<String>>> {
    let text = as_string_column(column)?;
    Ok(text
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect())
}

/// Integers stay text so nulls and mixed input survive; each value must
/// still parse as a 64-bit integer.
fn check_int(column: &Column, name: &str) -> Result<Column> {
    let text = as_string_column(column)?;
    let invalid: BTreeSet<String> = text
        .str()?
        .into_iter()
        .flatten()
        .filter(|value| value.trim().parse::<i64>().is_err())
        .map(str::to_string)
        .collect();
    if !invalid.is_empty() {
        return Err(TransformError::InvalidValues {
            column: name.to_string(),
            target: CastType::Int,
            values: invalid.into_iter().collect(),
        });
    }
    Ok(text)
}

fn cast_decimal(column: &Column, name: &str, cast: CastType) -> Result<Column> {
    if column.dtype().is_primitive_numeric() {
        return Ok(column.cast(&DataType::Float64)?);
    }
    let mut invalid = BTreeSet::new();
    let values: Vec<Option<f64>> = text_values(column)?
        .into_iter()
        .map(|value| {
            let value = value?;
            let parsed = value.trim().parse::<f64>().ok();
            if parsed.is_none() {
                invalid.insert(value);
            }
            parsed
        })
        .collect();
    if !invalid.is_empty() {
        return Err(TransformError::InvalidValues {
            column: name.to_string(),
            target: cast,
            values: invalid.into_iter().collect(),
        });
    }
    Ok(Series::new(name.into(), values).into_column())
}

fn cast_boolean(column: &Column, name: &str) -> Result<Column> {
    if column.dtype() == &DataType::Boolean {
        return Ok(column.clone());
    }
    let mut invalid = BTreeSet::new();
    let values: Vec<Option<bool>> = text_values(column)?
        .into_iter()
        .map(|value| {
            let value = value?;
            match value.trim().to_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => {
                    invalid.insert(value);
                    None
                }
            }
        })
        .collect();
    if !invalid.is_empty() {
        return Err(TransformError::NotBooleanCompatible {
            column: name.to_string(),
            values: invalid.into_iter().collect(),
        });
    }
    Ok(Series::new(name.into(), values).into_column())
}

fn cast_datetime(
    column: &Column,
    name: &str,
    cast: CastType,
    parse: fn(&str) -> Option<chrono::NaiveDateTime>,
) -> Result<Column> {
    let target = intermediate_dtype(cast);
    if matches!(column.dtype(), DataType::Datetime(..) | DataType::Date) {
        return Ok(column.cast(&target)?);
    }
    let mut invalid = BTreeSet::new();
    let micros: Vec<Option<i64>> = text_values(column)?
        .into_iter()
        .map(|value| {
            let value = value?;
            let parsed = parse(&value).map(|timestamp| timestamp.and_utc().timestamp_micros());
            if parsed.is_none() {
                invalid.insert(value);
            }
            parsed
        })
        .collect();
    if !invalid.is_empty() {
        return Err(TransformError::InvalidValues {
            column: name.to_string(),
            target: cast,
            values: invalid.into_iter().collect(),
        });
    }
    Ok(Series::new(name.into(), micros).cast(&target)?.into_column())
}
