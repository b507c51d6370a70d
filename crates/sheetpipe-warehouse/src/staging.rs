//! Local staging artifact handed to the bulk-load path.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::DateTime;
use polars::prelude::{Column, DataFrame, DataType, TimeUnit};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Result, WarehouseError};

/// Written for null cells. Empty text is missing data, so it loads as NULL
/// too; every other value, `\N` included, loads as written.
pub const NULL_MARKER: &str = "";
pub const DELIMITER: u8 = b'|';

/// `|`-delimited, headerless CSV in a temporary file.
///
/// The file is removed when the value is dropped.
#[derive(Debug)]
pub struct StagingFile {
    file: NamedTempFile,
    rows: usize,
}

impl StagingFile {
    /// Write `df` in column order. Columns listed in `date_columns` are
    /// written as plain dates.
    pub fn write(df: &DataFrame, date_columns: &BTreeSet<String>) -> Result<Self> {
        let file = NamedTempFile::with_prefix("sheetpipe-stage-")
            .map_err(|error| WarehouseError::database("creating staging file", error))?;
        let columns = df
            .get_columns()
            .iter()
            .map(|column| {
                let as_date = date_columns.contains(column.name().as_str());
                column_text(column, as_date)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut writer = csv::WriterBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(false)
            .from_writer(file.reopen().map_err(|error| {
                WarehouseError::database("opening staging file", error)
            })?);
        let rows = df.height();
        for row in 0..rows {
            let record = columns
                .iter()
                .map(|values| values[row].as_deref().unwrap_or(NULL_MARKER));
            writer
                .write_record(record)
                .map_err(|error| WarehouseError::database("writing staging file", error))?;
        }
        writer
            .flush()
            .map_err(|error| WarehouseError::database("writing staging file", error))?;
        debug!(path = %file.path().display(), rows, "staging file written");
        Ok(Self { file, rows })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }
}

fn polars_error(error: polars::error::PolarsError) -> WarehouseError {
    WarehouseError::database("writing staging file", error)
}

fn column_text(column: &Column, as_date: bool) -> Result<Vec<Option<String>>> {
    let series = column.as_materialized_series();
    let values = match series.dtype() {
        DataType::String => series
            .str()
            .map_err(polars_error)?
            .into_iter()
            .map(|value| value.map(str::to_string))
            .collect(),
        DataType::Boolean => series
            .bool()
            .map_err(polars_error)?
            .into_iter()
            .map(|value| value.map(|flag| flag.to_string()))
            .collect(),
        DataType::Float64 => series
            .f64()
            .map_err(polars_error)?
            .into_iter()
            .map(|value| value.map(|number| number.to_string()))
            .collect(),
        DataType::Datetime(unit, _) => {
            let unit = *unit;
            let physical = series.cast(&DataType::Int64).map_err(polars_error)?;
            physical
                .i64()
                .map_err(polars_error)?
                .into_iter()
                .map(|value| value.and_then(|raw| format_timestamp(raw, unit, as_date)))
                .collect()
        }
        _ => {
            let text = series.cast(&DataType::String).map_err(polars_error)?;
            text.str()
                .map_err(polars_error)?
                .into_iter()
                .map(|value| value.map(str::to_string))
                .collect()
        }
    };
    Ok(values)
}

fn format_timestamp(raw: i64, unit: TimeUnit, as_date: bool) -> Option<String> {
    let micros = match unit {
        TimeUnit::Nanoseconds => raw / 1_000,
        TimeUnit::Microseconds => raw,
        TimeUnit::Milliseconds => raw.checked_mul(1_000)?,
    };
    let timestamp = DateTime::from_timestamp_micros(micros)?.naive_utc();
    let text = if as_date {
        timestamp.format("%Y-%m-%d").to_string()
    } else {
        timestamp.format("%Y-%m-%d %H:%M:%S%.f").to_string()
    };
    Some(text)
}
