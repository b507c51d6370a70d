//! Column exclusion and renaming.
//!
//! Exclusion tolerates drift between the sheet and its configuration;
//! renaming does not.

use std::collections::BTreeMap;

use polars::prelude::DataFrame;
use tracing::{debug, warn};

use crate::error::{Result, TransformError};
use crate::frame::{column_names, rebuild, renamed};

/// Drop the listed raw headers. Returns the reduced frame and the entries that were not found.
pub fn exclude_columns(df: &DataFrame, excluded: &[String]) -> Result<(DataFrame, Vec<String>)> {
    if excluded.is_empty() {
        return Ok((df.clone(), Vec::new()));
    }
    let present = column_names(df);
    let missing: Vec<String> = excluded
        .iter()
        .filter(|name| !present.contains(name))
        .cloned()
        .collect();
    if !missing.is_empty() {
        warn!(
            columns = ?missing,
            "excluded columns not found in the sheet were ignored; consider cleaning sheets.yml"
        );
    }
    let kept = df
        .get_columns()
        .iter()
        .filter(|column| !excluded.iter().any(|name| name == column.name().as_str()))
        .cloned()
        .collect();
    let frame = rebuild(kept)?;
    debug!(dropped = excluded.len() - missing.len(), "excluded columns");
    Ok((frame, missing))
}

/// Apply `renames` (raw header to canonical name). Every source must exist.
pub fn rename_columns(df: &DataFrame, renames: &BTreeMap<String, String>) -> Result<DataFrame> {
    if renames.is_empty() {
        return Ok(df.clone());
    }
    let present = column_names(df);
    let missing: Vec<String> = renames
        .keys()
        .filter(|source| !present.contains(source))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(TransformError::MissingColumns {
            stage: "renaming",
            columns: missing,
        });
    }
    let columns = df
        .get_columns()
        .iter()
        .map(|column| match renames.get(column.name().as_str()) {
            Some(target) => renamed(column, target),
            None => column.clone(),
        })
        .collect();
    debug!(renamed = renames.len(), "renamed columns");
    rebuild(columns)
}
