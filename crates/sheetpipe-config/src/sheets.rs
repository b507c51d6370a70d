//! `sheets.yml` entries.

use std::path::Path;

use serde::Deserialize;
use serde_yaml::Value;
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::resolve::lowercase_name_keys;
use crate::yaml::{from_value, read_value};

pub const SHEETS_FILENAME: &str = "sheets.yml";

/// A configured column before its datatype has been validated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawColumn {
    pub name: String,
    pub datatype: String,
    #[serde(default)]
    pub identifier: Option<String>,
}

/// `excluded_columns` accepts a single header or a list of headers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ExcludedColumns {
    One(String),
    Many(Vec<String>),
}

impl ExcludedColumns {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            ExcludedColumns::One(column) => vec![column],
            ExcludedColumns::Many(columns) => columns,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SheetEntry {
    pub sheet_name: String,
    pub sheet_key: String,
    #[serde(default)]
    pub worksheet: Option<String>,
    #[serde(default)]
    pub target_schema: Option<String>,
    #[serde(default)]
    pub target_table: Option<String>,
    #[serde(default)]
    pub snake_case_camel: bool,
    #[serde(default)]
    pub columns: Vec<RawColumn>,
    #[serde(default)]
    pub excluded_columns: Option<ExcludedColumns>,
}

/// Load the single entry named `sheet_name` from `<dir>/sheets.yml`.
///
/// Column `name` values are lowercased before the entry is returned.
pub fn load_sheet_entry(dir: &Path, sheet_name: &str) -> Result<SheetEntry> {
    let path = dir.join(SHEETS_FILENAME);
    if !path.is_file() {
        return Err(ConfigError::SheetConfigMissing(dir.to_path_buf()));
    }
    let document = read_value(&path)?;
    let sheets = document
        .get("sheets")
        .and_then(Value::as_sequence)
        .cloned()
        .unwrap_or_default();
    let mut matches: Vec<Value> = sheets
        .into_iter()
        .filter(|sheet| sheet.get("sheet_name").and_then(Value::as_str) == Some(sheet_name))
        .collect();
    if matches.len() > 1 {
        return Err(ConfigError::DuplicateSheet {
            name: sheet_name.to_string(),
            count: matches.len(),
        });
    }
    let Some(mut entry) = matches.pop() else {
        return Err(ConfigError::SheetNotFound(sheet_name.to_string()));
    };
    if let Some(columns) = entry.get_mut("columns") {
        lowercase_name_keys(columns);
    }
    let entry: SheetEntry = from_value(&path, entry)?;
    debug!(sheet = %entry.sheet_name, columns = entry.columns.len(), "loaded sheet config");
    Ok(entry)
}
