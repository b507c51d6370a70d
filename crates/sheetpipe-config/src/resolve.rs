//! Turns configuration into concrete exclude, rename, and cast instructions.

use std::collections::BTreeMap;

use serde_yaml::Value;
use sheetpipe_model::{
    CastType, ColumnSpec, CreationPolicy, DeclaredType, ModelError, SheetColumns, TableTarget,
};
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::flags::RunFlags;
use crate::project::Project;
use crate::sheets::{RawColumn, load_sheet_entry};

/// Everything a single pipeline run needs to know about its sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetJob {
    pub sheet_name: Option<String>,
    pub sheet_key: String,
    pub worksheet: Option<String>,
    pub target: TableTarget,
    pub policy: CreationPolicy,
    pub columns: SheetColumns,
    pub interactive: bool,
    pub dry_run: bool,
}

impl SheetJob {
    pub fn plan(&self) -> ColumnPlan {
        ColumnPlan::new(&self.columns)
    }
}

/// Column instructions derived from [`SheetColumns`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnPlan {
    pub excluded: Vec<String>,
    /// Raw header to canonical name.
    pub rename: BTreeMap<String, String>,
    /// Canonical name to cast type.
    pub casts: BTreeMap<String, CastType>,
    pub snake_case_camel: bool,
}

impl ColumnPlan {
    pub fn new(columns: &SheetColumns) -> Self {
        Self {
            excluded: columns.excluded.clone(),
            rename: rename_map(&columns.columns),
            casts: cast_map(&columns.columns),
            snake_case_camel: columns.snake_case_camel,
        }
    }
}

/// Renames for columns whose identifier differs from their canonical name.
pub fn rename_map(columns: &[ColumnSpec]) -> BTreeMap<String, String> {
    columns
        .iter()
        .filter_map(|column| {
            column
                .rename_source()
                .map(|source| (source.to_string(), column.name.clone()))
        })
        .collect()
}

/// Cast instructions for every configured column, `numeric` pinned to a fixed precision.
pub fn cast_map(columns: &[ColumnSpec]) -> BTreeMap<String, CastType> {
    columns
        .iter()
        .map(|column| (column.name.clone(), column.datatype.cast_type()))
        .collect()
}

/// Validate declared datatypes, reporting every unsupported one at once.
pub fn resolve_columns(raw: &[RawColumn]) -> Result<Vec<ColumnSpec>> {
    let mut columns = Vec::with_capacity(raw.len());
    let mut unsupported = Vec::new();
    for column in raw {
        match column.datatype.parse::<DeclaredType>() {
            Ok(datatype) => columns.push(ColumnSpec {
                name: column.name.clone(),
                identifier: column.identifier.clone(),
                datatype,
            }),
            Err(_) => unsupported.push(column.datatype.clone()),
        }
    }
    if unsupported.is_empty() {
        Ok(columns)
    } else {
        unsupported.sort();
        unsupported.dedup();
        Err(ModelError::UnsupportedDataType(unsupported).into())
    }
}

/// Flag, then sheet config, then project default.
pub fn resolve_target_schema(
    flag: Option<&str>,
    sheet: Option<&str>,
    project: Option<&str>,
    table: &str,
) -> Result<String> {
    [flag, sheet, project]
        .into_iter()
        .flatten()
        .find(|schema| !schema.trim().is_empty())
        .map(str::to_string)
        .ok_or_else(|| ConfigError::TargetSchemaMissing {
            table: table.to_string(),
        })
}

/// Lowercase every string stored under a `name` key, at any depth.
pub fn lowercase_name_keys(value: &mut Value) {
    match value {
        Value::Mapping(mapping) => {
            for (key, entry) in mapping.iter_mut() {
                match entry {
                    Value::String(text) if key.as_str() == Some("name") => {
                        *text = text.to_lowercase();
                    }
                    _ => lowercase_name_keys(entry),
                }
            }
        }
        Value::Sequence(items) => items.iter_mut().for_each(lowercase_name_keys),
        _ => {}
    }
}

/// Build the [`SheetJob`] for this run.
pub fn resolve_job(flags: &RunFlags, project: &Project) -> Result<SheetJob> {
    let job = if let Some(sheet_name) = &flags.sheet_name {
        let entry = load_sheet_entry(&project.sheet_config_dir, sheet_name)?;
        let table = flags
            .target_table
            .clone()
            .or_else(|| entry.target_table.clone())
            .filter(|table| !table.is_empty())
            .ok_or_else(|| ConfigError::TargetTableMissing(sheet_name.clone()))?;
        let schema = resolve_target_schema(
            flags.target_schema.as_deref(),
            entry.target_schema.as_deref(),
            project.target_schema.as_deref(),
            &table,
        )?;
        SheetJob {
            sheet_name: Some(sheet_name.clone()),
            sheet_key: entry.sheet_key.clone(),
            worksheet: entry.worksheet.clone().filter(|name| !name.is_empty()),
            target: TableTarget::new(schema, table),
            policy: project.creation,
            columns: SheetColumns {
                columns: resolve_columns(&entry.columns)?,
                excluded: entry
                    .excluded_columns
                    .map(|excluded| excluded.into_vec())
                    .unwrap_or_default(),
                snake_case_camel: entry.snake_case_camel,
            },
            interactive: flags.interactive,
            dry_run: flags.dry_run,
        }
    } else if let (Some(key), Some(schema), Some(table)) = (
        &flags.sheet_key,
        &flags.target_schema,
        &flags.target_table,
    ) {
        debug!("reading sheet config from command line");
        SheetJob {
            sheet_name: None,
            sheet_key: key.clone(),
            worksheet: None,
            target: TableTarget::new(schema.clone(), table.clone()),
            policy: project.creation,
            columns: SheetColumns::default(),
            interactive: flags.interactive,
            dry_run: flags.dry_run,
        }
    } else {
        return Err(ConfigError::MissingSheetSelection);
    };
    debug!(target = %job.target, policy = ?job.policy, "resolved sheet job");
    Ok(job)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, datatype: &str, identifier: Option<&str>) -> RawColumn {
        RawColumn {
            name: name.to_string(),
            datatype: datatype.to_string(),
            identifier: identifier.map(str::to_string),
        }
    }

    #[test]
    fn rename_map_only_keeps_distinct_identifiers() {
        let columns = resolve_columns(&[
            raw("col_a", "varchar", Some("Col A")),
            raw("col_b", "int", Some("col_b")),
            raw("col_c", "boolean", None),
        ])
        .unwrap();
        let rename = rename_map(&columns);
        assert_eq!(rename.len(), 1);
        assert_eq!(rename.get("Col A").map(String::as_str), Some("col_a"));
    }

    #[test]
    fn cast_map_recodes_numeric() {
        let columns = resolve_columns(&[raw("price", "numeric", None)]).unwrap();
        assert_eq!(
            cast_map(&columns).get("price"),
            Some(&CastType::Decimal {
                precision: 38,
                scale: 18
            })
        );
    }

    #[test]
    fn unsupported_types_are_all_named() {
        let err = resolve_columns(&[
            raw("a", "money", None),
            raw("b", "int", None),
            raw("c", "blob", None),
        ])
        .unwrap_err();
        assert_eq!(err.to_string(), "unsupported datatype(s): blob, money");
    }

    #[test]
    fn schema_precedence() {
        let resolved =
            resolve_target_schema(Some("cli"), Some("sheet"), Some("project"), "t").unwrap();
        assert_eq!(resolved, "cli");
        let resolved = resolve_target_schema(None, Some("sheet"), Some("project"), "t").unwrap();
        assert_eq!(resolved, "sheet");
        let resolved = resolve_target_schema(None, None, Some("project"), "t").unwrap();
        assert_eq!(resolved, "project");
        let err = resolve_target_schema(None, Some(""), None, "orders").unwrap_err();
        assert!(err.to_string().contains("orders"));
    }

    #[test]
    fn lowercases_only_name_keys() {
        let mut value: Value = serde_yaml::from_str(
            "- name: Col_A\n  identifier: Col A\n  nested:\n    name: DEEP\n    other: KEEP\n",
        )
        .unwrap();
        lowercase_name_keys(&mut value);
        let first = &value[0];
        assert_eq!(first["name"].as_str(), Some("col_a"));
        assert_eq!(first["identifier"].as_str(), Some("Col A"));
        assert_eq!(first["nested"]["name"].as_str(), Some("deep"));
        assert_eq!(first["nested"]["other"].as_str(), Some("KEEP"));
    }
}
