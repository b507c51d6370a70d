//! SQL generation.
//!
//! Statements are plain ANSI SQL with double-quoted identifiers; engines
//! differ only in bind placeholders and in how a file reaches the stage.

use std::collections::BTreeMap;

use sheetpipe_model::{CastType, TableTarget};

/// A destination column: quoted name and native type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub sql_type: String,
}

pub trait SqlDialect {
    fn name(&self) -> &'static str;

    /// Bind placeholder for the 1-based parameter `index`.
    fn placeholder(&self, index: usize) -> String;

    /// Schema holding session-scoped tables. Stage names are always
    /// qualified with it so they never resolve to a user table.
    fn temp_schema(&self) -> &'static str;

    /// Native type for a cast type; unconfigured columns are text.
    fn column_type(&self, cast: Option<CastType>) -> String {
        match cast {
            Some(CastType::Int) => "INTEGER".to_string(),
            Some(CastType::Varchar) | None => "VARCHAR".to_string(),
            Some(CastType::Decimal { precision, scale }) => {
                format!("NUMERIC({precision},{scale})")
            }
            Some(CastType::Boolean) => "BOOLEAN".to_string(),
            Some(CastType::TimestampNtz) => "TIMESTAMP".to_string(),
            Some(CastType::Date) => "DATE".to_string(),
        }
    }

    fn quote_ident(&self, ident: &str) -> String {
        format!("\"{}\"", ident.replace('"', "\"\""))
    }

    fn qualified(&self, target: &TableTarget) -> String {
        format!(
            "{}.{}",
            self.quote_ident(&target.schema),
            self.quote_ident(&target.table)
        )
    }

    fn create_schema(&self, schema: &str) -> String {
        format!("CREATE SCHEMA {}", self.quote_ident(schema))
    }

    fn create_table(&self, target: &TableTarget, columns: &[ColumnDef]) -> String {
        format!(
            "CREATE TABLE {} ({})",
            self.qualified(target),
            column_list(columns, true)
        )
    }

    fn drop_table(&self, target: &TableTarget) -> String {
        format!("DROP TABLE IF EXISTS {}", self.qualified(target))
    }

    fn stage_ident(&self, stage: &str) -> String {
        format!("{}.{}", self.temp_schema(), self.quote_ident(stage))
    }

    fn create_stage(&self, stage: &str, columns: &[ColumnDef]) -> String {
        format!(
            "CREATE TEMPORARY TABLE {} ({})",
            self.stage_ident(stage),
            column_list(columns, true)
        )
    }

    fn drop_stage(&self, stage: &str) -> String {
        format!("DROP TABLE IF EXISTS {}", self.stage_ident(stage))
    }

    fn insert_from_stage(&self, target: &TableTarget, stage: &str, columns: &[ColumnDef]) -> String {
        let names = column_list(columns, false);
        format!(
            "INSERT INTO {} ({names}) SELECT {names} FROM {}",
            self.qualified(target),
            self.stage_ident(stage)
        )
    }

    fn schema_exists(&self) -> String {
        format!(
            "SELECT COUNT(*) FROM information_schema.schemata WHERE CAST(schema_name AS VARCHAR) = {}",
            self.placeholder(1)
        )
    }

    fn table_exists(&self) -> String {
        format!(
            "SELECT COUNT(*) FROM information_schema.tables WHERE CAST(table_schema AS VARCHAR) = {} AND CAST(table_name AS VARCHAR) = {}",
            self.placeholder(1),
            self.placeholder(2)
        )
    }

    fn column_count(&self) -> String {
        format!(
            "SELECT COUNT(*) FROM information_schema.columns WHERE CAST(table_schema AS VARCHAR) = {} AND CAST(table_name AS VARCHAR) = {}",
            self.placeholder(1),
            self.placeholder(2)
        )
    }

    fn row_count(&self, target: &TableTarget) -> String {
        format!("SELECT COUNT(*) FROM {}", self.qualified(target))
    }
}

fn column_list(columns: &[ColumnDef], with_types: bool) -> String {
    columns
        .iter()
        .map(|column| {
            if with_types {
                format!("{} {}", column.name, column.sql_type)
            } else {
                column.name.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Destination columns for `names`, typed from `casts`.
pub fn column_defs(
    dialect: &dyn SqlDialect,
    names: &[String],
    casts: &BTreeMap<String, CastType>,
) -> Vec<ColumnDef> {
    names
        .iter()
        .map(|name| ColumnDef {
            name: dialect.quote_ident(name),
            sql_type: dialect.column_type(casts.get(name).copied()),
        })
        .collect()
}
