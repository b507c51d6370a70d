//! Embedded DuckDB destination.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use duckdb::{Connection, params_from_iter};
use tracing::debug;

use crate::connection::{Connector, WarehouseConnection};
use crate::credentials::Credentials;
use crate::dialect::{ColumnDef, SqlDialect};
use crate::error::{Result, WarehouseError};

pub const REQUIRED_FIELDS: &[&str] = &["path", "schema"];

pub fn credentials(raw: &BTreeMap<String, String>) -> Result<Credentials> {
    Credentials::parse("duckdb", raw, REQUIRED_FIELDS)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DuckDbDialect;

impl SqlDialect for DuckDbDialect {
    fn name(&self) -> &'static str {
        "duckdb"
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn temp_schema(&self) -> &'static str {
        "temp.main"
    }
}

#[derive(Debug, Clone)]
pub struct DuckDbConnector {
    path: PathBuf,
}

impl DuckDbConnector {
    pub fn new(credentials: &Credentials) -> Result<Self> {
        Ok(Self::at(credentials.require("path")?))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Connector for DuckDbConnector {
    fn connect(&self) -> Result<Box<dyn WarehouseConnection>> {
        debug!(path = %self.path.display(), "opening duckdb database");
        let connection = Connection::open(&self.path)
            .map_err(|error| WarehouseError::database("opening duckdb database", error))?;
        Ok(Box::new(DuckDbConnection { connection }))
    }

    fn describe(&self) -> String {
        format!("duckdb://{}", self.path.display())
    }
}

struct DuckDbConnection {
    connection: Connection,
}

impl WarehouseConnection for DuckDbConnection {
    fn execute(&mut self, sql: &str) -> Result<()> {
        self.connection
            .execute_batch(sql)
            .map_err(|error| WarehouseError::database(format!("executing `{sql}`"), error))
    }

    fn query_count(&mut self, sql: &str, params: &[&str]) -> Result<i64> {
        self.connection
            .query_row(sql, params_from_iter(params.iter()), |row| row.get::<_, i64>(0))
            .map_err(|error| WarehouseError::database(format!("querying `{sql}`"), error))
    }

    fn copy_from_file(&mut self, stage: &str, _columns: &[ColumnDef], path: &Path) -> Result<u64> {
        let file = path.display().to_string().replace('\'', "''");
        let sql = format!(
            "COPY {stage} FROM '{file}' (FORMAT csv, DELIMITER '|', QUOTE '\"', HEADER false, NULL '')"
        );
        let rows = self
            .connection
            .execute(&sql, [])
            .map_err(|error| WarehouseError::database(format!("executing `{sql}`"), error))?;
        Ok(rows as u64)
    }

    fn close(self: Box<Self>) -> Result<()> {
        self.connection
            .close()
            .map_err(|(_, error)| WarehouseError::database("closing duckdb database", error))
    }
}
