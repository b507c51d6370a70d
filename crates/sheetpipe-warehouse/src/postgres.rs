//! PostgreSQL destination over the synchronous `postgres` client.

use std::fs::File;
use std::io;
use std::path::Path;

use postgres::types::ToSql;
use postgres::{Client, Config, NoTls};
use tracing::debug;

use crate::connection::{Connector, WarehouseConnection};
use crate::credentials::Credentials;
use crate::dialect::{ColumnDef, SqlDialect};
use crate::error::{Result, WarehouseError};

pub const REQUIRED_FIELDS: &[&str] = &["user", "password", "host", "port", "database", "schema"];

pub fn credentials(raw: &std::collections::BTreeMap<String, String>) -> Result<Credentials> {
    Credentials::parse("postgres", raw, REQUIRED_FIELDS)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl SqlDialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${index}")
    }

    fn temp_schema(&self) -> &'static str {
        "pg_temp"
    }
}

pub struct PostgresConnector {
    config: Config,
    location: String,
}

impl PostgresConnector {
    pub fn new(credentials: &Credentials) -> Result<Self> {
        let host = credentials.require("host")?;
        let port: u16 = credentials.parsed("port")?;
        let database = credentials.require("database")?;
        let mut config = Config::new();
        config
            .user(credentials.require("user")?)
            .password(credentials.require("password")?)
            .host(host)
            .port(port)
            .dbname(database)
            .application_name("sheetpipe");
        Ok(Self {
            config,
            location: format!("postgres://{host}:{port}/{database}"),
        })
    }
}

impl Connector for PostgresConnector {
    fn connect(&self) -> Result<Box<dyn WarehouseConnection>> {
        debug!(location = %self.location, "connecting");
        let client = self
            .config
            .connect(NoTls)
            .map_err(|error| WarehouseError::database("connecting to postgres", error))?;
        Ok(Box::new(PostgresConnection { client }))
    }

    fn describe(&self) -> String {
        self.location.clone()
    }
}

struct PostgresConnection {
    client: Client,
}

impl WarehouseConnection for PostgresConnection {
    fn execute(&mut self, sql: &str) -> Result<()> {
        self.client
            .batch_execute(sql)
            .map_err(|error| WarehouseError::database(format!("executing `{sql}`"), error))
    }

    fn query_count(&mut self, sql: &str, params: &[&str]) -> Result<i64> {
        let params: Vec<&(dyn ToSql + Sync)> = params
            .iter()
            .map(|param| param as &(dyn ToSql + Sync))
            .collect();
        let row = self
            .client
            .query_one(sql, &params)
            .map_err(|error| WarehouseError::database(format!("querying `{sql}`"), error))?;
        row.try_get::<_, i64>(0)
            .map_err(|error| WarehouseError::database(format!("reading `{sql}`"), error))
    }

    fn copy_from_file(&mut self, stage: &str, columns: &[ColumnDef], path: &Path) -> Result<u64> {
        let names = columns
            .iter()
            .map(|column| column.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        // A record holding one empty field is written as `""`.
        let sql = format!(
            "COPY {stage} FROM STDIN WITH (FORMAT csv, DELIMITER '|', QUOTE '\"', NULL '', FORCE_NULL ({names}))"
        );
        let mut file = File::open(path)
            .map_err(|error| WarehouseError::database("opening staging file", error))?;
        let mut writer = self
            .client
            .copy_in(sql.as_str())
            .map_err(|error| WarehouseError::database(format!("starting `{sql}`"), error))?;
        io::copy(&mut file, &mut writer)
            .map_err(|error| WarehouseError::database("streaming staging file", error))?;
        writer
            .finish()
            .map_err(|error| WarehouseError::database(format!("finishing `{sql}`"), error))
    }

    fn close(self: Box<Self>) -> Result<()> {
        self.client
            .close()
            .map_err(|error| WarehouseError::database("closing postgres connection", error))
    }
}
