//! Maps a profile's `db_type` to the pieces of a destination adapter.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::adapter::SqlAdapter;
use crate::connection::Connector;
use crate::credentials::Credentials;
use crate::dialect::SqlDialect;
use crate::duckdb::{self, DuckDbConnector, DuckDbDialect};
use crate::error::{Result, WarehouseError};
use crate::postgres::{self, PostgresConnector, PostgresDialect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationKind {
    Postgres,
    DuckDb,
}

/// Constructors for one destination kind.
#[derive(Clone, Copy)]
pub struct AdapterFactories {
    pub credentials: fn(&BTreeMap<String, String>) -> Result<Credentials>,
    pub connector: fn(&Credentials) -> Result<Box<dyn Connector>>,
    pub dialect: fn() -> Box<dyn SqlDialect>,
}

impl DestinationKind {
    pub const ALL: [DestinationKind; 2] = [DestinationKind::Postgres, DestinationKind::DuckDb];

    pub fn as_str(self) -> &'static str {
        match self {
            DestinationKind::Postgres => "postgres",
            DestinationKind::DuckDb => "duckdb",
        }
    }

    pub fn factories(self) -> AdapterFactories {
        match self {
            DestinationKind::Postgres => AdapterFactories {
                credentials: postgres::credentials,
                connector: |creds| Ok(Box::new(PostgresConnector::new(creds)?) as Box<dyn Connector>),
                dialect: || Box::new(PostgresDialect) as Box<dyn SqlDialect>,
            },
            DestinationKind::DuckDb => AdapterFactories {
                credentials: duckdb::credentials,
                connector: |creds| Ok(Box::new(DuckDbConnector::new(creds)?) as Box<dyn Connector>),
                dialect: || Box::new(DuckDbDialect) as Box<dyn SqlDialect>,
            },
        }
    }
}

impl fmt::Display for DestinationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DestinationKind {
    type Err = WarehouseError;

    fn from_str(value: &str) -> Result<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        DestinationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| WarehouseError::UnknownDestination(value.to_string()))
    }
}

/// Build an adapter for `db_type` from raw profile fields.
pub fn build_adapter(db_type: &str, fields: &BTreeMap<String, String>) -> Result<SqlAdapter> {
    let factories = db_type.parse::<DestinationKind>()?.factories();
    let credentials = (factories.credentials)(fields)?;
    let connector = (factories.connector)(&credentials)?;
    Ok(SqlAdapter::new(connector, (factories.dialect)()))
}
