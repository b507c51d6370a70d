use thiserror::Error;

use sheetpipe_transform::TransformError;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum WarehouseError {
    /// Any transport, staging, or copy failure.
    #[error("database error while {action}: {source}")]
    Database {
        action: String,
        #[source]
        source: BoxError,
    },
    #[error(
        "no acquired connection for {operation}; call acquire_connection() first"
    )]
    NoAcquiredConnection { operation: &'static str },
    #[error("table {table} seems empty or missing (columns: {columns}, rows: {rows})")]
    TableDoesNotExist {
        table: String,
        columns: i64,
        rows: i64,
    },
    #[error("missing {kind} credential fields: {}", .missing.join(", "))]
    CredentialsParsing {
        kind: &'static str,
        missing: Vec<String>,
    },
    #[error("invalid value for credential field '{field}': {reason}")]
    InvalidCredential { field: String, reason: String },
    #[error("unknown db_type '{0}'; expected one of: postgres, duckdb")]
    UnknownDestination(String),
    #[error(transparent)]
    Cast(#[from] TransformError),
}

impl WarehouseError {
    pub fn database(action: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Database {
            action: action.into(),
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WarehouseError>;
