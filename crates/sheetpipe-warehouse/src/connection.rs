use std::path::Path;

use crate::dialect::ColumnDef;
use crate::error::Result;

/// An open session against the destination.
pub trait WarehouseConnection {
    /// Run one or more statements without results.
    fn execute(&mut self, sql: &str) -> Result<()>;

    /// Run a query returning a single integer, binding `params` as text.
    fn query_count(&mut self, sql: &str, params: &[&str]) -> Result<i64>;

    /// Bulk-load a `|`-delimited staging file into `stage`, whose columns
    /// are `columns`. Empty fields load as NULL.
    fn copy_from_file(&mut self, stage: &str, columns: &[ColumnDef], path: &Path) -> Result<u64>;

    fn close(self: Box<Self>) -> Result<()>;
}

/// Opens connections; one per adapter operation.
pub trait Connector {
    fn connect(&self) -> Result<Box<dyn WarehouseConnection>>;

    /// Human-readable location used in logs, without secrets.
    fn describe(&self) -> String;
}
