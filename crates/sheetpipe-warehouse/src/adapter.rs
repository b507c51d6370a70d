//! Destination adapter: connection lifecycle, table creation, bulk load and
//! verification.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use polars::prelude::DataFrame;
use sheetpipe_model::{CastType, CreationPolicy, TableTarget};
use sheetpipe_transform::cast_columns;
use tracing::{debug, info, info_span, warn};

use crate::connection::{Connector, WarehouseConnection};
use crate::dialect::{ColumnDef, SqlDialect, column_defs};
use crate::error::{Result, WarehouseError};
use crate::staging::StagingFile;

/// What happened to the destination table during an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableOutcome {
    Created,
    Replaced,
    Appended,
}

impl fmt::Display for TableOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TableOutcome::Created => "created",
            TableOutcome::Replaced => "replaced",
            TableOutcome::Appended => "appended",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReport {
    pub target: TableTarget,
    pub outcome: TableOutcome,
    pub rows: u64,
}

/// Result of a post-load verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCheck {
    pub target: TableTarget,
    pub columns: i64,
    pub rows: i64,
}

/// A place cleaned datasets are pushed to.
pub trait Destination {
    /// Location shown to the user; never contains secrets.
    fn describe(&self) -> String;

    /// Cast `df`, make sure the schema and table exist according to
    /// `policy`, then bulk-load the rows.
    fn upload(
        &mut self,
        df: &DataFrame,
        target: &TableTarget,
        casts: &BTreeMap<String, CastType>,
        policy: CreationPolicy,
    ) -> Result<UploadReport>;

    /// Count columns and rows of `target`; an empty or missing table is an
    /// error.
    fn check_table(&mut self, target: &TableTarget) -> Result<TableCheck>;
}

/// Internal signal that a table could not be created because it exists.
enum CreateTable {
    AlreadyExists,
    Failed(WarehouseError),
}

impl From<WarehouseError> for CreateTable {
    fn from(error: WarehouseError) -> Self {
        CreateTable::Failed(error)
    }
}

/// [`Destination`] over any SQL engine.
///
/// Holds at most one connection. Operations that talk to the database need
/// [`SqlAdapter::acquire_connection`] first; the connection is released
/// when the adapter is dropped.
pub struct SqlAdapter {
    connector: Box<dyn Connector>,
    dialect: Box<dyn SqlDialect>,
    connection: Option<Box<dyn WarehouseConnection>>,
}

impl SqlAdapter {
    pub fn new(connector: Box<dyn Connector>, dialect: Box<dyn SqlDialect>) -> Self {
        Self {
            connector,
            dialect,
            connection: None,
        }
    }

    pub fn dialect(&self) -> &dyn SqlDialect {
        self.dialect.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn acquire_connection(&mut self) -> Result<()> {
        if self.connection.is_none() {
            self.connection = Some(self.connector.connect()?);
        }
        Ok(())
    }

    pub fn release_connection(&mut self) -> Result<()> {
        match self.connection.take() {
            Some(connection) => connection.close(),
            None => Ok(()),
        }
    }

    fn connection(&mut self, operation: &'static str) -> Result<&mut dyn WarehouseConnection> {
        match self.connection.as_deref_mut() {
            Some(connection) => Ok(connection),
            None => Err(WarehouseError::NoAcquiredConnection { operation }),
        }
    }

    /// Create `schema` when `create` is set and it does not exist yet.
    pub fn ensure_schema(&mut self, schema: &str, create: bool) -> Result<()> {
        let check = self.dialect.schema_exists();
        let create_sql = self.dialect.create_schema(schema);
        let connection = self.connection("ensure_schema")?;
        if !create {
            return Ok(());
        }
        if connection.query_count(&check, &[schema])? > 0 {
            debug!(schema, "schema already exists");
            return Ok(());
        }
        info!(schema, "creating schema");
        connection.execute(&create_sql)
    }

    /// Prepare `target` for a load according to `policy`.
    pub fn ensure_table(
        &mut self,
        target: &TableTarget,
        columns: &[ColumnDef],
        policy: CreationPolicy,
    ) -> Result<TableOutcome> {
        self.connection("ensure_table")?;
        if !policy.create_table {
            return Ok(TableOutcome::Appended);
        }
        if policy.destructive_create_table {
            let drop_sql = self.dialect.drop_table(target);
            let create_sql = self.dialect.create_table(target, columns);
            let connection = self.connection("ensure_table")?;
            info!(table = %target, "replacing table");
            connection.execute(&drop_sql)?;
            connection.execute(&create_sql)?;
            return Ok(TableOutcome::Replaced);
        }
        match self.create_table(target, columns) {
            Ok(()) => Ok(TableOutcome::Created),
            Err(CreateTable::AlreadyExists) => {
                warn!(
                    table = %target,
                    "table already exists; appending (set destructive_create_table to replace it)"
                );
                Ok(TableOutcome::Appended)
            }
            Err(CreateTable::Failed(error)) => Err(error),
        }
    }

    fn create_table(
        &mut self,
        target: &TableTarget,
        columns: &[ColumnDef],
    ) -> std::result::Result<(), CreateTable> {
        let check = self.dialect.table_exists();
        let create_sql = self.dialect.create_table(target, columns);
        let connection = self.connection("create_table")?;
        if connection.query_count(&check, &[target.schema.as_str(), target.table.as_str()])? > 0 {
            return Err(CreateTable::AlreadyExists);
        }
        info!(table = %target, "creating table");
        connection.execute(&create_sql)?;
        Ok(())
    }

    /// Stage `staging` and copy it into `target`, returning the count the
    /// engine reports for the copy. The stage is dropped whatever the
    /// outcome.
    pub fn load(
        &mut self,
        staging: &StagingFile,
        target: &TableTarget,
        columns: &[ColumnDef],
    ) -> Result<u64> {
        let stage = target.stage_name();
        let create_stage = self.dialect.create_stage(&stage, columns);
        let drop_stage = self.dialect.drop_stage(&stage);
        let insert = self.dialect.insert_from_stage(target, &stage, columns);
        let quoted_stage = self.dialect.stage_ident(&stage);
        let connection = self.connection("load")?;
        debug!(stage = %stage, rows = staging.rows(), "loading through stage");

        let result = stage_and_copy(
            connection,
            &[drop_stage.as_str(), create_stage.as_str()],
            &quoted_stage,
            columns,
            staging,
            &insert,
        );
        if let Err(error) = connection.execute(&drop_stage) {
            warn!(stage = %stage, %error, "could not drop stage");
        }
        result
    }

    fn upload_connected(
        &mut self,
        target: &TableTarget,
        columns: &[ColumnDef],
        staging: &StagingFile,
        policy: CreationPolicy,
    ) -> Result<UploadReport> {
        self.ensure_schema(&target.schema, policy.create_schema)?;
        let outcome = self.ensure_table(target, columns, policy)?;
        self.load(staging, target, columns)?;
        Ok(UploadReport {
            target: target.clone(),
            outcome,
            rows: staging.rows() as u64,
        })
    }

    fn count_connected(&mut self, target: &TableTarget) -> Result<(i64, i64)> {
        let column_sql = self.dialect.column_count();
        let row_sql = self.dialect.row_count(target);
        let connection = self.connection("check_table")?;
        let columns = connection.query_count(&column_sql, &[target.schema.as_str(), target.table.as_str()])?;
        let rows = match connection.query_count(&row_sql, &[]) {
            Ok(rows) => rows,
            Err(error) => {
                debug!(table = %target, %error, "row count failed");
                0
            }
        };
        Ok((columns, rows))
    }
}

fn stage_and_copy(
    connection: &mut dyn WarehouseConnection,
    prepare: &[&str],
    stage: &str,
    columns: &[ColumnDef],
    staging: &StagingFile,
    insert: &str,
) -> Result<u64> {
    for sql in prepare {
        connection.execute(sql)?;
    }
    let copied = connection.copy_from_file(stage, columns, staging.path())?;
    debug!(stage, copied, "staging file copied");
    connection.execute(insert)?;
    Ok(copied)
}

impl Destination for SqlAdapter {
    fn describe(&self) -> String {
        self.connector.describe()
    }

    fn upload(
        &mut self,
        df: &DataFrame,
        target: &TableTarget,
        casts: &BTreeMap<String, CastType>,
        policy: CreationPolicy,
    ) -> Result<UploadReport> {
        let _span = info_span!("upload", table = %target, engine = self.dialect.name()).entered();
        let cast = cast_columns(df, casts)?;
        let names: Vec<String> = cast
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect();
        let columns = column_defs(self.dialect.as_ref(), &names, casts);
        let dates: BTreeSet<String> = casts
            .iter()
            .filter(|(_, cast)| **cast == CastType::Date)
            .map(|(name, _)| name.clone())
            .collect();
        let staging = StagingFile::write(&cast, &dates)?;

        self.acquire_connection()?;
        let result = self.upload_connected(target, &columns, &staging, policy);
        let released = self.release_connection();
        let report = result?;
        released?;
        info!(table = %target, rows = report.rows, outcome = %report.outcome, "upload finished");
        Ok(report)
    }

    fn check_table(&mut self, target: &TableTarget) -> Result<TableCheck> {
        self.acquire_connection()?;
        let counted = self.count_connected(target);
        let released = self.release_connection();
        let (columns, rows) = counted?;
        released?;
        if columns == 0 || rows == 0 {
            return Err(WarehouseError::TableDoesNotExist {
                table: target.to_string(),
                columns,
                rows,
            });
        }
        info!(table = %target, columns, rows, "table verified");
        Ok(TableCheck {
            target: target.clone(),
            columns,
            rows,
        })
    }
}

impl Drop for SqlAdapter {
    fn drop(&mut self) {
        if let Some(connection) = self.connection.take() {
            if let Err(error) = connection.close() {
                debug!(%error, "closing connection on drop failed");
            }
        }
    }
}
