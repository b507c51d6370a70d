//! Loading cleaned datasets into a relational destination.
//!
//! [`SqlAdapter`] owns one connection per operation and drives the
//! `schema -> table -> stage -> copy -> cleanup` sequence. Engines plug in
//! through [`Connector`]/[`WarehouseConnection`] and a [`SqlDialect`];
//! [`DestinationKind`] maps a profile's `db_type` to those pieces.

pub mod adapter;
pub mod connection;
pub mod credentials;
pub mod dialect;
pub mod duckdb;
pub mod error;
pub mod postgres;
pub mod registry;
pub mod staging;

pub use adapter::{Destination, SqlAdapter, TableCheck, TableOutcome, UploadReport};
pub use connection::{Connector, WarehouseConnection};
pub use credentials::{Credentials, FIELD_MAP, canonical_field};
pub use dialect::{ColumnDef, SqlDialect, column_defs};
pub use error::{Result, WarehouseError};
pub use registry::{AdapterFactories, DestinationKind, build_adapter};
pub use staging::StagingFile;
