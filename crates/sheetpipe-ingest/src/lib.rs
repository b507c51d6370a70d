//! Spreadsheet ingestion.
//!
//! A [`SheetSource`] returns a [`SheetTable`] of strings whose first row was
//! the header row. [`retry_with`] repeats a fetch while it fails with a
//! transient API error.

pub mod error;
pub mod google;
pub mod retry;
pub mod source;
pub mod table;

pub use error::{FetchError, Result};
pub use google::{GoogleAuth, GoogleSheetsClient};
pub use retry::{RetryPolicy, retry_with};
pub use source::{SheetRequest, SheetSource};
pub use table::SheetTable;
