//! Dataset transformations applied between fetch and load.

pub mod cast;
pub mod cleaner;
pub mod columns;
pub mod datetime;
pub mod error;
mod frame;

pub use cast::{cast_columns, intermediate_dtype};
pub use cleaner::{CleanOptions, camel_to_snake, clean_frame, clean_header};
pub use columns::{exclude_columns, rename_columns};
pub use error::{Result, TransformError};
