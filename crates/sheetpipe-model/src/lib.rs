pub mod column;
pub mod datatype;
pub mod error;
pub mod target;

pub use column::{ColumnSpec, SheetColumns};
pub use datatype::{CastType, DeclaredType, NUMERIC_PRECISION, NUMERIC_SCALE};
pub use error::{ModelError, Result};
pub use target::{CreationPolicy, TableTarget};
