use std::fmt;

use serde::{Deserialize, Serialize};

/// Fully resolved destination table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableTarget {
    pub schema: String,
    pub table: String,
}

impl TableTarget {
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
        }
    }

    /// Name of the temporary stage used while loading this table.
    pub fn stage_name(&self) -> String {
        format!("{}_stg", self.table)
    }
}

impl fmt::Display for TableTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.table)
    }
}

/// Which destination objects a run may create.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreationPolicy {
    pub create_schema: bool,
    pub create_table: bool,
    /// Replace an existing table instead of appending to it.
    pub destructive_create_table: bool,
}
