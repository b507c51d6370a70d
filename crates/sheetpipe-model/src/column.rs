use serde::{Deserialize, Serialize};

use crate::datatype::DeclaredType;

/// One configured column.
///
/// `identifier` is the raw sheet header; when present and different from
/// `name` the column is renamed before cleanup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    pub datatype: DeclaredType,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, datatype: DeclaredType) -> Self {
        Self {
            name: name.into(),
            identifier: None,
            datatype,
        }
    }

    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Raw header that must be renamed, if any.
    pub fn rename_source(&self) -> Option<&str> {
        self.identifier
            .as_deref()
            .filter(|identifier| *identifier != self.name)
    }
}

/// Per-sheet column instructions after configuration has been validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetColumns {
    pub columns: Vec<ColumnSpec>,
    pub excluded: Vec<String>,
    pub snake_case_camel: bool,
}
