//! Destination credentials taken from a profile output.

use std::collections::BTreeMap;

use crate::error::{Result, WarehouseError};

/// Wire-name to canonical-field table for profile keys.
pub const FIELD_MAP: &[(&str, &str)] = &[("schema", "target_schema")];

/// Canonical field name for a profile key.
pub fn canonical_field(wire: &str) -> &str {
    FIELD_MAP
        .iter()
        .find(|(from, _)| *from == wire)
        .map_or(wire, |(_, to)| to)
}

/// Validated connection settings for one destination kind.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub kind: &'static str,
    pub target_schema: String,
    fields: BTreeMap<String, String>,
}

impl Credentials {
    /// Check that every key in `required` (wire names) is present and
    /// non-empty, then store the fields under their canonical names.
    pub fn parse(
        kind: &'static str,
        raw: &BTreeMap<String, String>,
        required: &[&str],
    ) -> Result<Self> {
        let mut missing: Vec<String> = required
            .iter()
            .filter(|key| raw.get(**key).is_none_or(|value| value.trim().is_empty()))
            .map(|key| (*key).to_string())
            .collect();
        missing.sort();
        if !missing.is_empty() {
            return Err(WarehouseError::CredentialsParsing { kind, missing });
        }
        let fields: BTreeMap<String, String> = raw
            .iter()
            .map(|(key, value)| (canonical_field(key).to_string(), value.clone()))
            .collect();
        let target_schema = fields.get("target_schema").cloned().unwrap_or_default();
        Ok(Self {
            kind,
            target_schema,
            fields,
        })
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(canonical_field(field)).map(String::as_str)
    }

    /// Required field; absence is reported as missing credentials.
    pub fn require(&self, field: &str) -> Result<&str> {
        self.get(field)
            .ok_or_else(|| WarehouseError::CredentialsParsing {
                kind: self.kind,
                missing: vec![field.to_string()],
            })
    }

    /// Required field parsed with `FromStr`.
    pub fn parsed<T>(&self, field: &str) -> Result<T>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.require(field)?;
        raw.trim()
            .parse()
            .map_err(|error: T::Err| WarehouseError::InvalidCredential {
                field: field.to_string(),
                reason: error.to_string(),
            })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("kind", &self.kind)
            .field("target_schema", &self.target_schema)
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .finish()
    }
}
