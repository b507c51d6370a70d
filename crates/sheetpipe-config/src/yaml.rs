use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_yaml::Value;

use crate::error::{ConfigError, Result};

pub(crate) fn read_value(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&text).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn from_value<T: DeserializeOwned>(path: &Path, value: Value) -> Result<T> {
    serde_yaml::from_value(value).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

/// Render a scalar YAML value as the string a driver expects.
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}
