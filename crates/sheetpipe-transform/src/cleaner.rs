//! Header and field normalization.
//!
//! Header rules, applied in order:
//!
//! 1. optional camelCase to snake_case conversion
//! 2. every character outside the allow-list becomes the separator
//! 3. separator runs collapse; leading digits and separators are stripped,
//!    as are trailing separators
//! 4. columns whose name ends up empty are dropped
//! 5. names are lowercased
//!
//! Fields: string cells are trimmed and empty strings become null.
//!
//! Cleaning a frame that is already clean returns it unchanged.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use polars::prelude::{Column, DataFrame, DataType, IntoColumn, NamedFrom, Series};
use regex::Regex;
use tracing::debug;

use crate::error::{Result, TransformError};
use crate::frame::{rebuild, renamed};

/// Acronym followed by a capitalised word, e.g. `HTTPValue`.
static ACRONYM_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").expect("Invalid acronym regex"));
static CASE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z\d])([A-Z])").expect("Invalid case boundary regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanOptions {
    pub snake_case_camel: bool,
    pub separator: char,
    /// Literal characters kept on top of ASCII alphanumerics.
    pub allowed: Vec<char>,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            snake_case_camel: false,
            separator: '_',
            allowed: Vec::new(),
        }
    }
}

impl CleanOptions {
    #[must_use]
    pub fn with_snake_case_camel(mut self, enable: bool) -> Self {
        self.snake_case_camel = enable;
        self
    }
}

/// `OrderID` -> `order_id`, `someHTTPValue` -> `some_http_value`.
pub fn camel_to_snake(name: &str) -> String {
    let split = ACRONYM_BOUNDARY.replace_all(name, "${1}_${2}");
    let split = CASE_BOUNDARY.replace_all(&split, "${1}_${2}");
    split.replace('-', "_").to_lowercase()
}

pub fn clean_header(raw: &str, options: &CleanOptions) -> String {
    let name = if options.snake_case_camel {
        camel_to_snake(raw)
    } else {
        raw.to_string()
    };
    let separator = options.separator;
    let mut collapsed = String::with_capacity(name.len());
    let mut previous_was_separator = false;
    for ch in name.chars() {
        let keep = ch.is_ascii_alphanumeric() || options.allowed.contains(&ch);
        let ch = if keep { ch } else { separator };
        if ch == separator {
            if !previous_was_separator {
                collapsed.push(ch);
            }
            previous_was_separator = true;
        } else {
            collapsed.push(ch);
            previous_was_separator = false;
        }
    }
    collapsed
        .trim_start_matches(|ch: char| ch.is_ascii_digit() || ch == separator)
        .trim_end_matches(separator)
        .trim()
        .to_lowercase()
}

/// Clean headers and string fields of `df`.
pub fn clean_frame(df: &DataFrame, options: &CleanOptions) -> Result<DataFrame> {
    let mut columns = Vec::with_capacity(df.width());
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    for column in df.get_columns() {
        let name = clean_header(column.name(), options);
        if name.is_empty() {
            debug!(column = %column.name(), "dropping column with empty cleaned name");
            continue;
        }
        *seen.entry(name.clone()).or_default() += 1;
        let column = if column.dtype() == &DataType::String {
            clean_strings(column.as_materialized_series(), &name)?
        } else {
            renamed(column, &name)
        };
        columns.push(column);
    }
    let duplicates: Vec<String> = seen
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(name, _)| name)
        .collect();
    if !duplicates.is_empty() {
        return Err(TransformError::DuplicateColumns(duplicates));
    }
    rebuild(columns)
}

fn clean_strings(series: &Series, name: &str) -> Result<Column> {
    let values: Vec<Option<&str>> = series
        .str()?
        .into_iter()
        .map(|value| value.map(str::trim).filter(|value| !value.is_empty()))
        .collect();
    Ok(Series::new(name.into(), values).into_column())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(raw: &str) -> String {
        clean_header(raw, &CleanOptions::default())
    }

    #[test]
    fn strips_leading_numbering() {
        assert_eq!(clean("1. col one"), "col_one");
        assert_eq!(clean("12) Total / Net?"), "total_net");
    }

    #[test]
    fn replaces_and_collapses_separators() {
        assert_eq!(clean("  col   b  "), "col_b");
        assert_eq!(clean("a/b.c?d"), "a_b_c_d");
        assert_eq!(clean("__x__"), "x");
        assert_eq!(clean("Price (€)"), "price");
    }

    #[test]
    fn symbol_only_headers_become_empty() {
        assert_eq!(clean("???"), "");
        assert_eq!(clean("2024"), "");
    }

    #[test]
    fn allowed_characters_survive() {
        let options = CleanOptions {
            allowed: vec!['$'],
            ..CleanOptions::default()
        };
        assert_eq!(clean_header("cost $", &options), "cost_$");
    }

    #[test]
    fn camel_case_conversion() {
        assert_eq!(camel_to_snake("OrderID"), "order_id");
        assert_eq!(camel_to_snake("someHTTPValue"), "some_http_value");
        assert_eq!(camel_to_snake("already_snake"), "already_snake");
        let options = CleanOptions::default().with_snake_case_camel(true);
        assert_eq!(clean_header("CustomerName", &options), "customer_name");
        assert_eq!(clean("CustomerName"), "customername");
    }
}
