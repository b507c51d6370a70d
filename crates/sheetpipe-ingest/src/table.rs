use std::collections::BTreeMap;

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, PolarsResult, Series};

use crate::error::{FetchError, Result};

/// Raw sheet contents: the header row and every data row, as strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SheetTable {
    /// Build a table whose first row holds the headers.
    ///
    /// Ragged rows are padded with empty strings; data wider than the header
    /// row gets empty headers so the caller can reject it.
    pub fn from_values(values: Vec<Vec<String>>) -> Result<Self> {
        let mut values = values.into_iter();
        let Some(headers) = values.next() else {
            return Ok(Self::default());
        };
        Self::new(headers, values.collect())
    }

    /// Fails with [`FetchError::DuplicateHeaders`] when a non-empty header repeats.
    pub fn new(mut headers: Vec<String>, mut rows: Vec<Vec<String>>) -> Result<Self> {
        let duplicates = duplicate_headers(&headers);
        if !duplicates.is_empty() {
            return Err(FetchError::DuplicateHeaders(duplicates));
        }
        let width = rows
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(0)
            .max(headers.len());
        headers.resize(width, String::new());
        for row in &mut rows {
            row.resize(width, String::new());
        }
        Ok(Self { headers, rows })
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Zero-based positions of headers that are blank once trimmed.
    pub fn empty_header_positions(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .filter(|(_, header)| header.trim().is_empty())
            .map(|(idx, _)| idx)
            .collect()
    }

    /// One string column per header.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let columns: Vec<Column> = self
            .headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                let values: Vec<&str> = self
                    .rows
                    .iter()
                    .map(|row| row.get(idx).map_or("", String::as_str))
                    .collect();
                Series::new(header.as_str().into(), values).into_column()
            })
            .collect();
        DataFrame::new(columns)
    }
}

/// Non-empty headers appearing more than once, in first-seen order.
pub fn duplicate_headers(headers: &[String]) -> Vec<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for header in headers.iter().filter(|header| !header.is_empty()) {
        *counts.entry(header.as_str()).or_default() += 1;
    }
    let mut duplicates = Vec::new();
    for header in headers {
        if counts.get(header.as_str()).is_some_and(|count| *count > 1)
            && !duplicates.contains(header)
        {
            duplicates.push(header.clone());
        }
    }
    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    #[test]
    fn duplicate_non_empty_headers_fail() {
        let err = SheetTable::from_values(vec![strings(&["a", "b", "a", "", ""])]).unwrap_err();
        match err {
            FetchError::DuplicateHeaders(names) => assert_eq!(names, strings(&["a"])),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn headers_differing_in_case_are_distinct() {
        let table = SheetTable::from_values(vec![strings(&["Col", "col", "col "])]).unwrap();
        assert_eq!(table.width(), 3);
    }

    #[test]
    fn ragged_rows_are_padded() {
        let table = SheetTable::from_values(vec![
            strings(&["a", "b"]),
            strings(&["1"]),
            strings(&["2", "3", "4"]),
        ])
        .unwrap();
        assert_eq!(table.headers, strings(&["a", "b", ""]));
        assert_eq!(table.rows[0], strings(&["1", "", ""]));
        assert_eq!(table.empty_header_positions(), vec![2]);
    }

    #[test]
    fn empty_sheet_has_no_columns() {
        let table = SheetTable::from_values(Vec::new()).unwrap();
        assert_eq!(table.width(), 0);
        assert_eq!(table.height(), 0);
    }

    #[test]
    fn converts_to_string_frame() {
        let table = SheetTable::from_values(vec![
            strings(&["a", "b"]),
            strings(&["x", "y"]),
            strings(&["z", ""]),
        ])
        .unwrap();
        let df = table.to_dataframe().unwrap();
        assert_eq!(df.shape(), (2, 2));
        let b = df.column("b").unwrap().str().unwrap();
        assert_eq!(b.get(0), Some("y"));
        assert_eq!(b.get(1), Some(""));
    }
}
