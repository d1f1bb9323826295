//! Core row types for representing parsed recipient data

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The full, ordered batch of rows parsed from one upload.
///
/// Header order is significant (it defines display/editing order); header
/// uniqueness is the invariant enforced at construction. A RowSet is
/// immutable once produced and replaced wholesale on re-upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowSet {
    headers: Vec<String>,
    rows: Vec<Row>,
}

/// One recipient's values, positionally aligned with the header list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Row {
    values: Vec<String>,
}

impl RowSet {
    /// Build a RowSet from a header record and raw data records.
    ///
    /// Records shorter than the header list are padded with empty strings
    /// (missing trailing fields). Records longer than the header list fail
    /// with [`Error::ColumnCountMismatch`] naming the 1-based data record
    /// index; extra values are never silently dropped.
    pub fn new(headers: Vec<String>, records: Vec<Vec<String>>) -> Result<Self> {
        let mut seen: HashSet<&str> = HashSet::with_capacity(headers.len());
        for name in &headers {
            if !seen.insert(name.as_str()) {
                return Err(Error::DuplicateHeader { name: name.clone() });
            }
        }

        let width = headers.len();
        let mut rows = Vec::with_capacity(records.len());
        for (idx, mut values) in records.into_iter().enumerate() {
            if values.len() > width {
                return Err(Error::ColumnCountMismatch {
                    row: idx + 1,
                    expected: width,
                    found: values.len(),
                });
            }
            values.resize(width, String::new());
            rows.push(Row { values });
        }

        Ok(Self { headers, rows })
    }

    /// The header list, in parse order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the RowSet holds no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Borrow one row as a header-keyed view
    pub fn row(&self, index: usize) -> Option<RowView<'_>> {
        self.rows.get(index).map(|row| RowView {
            headers: &self.headers,
            values: &row.values,
        })
    }

    /// Iterate rows in order as header-keyed views
    pub fn iter(&self) -> impl Iterator<Item = RowView<'_>> {
        self.rows.iter().map(move |row| RowView {
            headers: &self.headers,
            values: &row.values,
        })
    }
}

impl Row {
    /// The row's values, in header order
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// A borrowed view of one row paired with the shared header list
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    headers: &'a [String],
    values: &'a [String],
}

impl<'a> RowView<'a> {
    /// Look up a value by header name (case-sensitive)
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.headers
            .iter()
            .position(|header| header == name)
            .map(|idx| self.values[idx].as_str())
    }

    /// Iterate (header, value) pairs in header order
    pub fn fields(&self) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.headers
            .iter()
            .zip(self.values)
            .map(|(header, value)| (header.as_str(), value.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_new_pads_short_records() {
        let rowset = RowSet::new(owned(&["a", "b", "c"]), vec![owned(&["1"])]).unwrap();
        let row = rowset.row(0).unwrap();
        assert_eq!(row.get("a"), Some("1"));
        assert_eq!(row.get("b"), Some(""));
        assert_eq!(row.get("c"), Some(""));
    }

    #[test]
    fn test_new_rejects_wide_records() {
        let err = RowSet::new(
            owned(&["a", "b"]),
            vec![owned(&["1", "2"]), owned(&["1", "2", "3"])],
        )
        .unwrap_err();

        match err {
            Error::ColumnCountMismatch {
                row,
                expected,
                found,
            } => {
                assert_eq!(row, 2);
                assert_eq!(expected, 2);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_new_rejects_duplicate_headers() {
        let err = RowSet::new(owned(&["a", "a"]), vec![]).unwrap_err();
        match err {
            Error::DuplicateHeader { name } => assert_eq!(name, "a"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_headers_are_case_sensitive() {
        // "Name" and "name" are distinct columns
        let rowset = RowSet::new(owned(&["Name", "name"]), vec![owned(&["A", "b"])]).unwrap();
        let row = rowset.row(0).unwrap();
        assert_eq!(row.get("Name"), Some("A"));
        assert_eq!(row.get("name"), Some("b"));
    }

    #[test]
    fn test_row_view_fields_preserve_order() {
        let rowset = RowSet::new(owned(&["x", "y"]), vec![owned(&["1", "2"])]).unwrap();
        let fields: Vec<_> = rowset.row(0).unwrap().fields().collect();
        assert_eq!(fields, vec![("x", "1"), ("y", "2")]);
    }

    #[test]
    fn test_row_out_of_range() {
        let rowset = RowSet::new(owned(&["a"]), vec![]).unwrap();
        assert!(rowset.row(0).is_none());
        assert!(rowset.is_empty());
    }
}
