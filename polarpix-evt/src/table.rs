//! Columnar tables.
//!
//! A table is an ordered set of named, equal-length columns. Rows only
//! exist implicitly; every operation that matters here (subsetting,
//! appending a tag column) sweeps whole columns, so the storage is
//! columnar throughout.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Column element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dtype {
    /// 64-bit float.
    F64,
    /// 32-bit float.
    F32,
    /// 32-bit signed integer.
    I32,
    /// 8-bit unsigned integer.
    U8,
}

impl Dtype {
    /// Returns the element size in bytes.
    #[must_use]
    pub fn size(self) -> usize {
        match self {
            Dtype::F64 => 8,
            Dtype::F32 | Dtype::I32 => 4,
            Dtype::U8 => 1,
        }
    }

    /// Returns the type name used in headers and error messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Dtype::F64 => "f64",
            Dtype::F32 => "f32",
            Dtype::I32 => "i32",
            Dtype::U8 => "u8",
        }
    }
}

/// The values of one column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// 64-bit float values.
    F64(Vec<f64>),
    /// 32-bit float values.
    F32(Vec<f32>),
    /// 32-bit signed integer values.
    I32(Vec<i32>),
    /// 8-bit unsigned integer values.
    U8(Vec<u8>),
}

impl ColumnData {
    /// Returns the number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            ColumnData::F64(v) => v.len(),
            ColumnData::F32(v) => v.len(),
            ColumnData::I32(v) => v.len(),
            ColumnData::U8(v) => v.len(),
        }
    }

    /// Returns true if the column holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the element type.
    #[must_use]
    pub fn dtype(&self) -> Dtype {
        match self {
            ColumnData::F64(_) => Dtype::F64,
            ColumnData::F32(_) => Dtype::F32,
            ColumnData::I32(_) => Dtype::I32,
            ColumnData::U8(_) => Dtype::U8,
        }
    }

    /// Gathers the values at `rows`, preserving the element type.
    ///
    /// An empty `rows` yields an empty column of the same type.
    ///
    /// # Panics
    /// Panics if any row index is out of range; callers validate through
    /// [`Table::select_rows`].
    #[must_use]
    pub fn select(&self, rows: &[usize]) -> ColumnData {
        match self {
            ColumnData::F64(v) => ColumnData::F64(rows.iter().map(|&r| v[r]).collect()),
            ColumnData::F32(v) => ColumnData::F32(rows.iter().map(|&r| v[r]).collect()),
            ColumnData::I32(v) => ColumnData::I32(rows.iter().map(|&r| v[r]).collect()),
            ColumnData::U8(v) => ColumnData::U8(rows.iter().map(|&r| v[r]).collect()),
        }
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name, unique within its table.
    pub name: String,
    /// Column values.
    pub data: ColumnData,
}

/// An ordered set of named, equal-length columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Creates an empty table with no columns.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of rows (zero for a column-less table).
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.data.len())
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the table holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0
    }

    /// Returns the columns in insertion order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Appends a column.
    ///
    /// # Errors
    /// Returns [`Error::DuplicateColumn`] if the name is taken, or
    /// [`Error::ColumnLength`] if the length disagrees with existing
    /// columns.
    pub fn push_column(&mut self, name: &str, data: ColumnData) -> Result<()> {
        if self.has_column(name) {
            return Err(Error::DuplicateColumn {
                name: name.to_string(),
            });
        }
        if !self.columns.is_empty() && data.len() != self.n_rows() {
            return Err(Error::ColumnLength {
                name: name.to_string(),
                len: data.len(),
                rows: self.n_rows(),
            });
        }
        self.columns.push(Column {
            name: name.to_string(),
            data,
        });
        Ok(())
    }

    /// Returns true if a column with this name exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Returns the column with this name.
    ///
    /// # Errors
    /// Returns [`Error::MissingColumn`].
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| Error::MissingColumn {
                name: name.to_string(),
            })
    }

    /// Returns a column's values as `&[f64]`.
    ///
    /// # Errors
    /// Fails if the column is absent or holds another type.
    pub fn f64s(&self, name: &str) -> Result<&[f64]> {
        match &self.column(name)?.data {
            ColumnData::F64(v) => Ok(v),
            _ => Err(Error::ColumnType {
                name: name.to_string(),
                expected: Dtype::F64.name(),
            }),
        }
    }

    /// Returns a column's values as `&[f32]`.
    ///
    /// # Errors
    /// Fails if the column is absent or holds another type.
    pub fn f32s(&self, name: &str) -> Result<&[f32]> {
        match &self.column(name)?.data {
            ColumnData::F32(v) => Ok(v),
            _ => Err(Error::ColumnType {
                name: name.to_string(),
                expected: Dtype::F32.name(),
            }),
        }
    }

    /// Returns a column's values as `&[i32]`.
    ///
    /// # Errors
    /// Fails if the column is absent or holds another type.
    pub fn i32s(&self, name: &str) -> Result<&[i32]> {
        match &self.column(name)?.data {
            ColumnData::I32(v) => Ok(v),
            _ => Err(Error::ColumnType {
                name: name.to_string(),
                expected: Dtype::I32.name(),
            }),
        }
    }

    /// Returns a column's values as `&[u8]`.
    ///
    /// # Errors
    /// Fails if the column is absent or holds another type.
    pub fn u8s(&self, name: &str) -> Result<&[u8]> {
        match &self.column(name)?.data {
            ColumnData::U8(v) => Ok(v),
            _ => Err(Error::ColumnType {
                name: name.to_string(),
                expected: Dtype::U8.name(),
            }),
        }
    }

    /// Builds a new table from the given rows, in the given order.
    ///
    /// Column names, types and order are preserved. An empty `rows` is
    /// valid and yields a zero-row table with the full column set.
    ///
    /// # Errors
    /// Returns [`Error::RowOutOfRange`] for any index past the last row.
    pub fn select_rows(&self, rows: &[usize]) -> Result<Table> {
        let n_rows = self.n_rows();
        if let Some(&bad) = rows.iter().find(|&&r| r >= n_rows) {
            return Err(Error::RowOutOfRange { row: bad, rows: n_rows });
        }
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                data: c.data.select(rows),
            })
            .collect();
        Ok(Table { columns })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        let mut table = Table::new();
        table
            .push_column("TIME", ColumnData::F64(vec![1.0, 2.0, 3.0]))
            .unwrap();
        table
            .push_column("PI", ColumnData::F32(vec![50.0, 80.0, 120.0]))
            .unwrap();
        table
            .push_column("NUM_PIX", ColumnData::I32(vec![40, 90, 200]))
            .unwrap();
        table
    }

    #[test]
    fn test_shape_and_access() {
        let table = sample_table();
        assert_eq!(table.n_rows(), 3);
        assert_eq!(table.n_columns(), 3);
        assert_eq!(table.f64s("TIME").unwrap(), &[1.0, 2.0, 3.0]);
        assert_eq!(table.i32s("NUM_PIX").unwrap(), &[40, 90, 200]);
    }

    #[test]
    fn test_rejects_duplicate_column() {
        let mut table = sample_table();
        let err = table
            .push_column("TIME", ColumnData::F64(vec![0.0, 0.0, 0.0]))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateColumn { .. }));
    }

    #[test]
    fn test_rejects_length_mismatch() {
        let mut table = sample_table();
        let err = table
            .push_column("EXTRA", ColumnData::U8(vec![1]))
            .unwrap_err();
        assert!(matches!(err, Error::ColumnLength { .. }));
    }

    #[test]
    fn test_column_type_mismatch() {
        let table = sample_table();
        let err = table.f64s("PI").unwrap_err();
        assert!(matches!(err, Error::ColumnType { .. }));
    }

    #[test]
    fn test_select_rows_preserves_schema_and_order() {
        let table = sample_table();
        let subset = table.select_rows(&[2, 0]).unwrap();
        assert_eq!(subset.n_rows(), 2);
        assert_eq!(subset.n_columns(), 3);
        assert_eq!(subset.f64s("TIME").unwrap(), &[3.0, 1.0]);
        assert_eq!(subset.f32s("PI").unwrap(), &[120.0, 50.0]);
    }

    #[test]
    fn test_select_rows_empty_is_valid() {
        let table = sample_table();
        let subset = table.select_rows(&[]).unwrap();
        assert_eq!(subset.n_rows(), 0);
        assert_eq!(subset.n_columns(), 3);
        assert!(subset.is_empty());
        assert!(subset.has_column("PI"));
    }

    #[test]
    fn test_select_rows_out_of_range() {
        let table = sample_table();
        let err = table.select_rows(&[0, 3]).unwrap_err();
        assert!(matches!(err, Error::RowOutOfRange { row: 3, .. }));
    }
}
