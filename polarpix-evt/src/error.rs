//! Event-file error types.

use thiserror::Error;

/// Result type for event-file operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Event-file error types.
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File does not start with the event-file magic.
    #[error("bad magic: expected \"PXF1\", found {found:?}")]
    BadMagic { found: [u8; 4] },

    /// File shorter than its header or column layout claims.
    #[error("truncated file: need {expected} bytes, have {actual}")]
    Truncated { expected: usize, actual: usize },

    /// Header JSON could not be parsed or serialized.
    #[error("header error: {0}")]
    Header(#[from] serde_json::Error),

    /// Structurally invalid file contents.
    #[error("invalid file format: {0}")]
    InvalidFormat(String),

    /// A required extension is absent.
    #[error("missing extension: {name}")]
    MissingExtension { name: String },

    /// A required column is absent.
    #[error("missing column: {name}")]
    MissingColumn { name: String },

    /// A required header keyword is absent.
    #[error("missing header keyword: {name}")]
    MissingKeyword { name: String },

    /// A column holds a different data type than requested.
    #[error("column {name} is not of type {expected}")]
    ColumnType {
        name: String,
        expected: &'static str,
    },

    /// A column with this name already exists.
    #[error("duplicate column: {name}")]
    DuplicateColumn { name: String },

    /// A column's length disagrees with the table's row count.
    #[error("column {name} has {len} rows, table has {rows}")]
    ColumnLength {
        name: String,
        len: usize,
        rows: usize,
    },

    /// A row index lies outside the table.
    #[error("row index {row} out of range for table with {rows} rows")]
    RowOutOfRange { row: usize, rows: usize },

    /// Core library error.
    #[error("core error: {0}")]
    Core(#[from] polarpix_core::Error),
}
