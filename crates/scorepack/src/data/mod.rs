//! Tabular data handling.
//!
//! Training data arrives as a JSON array of row objects and is held as a
//! [`Table`] of named columns. Tables drive fill computation
//! ([`crate::impute`]), variable descriptors ([`crate::metadata`]) and batch
//! scoring.

mod table;

pub use table::{Column, ColumnKind, Table};

/// Errors building a [`Table`].
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("decoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON array of row objects")]
    NotAnArray,

    #[error("row {0} is not a JSON object")]
    NotAnObject(usize),

    #[error("column '{name}' mixes numbers and strings (row {row})")]
    MixedTypes { name: String, row: usize },

    #[error("column '{name}' holds an unsupported value at row {row}")]
    UnsupportedValue { name: String, row: usize },

    #[error("column '{name}' has {actual} rows, expected {expected}")]
    RaggedColumn {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),
}
