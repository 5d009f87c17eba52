//! Column-oriented table of named features.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde_json::{Map, Value};

use super::TableError;

/// Logical column kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    /// Decimal values. Missing: `None` or `NaN`.
    Numeric,
    /// Character values. Missing: `None`.
    Text,
}

impl ColumnKind {
    /// Returns true if this is a numeric column.
    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnKind::Numeric)
    }
}

/// Column storage.
#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl Column {
    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    /// Returns true if the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Logical kind.
    pub fn kind(&self) -> ColumnKind {
        match self {
            Column::Numeric(_) => ColumnKind::Numeric,
            Column::Text(_) => ColumnKind::Text,
        }
    }

    /// Numeric values, if this is a numeric column.
    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match self {
            Column::Numeric(v) => Some(v),
            Column::Text(_) => None,
        }
    }

    /// Observed (non-missing, non-NaN) numeric values.
    pub fn observed_numeric(&self) -> impl Iterator<Item = f64> + '_ {
        self.as_numeric()
            .unwrap_or(&[])
            .iter()
            .filter_map(|v| v.filter(|x| !x.is_nan()))
    }

    /// Longest text value in characters (0 for numeric columns).
    pub fn max_text_len(&self) -> usize {
        match self {
            Column::Numeric(_) => 0,
            Column::Text(v) => v
                .iter()
                .flatten()
                .map(|s| s.chars().count())
                .max()
                .unwrap_or(0),
        }
    }
}

/// Ordered collection of equally long named columns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column.
    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        column: Column,
    ) -> Result<(), TableError> {
        let name = name.into();
        if self.names.contains(&name) {
            return Err(TableError::DuplicateColumn(name));
        }
        if self.columns.is_empty() {
            self.n_rows = column.len();
        } else if self.n_rows != column.len() {
            return Err(TableError::RaggedColumn {
                name,
                expected: self.n_rows,
                actual: column.len(),
            });
        }
        self.names.push(name);
        self.columns.push(column);
        Ok(())
    }

    /// Builder-style [`push_column`](Self::push_column).
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        column: Column,
    ) -> Result<Self, TableError> {
        self.push_column(name, column)?;
        Ok(self)
    }

    // =========================================================================
    // JSON records
    // =========================================================================

    /// Build a table from a JSON array of row objects.
    ///
    /// Column order is the order in which keys are first seen. A key absent
    /// from a row is a missing value. A column whose values are all `null`
    /// is numeric.
    pub fn from_records(records: &[Value]) -> Result<Self, TableError> {
        let rows: Vec<&Map<String, Value>> = records
            .iter()
            .enumerate()
            .map(|(i, v)| v.as_object().ok_or(TableError::NotAnObject(i)))
            .collect::<Result<_, _>>()?;

        let mut names: Vec<&str> = Vec::new();
        let mut seen = HashSet::new();
        for row in &rows {
            for key in row.keys() {
                if seen.insert(key.as_str()) {
                    names.push(key.as_str());
                }
            }
        }

        let mut table = Table {
            n_rows: rows.len(),
            ..Table::default()
        };
        for name in names {
            let values: Vec<&Value> = rows
                .iter()
                .map(|row| row.get(name).unwrap_or(&Value::Null))
                .collect();
            table.push_column(name, column_from_values(name, &values)?)?;
        }
        Ok(table)
    }

    /// Parse a JSON array of row objects.
    pub fn from_json_str(json: &str) -> Result<Self, TableError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Read a JSON array of row objects.
    pub fn read_json<R: Read>(reader: R) -> Result<Self, TableError> {
        let value: Value = serde_json::from_reader(reader)?;
        Self::from_value(&value)
    }

    /// Load a JSON array of row objects from a file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let file = File::open(path)?;
        Self::read_json(BufReader::new(file))
    }

    fn from_value(value: &Value) -> Result<Self, TableError> {
        let records = value.as_array().ok_or(TableError::NotAnArray)?;
        Self::from_records(records)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of rows. Rows without any keys still count.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Column names in order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| &self.columns[idx])
    }

    /// Iterate `(name, column)` pairs in order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter())
    }

    /// Copy of this table without the named columns.
    pub fn without(&self, drop: &[&str]) -> Table {
        let (names, columns) = self
            .columns()
            .filter(|(name, _)| !drop.contains(name))
            .map(|(name, col)| (name.to_string(), col.clone()))
            .unzip();
        Table {
            names,
            columns,
            n_rows: self.n_rows,
        }
    }
}

fn column_from_values(name: &str, values: &[&Value]) -> Result<Column, TableError> {
    let mut kind: Option<ColumnKind> = None;
    for (row, value) in values.iter().enumerate() {
        let this = match value {
            Value::Null => continue,
            Value::Number(_) => ColumnKind::Numeric,
            Value::String(_) => ColumnKind::Text,
            _ => {
                return Err(TableError::UnsupportedValue {
                    name: name.to_string(),
                    row,
                })
            }
        };
        match kind {
            None => kind = Some(this),
            Some(k) if k != this => {
                return Err(TableError::MixedTypes {
                    name: name.to_string(),
                    row,
                })
            }
            Some(_) => {}
        }
    }

    Ok(match kind.unwrap_or(ColumnKind::Numeric) {
        ColumnKind::Numeric => Column::Numeric(values.iter().map(|v| v.as_f64()).collect()),
        ColumnKind::Text => Column::Text(
            values
                .iter()
                .map(|v| v.as_str().map(str::to_string))
                .collect(),
        ),
    })
}
