//! Input/output variable descriptors (`inputVar.json`, `outputVar.json`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::MetadataError;
use crate::data::{Column, Table};

/// Declared length of every decimal variable.
pub const DECIMAL_LENGTH: usize = 8;

/// Measurement level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Continuous numeric.
    Interval,
    /// Numeric with exactly two observed values.
    Binary,
    /// Categorical.
    Nominal,
}

/// Storage type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarType {
    Decimal,
    String,
}

/// One `{name, level, type, length}` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableSpec {
    pub name: String,
    pub level: Level,
    #[serde(rename = "type")]
    pub var_type: VarType,
    pub length: usize,
}

impl VariableSpec {
    /// Interval decimal variable.
    pub fn interval(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: Level::Interval,
            var_type: VarType::Decimal,
            length: DECIMAL_LENGTH,
        }
    }

    /// Binary decimal variable.
    pub fn binary(name: impl Into<String>) -> Self {
        Self {
            level: Level::Binary,
            ..Self::interval(name)
        }
    }

    /// Nominal string variable.
    pub fn nominal(name: impl Into<String>, length: usize) -> Self {
        Self {
            name: name.into(),
            level: Level::Nominal,
            var_type: VarType::String,
            length: length.max(1),
        }
    }

    /// Returns true for decimal variables.
    pub fn is_decimal(&self) -> bool {
        self.var_type == VarType::Decimal
    }
}

/// Describe every column of `table`.
///
/// - text column: nominal string, length = longest observed value
/// - numeric column with exactly two distinct observed values: binary decimal
/// - other numeric column: interval decimal
pub fn variables_from_table(table: &Table) -> Vec<VariableSpec> {
    table
        .columns()
        .map(|(name, column)| describe_column(name, column))
        .collect()
}

fn describe_column(name: &str, column: &Column) -> VariableSpec {
    match column {
        Column::Text(_) => VariableSpec::nominal(name, column.max_text_len()),
        Column::Numeric(_) => {
            let mut distinct: Vec<f64> = Vec::with_capacity(3);
            for v in column.observed_numeric() {
                if !distinct.contains(&v) {
                    distinct.push(v);
                    if distinct.len() > 2 {
                        break;
                    }
                }
            }
            if distinct.len() == 2 {
                VariableSpec::binary(name)
            } else {
                VariableSpec::interval(name)
            }
        }
    }
}

/// Returns true if a typed descriptor declares a string variable.
///
/// Accepts `{"type": "string"}` and tensor descriptors of the form
/// `{"type": "tensor", "tensor-spec": {"dtype": "string"}}`.
pub fn is_string_descriptor(descriptor: &Value) -> bool {
    let ty = descriptor.get("type").and_then(Value::as_str);
    match ty {
        Some("tensor") => descriptor
            .pointer("/tensor-spec/dtype")
            .and_then(Value::as_str)
            .is_some_and(|dtype| dtype == "string"),
        Some(ty) => ty == "string",
        None => false,
    }
}

/// Describe variables from typed `{name, type}` descriptors.
///
/// String descriptors become nominal strings of length 8; everything else is
/// an interval decimal. Descriptors without a name are named by position.
pub fn variables_from_descriptors(
    descriptors: &[Value],
) -> Result<Vec<VariableSpec>, MetadataError> {
    descriptors
        .iter()
        .enumerate()
        .map(|(idx, descriptor)| {
            if !descriptor.is_object() || descriptor.get("type").is_none() {
                return Err(MetadataError::InvalidDescriptor(idx));
            }
            let name = descriptor
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("var_{idx}"));
            Ok(if is_string_descriptor(descriptor) {
                VariableSpec::nominal(name, DECIMAL_LENGTH)
            } else {
                VariableSpec::interval(name)
            })
        })
        .collect()
}
