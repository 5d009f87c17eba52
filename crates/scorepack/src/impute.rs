//! Missing-value fills.
//!
//! Every scored input has a fill: the value substituted when the caller's
//! value is missing or not a number. Fills are computed from training data:
//!
//! - numeric column whose values are all `0` or `1`, with no gaps: the mode
//!   (ties resolve to `0`)
//! - any other numeric column: the mean of the observed values. A 0/1
//!   column with a missing value lands here.
//! - text column: [`Fill::Text`] (not scorable by a linear model)
//!
//! Substitution never fails. `NaN`, `null`, absent values and values of the
//! wrong JSON type all resolve to the fill. Infinite numbers are numbers
//! and pass through unchanged.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::{Column, Table};

// =============================================================================
// Raw values
// =============================================================================

/// A raw input value as handed to a scorer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FeatureValue {
    /// No value supplied.
    #[default]
    Missing,
    /// A number (may be `NaN`).
    Number(f64),
    /// A value of some other type (text, boolean, nested JSON).
    Other,
}

impl FeatureValue {
    /// Returns true if this value will be replaced by the fill.
    #[inline]
    pub fn is_missing(&self) -> bool {
        !matches!(self, FeatureValue::Number(x) if !x.is_nan())
    }

    /// The value to score with: the number itself, or `fill`.
    #[inline]
    pub fn resolve(self, fill: f64) -> f64 {
        match self {
            FeatureValue::Number(x) if !x.is_nan() => x,
            _ => fill,
        }
    }
}

impl From<f64> for FeatureValue {
    fn from(value: f64) -> Self {
        FeatureValue::Number(value)
    }
}

impl From<Option<f64>> for FeatureValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(FeatureValue::Missing, FeatureValue::Number)
    }
}

impl From<&Value> for FeatureValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => FeatureValue::Missing,
            Value::Number(n) => n.as_f64().map_or(FeatureValue::Other, FeatureValue::Number),
            _ => FeatureValue::Other,
        }
    }
}

// =============================================================================
// Fills
// =============================================================================

/// Fallback for one input variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fill {
    /// Numeric fallback.
    Numeric(f64),
    /// Text variable; the fallback is the empty string.
    Text,
}

impl Fill {
    /// Numeric fallback, if any.
    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            Fill::Numeric(v) => Some(*v),
            Fill::Text => None,
        }
    }
}

/// Errors computing fills.
#[derive(Debug, thiserror::Error)]
pub enum ImputeError {
    #[error("column '{0}' not found in training data")]
    UnknownColumn(String),

    #[error("column '{0}' has no observed values to compute a fill from")]
    NoObservedValues(String),

    #[error("fill for '{name}' is not finite: {value}")]
    NonFiniteFill { name: String, value: f64 },
}

/// Ordered fills for a list of input variables.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Imputer {
    names: Vec<String>,
    fills: Vec<Fill>,
}

impl Imputer {
    /// Compute fills for the named columns of `table`, in the given order.
    pub fn fit(table: &Table, names: &[&str]) -> Result<Self, ImputeError> {
        let mut imputer = Imputer::default();
        for &name in names {
            let column = table
                .column(name)
                .ok_or_else(|| ImputeError::UnknownColumn(name.to_string()))?;
            imputer.names.push(name.to_string());
            imputer.fills.push(fill_for(name, column)?);
        }
        Ok(imputer)
    }

    /// Compute fills for every column of `table`.
    pub fn fit_all(table: &Table) -> Result<Self, ImputeError> {
        let names: Vec<&str> = table.names().iter().map(String::as_str).collect();
        Self::fit(table, &names)
    }

    /// Use fixed numeric fills.
    pub fn from_defaults<S: Into<String>>(
        defaults: impl IntoIterator<Item = (S, f64)>,
    ) -> Result<Self, ImputeError> {
        let mut imputer = Imputer::default();
        for (name, value) in defaults {
            let name = name.into();
            if !value.is_finite() {
                return Err(ImputeError::NonFiniteFill { name, value });
            }
            imputer.names.push(name);
            imputer.fills.push(Fill::Numeric(value));
        }
        Ok(imputer)
    }

    /// Build from already computed `(name, fill)` pairs.
    pub fn from_fills(pairs: impl IntoIterator<Item = (String, Fill)>) -> Self {
        let (names, fills) = pairs.into_iter().unzip();
        Self { names, fills }
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.fills.len()
    }

    /// Returns true if there are no variables.
    pub fn is_empty(&self) -> bool {
        self.fills.is_empty()
    }

    /// Variable names in order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Fills in order.
    pub fn fills(&self) -> &[Fill] {
        &self.fills
    }

    /// Fill for a variable by name.
    pub fn fill(&self, name: &str) -> Option<Fill> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| self.fills[idx])
    }
}

fn fill_for(name: &str, column: &Column) -> Result<Fill, ImputeError> {
    match column {
        Column::Text(_) => Ok(Fill::Text),
        Column::Numeric(_) => {
            let observed: Vec<f64> = column.observed_numeric().collect();
            if observed.is_empty() {
                return Err(ImputeError::NoObservedValues(name.to_string()));
            }

            let complete = observed.len() == column.len();
            let value = if complete && observed.iter().all(|&v| v == 0.0 || v == 1.0) {
                binary_mode(&observed)
            } else {
                observed.iter().sum::<f64>() / observed.len() as f64
            };

            if !value.is_finite() {
                return Err(ImputeError::NonFiniteFill {
                    name: name.to_string(),
                    value,
                });
            }
            Ok(Fill::Numeric(value))
        }
    }
}

/// Most frequent of 0/1; ties go to the smaller value.
fn binary_mode(values: &[f64]) -> f64 {
    let ones = values.iter().filter(|&&v| v == 1.0).count();
    if ones * 2 > values.len() { 1.0 } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use serde_json::json;

    fn table() -> Table {
        Table::from_records(&[
            json!({"income": 10.0, "flag": 1, "job": "a", "empty": null}),
            json!({"income": 20.0, "flag": 0, "job": null, "empty": null}),
            json!({"income": null, "flag": 1, "job": "b", "empty": null}),
            json!({"income": 60.0, "flag": null, "job": "c", "empty": null}),
        ])
        .unwrap()
    }

    #[test]
    fn mean_ignores_missing() {
        let imputer = Imputer::fit(&table(), &["income"]).unwrap();
        assert_abs_diff_eq!(imputer.fills()[0].as_numeric().unwrap(), 30.0);
    }

    #[test]
    fn binary_column_uses_mode() {
        let table = Table::from_records(&[
            json!({"flag": 1}),
            json!({"flag": 0}),
            json!({"flag": 1}),
        ])
        .unwrap();
        let imputer = Imputer::fit(&table, &["flag"]).unwrap();
        assert_eq!(imputer.fill("flag"), Some(Fill::Numeric(1.0)));
    }

    #[test]
    fn binary_column_with_gaps_uses_mean() {
        let imputer = Imputer::fit(&table(), &["flag"]).unwrap();
        assert_abs_diff_eq!(imputer.fills()[0].as_numeric().unwrap(), 2.0 / 3.0);

        let nan_gap = Table::new()
            .with_column("flag", Column::Numeric(vec![Some(0.0), Some(f64::NAN), Some(0.0), Some(1.0)]))
            .unwrap();
        let imputer = Imputer::fit(&nan_gap, &["flag"]).unwrap();
        assert_abs_diff_eq!(imputer.fills()[0].as_numeric().unwrap(), 1.0 / 3.0);
    }

    #[test]
    fn binary_mode_tie_is_zero() {
        assert_eq!(binary_mode(&[0.0, 1.0]), 0.0);
        assert_eq!(binary_mode(&[1.0, 1.0, 0.0]), 1.0);
        assert_eq!(binary_mode(&[0.0]), 0.0);
    }

    #[test]
    fn text_column_gets_text_fill() {
        let imputer = Imputer::fit(&table(), &["job"]).unwrap();
        assert_eq!(imputer.fill("job"), Some(Fill::Text));
        assert_eq!(Fill::Text.as_numeric(), None);
    }

    #[test]
    fn fit_keeps_requested_order() {
        let imputer = Imputer::fit(&table(), &["flag", "income"]).unwrap();
        assert_eq!(imputer.names(), &["flag", "income"]);
    }

    #[test]
    fn unobserved_column_is_an_error() {
        let err = Imputer::fit(&table(), &["empty"]).unwrap_err();
        assert!(matches!(err, ImputeError::NoObservedValues(_)), "got: {err:?}");
    }

    #[test]
    fn unknown_column_is_an_error() {
        let err = Imputer::fit(&table(), &["nope"]).unwrap_err();
        assert!(matches!(err, ImputeError::UnknownColumn(_)), "got: {err:?}");
    }

    #[test]
    fn fixed_defaults_must_be_finite() {
        let err = Imputer::from_defaults([("x", f64::INFINITY)]).unwrap_err();
        assert!(matches!(err, ImputeError::NonFiniteFill { .. }), "got: {err:?}");
    }

    #[test]
    fn resolve_rules() {
        assert_eq!(FeatureValue::Number(3.0).resolve(9.0), 3.0);
        assert_eq!(FeatureValue::Number(f64::NAN).resolve(9.0), 9.0);
        assert_eq!(FeatureValue::Missing.resolve(9.0), 9.0);
        assert_eq!(FeatureValue::Other.resolve(9.0), 9.0);
        assert_eq!(FeatureValue::Number(f64::INFINITY).resolve(9.0), f64::INFINITY);
    }

    #[test]
    fn json_values_convert() {
        assert_eq!(FeatureValue::from(&json!(null)), FeatureValue::Missing);
        assert_eq!(FeatureValue::from(&json!(4)), FeatureValue::Number(4.0));
        assert_eq!(FeatureValue::from(&json!("4")), FeatureValue::Other);
        assert_eq!(FeatureValue::from(&json!(true)), FeatureValue::Other);
        assert!(FeatureValue::from(None::<f64>).is_missing());
        assert!(!FeatureValue::from(Some(0.0)).is_missing());
    }

    #[test]
    fn fill_serde_shape() {
        assert_eq!(
            serde_json::to_value(Fill::Numeric(1.5)).unwrap(),
            json!({"numeric": 1.5})
        );
        assert_eq!(serde_json::to_value(Fill::Text).unwrap(), json!("text"));
    }
}
