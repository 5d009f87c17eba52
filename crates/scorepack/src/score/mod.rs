//! Scoring.
//!
//! A [`Scorer`] pairs a validated linear regression with its
//! [`ScoreDescriptor`]. Scoring a row resolves every input against its fill,
//! evaluates `intercept + Σ coefᵢ·xᵢ` and maps the result through the
//! descriptor's [`OutputMapping`].
//!
//! Bad input values never fail a score: `NaN`, `null`, absent keys and
//! non-numbers are replaced by the fill. The only row-level error is a row
//! of the wrong width.
//!
//! A `Scorer` is immutable once built and can be shared across threads.

mod descriptor;
mod names;
mod output;

use ndarray::Array2;
use serde_json::{Map, Value};

pub use descriptor::{InputSpec, ScoreDescriptor};
pub use names::{check_names, is_valid_identifier};
pub use output::{OutputMapping, ScoreOutput, DEFAULT_THRESHOLD};

use crate::data::{Column, Table};
use crate::impute::FeatureValue;
use crate::persist::Model;
use crate::repr::LinearRegression;

/// Errors building or using a [`Scorer`].
#[derive(Debug, thiserror::Error)]
pub enum ScoreError {
    #[error("invalid variable names (expected [A-Za-z_][A-Za-z0-9_]*): {}", .0.join(", "))]
    InvalidVariableNames(Vec<String>),

    #[error("variable name '{0}' is used more than once")]
    DuplicateName(String),

    #[error("descriptor lists {inputs} inputs but the model has {features} features")]
    FeatureCountMismatch { inputs: usize, features: usize },

    #[error("input {position} is named '{input}' but the model was fit on '{feature}'")]
    FeatureNameMismatch {
        position: usize,
        input: String,
        feature: String,
    },

    #[error("input '{0}' has no numeric fill")]
    NonNumericInput(String),

    #[error("fill for '{name}' is not finite: {value}")]
    NonFiniteFill { name: String, value: f64 },

    #[error("row has {actual} values, expected {expected}")]
    RowWidth { expected: usize, actual: usize },

    #[error("a threshold was given without target values")]
    ThresholdWithoutTargets,

    #[error("single target value '{0}' is not the event value 1")]
    SingleNonEventTarget(String),

    #[error("{0} target values given; a single-output model supports at most one")]
    MultipleTargets(usize),

    #[error("threshold must be finite, got {0}")]
    InvalidThreshold(f64),

    #[error("expected {expected} output variables, got {actual}")]
    OutputCount { expected: &'static str, actual: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("decoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A ready-to-use model handle.
#[derive(Debug, Clone)]
pub struct Scorer {
    model: LinearRegression,
    descriptor: ScoreDescriptor,
    fills: Vec<f64>,
}

impl Scorer {
    /// Pair a model with its descriptor.
    ///
    /// The descriptor must list one numeric input per model feature. If the
    /// snapshot recorded feature names, the inputs must match them in order.
    pub fn new(model: &Model, descriptor: ScoreDescriptor) -> Result<Self, ScoreError> {
        descriptor.validate()?;

        let features = model.linear().n_features();
        if descriptor.inputs.len() != features {
            return Err(ScoreError::FeatureCountMismatch {
                inputs: descriptor.inputs.len(),
                features,
            });
        }
        if let Some(feature_names) = model.feature_names() {
            let mismatch = descriptor
                .input_names()
                .zip(feature_names)
                .enumerate()
                .find(|(_, (input, feature))| *input != feature.as_str());
            if let Some((position, (input, feature))) = mismatch {
                return Err(ScoreError::FeatureNameMismatch {
                    position,
                    input: input.to_string(),
                    feature: feature.clone(),
                });
            }
        }

        let fills = descriptor.numeric_fills();
        Ok(Self {
            model: model.linear().clone(),
            descriptor,
            fills,
        })
    }

    /// The descriptor this scorer was built from.
    pub fn descriptor(&self) -> &ScoreDescriptor {
        &self.descriptor
    }

    /// The underlying model.
    pub fn model(&self) -> &LinearRegression {
        &self.model
    }

    /// Input names in order.
    pub fn input_names(&self) -> impl Iterator<Item = &str> {
        self.descriptor.input_names()
    }

    /// Output names in order.
    pub fn output_names(&self) -> &[String] {
        &self.descriptor.outputs
    }

    /// Number of inputs.
    pub fn n_inputs(&self) -> usize {
        self.fills.len()
    }

    /// Resolve a row against the fills.
    ///
    /// Each substitution is logged at `debug`.
    pub fn resolve_row(&self, row: &[FeatureValue]) -> Result<Vec<f64>, ScoreError> {
        if row.len() != self.fills.len() {
            return Err(ScoreError::RowWidth {
                expected: self.fills.len(),
                actual: row.len(),
            });
        }
        Ok(row
            .iter()
            .zip(&self.fills)
            .zip(self.descriptor.input_names())
            .map(|((&value, &fill), name)| self.resolve(name, value, fill))
            .collect())
    }

    #[inline]
    fn resolve(&self, name: &str, value: FeatureValue, fill: f64) -> f64 {
        if value.is_missing() {
            tracing::debug!(input = name, fill, ?value, "substituting fill for missing input");
        }
        value.resolve(fill)
    }

    /// Score one row given in input order.
    pub fn score_row(&self, row: &[FeatureValue]) -> Result<ScoreOutput, ScoreError> {
        let resolved = self.resolve_row(row)?;
        Ok(self.descriptor.mapping.apply(self.model.predict_row(&resolved)))
    }

    /// Score one JSON object, looking inputs up by name.
    ///
    /// Absent keys are missing values; extra keys are ignored.
    pub fn score_record(&self, record: &Map<String, Value>) -> ScoreOutput {
        let resolved: Vec<f64> = self
            .descriptor
            .input_names()
            .zip(&self.fills)
            .map(|(name, &fill)| {
                let value = record.get(name).map(FeatureValue::from).unwrap_or_default();
                self.resolve(name, value, fill)
            })
            .collect();
        self.descriptor.mapping.apply(self.model.predict_row(&resolved))
    }

    /// Score a batch of JSON records.
    ///
    /// Each record goes through [`score_record`](Self::score_record), so a
    /// cell of the wrong type only affects its own input. A record that is
    /// not an object has every input missing.
    pub fn score_records(&self, records: &[Value]) -> Vec<ScoreOutput> {
        let empty = Map::new();
        records
            .iter()
            .enumerate()
            .map(|(row, record)| {
                match record.as_object() {
                    Some(record) => self.score_record(record),
                    None => {
                        tracing::debug!(row, "record is not an object; every input is missing");
                        self.score_record(&empty)
                    }
                }
            })
            .collect()
    }

    /// Score every row of a table.
    ///
    /// Inputs are looked up by column name. An absent column, or a text
    /// column, is missing in every row.
    pub fn score_table(&self, table: &Table) -> Vec<ScoreOutput> {
        let n_rows = table.n_rows();
        let mut data = Array2::<f64>::zeros((n_rows, self.fills.len()));

        for (j, (name, &fill)) in self.descriptor.input_names().zip(&self.fills).enumerate() {
            match table.column(name) {
                Some(Column::Numeric(values)) => {
                    for (i, value) in values.iter().enumerate() {
                        data[[i, j]] = self.resolve(name, FeatureValue::from(*value), fill);
                    }
                }
                other => {
                    tracing::debug!(
                        input = name,
                        fill,
                        present = other.is_some(),
                        "no numeric column for input; using fill for every row"
                    );
                    data.column_mut(j).fill(fill);
                }
            }
        }

        self.model
            .predict(data.view())
            .iter()
            .map(|&p| self.descriptor.mapping.apply(p))
            .collect()
    }
}
