//! `<prefix>_score.json`: the declarative scoring entry point.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::names::check_names;
use super::{OutputMapping, ScoreError};
use crate::impute::{Fill, Imputer};

/// One ordered input and its fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSpec {
    pub name: String,
    pub fill: Fill,
}

/// Function name, ordered inputs with fills, output names and mapping.
///
/// ```json
/// {
///   "function": "score",
///   "inputs": [{ "name": "Avg_Area_Income", "fill": { "numeric": 68583.1 } }],
///   "outputs": ["Price"],
///   "mapping": { "kind": "prediction" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreDescriptor {
    pub function: String,
    pub inputs: Vec<InputSpec>,
    pub outputs: Vec<String>,
    pub mapping: OutputMapping,
}

impl ScoreDescriptor {
    /// Build from an imputer's names and fills, validating the result.
    pub fn from_imputer(
        function: impl Into<String>,
        imputer: &Imputer,
        outputs: Vec<String>,
        mapping: OutputMapping,
    ) -> Result<Self, ScoreError> {
        let inputs = imputer
            .names()
            .iter()
            .zip(imputer.fills())
            .map(|(name, &fill)| InputSpec {
                name: name.clone(),
                fill,
            })
            .collect();
        let descriptor = Self {
            function: function.into(),
            inputs,
            outputs,
            mapping,
        };
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Check names, fills and output count.
    ///
    /// Every input and output name must be a unique identifier, every fill
    /// numeric and finite, and the output count must match the mapping.
    pub fn validate(&self) -> Result<(), ScoreError> {
        check_names(
            std::iter::once(self.function.as_str())
                .chain(self.input_names())
                .chain(self.outputs.iter().map(String::as_str)),
        )?;
        for input in &self.inputs {
            match input.fill {
                Fill::Numeric(v) if v.is_finite() => {}
                Fill::Numeric(v) => {
                    return Err(ScoreError::NonFiniteFill {
                        name: input.name.clone(),
                        value: v,
                    })
                }
                Fill::Text => return Err(ScoreError::NonNumericInput(input.name.clone())),
            }
        }
        if self.outputs.len() != self.mapping.n_outputs() {
            return Err(ScoreError::OutputCount {
                expected: if self.mapping.n_outputs() == 1 { "exactly 1" } else { "exactly 2" },
                actual: self.outputs.len(),
            });
        }
        Ok(())
    }

    /// Input names in order.
    pub fn input_names(&self) -> impl Iterator<Item = &str> {
        self.inputs.iter().map(|i| i.name.as_str())
    }

    /// Numeric fills in input order (`NaN` for text inputs).
    pub fn numeric_fills(&self) -> Vec<f64> {
        self.inputs
            .iter()
            .map(|i| i.fill.as_numeric().unwrap_or(f64::NAN))
            .collect()
    }

    // =========================================================================
    // JSON
    // =========================================================================

    /// Read and validate a descriptor.
    pub fn read_json<R: Read>(reader: R) -> Result<Self, ScoreError> {
        let descriptor: Self = serde_json::from_reader(reader)?;
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Load and validate a descriptor file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ScoreError> {
        Self::read_json(BufReader::new(File::open(path)?))
    }

    /// Render as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, ScoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save as pretty-printed JSON.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), ScoreError> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}
