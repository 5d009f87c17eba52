//! Test fixtures and tolerances.

use serde::Deserialize;

use crate::impute::FeatureValue;

/// Absolute tolerance for comparing predictions on the scale of house prices.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Input rows for a test case, loaded from JSON.
///
/// Expects JSON format:
/// ```json
/// {
///   "features": [[70000.0, 6.0, null, 4.0, 36000.0]],
///   "num_rows": 1,
///   "num_features": 5
/// }
/// ```
///
/// Use `null` for a missing value.
#[derive(Debug, Deserialize)]
pub struct TestInput {
    pub features: Vec<Vec<Option<f64>>>,
    #[serde(rename = "num_rows")]
    pub n_rows: usize,
    #[serde(rename = "num_features")]
    pub n_features: usize,
}

impl TestInput {
    /// Rows as scorer input.
    pub fn to_feature_rows(&self) -> Vec<Vec<FeatureValue>> {
        self.features
            .iter()
            .map(|row| row.iter().map(|&x| FeatureValue::from(x)).collect())
            .collect()
    }

    /// Rows as plain numbers, `NaN` for missing.
    pub fn to_f64_rows(&self) -> Vec<Vec<f64>> {
        self.features
            .iter()
            .map(|row| row.iter().map(|&x| x.unwrap_or(f64::NAN)).collect())
            .collect()
    }
}

/// Expected predictions for a test case, loaded from JSON.
#[derive(Debug, Deserialize)]
pub struct TestExpected {
    pub predictions: Vec<f64>,
    /// Fill applied to each input when missing.
    #[serde(default)]
    pub fills: Option<Vec<f64>>,
}
