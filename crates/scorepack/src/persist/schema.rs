//! Schema types for model serialization.
//!
//! These mirror the JSON file exactly. Runtime types are built from them
//! through the validating conversions in `convert.rs`.

use serde::{Deserialize, Serialize};

/// Current `format_version` written by this crate.
pub const FORMAT_VERSION: u32 = 1;

/// Top-level envelope of a `*.model.json` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFileSchema {
    /// Envelope version.
    pub format_version: u32,
    /// Model family tag, e.g. `"linear_regression"`.
    pub model_type: String,
    /// Library that produced the fit.
    pub library: LibrarySchema,
    /// Model-specific payload.
    pub model: LinearRegressionSchema,
}

/// Authoring library tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibrarySchema {
    /// Library name (e.g. `"scikit-learn"`).
    pub name: String,
    /// Library version string.
    pub version: String,
}

/// Estimator hyper-parameters recorded at fit time.
///
/// Not used for inference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimatorParamsSchema {
    #[serde(default = "default_true")]
    pub fit_intercept: bool,
    #[serde(default = "default_true")]
    pub copy_x: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_jobs: Option<i32>,
    #[serde(default)]
    pub positive: bool,
}

fn default_true() -> bool {
    true
}

impl Default for EstimatorParamsSchema {
    fn default() -> Self {
        Self {
            fit_intercept: true,
            copy_x: true,
            n_jobs: None,
            positive: false,
        }
    }
}

/// Linear regression snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressionSchema {
    /// Coefficients in trained feature order.
    pub coefficients: Vec<f64>,
    /// Constant offset.
    pub intercept: f64,
    /// Number of features seen during fit.
    pub n_features_in: usize,
    /// Feature names seen during fit (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names_in: Option<Vec<String>>,
    /// Estimator hyper-parameters.
    #[serde(default)]
    pub params: EstimatorParamsSchema,
    /// Rank of the design matrix (solver output).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,
    /// Singular values of the design matrix (solver output).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub singular_values: Option<Vec<f64>>,
}

impl LinearRegressionSchema {
    /// Model type string.
    pub const MODEL_TYPE: &'static str = "linear_regression";
}
