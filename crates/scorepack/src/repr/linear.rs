//! Linear regression data structure and prediction.

use ndarray::{Array1, ArrayView1, ArrayView2};

/// Single-output linear regression (coefficients + intercept).
///
/// Coefficients are stored in the feature order the model was trained with:
///
/// ```text
/// prediction = intercept + Σ(coefficients[i] × features[i])
/// ```
///
/// # Example
///
/// ```
/// use scorepack::repr::LinearRegression;
/// use ndarray::array;
///
/// let model = LinearRegression::new(array![0.5, 0.3], 0.1);
///
/// assert_eq!(model.n_features(), 2);
/// assert_eq!(model.coefficient(1), 0.3);
/// assert!((model.predict_row(&[2.0, 3.0]) - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRegression {
    /// One weight per input feature.
    coefficients: Array1<f64>,
    /// Constant offset.
    intercept: f64,
}

impl LinearRegression {
    /// Create a model from coefficients and an intercept.
    pub fn new(coefficients: Array1<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }

    /// Create a model from a plain coefficient slice.
    pub fn from_slice(coefficients: &[f64], intercept: f64) -> Self {
        Self::new(Array1::from_vec(coefficients.to_vec()), intercept)
    }

    /// Number of input features.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    /// Weight for a single feature.
    ///
    /// # Panics
    ///
    /// Panics if `feature >= n_features()`.
    #[inline]
    pub fn coefficient(&self, feature: usize) -> f64 {
        self.coefficients[feature]
    }

    /// All coefficients, in trained feature order.
    #[inline]
    pub fn coefficients(&self) -> ArrayView1<'_, f64> {
        self.coefficients.view()
    }

    /// Constant offset.
    #[inline]
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Predict for a single row.
    ///
    /// Extra trailing values are ignored.
    pub fn predict_row(&self, features: &[f64]) -> f64 {
        debug_assert!(
            features.len() >= self.n_features(),
            "not enough features: got {}, need {}",
            features.len(),
            self.n_features()
        );

        self.coefficients
            .iter()
            .zip(features)
            .fold(self.intercept, |sum, (&w, &x)| sum + w * x)
    }

    /// Predict for a batch of rows.
    ///
    /// `data` has shape `[n_samples, n_features]`; returns one prediction per sample.
    pub fn predict(&self, data: ArrayView2<'_, f64>) -> Array1<f64> {
        debug_assert_eq!(data.ncols(), self.n_features());
        data.dot(&self.coefficients) + self.intercept
    }
}
