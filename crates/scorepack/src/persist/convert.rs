//! Conversion between runtime types and schema types.
//!
//! Runtime → schema is infallible. Schema → runtime validates the snapshot
//! and reports violations as [`ReadError::Validation`].

use ndarray::Array1;

use super::error::ReadError;
use super::schema::LinearRegressionSchema;
use crate::repr::LinearRegression;

impl From<&LinearRegression> for LinearRegressionSchema {
    fn from(model: &LinearRegression) -> Self {
        LinearRegressionSchema {
            coefficients: model.coefficients().to_vec(),
            intercept: model.intercept(),
            n_features_in: model.n_features(),
            feature_names_in: None,
            params: Default::default(),
            rank: None,
            singular_values: None,
        }
    }
}

impl TryFrom<&LinearRegressionSchema> for LinearRegression {
    type Error = ReadError;

    fn try_from(schema: &LinearRegressionSchema) -> Result<Self, Self::Error> {
        validate(schema)?;
        Ok(LinearRegression::new(
            Array1::from_vec(schema.coefficients.clone()),
            schema.intercept,
        ))
    }
}

fn validate(schema: &LinearRegressionSchema) -> Result<(), ReadError> {
    if schema.n_features_in == 0 {
        return Err(ReadError::Validation("n_features_in must be > 0".into()));
    }

    if schema.coefficients.len() != schema.n_features_in {
        return Err(ReadError::Validation(format!(
            "coefficients length {} doesn't match n_features_in = {}",
            schema.coefficients.len(),
            schema.n_features_in
        )));
    }

    if let Some(names) = &schema.feature_names_in {
        if names.len() != schema.n_features_in {
            return Err(ReadError::Validation(format!(
                "feature_names_in length {} doesn't match n_features_in = {}",
                names.len(),
                schema.n_features_in
            )));
        }
    }

    if let Some(idx) = schema.coefficients.iter().position(|c| !c.is_finite()) {
        return Err(ReadError::Validation(format!(
            "coefficient {idx} is not finite: {}",
            schema.coefficients[idx]
        )));
    }

    if !schema.intercept.is_finite() {
        return Err(ReadError::Validation(format!(
            "intercept is not finite: {}",
            schema.intercept
        )));
    }

    if let Some(rank) = schema.rank {
        if rank > schema.n_features_in {
            return Err(ReadError::Validation(format!(
                "rank {rank} exceeds n_features_in = {}",
                schema.n_features_in
            )));
        }
    }

    Ok(())
}
