//! The packaged housing-price model.
//!
//! A linear regression of house price on five area statistics. Each input
//! falls back to its training-set mean when missing or not a number.
//!
//! ```
//! use scorepack::housing;
//!
//! let price = housing::score(70000.0, 6.0, 7.0, 4.0, 36000.0);
//! assert!((price - 1_267_050.29).abs() < 0.01);
//!
//! // Missing values take the training means.
//! let at_means = housing::score(None::<f64>, f64::NAN, None::<f64>, None::<f64>, None::<f64>);
//! assert!(at_means.is_finite());
//! ```

use std::path::Path;

use serde_json::{Map, Value};

use crate::impute::{FeatureValue, Fill};
use crate::persist::{LibrarySchema, Model, ReadError};
use crate::repr::LinearRegression;
use crate::score::{InputSpec, OutputMapping, ScoreDescriptor, ScoreError, Scorer};

/// File name prefix of the bundled package.
pub const MODEL_PREFIX: &str = "HousingModel";

/// Input variables in model order.
pub const INPUT_NAMES: [&str; 5] = [
    "Avg_Area_Income",
    "Avg_Area_House_Age",
    "Avg_Area_Number_of_Rooms",
    "Avg_Area_Number_of_Bedrooms",
    "Area_Population",
];

/// Output variable.
pub const OUTPUT_NAME: &str = "Price";

/// Training-set means, in input order.
pub const DEFAULTS: [f64; 5] = [
    68583.10898397,
    5.977222035287,
    6.98779229,
    3.98133,
    36163.516038871,
];

/// Fitted coefficients, in input order.
pub const COEFFICIENTS: [f64; 5] = [
    21.528276,
    164883.282027,
    122368.678027,
    2233.801864,
    15.150420,
];

/// Fitted intercept.
pub const INTERCEPT: f64 = -2640159.796851911;

/// The bundled model snapshot.
pub const BUNDLED_MODEL_JSON: &str = include_str!("../assets/housing/HousingModel.model.json");

/// Errors loading a housing model snapshot.
#[derive(Debug, thiserror::Error)]
pub enum HousingError {
    #[error("reading model snapshot: {0}")]
    Read(#[from] ReadError),

    #[error("snapshot does not fit the housing inputs: {0}")]
    Incompatible(#[from] ScoreError),
}

/// One input row.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HousingRecord {
    pub avg_area_income: FeatureValue,
    pub avg_area_house_age: FeatureValue,
    pub avg_area_number_of_rooms: FeatureValue,
    pub avg_area_number_of_bedrooms: FeatureValue,
    pub area_population: FeatureValue,
}

impl HousingRecord {
    pub fn new(
        avg_area_income: impl Into<FeatureValue>,
        avg_area_house_age: impl Into<FeatureValue>,
        avg_area_number_of_rooms: impl Into<FeatureValue>,
        avg_area_number_of_bedrooms: impl Into<FeatureValue>,
        area_population: impl Into<FeatureValue>,
    ) -> Self {
        Self {
            avg_area_income: avg_area_income.into(),
            avg_area_house_age: avg_area_house_age.into(),
            avg_area_number_of_rooms: avg_area_number_of_rooms.into(),
            avg_area_number_of_bedrooms: avg_area_number_of_bedrooms.into(),
            area_population: area_population.into(),
        }
    }

    /// Read a JSON object keyed by [`INPUT_NAMES`].
    pub fn from_json(record: &Map<String, Value>) -> Self {
        let [a, b, c, d, e] =
            INPUT_NAMES.map(|name| record.get(name).map(FeatureValue::from).unwrap_or_default());
        Self::new(a, b, c, d, e)
    }

    /// Values in input order.
    pub fn values(&self) -> [FeatureValue; 5] {
        [
            self.avg_area_income,
            self.avg_area_house_age,
            self.avg_area_number_of_rooms,
            self.avg_area_number_of_bedrooms,
            self.area_population,
        ]
    }
}

/// Handle to a housing model.
#[derive(Debug, Clone, PartialEq)]
pub struct HousingScorer {
    model: LinearRegression,
}

impl HousingScorer {
    /// The fitted model shipped with this crate.
    pub fn bundled() -> Self {
        Self {
            model: LinearRegression::from_slice(&COEFFICIENTS, INTERCEPT),
        }
    }

    /// Load a snapshot from disk.
    ///
    /// The snapshot must have five features; if it recorded feature names
    /// they must equal [`INPUT_NAMES`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HousingError> {
        Self::from_model(&Model::load_json(path)?)
    }

    /// Wrap an already loaded snapshot.
    pub fn from_model(model: &Model) -> Result<Self, HousingError> {
        Scorer::new(model, descriptor()?)?;
        Ok(Self {
            model: model.linear().clone(),
        })
    }

    /// The underlying model.
    pub fn model(&self) -> &LinearRegression {
        &self.model
    }

    /// Score one record.
    pub fn score(&self, record: &HousingRecord) -> f64 {
        self.score_values(record.values())
    }

    /// Score five values given in input order.
    pub fn score_values(&self, values: [FeatureValue; 5]) -> f64 {
        let mut row = [0.0; 5];
        for (i, value) in values.into_iter().enumerate() {
            if value.is_missing() {
                tracing::debug!(input = INPUT_NAMES[i], fill = DEFAULTS[i], ?value, "substituting training mean");
            }
            row[i] = value.resolve(DEFAULTS[i]);
        }
        self.model.predict_row(&row)
    }

    /// A general-purpose [`Scorer`] for this model.
    pub fn to_scorer(&self) -> Result<Scorer, HousingError> {
        Ok(Scorer::new(&self.to_model()?, descriptor()?)?)
    }

    /// Snapshot of this model, tagged with its fitting library.
    pub fn to_model(&self) -> Result<Model, ReadError> {
        Model::from_linear(
            self.model.clone(),
            LibrarySchema {
                name: "scikit-learn".to_string(),
                version: "1.2.2".to_string(),
            },
            Some(INPUT_NAMES.map(str::to_string).to_vec()),
        )
    }
}

impl Default for HousingScorer {
    fn default() -> Self {
        Self::bundled()
    }
}

/// The score descriptor of the housing package.
pub fn descriptor() -> Result<ScoreDescriptor, ScoreError> {
    let descriptor = ScoreDescriptor {
        function: "score".to_string(),
        inputs: INPUT_NAMES
            .into_iter()
            .zip(DEFAULTS)
            .map(|(name, fill)| InputSpec {
                name: name.to_string(),
                fill: Fill::Numeric(fill),
            })
            .collect(),
        outputs: vec![OUTPUT_NAME.to_string()],
        mapping: OutputMapping::Prediction,
    };
    descriptor.validate()?;
    Ok(descriptor)
}

/// Predict a price with the bundled model.
///
/// Missing, `NaN` and non-numeric arguments take the training mean.
pub fn score(
    avg_area_income: impl Into<FeatureValue>,
    avg_area_house_age: impl Into<FeatureValue>,
    avg_area_number_of_rooms: impl Into<FeatureValue>,
    avg_area_number_of_bedrooms: impl Into<FeatureValue>,
    area_population: impl Into<FeatureValue>,
) -> f64 {
    HousingScorer::bundled().score(&HousingRecord::new(
        avg_area_income,
        avg_area_house_age,
        avg_area_number_of_rooms,
        avg_area_number_of_bedrooms,
        area_population,
    ))
}
