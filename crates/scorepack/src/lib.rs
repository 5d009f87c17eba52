//! scorepack: packaged linear-regression scoring.
//!
//! A fitted linear regression is shipped as a *package*: a JSON model
//! snapshot, a score descriptor holding one fill per input, and descriptor
//! files for an external model manager. Scoring never rejects a bad value;
//! missing, `NaN` and non-numeric inputs take their fill.
//!
//! # Key Types
//!
//! - [`LinearRegression`] - coefficients + intercept, row and batch prediction
//! - [`Model`] - validated JSON snapshot
//! - [`Scorer`] - model handle that resolves fills and maps outputs
//! - [`ScorePackage`] - build, write and open package directories
//! - [`HousingScorer`] - the bundled housing-price model
//!
//! # Scoring the bundled model
//!
//! ```
//! use scorepack::housing;
//!
//! let price = housing::score(70000.0, 6.0, 7.0, 4.0, 36000.0);
//! assert!(price > 1_000_000.0);
//! ```

// Re-export approx for users of the testing module.
pub use approx;

pub mod data;
pub mod housing;
pub mod impute;
pub mod metadata;
pub mod package;
pub mod persist;
pub mod repr;
pub mod score;
pub mod testing;

pub use data::{Column, ColumnKind, Table, TableError};
pub use housing::{HousingError, HousingRecord, HousingScorer};
pub use impute::{FeatureValue, Fill, ImputeError, Imputer};
pub use metadata::{MetadataError, ModelProperties, ModelPropertiesConfig, VariableSpec};
pub use package::{PackageConfig, PackageError, ScorePackage};
pub use persist::{Model, ReadError, WriteError};
pub use repr::LinearRegression;
pub use score::{OutputMapping, ScoreDescriptor, ScoreError, ScoreOutput, Scorer};
