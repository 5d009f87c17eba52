//! JSON model snapshots.
//!
//! A snapshot is a `*.model.json` file holding a fitted linear regression
//! together with the bookkeeping its authoring library recorded:
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "model_type": "linear_regression",
//!   "library": { "name": "scikit-learn", "version": "1.3.2" },
//!   "model": {
//!     "coefficients": [21.52, 164883.28],
//!     "intercept": -2640159.79,
//!     "n_features_in": 2
//!   }
//! }
//! ```
//!
//! [`Model`] validates the snapshot on read, so a loaded model is always
//! safe to score with.

mod convert;
mod error;
pub mod schema;

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

pub use error::{ReadError, WriteError};
pub use schema::{
    EstimatorParamsSchema, LibrarySchema, LinearRegressionSchema, ModelFileSchema, FORMAT_VERSION,
};

use crate::repr::LinearRegression;

/// A validated model snapshot.
///
/// Holds the runtime [`LinearRegression`] plus the schema it was read from,
/// so writing a loaded model back out preserves every recorded field.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    linear: LinearRegression,
    schema: ModelFileSchema,
}

impl Model {
    /// Wrap a runtime model with library information.
    ///
    /// The result is validated exactly as a read would be, so a snapshot
    /// that could not be read back (feature names of the wrong length, a
    /// non-finite coefficient) fails here with [`ReadError::Validation`].
    pub fn from_linear(
        linear: LinearRegression,
        library: LibrarySchema,
        feature_names: Option<Vec<String>>,
    ) -> Result<Self, ReadError> {
        let mut model = LinearRegressionSchema::from(&linear);
        model.feature_names_in = feature_names;
        Self::from_schema(ModelFileSchema {
            format_version: FORMAT_VERSION,
            model_type: LinearRegressionSchema::MODEL_TYPE.to_string(),
            library,
            model,
        })
    }

    /// Build from a decoded schema, validating it.
    pub fn from_schema(schema: ModelFileSchema) -> Result<Self, ReadError> {
        if schema.format_version == 0 || schema.format_version > FORMAT_VERSION {
            return Err(ReadError::UnsupportedVersion {
                found: schema.format_version,
                supported: FORMAT_VERSION,
            });
        }
        if schema.model_type != LinearRegressionSchema::MODEL_TYPE {
            return Err(ReadError::UnsupportedModelType(schema.model_type));
        }

        let linear = LinearRegression::try_from(&schema.model)?;
        Ok(Self { linear, schema })
    }

    // =========================================================================
    // Reading
    // =========================================================================

    /// Read a snapshot from any reader.
    pub fn read_json<R: Read>(reader: R) -> Result<Self, ReadError> {
        let schema: ModelFileSchema = serde_json::from_reader(reader)?;
        Self::from_schema(schema)
    }

    /// Parse a snapshot from a string.
    pub fn from_json_str(json: &str) -> Result<Self, ReadError> {
        let schema: ModelFileSchema = serde_json::from_str(json)?;
        Self::from_schema(schema)
    }

    /// Load a snapshot from a file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ReadError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let model = Self::read_json(BufReader::new(file))?;
        tracing::info!(
            path = %path.display(),
            n_features = model.linear.n_features(),
            library = %model.schema.library.name,
            library_version = %model.schema.library.version,
            "loaded model snapshot"
        );
        Ok(model)
    }

    // =========================================================================
    // Writing
    // =========================================================================

    /// Write the snapshot as pretty-printed JSON.
    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), WriteError> {
        serde_json::to_writer_pretty(writer, &self.schema)?;
        Ok(())
    }

    /// Render the snapshot as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, WriteError> {
        Ok(serde_json::to_string_pretty(&self.schema)?)
    }

    /// Save the snapshot to a file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), WriteError> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        self.write_json(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The runtime model.
    pub fn linear(&self) -> &LinearRegression {
        &self.linear
    }

    /// Consume into the runtime model.
    pub fn into_linear(self) -> LinearRegression {
        self.linear
    }

    /// The schema this model was built from.
    pub fn schema(&self) -> &ModelFileSchema {
        &self.schema
    }

    /// Authoring library tag.
    pub fn library(&self) -> &LibrarySchema {
        &self.schema.library
    }

    /// Feature names recorded at fit time.
    pub fn feature_names(&self) -> Option<&[String]> {
        self.schema.model.feature_names_in.as_deref()
    }
}
