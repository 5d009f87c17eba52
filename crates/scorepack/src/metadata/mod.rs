//! Package metadata files.
//!
//! A model package carries four descriptor files next to the model snapshot
//! and score descriptor:
//!
//! | File | Type |
//! |------|------|
//! | `inputVar.json` | `Vec<`[`VariableSpec`]`>` |
//! | `outputVar.json` | `Vec<`[`VariableSpec`]`>` |
//! | `ModelProperties.json` | [`ModelProperties`] |
//! | `fileMetadata.json` | [`FileMetadata`] |

mod files;
mod properties;
mod variables;

pub use files::{
    model_file_name, score_file_name, FileEntry, FileMetadata, FileRole, FILE_METADATA_FILE,
    INPUT_VAR_FILE, MODEL_PROPERTIES_FILE, OUTPUT_VAR_FILE,
};
pub use properties::{
    truncate_property, ModelFunction, ModelProperties, ModelPropertiesConfig, Property,
    TargetLevel, MAX_DESCRIPTION, MAX_PROPERTY_NAME, MAX_PROPERTY_VALUE,
};
pub use variables::{
    is_string_descriptor, variables_from_descriptors, variables_from_table, Level, VarType,
    VariableSpec, DECIMAL_LENGTH,
};

/// Errors building metadata.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("only one target value ('{0}') was given; classification needs at least two")]
    SingleTargetValue(String),

    #[error("variable descriptor {0} is not an object with a 'type' field")]
    InvalidDescriptor(usize),

    #[error("column '{0}' not found in training data")]
    UnknownColumn(String),
}
