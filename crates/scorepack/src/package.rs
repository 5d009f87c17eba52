//! Model package directories.
//!
//! A package is a flat directory:
//!
//! | File | Contents |
//! |------|----------|
//! | `<prefix>.model.json` | model snapshot ([`Model`]) |
//! | `<prefix>_score.json` | score descriptor ([`ScoreDescriptor`]) |
//! | `inputVar.json` | input variables |
//! | `outputVar.json` | output variables |
//! | `ModelProperties.json` | [`ModelProperties`] |
//! | `fileMetadata.json` | [`FileMetadata`] |
//!
//! [`ScorePackage::build`] derives everything from a model and its training
//! table; [`ScorePackage::open`] reads a directory back and checks that the
//! files agree with each other.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::data::Table;
use crate::impute::{ImputeError, Imputer};
use crate::metadata::{
    model_file_name, score_file_name, variables_from_table, FileMetadata, FileRole,
    MetadataError, ModelProperties, ModelPropertiesConfig, VariableSpec, FILE_METADATA_FILE,
    INPUT_VAR_FILE, MODEL_PROPERTIES_FILE, OUTPUT_VAR_FILE,
};
use crate::persist::{Model, ReadError, WriteError};
use crate::score::{check_names, OutputMapping, ScoreDescriptor, ScoreError, ScoreOutput, Scorer};

/// Errors building, writing or opening a package.
#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    #[error("invalid package configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Impute(#[from] ImputeError),

    #[error(transparent)]
    Score(#[from] ScoreError),

    #[error(transparent)]
    ReadModel(#[from] ReadError),

    #[error(transparent)]
    WriteModel(#[from] WriteError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("decoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("fileMetadata.json has no entry for role {0:?}")]
    MissingRole(FileRole),

    #[error("{file} lists [{}] but the score descriptor lists [{}]", .found.join(", "), .expected.join(", "))]
    Inconsistent {
        file: &'static str,
        expected: Vec<String>,
        found: Vec<String>,
    },
}

// =============================================================================
// Configuration
// =============================================================================

/// Settings for [`ScorePackage::build`].
#[derive(Debug, Clone, PartialEq)]
pub struct PackageConfig {
    /// File name prefix.
    pub prefix: String,
    /// Output variable names. Defaults to the target variable.
    pub output_names: Vec<String>,
    /// Classification cutoff for binary targets.
    pub threshold: Option<f64>,
    /// `ModelProperties.json` settings.
    pub properties: ModelPropertiesConfig,
}

impl PackageConfig {
    pub fn new(prefix: impl Into<String>, properties: ModelPropertiesConfig) -> Self {
        Self {
            prefix: prefix.into(),
            output_names: vec![properties.target_variable.clone()],
            threshold: None,
            properties,
        }
    }

    pub fn output_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.output_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Check the settings without building.
    pub fn validate(&self) -> Result<(), PackageError> {
        check_names([self.prefix.as_str()])
            .map_err(|_| PackageError::InvalidConfig(format!("prefix '{}' is not an identifier", self.prefix)))?;
        if self.output_names.is_empty() {
            return Err(PackageError::InvalidConfig("no output names".to_string()));
        }
        self.properties.validate()?;
        Ok(())
    }
}

// =============================================================================
// Package
// =============================================================================

/// Every file of a model package, in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct ScorePackage {
    prefix: String,
    model: Model,
    descriptor: ScoreDescriptor,
    input_vars: Vec<VariableSpec>,
    output_vars: Vec<VariableSpec>,
    properties: ModelProperties,
    file_metadata: FileMetadata,
}

impl ScorePackage {
    /// Derive a package from a model and its training table.
    ///
    /// Inputs are the model's recorded feature names, or every training
    /// column except the target. Fills are computed from the training table.
    pub fn build(model: Model, train: &Table, config: &PackageConfig) -> Result<Self, PackageError> {
        config.validate()?;
        let properties = config.properties.build()?;

        let names: Vec<String> = match model.feature_names() {
            Some(names) => names.to_vec(),
            None => train
                .without(&[properties.target_variable.as_str()])
                .names()
                .to_vec(),
        };
        let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();

        let imputer = Imputer::fit(train, &name_refs)?;
        let mapping = OutputMapping::from_targets(
            &properties.target_values(),
            config.threshold,
            config.output_names.len(),
        )?;
        let descriptor =
            ScoreDescriptor::from_imputer("score", &imputer, config.output_names.clone(), mapping)?;
        Scorer::new(&model, descriptor.clone())?;

        let all_vars = variables_from_table(train);
        let input_vars = name_refs
            .iter()
            .map(|&name| {
                all_vars
                    .iter()
                    .find(|v| v.name == name)
                    .cloned()
                    .ok_or_else(|| MetadataError::UnknownColumn(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            file_metadata: FileMetadata::for_prefix(&config.prefix),
            prefix: config.prefix.clone(),
            output_vars: output_variables(&descriptor),
            model,
            descriptor,
            input_vars,
            properties,
        })
    }

    /// Read a package directory.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, PackageError> {
        let dir = dir.as_ref();
        let file_metadata: FileMetadata = read_json(&dir.join(FILE_METADATA_FILE))?;
        let score_file = file_metadata
            .file_for(FileRole::Score)
            .ok_or(PackageError::MissingRole(FileRole::Score))?;
        let model_file = file_metadata
            .file_for(FileRole::ScoreResource)
            .ok_or(PackageError::MissingRole(FileRole::ScoreResource))?;
        let input_file = file_metadata.file_for(FileRole::InputVariables).unwrap_or(INPUT_VAR_FILE);
        let output_file = file_metadata
            .file_for(FileRole::OutputVariables)
            .unwrap_or(OUTPUT_VAR_FILE);

        let prefix = score_file
            .strip_suffix("_score.json")
            .unwrap_or(score_file)
            .to_string();
        let model = Model::load_json(dir.join(model_file))?;
        let descriptor = ScoreDescriptor::load_json(dir.join(score_file))?;
        let input_vars: Vec<VariableSpec> = read_json(&dir.join(input_file))?;
        let output_vars: Vec<VariableSpec> = read_json(&dir.join(output_file))?;
        let properties: ModelProperties = read_json(&dir.join(MODEL_PROPERTIES_FILE))?;

        check_consistent(
            INPUT_VAR_FILE,
            descriptor.input_names(),
            input_vars.iter().map(|v| v.name.as_str()),
        )?;
        check_consistent(
            OUTPUT_VAR_FILE,
            descriptor.outputs.iter().map(String::as_str),
            output_vars.iter().map(|v| v.name.as_str()),
        )?;
        Scorer::new(&model, descriptor.clone())?;

        tracing::info!(
            dir = %dir.display(),
            prefix = %prefix,
            n_inputs = input_vars.len(),
            "opened model package"
        );
        Ok(Self {
            prefix,
            model,
            descriptor,
            input_vars,
            output_vars,
            properties,
            file_metadata,
        })
    }

    /// All files as `name -> contents`.
    pub fn files(&self) -> Result<BTreeMap<String, String>, PackageError> {
        let mut files = BTreeMap::new();
        files.insert(
            INPUT_VAR_FILE.to_string(),
            serde_json::to_string_pretty(&self.input_vars)?,
        );
        files.insert(
            OUTPUT_VAR_FILE.to_string(),
            serde_json::to_string_pretty(&self.output_vars)?,
        );
        files.insert(
            MODEL_PROPERTIES_FILE.to_string(),
            serde_json::to_string_pretty(&self.properties)?,
        );
        files.insert(
            FILE_METADATA_FILE.to_string(),
            serde_json::to_string_pretty(&self.file_metadata)?,
        );
        files.insert(score_file_name(&self.prefix), self.descriptor.to_json_string()?);
        files.insert(model_file_name(&self.prefix), self.model.to_json_string()?);
        Ok(files)
    }

    /// Write every file into `dir`, creating it if needed.
    pub fn write(&self, dir: impl AsRef<Path>) -> Result<(), PackageError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        for (name, contents) in self.files()? {
            let path = dir.join(&name);
            fs::write(&path, contents)?;
            tracing::info!(file = %name, path = %path.display(), "written and saved");
        }
        Ok(())
    }

    /// A scorer for this package.
    pub fn scorer(&self) -> Result<Scorer, PackageError> {
        Ok(Scorer::new(&self.model, self.descriptor.clone())?)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn descriptor(&self) -> &ScoreDescriptor {
        &self.descriptor
    }

    pub fn input_variables(&self) -> &[VariableSpec] {
        &self.input_vars
    }

    pub fn output_variables(&self) -> &[VariableSpec] {
        &self.output_vars
    }

    pub fn properties(&self) -> &ModelProperties {
        &self.properties
    }

    pub fn file_metadata(&self) -> &FileMetadata {
        &self.file_metadata
    }
}

/// Output variables implied by the descriptor's mapping.
///
/// A prediction is an interval decimal; a class is a binary decimal and its
/// probability an interval decimal.
fn output_variables(descriptor: &ScoreDescriptor) -> Vec<VariableSpec> {
    let sample = descriptor.mapping.apply(0.0);
    descriptor
        .outputs
        .iter()
        .enumerate()
        .map(|(i, name)| match sample {
            ScoreOutput::Classification { .. } if i == 0 => VariableSpec::binary(name.as_str()),
            _ => VariableSpec::interval(name.as_str()),
        })
        .collect()
}

fn check_consistent<'a>(
    file: &'static str,
    expected: impl Iterator<Item = &'a str>,
    found: impl Iterator<Item = &'a str>,
) -> Result<(), PackageError> {
    let expected: Vec<String> = expected.map(str::to_string).collect();
    let found: Vec<String> = found.map(str::to_string).collect();
    if expected != found {
        return Err(PackageError::Inconsistent {
            file,
            expected,
            found,
        });
    }
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, PackageError> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
