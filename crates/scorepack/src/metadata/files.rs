//! `fileMetadata.json` and package file names.

use serde::{Deserialize, Serialize};

/// Input variable descriptors.
pub const INPUT_VAR_FILE: &str = "inputVar.json";
/// Output variable descriptors.
pub const OUTPUT_VAR_FILE: &str = "outputVar.json";
/// Model properties.
pub const MODEL_PROPERTIES_FILE: &str = "ModelProperties.json";
/// File role listing.
pub const FILE_METADATA_FILE: &str = "fileMetadata.json";

/// Score descriptor file name for a model prefix.
pub fn score_file_name(prefix: &str) -> String {
    format!("{prefix}_score.json")
}

/// Model snapshot file name for a model prefix.
pub fn model_file_name(prefix: &str) -> String {
    format!("{prefix}.model.json")
}

/// Role of a file in a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FileRole {
    InputVariables,
    OutputVariables,
    Score,
    ScoreResource,
}

/// One `{role, name}` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub role: FileRole,
    pub name: String,
}

/// Contents of `fileMetadata.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileMetadata {
    pub entries: Vec<FileEntry>,
}

impl FileMetadata {
    /// Standard four-entry listing for a model prefix.
    pub fn for_prefix(prefix: &str) -> Self {
        let entry = |role, name: String| FileEntry { role, name };
        Self {
            entries: vec![
                entry(FileRole::InputVariables, INPUT_VAR_FILE.to_string()),
                entry(FileRole::OutputVariables, OUTPUT_VAR_FILE.to_string()),
                entry(FileRole::Score, score_file_name(prefix)),
                entry(FileRole::ScoreResource, model_file_name(prefix)),
            ],
        }
    }

    /// File name registered for `role`.
    pub fn file_for(&self, role: FileRole) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.role == role)
            .map(|e| e.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn standard_listing() {
        let meta = FileMetadata::for_prefix("Test_Model");
        assert_eq!(
            serde_json::to_value(&meta).unwrap(),
            json!([
                {"role": "inputVariables", "name": "inputVar.json"},
                {"role": "outputVariables", "name": "outputVar.json"},
                {"role": "score", "name": "Test_Model_score.json"},
                {"role": "scoreResource", "name": "Test_Model.model.json"},
            ])
        );
        assert_eq!(meta.file_for(FileRole::ScoreResource), Some("Test_Model.model.json"));
    }

    #[test]
    fn reads_back() {
        let json = serde_json::to_string(&FileMetadata::for_prefix("m")).unwrap();
        let meta: FileMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(meta.file_for(FileRole::Score), Some("m_score.json"));
    }
}
