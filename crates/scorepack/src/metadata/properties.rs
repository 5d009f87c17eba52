//! `ModelProperties.json`.

use serde::{Deserialize, Serialize};

use super::MetadataError;

/// Longest property name kept.
pub const MAX_PROPERTY_NAME: usize = 60;
/// Longest property value kept.
pub const MAX_PROPERTY_VALUE: usize = 512;
/// Longest model description kept.
pub const MAX_DESCRIPTION: usize = 1024;

/// What the model predicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelFunction {
    Prediction,
    Classification,
}

/// Measurement level of the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetLevel {
    Interval,
    Binary,
    Nominal,
}

/// A custom `{name, value, type}` property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Property {
    /// String property, truncated to the allowed lengths.
    pub fn string(name: &str, value: &str) -> Self {
        let (name, value) = truncate_property(name, value);
        Self {
            name,
            value,
            kind: "string".to_string(),
        }
    }
}

/// Contents of `ModelProperties.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelProperties {
    pub name: String,
    pub description: String,
    pub score_code_type: String,
    pub train_table: String,
    pub train_code_type: String,
    pub algorithm: String,
    pub function: ModelFunction,
    pub target_variable: String,
    pub target_event: String,
    pub target_level: TargetLevel,
    pub event_prob_var: String,
    pub modeler: String,
    pub tool: String,
    pub tool_version: String,
    pub properties: Vec<Property>,
}

impl ModelProperties {
    /// Target values for a classifier, in declaration order.
    ///
    /// Binary models yield `[targetEvent]`; multiclass models read the
    /// `multiclass_target_events` property. Prediction models yield nothing.
    pub fn target_values(&self) -> Vec<String> {
        match self.target_level {
            TargetLevel::Interval => Vec::new(),
            TargetLevel::Binary => vec![self.target_event.clone()],
            TargetLevel::Nominal => self
                .properties
                .iter()
                .find(|p| p.name == MULTICLASS_EVENTS)
                .map(|p| p.value.split(", ").map(str::to_string).collect())
                .unwrap_or_default(),
        }
    }
}

const MULTICLASS_EVENTS: &str = "multiclass_target_events";
const MULTICLASS_PROBA: &str = "multiclass_proba_variables";

/// Settings for [`ModelProperties`].
///
/// # Example
///
/// ```
/// use scorepack::metadata::ModelPropertiesConfig;
///
/// let props = ModelPropertiesConfig::new("HousingModel", "Price")
///     .algorithm("Linear regression")
///     .build()
///     .unwrap();
/// assert_eq!(props.target_level, scorepack::metadata::TargetLevel::Interval);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ModelPropertiesConfig {
    pub model_name: String,
    pub target_variable: String,
    pub target_values: Vec<String>,
    pub description: String,
    pub algorithm: String,
    pub modeler: String,
    pub train_table: String,
    pub train_code_type: String,
    pub tool: String,
    pub tool_version: String,
    pub properties: Vec<(String, String)>,
}

impl ModelPropertiesConfig {
    /// Prediction model with default bookkeeping fields.
    pub fn new(model_name: impl Into<String>, target_variable: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            target_variable: target_variable.into(),
            target_values: Vec::new(),
            description: String::new(),
            algorithm: String::new(),
            modeler: String::new(),
            train_table: String::new(),
            train_code_type: "Python".to_string(),
            tool: env!("CARGO_PKG_NAME").to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            properties: Vec::new(),
        }
    }

    /// Set the target class values (first value is the event).
    pub fn target_values<S: ToString>(mut self, values: impl IntoIterator<Item = S>) -> Self {
        self.target_values = values.into_iter().map(|v| v.to_string()).collect();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = algorithm.into();
        self
    }

    pub fn modeler(mut self, modeler: impl Into<String>) -> Self {
        self.modeler = modeler.into();
        self
    }

    pub fn train_table(mut self, train_table: impl Into<String>) -> Self {
        self.train_table = train_table.into();
        self
    }

    /// Add a custom string property.
    pub fn property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.push((name.into(), value.into()));
        self
    }

    /// Check the settings without building.
    pub fn validate(&self) -> Result<(), MetadataError> {
        if self.model_name.trim().is_empty() {
            return Err(MetadataError::EmptyField("model name"));
        }
        if self.target_variable.trim().is_empty() {
            return Err(MetadataError::EmptyField("target variable"));
        }
        if self.target_values.len() == 1 {
            return Err(MetadataError::SingleTargetValue(self.target_values[0].clone()));
        }
        Ok(())
    }

    /// Validate and build.
    pub fn build(&self) -> Result<ModelProperties, MetadataError> {
        self.validate()?;

        let mut properties: Vec<Property> = self
            .properties
            .iter()
            .map(|(name, value)| Property::string(name, value))
            .collect();

        let (function, target_level, target_event, event_prob_var) =
            match self.target_values.as_slice() {
                [] => (ModelFunction::Prediction, TargetLevel::Interval, "", String::new()),
                [event, _] => (
                    ModelFunction::Classification,
                    TargetLevel::Binary,
                    event.as_str(),
                    format!("P_{event}"),
                ),
                values => {
                    let probas: Vec<String> = values.iter().map(|v| format!("P_{v}")).collect();
                    properties.push(Property::string(MULTICLASS_EVENTS, &values.join(", ")));
                    properties.push(Property::string(MULTICLASS_PROBA, &probas.join(", ")));
                    (ModelFunction::Classification, TargetLevel::Nominal, "", String::new())
                }
            };

        let description = if self.description.chars().count() > MAX_DESCRIPTION {
            tracing::warn!(
                limit = MAX_DESCRIPTION,
                "model description was truncated"
            );
            truncate_chars(&self.description, MAX_DESCRIPTION)
        } else {
            self.description.clone()
        };

        Ok(ModelProperties {
            name: self.model_name.clone(),
            description,
            score_code_type: "scorepack".to_string(),
            train_table: self.train_table.clone(),
            train_code_type: self.train_code_type.clone(),
            algorithm: self.algorithm.clone(),
            function,
            target_variable: self.target_variable.clone(),
            target_event: target_event.to_string(),
            target_level,
            event_prob_var,
            modeler: self.modeler.clone(),
            tool: self.tool.clone(),
            tool_version: self.tool_version.clone(),
            properties,
        })
    }
}

/// Truncate a property name to 60 and its value to 512 characters.
///
/// Each truncation is logged at `warn`.
pub fn truncate_property(name: &str, value: &str) -> (String, String) {
    let name = if name.chars().count() > MAX_PROPERTY_NAME {
        tracing::warn!(property = name, limit = MAX_PROPERTY_NAME, "property name was truncated");
        truncate_chars(name, MAX_PROPERTY_NAME)
    } else {
        name.to_string()
    };
    let value = if value.chars().count() > MAX_PROPERTY_VALUE {
        tracing::warn!(property = %name, limit = MAX_PROPERTY_VALUE, "property value was truncated");
        truncate_chars(value, MAX_PROPERTY_VALUE)
    } else {
        value.to_string()
    };
    (name, value)
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> ModelPropertiesConfig {
        ModelPropertiesConfig::new("Test_Model", "BAD")
    }

    #[test]
    fn prediction_model() {
        let props = config().build().unwrap();
        assert_eq!(props.function, ModelFunction::Prediction);
        assert_eq!(props.target_level, TargetLevel::Interval);
        assert_eq!(props.target_event, "");
        assert_eq!(props.event_prob_var, "");
        assert!(props.target_values().is_empty());
    }

    #[test]
    fn binary_model() {
        let props = config().target_values([1, 0]).build().unwrap();
        assert_eq!(props.function, ModelFunction::Classification);
        assert_eq!(props.target_level, TargetLevel::Binary);
        assert_eq!(props.target_event, "1");
        assert_eq!(props.event_prob_var, "P_1");
        assert_eq!(props.target_values(), vec!["1".to_string()]);
    }

    #[test]
    fn multiclass_model() {
        let props = config().target_values([4, 3, 1, 5]).build().unwrap();
        assert_eq!(props.target_level, TargetLevel::Nominal);
        assert_eq!(
            serde_json::to_value(&props.properties).unwrap(),
            json!([
                {"name": "multiclass_target_events", "value": "4, 3, 1, 5", "type": "string"},
                {"name": "multiclass_proba_variables", "value": "P_4, P_3, P_1, P_5", "type": "string"},
            ])
        );
        assert_eq!(props.target_values(), vec!["4", "3", "1", "5"]);
    }

    #[test]
    fn single_target_value_rejected() {
        let err = config().target_values([1]).build().unwrap_err();
        assert!(matches!(err, MetadataError::SingleTargetValue(_)), "got: {err:?}");
    }

    #[test]
    fn empty_name_rejected() {
        let err = ModelPropertiesConfig::new(" ", "BAD").build().unwrap_err();
        assert!(matches!(err, MetadataError::EmptyField(_)), "got: {err:?}");
    }

    #[test]
    fn long_description_truncated() {
        let props = config().description("a".repeat(10_000)).build().unwrap();
        assert_eq!(props.description.len(), MAX_DESCRIPTION);
    }

    #[test]
    fn truncation_limits() {
        assert_eq!(
            truncate_property("test_key", "test_value"),
            ("test_key".to_string(), "test_value".to_string())
        );

        let big_key = "k".repeat(100);
        let big_value = "v".repeat(1000);
        let (name, value) = truncate_property(&big_key, &big_value);
        assert_eq!(name, big_key[..60]);
        assert_eq!(value, big_value[..512]);
    }

    #[test]
    fn camel_case_keys() {
        let json = serde_json::to_value(config().build().unwrap()).unwrap();
        for key in [
            "name",
            "description",
            "scoreCodeType",
            "trainTable",
            "trainCodeType",
            "algorithm",
            "function",
            "targetVariable",
            "targetEvent",
            "targetLevel",
            "eventProbVar",
            "modeler",
            "tool",
            "toolVersion",
            "properties",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["function"], "Prediction");
        assert_eq!(json["targetLevel"], "Interval");
    }
}
