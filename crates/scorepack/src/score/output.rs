//! Mapping a raw prediction to output variables.

use serde::{Deserialize, Serialize};

use super::ScoreError;

/// Default classification cutoff.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// How the raw prediction becomes output values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutputMapping {
    /// One output: the prediction itself.
    Prediction,
    /// Class `1` when the prediction exceeds `threshold`, else `0`.
    ///
    /// With `with_probability` the raw prediction is a second output.
    BinaryThreshold {
        threshold: f64,
        with_probability: bool,
    },
}

impl OutputMapping {
    /// Choose a mapping from target values, an optional threshold and the
    /// number of output variables.
    ///
    /// - no target values: [`Prediction`](Self::Prediction), one output
    /// - target values `["1"]`: [`BinaryThreshold`](Self::BinaryThreshold) with one
    ///   or two outputs
    /// - anything else is rejected
    pub fn from_targets(
        target_values: &[String],
        threshold: Option<f64>,
        n_outputs: usize,
    ) -> Result<Self, ScoreError> {
        match target_values {
            [] => {
                if threshold.is_some() {
                    return Err(ScoreError::ThresholdWithoutTargets);
                }
                if n_outputs != 1 {
                    return Err(ScoreError::OutputCount {
                        expected: "exactly 1",
                        actual: n_outputs,
                    });
                }
                Ok(OutputMapping::Prediction)
            }
            [event] => {
                if event.trim().parse::<f64>().ok() != Some(1.0) {
                    return Err(ScoreError::SingleNonEventTarget(event.clone()));
                }
                // Only `None` takes the default; an explicit 0.0 is kept.
                let threshold = threshold.unwrap_or(DEFAULT_THRESHOLD);
                if !threshold.is_finite() {
                    return Err(ScoreError::InvalidThreshold(threshold));
                }
                let with_probability = match n_outputs {
                    1 => false,
                    2 => true,
                    n => {
                        return Err(ScoreError::OutputCount {
                            expected: "1 or 2",
                            actual: n,
                        })
                    }
                };
                Ok(OutputMapping::BinaryThreshold {
                    threshold,
                    with_probability,
                })
            }
            values => Err(ScoreError::MultipleTargets(values.len())),
        }
    }

    /// Number of output variables this mapping produces.
    pub fn n_outputs(&self) -> usize {
        match self {
            OutputMapping::Prediction => 1,
            OutputMapping::BinaryThreshold {
                with_probability, ..
            } => 1 + usize::from(*with_probability),
        }
    }

    /// Map a raw prediction.
    #[inline]
    pub fn apply(&self, prediction: f64) -> ScoreOutput {
        match *self {
            OutputMapping::Prediction => ScoreOutput::Prediction(prediction),
            OutputMapping::BinaryThreshold {
                threshold,
                with_probability,
            } => ScoreOutput::Classification {
                class: u8::from(prediction > threshold),
                probability: with_probability.then_some(prediction),
            },
        }
    }
}

/// Result of scoring one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreOutput {
    Prediction(f64),
    Classification { class: u8, probability: Option<f64> },
}

impl ScoreOutput {
    /// Output values in output-variable order.
    pub fn values(&self) -> Vec<f64> {
        match *self {
            ScoreOutput::Prediction(p) => vec![p],
            ScoreOutput::Classification { class, probability } => {
                std::iter::once(f64::from(class)).chain(probability).collect()
            }
        }
    }

    /// Pair each output value with its variable name.
    pub fn fields<'a>(&self, names: &'a [String]) -> Vec<(&'a str, f64)> {
        names.iter().map(String::as_str).zip(self.values()).collect()
    }

    /// The prediction of a regression output.
    pub fn prediction(&self) -> Option<f64> {
        match *self {
            ScoreOutput::Prediction(p) => Some(p),
            ScoreOutput::Classification { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn no_targets_is_prediction() {
        let mapping = OutputMapping::from_targets(&[], None, 1).unwrap();
        assert_eq!(mapping, OutputMapping::Prediction);
        assert_eq!(mapping.apply(3.5), ScoreOutput::Prediction(3.5));
    }

    #[test]
    fn threshold_needs_targets() {
        let err = OutputMapping::from_targets(&[], Some(0.3), 1).unwrap_err();
        assert!(matches!(err, ScoreError::ThresholdWithoutTargets), "got: {err:?}");
    }

    #[test]
    fn prediction_needs_one_output() {
        let err = OutputMapping::from_targets(&[], None, 2).unwrap_err();
        assert!(matches!(err, ScoreError::OutputCount { actual: 2, .. }), "got: {err:?}");
    }

    #[test]
    fn event_one_is_binary() {
        let mapping = OutputMapping::from_targets(&targets(&["1"]), None, 1).unwrap();
        assert_eq!(
            mapping,
            OutputMapping::BinaryThreshold {
                threshold: DEFAULT_THRESHOLD,
                with_probability: false
            }
        );
        assert_eq!(
            mapping.apply(0.7),
            ScoreOutput::Classification { class: 1, probability: None }
        );
        assert_eq!(
            mapping.apply(0.5),
            ScoreOutput::Classification { class: 0, probability: None }
        );
    }

    #[test]
    fn two_outputs_carry_probability() {
        let mapping = OutputMapping::from_targets(&targets(&["1"]), Some(0.2), 2).unwrap();
        assert_eq!(mapping.n_outputs(), 2);
        let out = mapping.apply(0.25);
        assert_eq!(out.values(), vec![1.0, 0.25]);
        let names = targets(&["EM_CLASSIFICATION", "EM_EVENTPROBABILITY"]);
        assert_eq!(
            out.fields(&names),
            vec![("EM_CLASSIFICATION", 1.0), ("EM_EVENTPROBABILITY", 0.25)]
        );
    }

    #[test]
    fn zero_threshold_is_kept() {
        let mapping = OutputMapping::from_targets(&targets(&["1"]), Some(0.0), 1).unwrap();
        assert_eq!(
            mapping,
            OutputMapping::BinaryThreshold {
                threshold: 0.0,
                with_probability: false
            }
        );
        assert_eq!(
            mapping.apply(0.25),
            ScoreOutput::Classification { class: 1, probability: None }
        );
    }

    #[test]
    fn binary_with_three_outputs_rejected() {
        let err = OutputMapping::from_targets(&targets(&["1"]), None, 3).unwrap_err();
        assert!(matches!(err, ScoreError::OutputCount { actual: 3, .. }), "got: {err:?}");
    }

    #[test]
    fn single_other_target_rejected() {
        let err = OutputMapping::from_targets(&targets(&["0"]), None, 1).unwrap_err();
        assert!(matches!(err, ScoreError::SingleNonEventTarget(_)), "got: {err:?}");
    }

    #[test]
    fn multiple_targets_rejected() {
        let err = OutputMapping::from_targets(&targets(&["a", "b"]), None, 2).unwrap_err();
        assert!(matches!(err, ScoreError::MultipleTargets(2)), "got: {err:?}");
    }

    #[test]
    fn serde_shape() {
        let json = serde_json::to_value(OutputMapping::BinaryThreshold {
            threshold: 0.5,
            with_probability: true,
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "binary_threshold", "threshold": 0.5, "with_probability": true})
        );
        assert_eq!(
            serde_json::to_value(OutputMapping::Prediction).unwrap(),
            serde_json::json!({"kind": "prediction"})
        );
    }
}
