//! Property-based tests for scoring.

use proptest::prelude::*;

use scorepack::housing::{HousingScorer, COEFFICIENTS, DEFAULTS, INTERCEPT};
use scorepack::FeatureValue;

/// Plausible finite feature values.
fn arb_feature() -> impl Strategy<Value = f64> {
    -1e6f64..1e6f64
}

/// A feature that may be missing, NaN or non-numeric.
fn arb_value() -> impl Strategy<Value = FeatureValue> {
    prop_oneof![
        3 => arb_feature().prop_map(FeatureValue::Number),
        1 => Just(FeatureValue::Missing),
        1 => Just(FeatureValue::Number(f64::NAN)),
        1 => Just(FeatureValue::Other),
    ]
}

fn direct(row: [f64; 5]) -> f64 {
    INTERCEPT + COEFFICIENTS.iter().zip(row).map(|(c, x)| c * x).sum::<f64>()
}

fn tolerance(row: &[f64; 5]) -> f64 {
    let scale = INTERCEPT.abs()
        + COEFFICIENTS
            .iter()
            .zip(row)
            .map(|(c, x)| (c * x).abs())
            .sum::<f64>();
    scale * 1e-12
}

proptest! {
    #[test]
    fn prediction_is_intercept_plus_dot(row in prop::array::uniform5(arb_feature())) {
        let got = HousingScorer::bundled().score_values(row.map(FeatureValue::Number));
        prop_assert!((got - direct(row)).abs() <= tolerance(&row));
    }

    #[test]
    fn missing_values_take_defaults(values in prop::array::uniform5(arb_value())) {
        let mut resolved = [0.0; 5];
        for i in 0..5 {
            resolved[i] = match values[i] {
                FeatureValue::Number(x) if !x.is_nan() => x,
                _ => DEFAULTS[i],
            };
        }
        let got = HousingScorer::bundled().score_values(values);
        prop_assert!(got.is_finite());
        prop_assert!((got - direct(resolved)).abs() <= tolerance(&resolved));
    }

    #[test]
    fn general_scorer_agrees_with_housing(values in prop::array::uniform5(arb_value())) {
        let housing = HousingScorer::bundled();
        let scorer = housing.to_scorer().unwrap();
        let out = scorer.score_row(&values).unwrap();
        prop_assert_eq!(out.prediction(), Some(housing.score_values(values)));
    }
}
