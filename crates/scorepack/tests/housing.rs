//! Bundled housing model: fixtures, snapshot loading and fills.

use std::path::{Path, PathBuf};

use approx::assert_abs_diff_eq;

use scorepack::housing::{self, HousingRecord, HousingScorer, COEFFICIENTS, DEFAULTS, INTERCEPT};
use scorepack::testing::{TestExpected, TestInput, DEFAULT_TOLERANCE};
use scorepack::{FeatureValue, Model};

fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/housing")
}

fn asset_model() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/housing/HousingModel.model.json")
}

fn load_case() -> (TestInput, TestExpected) {
    let input: TestInput = serde_json::from_slice(
        &std::fs::read(fixture_dir().join("input.json")).expect("read input fixture"),
    )
    .expect("parse input fixture");
    let expected: TestExpected = serde_json::from_slice(
        &std::fs::read(fixture_dir().join("expected.json")).expect("read expected fixture"),
    )
    .expect("parse expected fixture");
    (input, expected)
}

#[test]
fn fixture_predictions() {
    let (input, expected) = load_case();
    assert_eq!(input.n_rows, expected.predictions.len());

    let scorer = HousingScorer::bundled();
    for (row, &want) in input.to_feature_rows().into_iter().zip(&expected.predictions) {
        assert_eq!(row.len(), input.n_features);
        let values: [FeatureValue; 5] = row.try_into().expect("five features");
        assert_abs_diff_eq!(scorer.score_values(values), want, epsilon = DEFAULT_TOLERANCE);
    }
}

#[test]
fn fixture_fills_are_training_means() {
    let (_, expected) = load_case();
    assert_eq!(expected.fills.as_deref(), Some(&DEFAULTS[..]));
}

#[test]
fn nan_rows_match_missing_rows() {
    let (input, _) = load_case();
    let scorer = HousingScorer::bundled();
    for (missing, nan) in input.to_feature_rows().into_iter().zip(input.to_f64_rows()) {
        let missing: [FeatureValue; 5] = missing.try_into().expect("five features");
        let nan: [f64; 5] = nan.try_into().expect("five features");
        assert_eq!(
            scorer.score_values(missing),
            scorer.score_values(nan.map(FeatureValue::Number))
        );
    }
}

#[test]
fn worked_example_matches_direct_dot_product() {
    let row = [70000.0, 6.0, 7.0, 4.0, 36000.0];
    let direct = INTERCEPT + COEFFICIENTS.iter().zip(row).map(|(c, x)| c * x).sum::<f64>();
    assert_abs_diff_eq!(
        housing::score(row[0], row[1], row[2], row[3], row[4]),
        direct,
        epsilon = DEFAULT_TOLERANCE
    );
}

#[test]
fn loading_twice_is_identical() {
    let first = HousingScorer::load(asset_model()).expect("load snapshot");
    let second = HousingScorer::load(asset_model()).expect("load snapshot");
    assert_eq!(first, second);
    assert_eq!(first, HousingScorer::bundled());
    assert_eq!(first.model().intercept(), INTERCEPT);
    assert_eq!(first.model().coefficients().to_vec(), COEFFICIENTS.to_vec());
}

#[test]
fn bundled_snapshot_round_trips() {
    let model = Model::load_json(asset_model()).expect("load snapshot");
    let json = model.to_json_string().expect("render snapshot");
    let reread = Model::from_json_str(&json).expect("reread snapshot");
    assert_eq!(reread.linear(), model.linear());
    assert_eq!(reread.feature_names(), model.feature_names());
}

#[test]
fn text_and_nulls_take_means() {
    let record = serde_json::json!({
        "Avg_Area_Income": "seventy thousand",
        "Avg_Area_House_Age": null,
        "Avg_Area_Number_of_Rooms": true,
    });
    let record = HousingRecord::from_json(record.as_object().expect("object"));
    assert_abs_diff_eq!(
        HousingScorer::bundled().score(&record),
        housing::score(
            FeatureValue::Missing,
            FeatureValue::Missing,
            FeatureValue::Missing,
            FeatureValue::Missing,
            FeatureValue::Missing
        ),
        epsilon = DEFAULT_TOLERANCE
    );
}

#[test]
fn infinite_values_are_kept() {
    let price = housing::score(f64::INFINITY, 6.0, 7.0, 4.0, 36000.0);
    assert!(price.is_infinite());
}
