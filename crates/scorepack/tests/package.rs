//! Package build, write and open round trips.

use std::fs;
use std::path::{Path, PathBuf};

use approx::assert_abs_diff_eq;
use serde_json::{json, Value};

use scorepack::housing::{self, HousingScorer, INPUT_NAMES, MODEL_PREFIX, OUTPUT_NAME};
use scorepack::metadata::{FileRole, TargetLevel};
use scorepack::testing::DEFAULT_TOLERANCE;
use scorepack::{
    FeatureValue, Imputer, Model, ModelPropertiesConfig, PackageConfig, PackageError,
    ScorePackage, Table,
};

fn manifest_dir() -> &'static Path {
    Path::new(env!("CARGO_MANIFEST_DIR"))
}

fn bundled_package_dir() -> PathBuf {
    manifest_dir().join("assets/housing")
}

fn train() -> Table {
    Table::load_json(manifest_dir().join("tests/fixtures/housing/train.json")).expect("train fixture")
}

fn housing_config() -> PackageConfig {
    PackageConfig::new(
        MODEL_PREFIX,
        ModelPropertiesConfig::new(MODEL_PREFIX, OUTPUT_NAME)
            .algorithm("Linear regression")
            .description("Linear regression of house price on area demographics"),
    )
}

fn build_housing() -> ScorePackage {
    let model = HousingScorer::bundled().to_model().expect("bundled snapshot");
    ScorePackage::build(model, &train(), &housing_config())
        .expect("build package")
}

#[test]
fn bundled_package_opens_and_scores() {
    let package = ScorePackage::open(bundled_package_dir()).expect("open bundled package");
    assert_eq!(package.prefix(), MODEL_PREFIX);
    assert_eq!(package.properties().target_level, TargetLevel::Interval);

    let scorer = package.scorer().expect("scorer");
    let names: Vec<&str> = scorer.input_names().collect();
    assert_eq!(names, INPUT_NAMES.to_vec());
    assert_eq!(scorer.output_names(), &[OUTPUT_NAME.to_string()]);

    let row = [70000.0, 6.0, 7.0, 4.0, 36000.0].map(FeatureValue::Number);
    let out = scorer.score_row(&row).expect("score");
    assert_abs_diff_eq!(
        out.prediction().expect("prediction"),
        housing::score(70000.0, 6.0, 7.0, 4.0, 36000.0),
        epsilon = DEFAULT_TOLERANCE
    );

    let missing = scorer
        .score_row(&[FeatureValue::Missing; 5])
        .expect("score");
    assert_abs_diff_eq!(
        missing.prediction().expect("prediction"),
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
fn bundled_descriptor_matches_housing_module() {
    let package = ScorePackage::open(bundled_package_dir()).expect("open bundled package");
    assert_eq!(package.descriptor(), &housing::descriptor().expect("descriptor"));
}

#[test]
fn build_uses_training_fills() {
    let package = build_housing();
    let imputer = Imputer::fit(&train(), &INPUT_NAMES).expect("fit");
    let fills: Vec<f64> = imputer.fills().iter().filter_map(|f| f.as_numeric()).collect();
    assert_eq!(package.descriptor().numeric_fills(), fills);
    assert_eq!(package.input_variables().len(), 5);
    assert!(package.input_variables().iter().all(|v| v.is_decimal()));
}

#[test]
fn write_then_open_scores_identically() {
    let dir = tempfile::tempdir().expect("tempdir");
    let package = build_housing();
    package.write(dir.path()).expect("write");

    for name in package.files().expect("files").keys() {
        assert!(dir.path().join(name).exists(), "{name} not written");
    }

    let reopened = ScorePackage::open(dir.path()).expect("open");
    assert_eq!(reopened.descriptor(), package.descriptor());
    assert_eq!(reopened.properties(), package.properties());
    assert_eq!(reopened.model().linear(), package.model().linear());

    let before = package.scorer().expect("scorer");
    let after = reopened.scorer().expect("scorer");
    let table = Table::from_records(&[
        json!({"Avg_Area_Income": 70000, "Avg_Area_House_Age": 6, "Avg_Area_Number_of_Rooms": 7,
               "Avg_Area_Number_of_Bedrooms": 4, "Area_Population": 36000}),
        json!({"Avg_Area_Income": null, "Area_Population": 20000}),
    ])
    .expect("table");
    assert_eq!(before.score_table(&table), after.score_table(&table));
}

#[test]
fn files_are_valid_json() {
    let files = build_housing().files().expect("files");
    assert_eq!(files.len(), 6);
    for (name, contents) in &files {
        serde_json::from_str::<Value>(contents)
            .unwrap_or_else(|e| panic!("{name} is not JSON: {e}"));
    }
    let meta: Value = serde_json::from_str(&files["fileMetadata.json"]).expect("json");
    assert_eq!(meta[3]["name"], "HousingModel.model.json");
}

#[test]
fn open_detects_inconsistent_input_list() {
    let dir = tempfile::tempdir().expect("tempdir");
    build_housing().write(dir.path()).expect("write");

    let path = dir.path().join("inputVar.json");
    let mut vars: Vec<Value> =
        serde_json::from_str(&fs::read_to_string(&path).expect("read")).expect("json");
    vars.swap(0, 1);
    fs::write(&path, serde_json::to_string(&vars).expect("json")).expect("write");

    let err = ScorePackage::open(dir.path()).unwrap_err();
    assert!(matches!(err, PackageError::Inconsistent { .. }), "got: {err:?}");
}

#[test]
fn open_requires_score_role() {
    let dir = tempfile::tempdir().expect("tempdir");
    build_housing().write(dir.path()).expect("write");

    let path = dir.path().join("fileMetadata.json");
    let entries: Vec<Value> =
        serde_json::from_str(&fs::read_to_string(&path).expect("read")).expect("json");
    let kept: Vec<Value> = entries
        .into_iter()
        .filter(|e| e["role"] != "score")
        .collect();
    fs::write(&path, serde_json::to_string(&kept).expect("json")).expect("write");

    let err = ScorePackage::open(dir.path()).unwrap_err();
    assert!(
        matches!(err, PackageError::MissingRole(FileRole::Score)),
        "got: {err:?}"
    );
}

#[test]
fn open_missing_directory_is_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = ScorePackage::open(dir.path().join("nope")).unwrap_err();
    assert!(matches!(err, PackageError::Io(_)), "got: {err:?}");
}

#[test]
fn snapshot_without_names_uses_training_columns() {
    let linear = HousingScorer::bundled().model().clone();
    let library = HousingScorer::bundled().to_model().expect("bundled snapshot").library().clone();
    let model = Model::from_linear(linear, library, None).expect("snapshot");
    let package = ScorePackage::build(model, &train(), &housing_config()).expect("build");
    let names: Vec<&str> = package.descriptor().input_names().collect();
    assert_eq!(names, INPUT_NAMES.to_vec());
}
