//! Saving, loading and recovering from broken model artifacts.

use std::fs;

use pat_classify::{
    ModelLoadError, ModelTrainer, RuleClassifier, StatisticalClassifier, TrainedModel,
    TrainerConfig,
};
use pat_model::{ColumnMetadata, DataType, SensitivityClass};
use tempfile::TempDir;

fn training_columns() -> Vec<ColumnMetadata> {
    vec![
        ColumnMetadata::new("email", DataType::String).with_description("customer email"),
        ColumnMetadata::new("phone_number", DataType::String),
        ColumnMetadata::new("diagnosis", DataType::String).with_description("patient diagnosis"),
        ColumnMetadata::new("medication", DataType::String),
        ColumnMetadata::new("order_status", DataType::String),
        ColumnMetadata::new("item_quantity", DataType::Int),
    ]
}

fn trained() -> TrainedModel {
    let rules = RuleClassifier::with_default_rules().expect("rules");
    ModelTrainer::new(TrainerConfig::default())
        .train_on_columns(&rules, &training_columns())
        .expect("train")
}

#[test]
fn saved_model_loads_back_identically() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("models").join("sensitivity.json");
    let model = trained();
    model.save(&path).expect("save model");

    let loaded = TrainedModel::load(&path).expect("load model");
    assert_eq!(loaded, model);

    let classifier = StatisticalClassifier::from_path(&path);
    assert!(classifier.is_available());
    assert_eq!(classifier.source(), Some(path.as_path()));
    let column = ColumnMetadata::new("email", DataType::String).with_description("customer email");
    let prediction = classifier.predict(&column).expect("prediction");
    assert_eq!(prediction.class, SensitivityClass::Pii);
}

#[test]
fn missing_artifact_is_io_error_and_unavailable() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("absent.json");

    assert!(matches!(
        TrainedModel::load(&path),
        Err(ModelLoadError::Io { .. })
    ));
    let classifier = StatisticalClassifier::from_path(&path);
    assert!(!classifier.is_available());
    let column = ColumnMetadata::new("email", DataType::String);
    assert!(classifier.predict(&column).is_none());
}

#[test]
fn corrupt_artifact_is_parse_error() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("corrupt.json");
    fs::write(&path, "{ not json").expect("write corrupt artifact");

    assert!(matches!(
        TrainedModel::load(&path),
        Err(ModelLoadError::Parse { .. })
    ));
    assert!(!StatisticalClassifier::from_path(&path).is_available());
}

#[test]
fn failed_reload_drops_previous_model() {
    let dir = TempDir::new().expect("temp dir");
    let mut classifier = StatisticalClassifier::new(trained());
    assert!(classifier.is_available());
    assert!(!classifier.reload(dir.path().join("absent.json")));
    assert!(!classifier.is_available());
}

#[test]
fn importances_cover_vocabulary() {
    let model = trained();
    let importances = model.feature_importances();
    assert_eq!(importances.len(), model.extractor().len());
    assert!(importances.windows(2).all(|pair| pair[0].1 >= pair[1].1));
}
