//! Sensitivity classification of column metadata.
//!
//! A weighted pattern table gives a first classification for every column.
//! When that classification is not confident enough, an optional statistical
//! model (TF-IDF features and logistic regression) is consulted and the two
//! are blended.
//!
//! # Example
//!
//! ```ignore
//! use pat_classify::{RuleClassifier, SensitivityClassifier, StatisticalClassifier};
//!
//! let rules = RuleClassifier::with_default_rules()?;
//! let model = StatisticalClassifier::from_path("models/sensitivity.json");
//! let classifier = SensitivityClassifier::new(rules, Some(model));
//!
//! let results = classifier.classify_all(&table.columns)?;
//! let summary = SensitivityClassifier::summarize(&results);
//! ```

mod blend;
mod classifier;
mod error;
mod features;
mod model;
mod rules;
mod statistical;
mod train;

pub use blend::{DEFAULT_BLEND_THRESHOLD, blend};
pub use classifier::SensitivityClassifier;
pub use error::{ClassifyError, ModelLoadError, TrainError};
pub use features::{FeatureExtractor, VocabularyOptions, terms, tokenize};
pub use model::{FORMAT_VERSION, Prediction, TrainedModel};
pub use rules::{
    NO_MATCH_CONFIDENCE, NO_MATCH_REASONING, PatternRule, RuleClassifier, RuleMatch,
    default_pattern_rules,
};
pub use statistical::StatisticalClassifier;
pub use train::{ModelTrainer, TrainerConfig, label_for_training};
