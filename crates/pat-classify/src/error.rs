//! Error types for classification, model loading and training.

use std::path::PathBuf;

use pat_model::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("invalid pattern for rule {rule}: {source}")]
    InvalidPattern {
        rule: String,
        #[source]
        source: regex::Error,
    },
}

/// Failure to obtain a usable model artifact.
///
/// Callers that only need a fallback signal should go through
/// [`StatisticalClassifier::from_path`](crate::StatisticalClassifier::from_path),
/// which logs this error and continues without a model.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("failed to read model artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid model artifact: {message}")]
    Invalid { message: String },
}

impl ModelLoadError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum TrainError {
    #[error("no training samples provided")]
    EmptyTrainingSet,

    #[error("no features remain after vocabulary pruning")]
    EmptyVocabulary,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Classify(#[from] ClassifyError),

    #[error("training produced an unusable model: {0}")]
    Model(#[from] ModelLoadError),
}
