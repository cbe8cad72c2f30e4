use std::path::{Path, PathBuf};

use pat_model::ColumnMetadata;
use tracing::{debug, info, warn};

use crate::model::{Prediction, TrainedModel};

/// Statistical classifier over an optional [`TrainedModel`].
///
/// Without a model every prediction is `None`, which callers treat as
/// "statistical signal unavailable".
#[derive(Debug, Clone, Default)]
pub struct StatisticalClassifier {
    model: Option<TrainedModel>,
    source: Option<PathBuf>,
}

impl StatisticalClassifier {
    pub fn new(model: TrainedModel) -> Self {
        Self {
            model: Some(model),
            source: None,
        }
    }

    /// A classifier that never predicts.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Load a model artifact; failures are logged and leave the classifier unavailable.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let mut classifier = Self::unavailable();
        classifier.reload(path);
        classifier
    }

    /// Replace the current model with the artifact at `path`.
    ///
    /// Returns whether a model is available afterwards. A failed reload
    /// drops the previous model.
    pub fn reload(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        self.source = Some(path.to_path_buf());
        match TrainedModel::load(path) {
            Ok(model) => {
                info!(
                    path = %path.display(),
                    classes = model.classes().len(),
                    features = model.extractor().len(),
                    "loaded statistical model"
                );
                self.model = Some(model);
                true
            }
            Err(error) => {
                warn!(%error, "statistical model unavailable, using rule classification only");
                self.model = None;
                false
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.model.is_some()
    }

    pub fn model(&self) -> Option<&TrainedModel> {
        self.model.as_ref()
    }

    /// Path of the last artifact load attempt, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn predict(&self, column: &ColumnMetadata) -> Option<Prediction> {
        let model = self.model.as_ref()?;
        let prediction = model.predict(&column.search_text());
        debug!(
            column = %column.name,
            class = %prediction.class,
            confidence = prediction.confidence,
            "statistical prediction"
        );
        Some(prediction)
    }
}
