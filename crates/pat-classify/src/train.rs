//! Fitting a [`TrainedModel`] from labelled column texts.

use pat_model::{ColumnMetadata, SensitivityClass};
use tracing::{debug, info};

use crate::error::TrainError;
use crate::features::{FeatureExtractor, VocabularyOptions};
use crate::model::{TrainedModel, dot, softmax};
use crate::rules::RuleClassifier;

/// Hyper-parameters for [`ModelTrainer`].
#[derive(Debug, Clone)]
pub struct TrainerConfig {
    pub max_features: usize,
    pub ngram_max: usize,
    pub max_df: f32,
    pub epochs: usize,
    pub learning_rate: f32,
    /// L2 penalty on the weights (biases are not penalized).
    pub l2: f32,
    /// Weight samples inversely to their class frequency.
    pub balanced: bool,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            max_features: 100,
            ngram_max: 2,
            max_df: 0.9,
            epochs: 300,
            learning_rate: 0.5,
            l2: 1e-3,
            balanced: true,
        }
    }
}

/// Deterministic multinomial logistic-regression trainer.
#[derive(Debug, Clone, Default)]
pub struct ModelTrainer {
    config: TrainerConfig,
}

impl ModelTrainer {
    pub fn new(config: TrainerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Train on `(search text, label)` pairs.
    ///
    /// Weights start at zero and are updated with full-batch gradient
    /// descent, so the same samples always produce the same model.
    pub fn train(&self, samples: &[(String, SensitivityClass)]) -> Result<TrainedModel, TrainError> {
        if samples.is_empty() {
            return Err(TrainError::EmptyTrainingSet);
        }

        let documents: Vec<String> = samples.iter().map(|(text, _)| text.clone()).collect();
        let extractor = FeatureExtractor::fit(
            &documents,
            VocabularyOptions {
                max_features: self.config.max_features,
                max_df: self.config.max_df,
                ngram_max: self.config.ngram_max,
            },
        );
        if extractor.is_empty() {
            return Err(TrainError::EmptyVocabulary);
        }

        let mut classes: Vec<SensitivityClass> = samples.iter().map(|(_, class)| *class).collect();
        classes.sort();
        classes.dedup();

        let features: Vec<Vec<f32>> = documents.iter().map(|doc| extractor.transform(doc)).collect();
        let targets: Vec<usize> = samples
            .iter()
            .map(|(_, class)| classes.iter().position(|c| c == class).unwrap_or(0))
            .collect();
        let sample_weights = self.sample_weights(&targets, classes.len());

        let n_classes = classes.len();
        let n_features = extractor.len();
        let n_samples = samples.len() as f32;
        let mut weights = vec![vec![0.0f32; n_features]; n_classes];
        let mut bias = vec![0.0f32; n_classes];

        for epoch in 0..self.config.epochs {
            let mut grad_w = vec![vec![0.0f32; n_features]; n_classes];
            let mut grad_b = vec![0.0f32; n_classes];
            let mut loss = 0.0f32;

            for ((x, &target), &sample_weight) in features.iter().zip(&targets).zip(&sample_weights) {
                let logits: Vec<f32> = weights
                    .iter()
                    .zip(&bias)
                    .map(|(row, b)| dot(row, x) + b)
                    .collect();
                let probs = softmax(&logits);
                loss -= sample_weight * probs[target].max(f32::MIN_POSITIVE).ln();

                for (class_idx, prob) in probs.iter().enumerate() {
                    let indicator = if class_idx == target { 1.0 } else { 0.0 };
                    let error = sample_weight * (prob - indicator);
                    grad_b[class_idx] += error;
                    for (g, xi) in grad_w[class_idx].iter_mut().zip(x) {
                        *g += error * xi;
                    }
                }
            }

            let step = self.config.learning_rate / n_samples;
            for (row, grad_row) in weights.iter_mut().zip(&grad_w) {
                for (w, g) in row.iter_mut().zip(grad_row) {
                    *w -= step * g + self.config.learning_rate * self.config.l2 * *w;
                }
            }
            for (b, g) in bias.iter_mut().zip(&grad_b) {
                *b -= step * g;
            }

            if epoch % 100 == 0 {
                debug!(epoch, loss = loss / n_samples, "training step");
            }
        }

        info!(
            samples = samples.len(),
            classes = n_classes,
            features = n_features,
            "trained statistical model"
        );
        Ok(TrainedModel::new(extractor, classes, weights, bias)?)
    }

    /// Train on columns labelled by the rule classifier.
    pub fn train_on_columns(
        &self,
        rules: &RuleClassifier,
        columns: &[ColumnMetadata],
    ) -> Result<TrainedModel, TrainError> {
        let samples = columns
            .iter()
            .map(|column| {
                let label = label_for_training(rules, column)?;
                Ok((column.search_text(), label))
            })
            .collect::<Result<Vec<_>, TrainError>>()?;
        self.train(&samples)
    }

    fn sample_weights(&self, targets: &[usize], n_classes: usize) -> Vec<f32> {
        if !self.config.balanced {
            return vec![1.0; targets.len()];
        }
        let mut counts = vec![0usize; n_classes];
        for &target in targets {
            counts[target] += 1;
        }
        let total = targets.len() as f32;
        targets
            .iter()
            .map(|&target| total / (n_classes as f32 * counts[target] as f32))
            .collect()
    }
}

/// Heuristic training label for a column, taken from the rule classifier.
pub fn label_for_training(
    rules: &RuleClassifier,
    column: &ColumnMetadata,
) -> Result<SensitivityClass, TrainError> {
    Ok(rules.classify(column)?.class)
}
