//! Trained statistical model handle and its on-disk artifact.
//!
//! A [`TrainedModel`] bundles the TF-IDF [`FeatureExtractor`] with a
//! multinomial logistic-regression layer (one weight row and bias per class).
//! The artifact is a JSON document; its layout is private to this crate and
//! versioned by `format_version`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use pat_model::SensitivityClass;
use serde::{Deserialize, Serialize};

use crate::error::ModelLoadError;
use crate::features::FeatureExtractor;

/// Artifact layout version written by [`TrainedModel::save`].
pub const FORMAT_VERSION: u32 = 1;

/// A class prediction with its probability mass.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub class: SensitivityClass,
    /// Probability of `class`, in `0.0..=1.0`.
    pub confidence: f32,
    /// Probability per class known to the model, in model class order.
    pub probabilities: Vec<(SensitivityClass, f32)>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ModelArtifact {
    format_version: u32,
    classes: Vec<SensitivityClass>,
    ngram_max: usize,
    vocabulary: Vec<String>,
    idf: Vec<f32>,
    weights: Vec<Vec<f32>>,
    bias: Vec<f32>,
}

/// Text-feature extractor plus probabilistic classifier over [`SensitivityClass`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedModel {
    extractor: FeatureExtractor,
    classes: Vec<SensitivityClass>,
    weights: Vec<Vec<f32>>,
    bias: Vec<f32>,
}

impl TrainedModel {
    /// Assemble a model, checking that all dimensions line up.
    pub fn new(
        extractor: FeatureExtractor,
        classes: Vec<SensitivityClass>,
        weights: Vec<Vec<f32>>,
        bias: Vec<f32>,
    ) -> Result<Self, ModelLoadError> {
        if classes.is_empty() {
            return Err(ModelLoadError::invalid("model has no classes"));
        }
        let mut seen = classes.clone();
        seen.sort();
        seen.dedup();
        if seen.len() != classes.len() {
            return Err(ModelLoadError::invalid("model lists a class more than once"));
        }
        if weights.len() != classes.len() || bias.len() != classes.len() {
            return Err(ModelLoadError::invalid(format!(
                "expected {} weight rows and biases, found {} and {}",
                classes.len(),
                weights.len(),
                bias.len()
            )));
        }
        if let Some(row) = weights.iter().find(|row| row.len() != extractor.len()) {
            return Err(ModelLoadError::invalid(format!(
                "weight row has {} entries for a vocabulary of {}",
                row.len(),
                extractor.len()
            )));
        }
        let all_finite = weights.iter().flatten().chain(bias.iter()).all(|v| v.is_finite());
        if !all_finite {
            return Err(ModelLoadError::invalid("model contains non-finite coefficients"));
        }

        Ok(Self {
            extractor,
            classes,
            weights,
            bias,
        })
    }

    /// Read a model artifact from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelLoadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ModelLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// Parse an artifact held in memory.
    pub fn from_json(text: &str) -> Result<Self, ModelLoadError> {
        Self::parse(text, Path::new("<memory>"))
    }

    fn parse(text: &str, path: &Path) -> Result<Self, ModelLoadError> {
        let artifact: ModelArtifact =
            serde_json::from_str(text).map_err(|source| ModelLoadError::Parse {
                path: PathBuf::from(path),
                source,
            })?;
        if artifact.format_version != FORMAT_VERSION {
            return Err(ModelLoadError::invalid(format!(
                "unsupported format version {} (expected {FORMAT_VERSION})",
                artifact.format_version
            )));
        }
        let extractor =
            FeatureExtractor::new(artifact.vocabulary, artifact.idf, artifact.ngram_max)
                .ok_or_else(|| ModelLoadError::invalid("vocabulary and idf do not line up"))?;
        Self::new(extractor, artifact.classes, artifact.weights, artifact.bias)
    }

    /// Serialize the model as a JSON artifact.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let artifact = ModelArtifact {
            format_version: FORMAT_VERSION,
            classes: self.classes.clone(),
            ngram_max: self.extractor.ngram_max(),
            vocabulary: self.extractor.vocabulary().to_vec(),
            idf: self.extractor.idf().to_vec(),
            weights: self.weights.clone(),
            bias: self.bias.clone(),
        };
        serde_json::to_string_pretty(&artifact)
    }

    /// Write the artifact, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let json = self.to_json().map_err(io::Error::other)?;
        fs::write(path, json)
    }

    pub fn classes(&self) -> &[SensitivityClass] {
        &self.classes
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    /// Softmax probabilities for each model class.
    pub fn predict_proba(&self, text: &str) -> Vec<(SensitivityClass, f32)> {
        let features = self.extractor.transform(text);
        let logits: Vec<f32> = self
            .weights
            .iter()
            .zip(&self.bias)
            .map(|(row, bias)| dot(row, &features) + bias)
            .collect();
        self.classes
            .iter()
            .copied()
            .zip(softmax(&logits))
            .collect()
    }

    /// Most probable class; ties go to the more protective class.
    pub fn predict(&self, text: &str) -> Prediction {
        let probabilities = self.predict_proba(text);
        let mut best = probabilities[0];
        for &(class, probability) in &probabilities[1..] {
            let better = probability > best.1
                || (probability == best.1 && class.protection_rank() > best.0.protection_rank());
            if better {
                best = (class, probability);
            }
        }
        Prediction {
            class: best.0,
            confidence: pat_model::clamp_confidence(best.1),
            probabilities,
        }
    }

    /// Vocabulary terms ordered by mean absolute coefficient across classes.
    pub fn feature_importances(&self) -> Vec<(String, f32)> {
        let n_classes = self.weights.len() as f32;
        let mut importances: Vec<(String, f32)> = self
            .extractor
            .vocabulary()
            .iter()
            .enumerate()
            .map(|(idx, term)| {
                let total: f32 = self.weights.iter().map(|row| row[idx].abs()).sum();
                (term.clone(), total / n_classes)
            })
            .collect();
        importances.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        importances
    }
}

pub(crate) fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

pub(crate) fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|z| (z - max).exp()).collect();
    let total: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}
