use pat_model::{ClassificationResult, ClassificationSummary, ColumnMetadata};
use tracing::debug;

use crate::blend::{DEFAULT_BLEND_THRESHOLD, blend};
use crate::error::ClassifyError;
use crate::rules::RuleClassifier;
use crate::statistical::StatisticalClassifier;

/// Rule classification with an optional statistical second opinion.
#[derive(Debug, Clone)]
pub struct SensitivityClassifier {
    rules: RuleClassifier,
    statistical: Option<StatisticalClassifier>,
    threshold: f32,
}

impl SensitivityClassifier {
    pub fn new(rules: RuleClassifier, statistical: Option<StatisticalClassifier>) -> Self {
        Self {
            rules,
            statistical,
            threshold: DEFAULT_BLEND_THRESHOLD,
        }
    }

    /// Default pattern table, no statistical model.
    pub fn rule_only() -> Result<Self, ClassifyError> {
        Ok(Self::new(RuleClassifier::with_default_rules()?, None))
    }

    #[must_use]
    pub fn with_statistical(mut self, statistical: StatisticalClassifier) -> Self {
        self.statistical = Some(statistical);
        self
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = pat_model::clamp_confidence(threshold);
        self
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn rules(&self) -> &RuleClassifier {
        &self.rules
    }

    pub fn statistical(&self) -> Option<&StatisticalClassifier> {
        self.statistical.as_ref()
    }

    pub fn classify(&self, column: &ColumnMetadata) -> Result<ClassificationResult, ClassifyError> {
        let rule_result = self.rules.classify(column)?;
        if rule_result.confidence >= self.threshold {
            return Ok(rule_result);
        }

        let prediction = self
            .statistical
            .as_ref()
            .and_then(|statistical| statistical.predict(column));
        let result = blend(rule_result, prediction.as_ref(), self.threshold);
        debug!(
            column = %column.name,
            class = %result.class,
            confidence = result.confidence,
            method = %result.method,
            "classified column"
        );
        Ok(result)
    }

    /// Classify every column; output is index-aligned with `columns`.
    pub fn classify_all(
        &self,
        columns: &[ColumnMetadata],
    ) -> Result<Vec<ClassificationResult>, ClassifyError> {
        columns.iter().map(|column| self.classify(column)).collect()
    }

    pub fn summarize(results: &[ClassificationResult]) -> ClassificationSummary {
        ClassificationSummary::from_results(results)
    }
}
