//! Combining a rule result with an optional statistical prediction.

use pat_model::{ClassificationMethod, ClassificationResult};

use crate::model::Prediction;

/// Rule confidence at or above which the statistical model is not consulted.
pub const DEFAULT_BLEND_THRESHOLD: f32 = 0.8;

/// Merge a rule result with a statistical prediction.
///
/// - rule confidence `>= threshold`, or no prediction: the rule result.
/// - same class: mean confidence, method [`ClassificationMethod::Blended`].
/// - different class and strictly more confident prediction: the prediction.
/// - otherwise the rule result.
pub fn blend(
    rule: ClassificationResult,
    prediction: Option<&Prediction>,
    threshold: f32,
) -> ClassificationResult {
    if rule.confidence >= threshold {
        return rule;
    }
    let Some(prediction) = prediction else {
        return rule;
    };

    if prediction.class == rule.class {
        let confidence = (rule.confidence + prediction.confidence) / 2.0;
        let reasoning = format!(
            "{}; model agrees ({:.2})",
            rule.reasoning, prediction.confidence
        );
        return ClassificationResult::new(
            rule.column_name,
            rule.class,
            confidence,
            reasoning,
            ClassificationMethod::Blended,
        );
    }

    if prediction.confidence > rule.confidence {
        let reasoning = format!(
            "model predicts {} ({:.2}) over rule {} ({:.2})",
            prediction.class, prediction.confidence, rule.class, rule.confidence
        );
        return ClassificationResult::new(
            rule.column_name,
            prediction.class,
            prediction.confidence,
            reasoning,
            ClassificationMethod::Ml,
        );
    }

    rule
}

#[cfg(test)]
mod tests {
    use super::*;
    use pat_model::SensitivityClass;

    fn rule(class: SensitivityClass, confidence: f32) -> ClassificationResult {
        ClassificationResult::new("col", class, confidence, "rule trace", ClassificationMethod::Rule)
    }

    fn prediction(class: SensitivityClass, confidence: f32) -> Prediction {
        Prediction {
            class,
            confidence,
            probabilities: vec![(class, confidence)],
        }
    }

    #[test]
    fn confident_rule_wins_outright() {
        let ml = prediction(SensitivityClass::Phi, 0.99);
        let out = blend(rule(SensitivityClass::Pii, 0.85), Some(&ml), DEFAULT_BLEND_THRESHOLD);
        assert_eq!(out.class, SensitivityClass::Pii);
        assert_eq!(out.method, ClassificationMethod::Rule);
        assert_eq!(out.confidence, 0.85);
    }

    #[test]
    fn missing_prediction_keeps_rule() {
        let out = blend(rule(SensitivityClass::NonSensitive, 0.5), None, DEFAULT_BLEND_THRESHOLD);
        assert_eq!(out.method, ClassificationMethod::Rule);
        assert_eq!(out.confidence, 0.5);
    }

    #[test]
    fn agreement_averages_confidence() {
        let ml = prediction(SensitivityClass::Phi, 0.9);
        let out = blend(rule(SensitivityClass::Phi, 0.6), Some(&ml), DEFAULT_BLEND_THRESHOLD);
        assert_eq!(out.class, SensitivityClass::Phi);
        assert_eq!(out.method, ClassificationMethod::Blended);
        assert!((out.confidence - 0.75).abs() < 1e-6);
        assert!(out.reasoning.starts_with("rule trace"));
    }

    #[test]
    fn stronger_disagreeing_model_wins() {
        let ml = prediction(SensitivityClass::Pii, 0.7);
        let out = blend(rule(SensitivityClass::NonSensitive, 0.5), Some(&ml), DEFAULT_BLEND_THRESHOLD);
        assert_eq!(out.class, SensitivityClass::Pii);
        assert_eq!(out.method, ClassificationMethod::Ml);
        assert_eq!(out.confidence, 0.7);
    }

    #[test]
    fn equal_confidence_disagreement_keeps_rule() {
        let ml = prediction(SensitivityClass::Pii, 0.6);
        let out = blend(rule(SensitivityClass::Sensitive, 0.6), Some(&ml), DEFAULT_BLEND_THRESHOLD);
        assert_eq!(out.class, SensitivityClass::Sensitive);
        assert_eq!(out.method, ClassificationMethod::Rule);
    }
}
