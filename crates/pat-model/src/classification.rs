//! Classification results produced per column.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::{ClassificationMethod, SensitivityClass};

/// Outcome of classifying one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub column_name: String,
    pub class: SensitivityClass,
    /// Always within `0.0..=1.0`.
    pub confidence: f32,
    /// Human-readable trace of the matched patterns or model features.
    pub reasoning: String,
    pub method: ClassificationMethod,
}

impl ClassificationResult {
    /// Build a result, clamping `confidence` into `0.0..=1.0` (NaN becomes 0.0).
    pub fn new(
        column_name: impl Into<String>,
        class: SensitivityClass,
        confidence: f32,
        reasoning: impl Into<String>,
        method: ClassificationMethod,
    ) -> Self {
        Self {
            column_name: column_name.into(),
            class,
            confidence: clamp_confidence(confidence),
            reasoning: reasoning.into(),
            method,
        }
    }

    #[must_use]
    pub fn with_method(mut self, method: ClassificationMethod) -> Self {
        self.method = method;
        self
    }
}

/// Clamp a score into the valid confidence range.
pub fn clamp_confidence(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Count of columns per sensitivity class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationSummary {
    counts: BTreeMap<SensitivityClass, usize>,
}

impl ClassificationSummary {
    pub fn from_results<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a ClassificationResult>,
    {
        let mut counts: BTreeMap<SensitivityClass, usize> =
            SensitivityClass::ALL.iter().map(|class| (*class, 0)).collect();
        for result in results {
            *counts.entry(result.class).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn count(&self, class: SensitivityClass) -> usize {
        self.counts.get(&class).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Counts in protection order, zero entries included.
    pub fn iter(&self) -> impl Iterator<Item = (SensitivityClass, usize)> + '_ {
        SensitivityClass::ALL
            .into_iter()
            .map(|class| (class, self.count(class)))
    }
}
