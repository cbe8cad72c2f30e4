//! Pattern-table classification of column metadata.
//!
//! Each [`PatternRule`] contributes its weight to a class score when its
//! regular expression matches the column's search text (see
//! [`ColumnMetadata::search_text`]). The class with the highest score wins,
//! ties going to the more protective class. The reported confidence is the
//! strongest single matching weight of the winning class, so a column that
//! trips several weak patterns does not end up with inflated confidence.

use pat_model::{ClassificationMethod, ClassificationResult, ColumnMetadata, SensitivityClass};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ClassifyError;

/// Confidence reported when no pattern matches.
pub const NO_MATCH_CONFIDENCE: f32 = 0.5;

/// Reasoning reported when no pattern matches.
pub const NO_MATCH_REASONING: &str = "no pattern matched";

/// A single entry of the pattern table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternRule {
    pub class: SensitivityClass,
    /// Short label used in the reasoning trace (e.g. "email").
    pub name: String,
    /// Regular expression matched against the normalized search text.
    pub pattern: String,
    /// Confidence contributed when the pattern matches.
    pub weight: f32,
}

impl PatternRule {
    pub fn new(class: SensitivityClass, name: &str, pattern: &str, weight: f32) -> Self {
        Self {
            class,
            name: name.to_string(),
            pattern: pattern.to_string(),
            weight,
        }
    }
}

/// One rule that matched a search text.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleMatch {
    pub class: SensitivityClass,
    pub rule_name: String,
    pub weight: f32,
}

#[derive(Debug, Clone)]
struct CompiledRule {
    class: SensitivityClass,
    name: String,
    regex: Regex,
    weight: f32,
}

/// Classifier driven by a static table of weighted patterns.
#[derive(Debug, Clone)]
pub struct RuleClassifier {
    rules: Vec<CompiledRule>,
}

impl RuleClassifier {
    /// Compile a pattern table.
    pub fn new(rules: &[PatternRule]) -> Result<Self, ClassifyError> {
        let compiled = rules
            .iter()
            .map(|rule| {
                let regex = Regex::new(&rule.pattern).map_err(|source| {
                    ClassifyError::InvalidPattern {
                        rule: rule.name.clone(),
                        source,
                    }
                })?;
                Ok(CompiledRule {
                    class: rule.class,
                    name: rule.name.clone(),
                    regex,
                    weight: pat_model::clamp_confidence(rule.weight),
                })
            })
            .collect::<Result<Vec<_>, ClassifyError>>()?;

        Ok(Self { rules: compiled })
    }

    /// Classifier over [`default_pattern_rules`].
    pub fn with_default_rules() -> Result<Self, ClassifyError> {
        Self::new(&default_pattern_rules())
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Classify a column from its name, description and declared type.
    ///
    /// Fails only when the column name is empty.
    pub fn classify(&self, column: &ColumnMetadata) -> Result<ClassificationResult, ClassifyError> {
        column.validate()?;
        let result = self.classify_text(&column.name, &column.search_text());
        debug!(
            column = %column.name,
            class = %result.class,
            confidence = result.confidence,
            "rule classification"
        );
        Ok(result)
    }

    /// Classify an already normalized search text.
    pub fn classify_text(&self, column_name: &str, search_text: &str) -> ClassificationResult {
        let matches = self.matches(search_text);

        let mut scores = [0.0f32; 4];
        for found in &matches {
            scores[found.class.index()] += found.weight;
        }

        let mut winner: Option<SensitivityClass> = None;
        for class in SensitivityClass::ALL {
            let score = scores[class.index()];
            if score <= 0.0 {
                continue;
            }
            // ALL is in protection order, so only a strictly higher score
            // displaces an earlier class.
            match winner {
                Some(best) if scores[best.index()] >= score => {}
                _ => winner = Some(class),
            }
        }

        let Some(class) = winner else {
            return ClassificationResult::new(
                column_name,
                SensitivityClass::NonSensitive,
                NO_MATCH_CONFIDENCE,
                NO_MATCH_REASONING,
                ClassificationMethod::Rule,
            );
        };

        let winning: Vec<&RuleMatch> = matches.iter().filter(|m| m.class == class).collect();
        let confidence = winning.iter().map(|m| m.weight).fold(0.0f32, f32::max);
        let trace = winning
            .iter()
            .map(|m| format!("{} ({:.2})", m.rule_name, m.weight))
            .collect::<Vec<_>>()
            .join(", ");

        ClassificationResult::new(
            column_name,
            class,
            confidence,
            format!("matched {class} patterns: {trace}"),
            ClassificationMethod::Rule,
        )
    }

    /// Every rule whose pattern matches `search_text`, in table order.
    pub fn matches(&self, search_text: &str) -> Vec<RuleMatch> {
        self.rules
            .iter()
            .filter(|rule| rule.regex.is_match(search_text))
            .map(|rule| RuleMatch {
                class: rule.class,
                rule_name: rule.name.clone(),
                weight: rule.weight,
            })
            .collect()
    }
}

/// The built-in pattern table.
///
/// Patterns are written against normalized search text: camelCase split,
/// lower case, with `_ - . /` already turned into single spaces. Direct
/// identifier markers are unanchored so that run-together names such as
/// `homephone` or `userssn` still match; short markers that would hit
/// unrelated words (`tel`, `fax`, `dob`, `iban`, `name`) keep word
/// boundaries.
pub fn default_pattern_rules() -> Vec<PatternRule> {
    use SensitivityClass::{NonSensitive, Phi, Pii, Sensitive};

    vec![
        // Direct identifiers
        PatternRule::new(Pii, "ssn", r"(ssn|social ?security)", 0.9),
        PatternRule::new(Pii, "credit card", r"(credit ?card|cc ?number|card ?number)", 0.9),
        PatternRule::new(
            Pii,
            "identity document",
            r"(passport|drivers? ?licen[cs]e|national ?id\b)",
            0.9,
        ),
        PatternRule::new(Pii, "email", r"e ?mail", 0.85),
        PatternRule::new(
            Pii,
            "phone",
            r"(phone|\btel\b|mobile|\bfax\b|contact ?number)",
            0.85,
        ),
        PatternRule::new(Pii, "date of birth", r"(\bdob\b|date ?of ?birth|birth ?date|birthday)", 0.85),
        PatternRule::new(Pii, "address", r"\b(address|street|residence)", 0.8),
        PatternRule::new(Pii, "account number", r"(account ?number|acct ?number|\biban\b)", 0.8),
        PatternRule::new(
            Pii,
            "person name",
            r"(first ?name|last ?name|full ?name|surname|given ?name|\bname\b)",
            0.75,
        ),
        // Health
        PatternRule::new(Phi, "diagnosis", r"\b(diagnosis|diagnoses|medical ?condition|icd ?code)\b", 0.9),
        PatternRule::new(
            Phi,
            "medical record",
            r"\b(medical ?record|patient ?record|health ?record|mrn)\b",
            0.9,
        ),
        PatternRule::new(Phi, "medication", r"\b(medication|medicine|drug|prescription|dosage)\b", 0.85),
        PatternRule::new(Phi, "lab result", r"\b(laboratory|lab ?result|lab ?test)\b", 0.8),
        PatternRule::new(Phi, "treatment", r"\b(procedure|surgery|treatment|therapy)\b", 0.7),
        PatternRule::new(Phi, "health domain", r"\b(patient|health|medical|clinical)\b", 0.6),
        // Sensitive
        PatternRule::new(
            Sensitive,
            "device identifier",
            r"\b(ip ?address|mac ?address|device ?id|imei)\b",
            0.85,
        ),
        PatternRule::new(
            Sensitive,
            "credential",
            r"\b(password|passwd|secret|token|api ?key|credential)\b",
            0.85,
        ),
        PatternRule::new(
            Sensitive,
            "demographic",
            r"\b(religion|ethnicity|race|gender|sexual ?orientation)\b",
            0.8,
        ),
        PatternRule::new(
            Sensitive,
            "location",
            r"\b(zip ?code|postal ?code|postcode|location|latitude|longitude)\b",
            0.75,
        ),
        PatternRule::new(
            Sensitive,
            "financial amount",
            r"\b(salary|income|wages?|payment|amount|price|cost|revenue)\b",
            0.7,
        ),
        PatternRule::new(
            Sensitive,
            "financial",
            r"\b(bank|account|balance|transaction|financial)\b",
            0.65,
        ),
        // Operational metadata
        PatternRule::new(
            NonSensitive,
            "operational",
            r"\b(created ?at|updated ?at|modified ?at|status|category|quantity|count|flag)\b",
            0.6,
        ),
    ]
}
