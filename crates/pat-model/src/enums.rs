//! Closed vocabularies shared by the classifier, policy and transform crates.
//!
//! Every enum here parses case-insensitively from the spellings found in
//! metadata files and policy definitions, and renders a single canonical name.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Int,
    Float,
    String,
    Date,
    Bool,
}

impl DataType {
    /// Returns the canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Int => "int",
            DataType::Float => "float",
            DataType::String => "string",
            DataType::Date => "date",
            DataType::Bool => "bool",
        }
    }

    /// Returns true for integer and floating point columns.
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Int | DataType::Float)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DataType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();

        match normalized.as_str() {
            "int" | "integer" | "bigint" | "smallint" | "long" => Ok(DataType::Int),
            "float" | "double" | "decimal" | "numeric" | "real" => Ok(DataType::Float),
            "string" | "str" | "text" | "varchar" | "char" => Ok(DataType::String),
            "date" | "datetime" | "timestamp" => Ok(DataType::Date),
            "bool" | "boolean" => Ok(DataType::Bool),
            _ => Err(ValidationError::UnknownDataType(s.to_string())),
        }
    }
}

/// Sensitivity label assigned to a column. Exactly one per column.
///
/// Variants are declared from most to least protective, so the derived
/// ordering doubles as the tie-break order used by the classifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SensitivityClass {
    /// Personally identifiable information (names, emails, SSN, ...).
    #[serde(rename = "PII")]
    Pii,
    /// Protected health information (diagnoses, medications, ...).
    #[serde(rename = "PHI")]
    Phi,
    /// Financial, location, credential or other sensitive data.
    #[serde(rename = "Sensitive")]
    Sensitive,
    /// Public or low-sensitivity data.
    #[serde(rename = "Non-Sensitive")]
    NonSensitive,
}

impl SensitivityClass {
    /// All classes, most protective first.
    pub const ALL: [SensitivityClass; 4] = [
        SensitivityClass::Pii,
        SensitivityClass::Phi,
        SensitivityClass::Sensitive,
        SensitivityClass::NonSensitive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SensitivityClass::Pii => "PII",
            SensitivityClass::Phi => "PHI",
            SensitivityClass::Sensitive => "Sensitive",
            SensitivityClass::NonSensitive => "Non-Sensitive",
        }
    }

    /// Higher rank wins ties: PII > PHI > Sensitive > Non-Sensitive.
    pub fn protection_rank(&self) -> u8 {
        match self {
            SensitivityClass::Pii => 3,
            SensitivityClass::Phi => 2,
            SensitivityClass::Sensitive => 1,
            SensitivityClass::NonSensitive => 0,
        }
    }

    /// Position in [`SensitivityClass::ALL`].
    pub fn index(&self) -> usize {
        match self {
            SensitivityClass::Pii => 0,
            SensitivityClass::Phi => 1,
            SensitivityClass::Sensitive => 2,
            SensitivityClass::NonSensitive => 3,
        }
    }
}

impl fmt::Display for SensitivityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SensitivityClass {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_uppercase();

        match normalized.as_str() {
            "PII" => Ok(SensitivityClass::Pii),
            "PHI" => Ok(SensitivityClass::Phi),
            "SENSITIVE" => Ok(SensitivityClass::Sensitive),
            "NONSENSITIVE" => Ok(SensitivityClass::NonSensitive),
            _ => Err(ValidationError::UnknownSensitivity(s.to_string())),
        }
    }
}

/// How a classification result was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationMethod {
    Rule,
    Ml,
    Blended,
}

impl ClassificationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationMethod::Rule => "rule",
            ClassificationMethod::Ml => "ml",
            ClassificationMethod::Blended => "blended",
        }
    }
}

impl fmt::Display for ClassificationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transformation applied to a cell value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformKind {
    /// Identity.
    Keep,
    /// Partial reveal with a mask character.
    Mask,
    /// One-way digest.
    Hash,
    /// Keyed HMAC pseudonym.
    Tokenize,
    /// Grouping transform. Declared only; no implementation is registered by default.
    Aggregate,
}

impl TransformKind {
    pub const ALL: [TransformKind; 5] = [
        TransformKind::Keep,
        TransformKind::Mask,
        TransformKind::Hash,
        TransformKind::Tokenize,
        TransformKind::Aggregate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransformKind::Keep => "keep",
            TransformKind::Mask => "mask",
            TransformKind::Hash => "hash",
            TransformKind::Tokenize => "tokenize",
            TransformKind::Aggregate => "aggregate",
        }
    }

    /// Returns true when results are worth memoizing.
    pub fn is_cacheable(&self) -> bool {
        matches!(self, TransformKind::Hash | TransformKind::Tokenize)
    }

    /// Parameter names the built-in transformer for this kind reads.
    ///
    /// `None` for `aggregate`, whose parameters belong to the registered
    /// implementation.
    pub fn known_params(&self) -> Option<&'static [&'static str]> {
        match self {
            TransformKind::Keep => Some(&[]),
            TransformKind::Mask => Some(&[
                "reveal_prefix",
                "reveal_suffix",
                "mask_char",
                "preserve_email_domain",
            ]),
            TransformKind::Hash => Some(&["algorithm", "salt"]),
            TransformKind::Tokenize => Some(&["key", "token_length", "prefix"]),
            TransformKind::Aggregate => None,
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransformKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "keep" => Ok(TransformKind::Keep),
            "mask" => Ok(TransformKind::Mask),
            "hash" => Ok(TransformKind::Hash),
            "tokenize" | "tokenise" => Ok(TransformKind::Tokenize),
            "aggregate" => Ok(TransformKind::Aggregate),
            _ => Err(ValidationError::UnknownTransformKind(s.to_string())),
        }
    }
}
