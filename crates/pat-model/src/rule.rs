//! Transformation rules selected by the policy engine.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::enums::TransformKind;
use crate::error::ValidationError;

/// Scalar parameter value attached to a rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl ParamValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(value) => Some(*value),
            ParamValue::Text(text) => text.trim().parse().ok(),
            ParamValue::Bool(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(value) => Some(*value),
            ParamValue::Text(text) => match text.trim().to_lowercase().as_str() {
                "true" | "yes" => Some(true),
                "false" | "no" => Some(false),
                _ => None,
            },
            ParamValue::Int(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(value) => write!(f, "{value}"),
            ParamValue::Int(value) => write!(f, "{value}"),
            ParamValue::Text(value) => write!(f, "{value}"),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(i64::from(value))
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

/// A transform kind plus its kind-specific parameters.
///
/// Parameters are kept as a sorted map so that [`canonical_params`] is
/// stable.
///
/// [`canonical_params`]: TransformationRule::canonical_params
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformationRule {
    pub kind: TransformKind,
    #[serde(default)]
    pub params: BTreeMap<String, ParamValue>,
}

impl TransformationRule {
    pub fn new(kind: TransformKind) -> Self {
        Self {
            kind,
            params: BTreeMap::new(),
        }
    }

    pub fn keep() -> Self {
        Self::new(TransformKind::Keep)
    }

    pub fn mask(reveal_prefix: i64, reveal_suffix: i64) -> Self {
        Self::new(TransformKind::Mask)
            .with_param("reveal_prefix", reveal_prefix)
            .with_param("reveal_suffix", reveal_suffix)
    }

    pub fn hash(algorithm: &str) -> Self {
        Self::new(TransformKind::Hash).with_param("algorithm", algorithm)
    }

    pub fn tokenize(token_length: i64) -> Self {
        Self::new(TransformKind::Tokenize).with_param("token_length", token_length)
    }

    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    /// Parameter names the transformer for this kind does not read.
    pub fn unknown_params(&self) -> impl Iterator<Item = &str> {
        let known = self.kind.known_params();
        self.params
            .keys()
            .map(String::as_str)
            .filter(move |name| known.is_some_and(|known| !known.iter().any(|k| k == name)))
    }

    /// Reject parameters the transformer would silently ignore.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.unknown_params().next() {
            Some(param) => Err(ValidationError::UnknownParameter {
                kind: self.kind,
                param: param.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Parameters rendered as `name=value` pairs joined by `;`, in name order.
    pub fn canonical_params(&self) -> String {
        self.params
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join(";")
    }
}

impl fmt::Display for TransformationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}({})", self.kind, self.canonical_params())
        }
    }
}
