//! Declarative policy definitions loaded from TOML.
//!
//! ```toml
//! [policies.auditor]
//! description = "Internal audit exports"
//!
//! [policies.auditor.rules.PII]
//! kind = "hash"
//! algorithm = "sha512"
//! salt = "audit"
//!
//! [policies.auditor.rules.Non-Sensitive]
//! kind = "keep"
//! ```
//!
//! Class and kind names are parsed leniently (`pii`, `non_sensitive`,
//! `tokenise` are all accepted); every key other than `kind` becomes a rule
//! parameter. Two spellings of the same class in one policy, or a parameter
//! the rule's kind does not read, are rejected.

use std::collections::BTreeMap;

use pat_model::{ParamValue, SensitivityClass, TransformKind, TransformationRule, ValidationError};
use serde::{Deserialize, Serialize};

use crate::engine::{ConsumerPolicy, PolicyEngine};
use crate::error::{PolicyError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub kind: String,
    #[serde(flatten)]
    pub params: BTreeMap<String, ParamValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyDefinition {
    #[serde(default)]
    pub description: String,
    /// Rules keyed by sensitivity class name.
    pub rules: BTreeMap<String, RuleDefinition>,
}

impl PolicyDefinition {
    /// Resolve class and kind names into a rule mapping.
    pub fn to_rules(
        &self,
        consumer_type: &str,
    ) -> Result<BTreeMap<SensitivityClass, TransformationRule>> {
        let invalid = |source| PolicyError::Validation {
            consumer_type: consumer_type.to_string(),
            source,
        };

        let mut rules = BTreeMap::new();
        for (class_name, definition) in &self.rules {
            let class: SensitivityClass = class_name.parse().map_err(invalid)?;
            let kind: TransformKind = definition.kind.parse().map_err(invalid)?;
            let rule = TransformationRule {
                kind,
                params: definition.params.clone(),
            };
            if rules.insert(class, rule).is_some() {
                return Err(invalid(ValidationError::DuplicateSensitivity(
                    class.to_string(),
                )));
            }
        }
        Ok(rules)
    }
}

#[derive(Debug, Default, Deserialize)]
struct PolicyFile {
    #[serde(default)]
    policies: BTreeMap<String, PolicyDefinition>,
}

/// Parse the `[policies.<consumer>]` tables of a TOML document.
pub fn parse_definitions(text: &str) -> Result<BTreeMap<String, PolicyDefinition>> {
    let file: PolicyFile = toml::from_str(text)?;
    Ok(file.policies)
}

impl PolicyEngine {
    /// Register every definition, keyed by consumer type.
    ///
    /// Definitions are all validated before any is registered, so a bad
    /// entry leaves the engine unchanged.
    pub fn register_definitions(
        &mut self,
        definitions: &BTreeMap<String, PolicyDefinition>,
    ) -> Result<()> {
        let resolved = definitions
            .iter()
            .map(|(consumer_type, definition)| {
                let rules = definition.to_rules(consumer_type)?;
                let policy = ConsumerPolicy::new(consumer_type, rules)?;
                Ok((consumer_type.clone(), policy))
            })
            .collect::<Result<Vec<_>>>()?;

        for (consumer_type, policy) in resolved {
            self.insert_policy(consumer_type, policy);
        }
        Ok(())
    }

    /// The built-in consumer types plus the policies defined in `text`.
    ///
    /// A definition named like a built-in consumer replaces it.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let definitions = parse_definitions(text)?;
        let mut engine = Self::with_defaults();
        engine.register_definitions(&definitions)?;
        Ok(engine)
    }
}
