//! Consumer-type policies and rule lookup.
//!
//! A policy maps every [`SensitivityClass`] to one [`TransformationRule`] for
//! a given consumer type. Registration refuses incomplete mappings, so a
//! registered consumer can always answer for all four classes.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use pat_model::{SensitivityClass, TransformationRule};
use tracing::debug;

use crate::error::{PolicyError, Result};

pub const INTERNAL_ANALYST: &str = "internal_analyst";
pub const EXTERNAL_PARTNER: &str = "external_partner";
pub const REPORTING: &str = "reporting";
pub const PUBLIC: &str = "public";

/// Complete class-to-rule mapping for one consumer type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerPolicy {
    rules: BTreeMap<SensitivityClass, TransformationRule>,
}

impl ConsumerPolicy {
    /// Build a policy, rejecting mappings that leave a class uncovered or
    /// carry parameters the transformer would ignore.
    pub fn new(
        consumer_type: &str,
        rules: BTreeMap<SensitivityClass, TransformationRule>,
    ) -> Result<Self> {
        for rule in rules.values() {
            rule.validate().map_err(|source| PolicyError::Validation {
                consumer_type: consumer_type.to_string(),
                source,
            })?;
        }
        let missing: Vec<SensitivityClass> = SensitivityClass::ALL
            .iter()
            .copied()
            .filter(|class| !rules.contains_key(class))
            .collect();
        if !missing.is_empty() {
            return Err(PolicyError::Incomplete {
                consumer_type: consumer_type.to_string(),
                missing,
            });
        }
        Ok(Self { rules })
    }

    pub fn rule(&self, sensitivity: SensitivityClass) -> Option<&TransformationRule> {
        self.rules.get(&sensitivity)
    }

    /// Rules in protection order.
    pub fn iter(&self) -> impl Iterator<Item = (SensitivityClass, &TransformationRule)> {
        self.rules.iter().map(|(class, rule)| (*class, rule))
    }
}

/// Registry of consumer policies.
#[derive(Debug, Clone, Default)]
pub struct PolicyEngine {
    policies: BTreeMap<String, ConsumerPolicy>,
}

impl PolicyEngine {
    /// An engine with no consumer types registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine with the built-in consumer types.
    ///
    /// | consumer | PII / PHI | Sensitive | Non-Sensitive |
    /// |---|---|---|---|
    /// | `internal_analyst` | tokenize, 16 chars | mask, reveal 1/1 | keep |
    /// | `external_partner` | hash sha256 | mask, reveal 0/0 | keep |
    /// | `reporting` | mask, reveal 0/0 | mask, reveal 1/1 | keep |
    /// | `public` | hash sha512 | mask, reveal 0/0 | keep |
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        for (consumer_type, policy) in default_policies() {
            engine.policies.insert(consumer_type.to_string(), policy);
        }
        engine
    }

    /// Register or replace the policy for `consumer_type`.
    pub fn register_policy(
        &mut self,
        consumer_type: impl Into<String>,
        rules: BTreeMap<SensitivityClass, TransformationRule>,
    ) -> Result<()> {
        let consumer_type = consumer_type.into();
        let policy = ConsumerPolicy::new(&consumer_type, rules)?;
        self.insert_policy(consumer_type, policy);
        Ok(())
    }

    pub(crate) fn insert_policy(&mut self, consumer_type: String, policy: ConsumerPolicy) {
        debug!(consumer_type = %consumer_type, "registered policy");
        if self.policies.insert(consumer_type, policy).is_some() {
            debug!("replaced existing policy");
        }
    }

    /// Look up the rule for a class and consumer type.
    pub fn get_rule(
        &self,
        sensitivity: SensitivityClass,
        consumer_type: &str,
    ) -> Result<&TransformationRule> {
        let policy = self.get_policy(consumer_type)?;
        let rule = policy.rule(sensitivity).ok_or_else(|| PolicyError::NotFound {
            consumer_type: consumer_type.to_string(),
            sensitivity: Some(sensitivity),
        })?;
        debug!(consumer_type, sensitivity = %sensitivity, rule = %rule, "resolved rule");
        Ok(rule)
    }

    pub fn get_policy(&self, consumer_type: &str) -> Result<&ConsumerPolicy> {
        self.policies
            .get(consumer_type)
            .ok_or_else(|| PolicyError::NotFound {
                consumer_type: consumer_type.to_string(),
                sensitivity: None,
            })
    }

    /// Registered consumer types in name order.
    pub fn consumer_types(&self) -> impl Iterator<Item = &str> {
        self.policies.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// One line per consumer type listing its rule for each class.
    pub fn render_matrix(&self) -> String {
        let mut out = String::new();
        for (consumer_type, policy) in &self.policies {
            let _ = write!(out, "{consumer_type}:");
            for (class, rule) in policy.iter() {
                let _ = write!(out, " {class}={rule}");
            }
            out.push('\n');
        }
        out
    }
}

fn default_policies() -> Vec<(&'static str, ConsumerPolicy)> {
    use SensitivityClass::{NonSensitive, Phi, Pii, Sensitive};

    let policy = |identifying: TransformationRule, sensitive: TransformationRule| ConsumerPolicy {
        rules: BTreeMap::from([
            (Pii, identifying.clone()),
            (Phi, identifying),
            (Sensitive, sensitive),
            (NonSensitive, TransformationRule::keep()),
        ]),
    };

    vec![
        (
            INTERNAL_ANALYST,
            policy(TransformationRule::tokenize(16), TransformationRule::mask(1, 1)),
        ),
        (
            EXTERNAL_PARTNER,
            policy(TransformationRule::hash("sha256"), TransformationRule::mask(0, 0)),
        ),
        (
            REPORTING,
            policy(TransformationRule::mask(0, 0), TransformationRule::mask(1, 1)),
        ),
        (
            PUBLIC,
            policy(TransformationRule::hash("sha512"), TransformationRule::mask(0, 0)),
        ),
    ]
}
