use pat_model::{DataType, SensitivityClass, TransformKind, TransformationRule, Value};
use pat_policy::PolicyEngine;
use tracing::{debug, trace};

use crate::cache::{CacheKey, CacheStats, TransformCache};
use crate::canonical::canonicalize;
use crate::error::Result;
use crate::keys::KeyRing;
use crate::transformer::{TransformContext, Transformer, TransformerRegistry};

/// Applies policy-selected transformations to cell values.
///
/// `TransformEngine` is `Send + Sync`; the policy engine, registry and key
/// ring are read-only after construction and the cache is mutex-guarded.
#[derive(Debug)]
pub struct TransformEngine {
    policies: PolicyEngine,
    registry: TransformerRegistry,
    keys: KeyRing,
    cache: TransformCache,
}

impl TransformEngine {
    pub fn new(policies: PolicyEngine, keys: KeyRing) -> Self {
        Self {
            policies,
            registry: TransformerRegistry::with_builtins(),
            keys,
            cache: TransformCache::new(),
        }
    }

    /// Register an implementation for `aggregate` rules.
    #[must_use]
    pub fn with_aggregator(self, aggregator: impl Transformer + 'static) -> Self {
        debug_assert_eq!(aggregator.kind(), TransformKind::Aggregate);
        self.with_transformer(aggregator)
    }

    /// Register or replace the transformer for its kind.
    #[must_use]
    pub fn with_transformer(mut self, transformer: impl Transformer + 'static) -> Self {
        self.registry.register(Box::new(transformer));
        self
    }

    pub fn policies(&self) -> &PolicyEngine {
        &self.policies
    }

    pub fn registry(&self) -> &TransformerRegistry {
        &self.registry
    }

    /// Transform one cell according to the policy for `(sensitivity, consumer_type)`.
    pub fn transform(
        &self,
        value: &Value,
        sensitivity: SensitivityClass,
        consumer_type: &str,
        data_type: DataType,
    ) -> Result<Value> {
        let rule = self.policies.get_rule(sensitivity, consumer_type)?;
        self.apply_rule(value, rule, data_type)
    }

    /// Transform a whole column, resolving the rule once.
    pub fn transform_column(
        &self,
        values: &[Value],
        sensitivity: SensitivityClass,
        consumer_type: &str,
        data_type: DataType,
    ) -> Result<Vec<Value>> {
        let rule = self.policies.get_rule(sensitivity, consumer_type)?;
        debug!(
            consumer_type,
            sensitivity = %sensitivity,
            rule = %rule,
            cells = values.len(),
            "transforming column"
        );
        values
            .iter()
            .map(|value| self.apply_rule(value, rule, data_type))
            .collect()
    }

    /// Apply `rule` directly, bypassing policy lookup.
    ///
    /// Null cells and empty text pass through unchanged. `hash` and
    /// `tokenize` outputs are served from the cache when possible.
    pub fn apply_rule(
        &self,
        value: &Value,
        rule: &TransformationRule,
        data_type: DataType,
    ) -> Result<Value> {
        let transformer = self.registry.get(rule.kind)?;
        if is_passthrough(value) {
            return Ok(value.clone());
        }

        let ctx = TransformContext {
            data_type,
            keys: &self.keys,
        };
        if !rule.kind.is_cacheable() {
            return transformer.transform(value, rule, &ctx);
        }

        let key = CacheKey::new(rule, canonicalize(value, data_type));
        trace!(kind = %rule.kind, "cached transform lookup");
        self.cache
            .get_or_try_insert_with(key, || transformer.transform(value, rule, &ctx))
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

fn is_passthrough(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Text(text) => text.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransformError;
    use crate::keys::SecretKey;
    use pat_policy::{EXTERNAL_PARTNER, INTERNAL_ANALYST, REPORTING};

    fn engine() -> TransformEngine {
        TransformEngine::new(
            PolicyEngine::with_defaults(),
            KeyRing::new().with_key("default", SecretKey::new("unit-test-key")),
        )
    }

    #[test]
    fn null_and_empty_pass_through() {
        let engine = engine();
        for class in SensitivityClass::ALL {
            let out = engine
                .transform(&Value::Null, class, EXTERNAL_PARTNER, DataType::String)
                .unwrap();
            assert_eq!(out, Value::Null);
            let out = engine
                .transform(&Value::from(""), class, INTERNAL_ANALYST, DataType::String)
                .unwrap();
            assert_eq!(out, Value::from(""));
        }
    }

    #[test]
    fn keep_preserves_variant() {
        let out = engine()
            .transform(&Value::Int(5), SensitivityClass::NonSensitive, REPORTING, DataType::Int)
            .unwrap();
        assert_eq!(out, Value::Int(5));
    }

    #[test]
    fn hash_widens_to_text() {
        let out = engine()
            .transform(&Value::Int(5), SensitivityClass::Pii, EXTERNAL_PARTNER, DataType::Int)
            .unwrap();
        assert!(matches!(out, Value::Text(ref digest) if digest.len() == 64));
    }

    #[test]
    fn aggregate_without_implementation_is_unsupported() {
        let rule = TransformationRule::new(TransformKind::Aggregate);
        let err = engine()
            .apply_rule(&Value::Int(5), &rule, DataType::Int)
            .unwrap_err();
        assert!(matches!(
            err,
            TransformError::UnsupportedTransform {
                kind: TransformKind::Aggregate
            }
        ));
    }

    #[test]
    fn only_hash_and_tokenize_are_cached() {
        let engine = engine();
        let value = Value::from("john");
        engine
            .transform(&value, SensitivityClass::Pii, EXTERNAL_PARTNER, DataType::String)
            .unwrap();
        engine
            .transform(&value, SensitivityClass::Pii, EXTERNAL_PARTNER, DataType::String)
            .unwrap();
        engine
            .transform(&value, SensitivityClass::Sensitive, REPORTING, DataType::String)
            .unwrap();
        assert_eq!(
            engine.cache_stats(),
            CacheStats {
                entries: 1,
                hits: 1,
                misses: 1
            }
        );
        engine.clear_cache();
        assert_eq!(engine.cache_stats().entries, 0);
    }

    #[test]
    fn engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TransformEngine>();
    }
}
