//! Transformer trait and the kind-indexed registry.
//!
//! Every [`TransformKind`] maps to at most one [`Transformer`]. The built-in
//! registry covers `keep`, `mask`, `hash` and `tokenize`; `aggregate` has no
//! default implementation and must be supplied by the caller.
//!
//! # Example
//!
//! ```ignore
//! struct BucketAggregator;
//!
//! impl Transformer for BucketAggregator {
//!     fn kind(&self) -> TransformKind {
//!         TransformKind::Aggregate
//!     }
//!
//!     fn transform(
//!         &self,
//!         input: &Value,
//!         rule: &TransformationRule,
//!         ctx: &TransformContext<'_>,
//!     ) -> Result<Value> {
//!         // bucket numeric values
//!     }
//! }
//!
//! let engine = TransformEngine::new(policies, keys).with_aggregator(BucketAggregator);
//! ```

use std::collections::HashMap;

use pat_model::{DataType, TransformKind, TransformationRule, Value};

use crate::error::{Result, TransformError};
use crate::hash::HashTransformer;
use crate::keys::KeyRing;
use crate::mask::MaskTransformer;
use crate::params;
use crate::tokenize::TokenizeTransformer;

/// Inputs shared by every transformer call.
#[derive(Debug, Clone, Copy)]
pub struct TransformContext<'a> {
    /// Declared type of the column being transformed.
    pub data_type: DataType,
    pub keys: &'a KeyRing,
}

/// One transformation kind.
///
/// Implementations never see null cells or empty text; the engine passes
/// those through unchanged.
pub trait Transformer: Send + Sync {
    fn kind(&self) -> TransformKind;

    fn transform(
        &self,
        input: &Value,
        rule: &TransformationRule,
        ctx: &TransformContext<'_>,
    ) -> Result<Value>;
}

/// Identity transform.
pub struct KeepTransformer;

impl Transformer for KeepTransformer {
    fn kind(&self) -> TransformKind {
        TransformKind::Keep
    }

    fn transform(
        &self,
        input: &Value,
        rule: &TransformationRule,
        _ctx: &TransformContext<'_>,
    ) -> Result<Value> {
        params::reject_unknown(rule)?;
        Ok(input.clone())
    }
}

/// Transformers indexed by kind.
pub struct TransformerRegistry {
    transformers: HashMap<TransformKind, Box<dyn Transformer>>,
}

impl TransformerRegistry {
    pub fn empty() -> Self {
        Self {
            transformers: HashMap::new(),
        }
    }

    /// Registry with `keep`, `mask`, `hash` and `tokenize`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(KeepTransformer));
        registry.register(Box::new(MaskTransformer));
        registry.register(Box::new(HashTransformer));
        registry.register(Box::new(TokenizeTransformer));
        registry
    }

    /// Register a transformer under its own kind, replacing any existing one.
    pub fn register(&mut self, transformer: Box<dyn Transformer>) {
        self.transformers.insert(transformer.kind(), transformer);
    }

    pub fn get(&self, kind: TransformKind) -> Result<&dyn Transformer> {
        self.transformers
            .get(&kind)
            .map(|transformer| transformer.as_ref())
            .ok_or(TransformError::UnsupportedTransform { kind })
    }

    pub fn contains(&self, kind: TransformKind) -> bool {
        self.transformers.contains_key(&kind)
    }

    /// Registered kinds in declaration order.
    pub fn kinds(&self) -> Vec<TransformKind> {
        TransformKind::ALL
            .iter()
            .copied()
            .filter(|kind| self.contains(*kind))
            .collect()
    }
}

impl Default for TransformerRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for TransformerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformerRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_leave_aggregate_unregistered() {
        let registry = TransformerRegistry::with_builtins();
        assert_eq!(
            registry.kinds(),
            vec![
                TransformKind::Keep,
                TransformKind::Mask,
                TransformKind::Hash,
                TransformKind::Tokenize
            ]
        );
        assert!(matches!(
            registry.get(TransformKind::Aggregate),
            Err(TransformError::UnsupportedTransform {
                kind: TransformKind::Aggregate
            })
        ));
    }

    #[test]
    fn keep_returns_value_unchanged() {
        let keys = KeyRing::new();
        let ctx = TransformContext {
            data_type: DataType::Int,
            keys: &keys,
        };
        let out = KeepTransformer
            .transform(&Value::Int(7), &TransformationRule::keep(), &ctx)
            .unwrap();
        assert_eq!(out, Value::Int(7));
    }
}
