//! Privacy transformations of cell values.
//!
//! [`TransformEngine::transform`] resolves the rule for a column's
//! sensitivity class and the receiving consumer type through
//! [`pat_policy::PolicyEngine`], then dispatches to the [`Transformer`]
//! registered for the rule's kind:
//!
//! - **keep**: identity
//! - **mask**: partial reveal, character based
//! - **hash**: salted SHA-2 digest
//! - **tokenize**: keyed HMAC-SHA256 pseudonym
//!
//! `aggregate` rules fail with [`TransformError::UnsupportedTransform`]
//! unless an implementation is supplied with
//! [`TransformEngine::with_aggregator`].

mod cache;
mod canonical;
mod engine;
mod error;
mod hash;
mod keys;
mod mask;
mod params;
mod tokenize;
mod transformer;

pub use cache::{CacheKey, CacheStats, TransformCache};
pub use canonical::canonicalize;
pub use engine::TransformEngine;
pub use error::{Result, TransformError};
pub use hash::{HashAlgorithm, HashTransformer};
pub use keys::{DEFAULT_KEY_NAME, KeyRing, SecretKey};
pub use mask::{DEFAULT_MASK_CHAR, MaskOptions, MaskTransformer, mask_text};
pub use tokenize::{
    DEFAULT_TOKEN_LENGTH, DEFAULT_TOKEN_PREFIX, MAX_TOKEN_LENGTH, TokenizeTransformer, keyed_token,
};
pub use transformer::{KeepTransformer, TransformContext, Transformer, TransformerRegistry};
