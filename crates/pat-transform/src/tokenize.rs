//! Deterministic keyed pseudonyms.
//!
//! A token is `prefix` followed by the first `token_length` hex characters
//! of HMAC-SHA256(key, canonical value). The same value and key always give
//! the same token; without the key, tokens cannot be recomputed.

use hmac::{Hmac, Mac};
use pat_model::{TransformKind, TransformationRule, Value};
use sha2::Sha256;

use crate::canonical::canonicalize;
use crate::error::{Result, TransformError};
use crate::keys::{DEFAULT_KEY_NAME, SecretKey};
use crate::params;
use crate::transformer::{TransformContext, Transformer};

type HmacSha256 = Hmac<Sha256>;

pub const DEFAULT_TOKEN_LENGTH: i64 = 16;
pub const MAX_TOKEN_LENGTH: i64 = 64;
pub const DEFAULT_TOKEN_PREFIX: &str = "TOKEN_";

/// Hex HMAC-SHA256 of `input`, truncated to `length` characters.
pub fn keyed_token(key: &SecretKey, input: &[u8], length: usize) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes()).map_err(|_| {
        TransformError::invalid(TransformKind::Tokenize, "key", "unusable key material")
    })?;
    mac.update(input);
    let mut token = hex::encode(mac.finalize().into_bytes());
    token.truncate(length);
    Ok(token)
}

pub struct TokenizeTransformer;

impl Transformer for TokenizeTransformer {
    fn kind(&self) -> TransformKind {
        TransformKind::Tokenize
    }

    fn transform(
        &self,
        input: &Value,
        rule: &TransformationRule,
        ctx: &TransformContext<'_>,
    ) -> Result<Value> {
        params::reject_unknown(rule)?;
        let length = params::bounded(
            rule,
            "token_length",
            DEFAULT_TOKEN_LENGTH,
            1,
            MAX_TOKEN_LENGTH,
        )?;
        let prefix = params::text(rule, "prefix", DEFAULT_TOKEN_PREFIX);
        let key_name = params::text(rule, "key", DEFAULT_KEY_NAME);
        let key = ctx.keys.get(&key_name)?;

        let canonical = canonicalize(input, ctx.data_type);
        let token = keyed_token(key, canonical.as_bytes(), length)?;
        Ok(Value::Text(format!("{prefix}{token}")))
    }
}
