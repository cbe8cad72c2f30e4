//! Salted one-way digests.

use pat_model::{TransformKind, TransformationRule, Value};
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};

use crate::canonical::canonicalize;
use crate::error::{Result, TransformError};
use crate::params;
use crate::transformer::{TransformContext, Transformer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().replace('-', "").as_str() {
            "sha224" => Some(Self::Sha224),
            "sha256" => Some(Self::Sha256),
            "sha384" => Some(Self::Sha384),
            "sha512" => Some(Self::Sha512),
            _ => None,
        }
    }

    /// Length of the hex digest.
    pub fn hex_len(&self) -> usize {
        match self {
            Self::Sha224 => 56,
            Self::Sha256 => 64,
            Self::Sha384 => 96,
            Self::Sha512 => 128,
        }
    }

    /// Lowercase hex digest of `salt || input`.
    pub fn digest_hex(&self, salt: &[u8], input: &[u8]) -> String {
        match self {
            Self::Sha224 => salted_hex::<Sha224>(salt, input),
            Self::Sha256 => salted_hex::<Sha256>(salt, input),
            Self::Sha384 => salted_hex::<Sha384>(salt, input),
            Self::Sha512 => salted_hex::<Sha512>(salt, input),
        }
    }
}

fn salted_hex<D: Digest>(salt: &[u8], input: &[u8]) -> String {
    hex::encode(D::new().chain_update(salt).chain_update(input).finalize())
}

pub struct HashTransformer;

impl Transformer for HashTransformer {
    fn kind(&self) -> TransformKind {
        TransformKind::Hash
    }

    fn transform(
        &self,
        input: &Value,
        rule: &TransformationRule,
        ctx: &TransformContext<'_>,
    ) -> Result<Value> {
        params::reject_unknown(rule)?;
        let name = params::text(rule, "algorithm", "sha256");
        let algorithm = HashAlgorithm::parse(&name).ok_or_else(|| {
            TransformError::invalid(
                TransformKind::Hash,
                "algorithm",
                format!("unsupported algorithm `{name}`"),
            )
        })?;
        let salt = params::text(rule, "salt", "");
        let canonical = canonicalize(input, ctx.data_type);
        Ok(Value::Text(algorithm.digest_hex(salt.as_bytes(), canonical.as_bytes())))
    }
}
