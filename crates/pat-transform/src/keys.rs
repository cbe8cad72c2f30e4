//! Named secret keys for keyed transforms.

use std::collections::BTreeMap;
use std::fmt;

use zeroize::Zeroizing;

use crate::error::{Result, TransformError};

/// Name looked up when a tokenize rule does not set `key`.
pub const DEFAULT_KEY_NAME: &str = "default";

/// HMAC key material. Never printed; wiped on drop by [`Zeroizing`].
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey {
    material: Zeroizing<Vec<u8>>,
}

impl SecretKey {
    pub fn new(material: impl Into<Vec<u8>>) -> Self {
        Self {
            material: Zeroizing::new(material.into()),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.material
    }

    pub fn len(&self) -> usize {
        self.material.len()
    }

    pub fn is_empty(&self) -> bool {
        self.material.is_empty()
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey([REDACTED; {} bytes])", self.material.len())
    }
}

/// Secret keys by reference name.
#[derive(Clone, Default)]
pub struct KeyRing {
    keys: BTreeMap<String, SecretKey>,
}

impl KeyRing {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_key(mut self, name: impl Into<String>, key: SecretKey) -> Self {
        self.insert(name, key);
        self
    }

    /// Add or replace a key.
    pub fn insert(&mut self, name: impl Into<String>, key: SecretKey) {
        self.keys.insert(name.into(), key);
    }

    pub fn get(&self, name: &str) -> Result<&SecretKey> {
        self.keys
            .get(name)
            .ok_or_else(|| TransformError::MissingSecretKey {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.keys.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl fmt::Debug for KeyRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyRing")
            .field("names", &self.keys.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_never_prints_material() {
        let ring = KeyRing::new().with_key("default", SecretKey::new("hunter2-material"));
        let rendered = format!("{ring:?} {:?}", ring.get("default").unwrap());
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("default"));
        assert!(rendered.contains("REDACTED"));
    }

    #[test]
    fn clones_compare_by_material() {
        let key = SecretKey::new("material");
        let copy = key.clone();
        drop(key);
        assert_eq!(copy.as_bytes(), b"material");
        assert_eq!(copy, SecretKey::new("material"));
        assert_ne!(copy, SecretKey::new("other"));
    }

    #[test]
    fn missing_key_is_reported_by_name() {
        let err = KeyRing::new().get("audit").unwrap_err();
        assert!(matches!(err, TransformError::MissingSecretKey { ref name } if name == "audit"));
    }
}
