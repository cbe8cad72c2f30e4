//! Memoization of deterministic transform outputs.
//!
//! Only kinds whose output is a pure function of (parameters, canonical
//! input), namely `hash` and `tokenize`, are cached. The cache is unbounded:
//! it grows with the number of distinct values seen and is only emptied by
//! [`TransformCache::clear`].

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use pat_model::{ParamValue, TransformKind, TransformationRule, Value};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub kind: TransformKind,
    /// The rule's parameters, compared structurally.
    pub params: BTreeMap<String, ParamValue>,
    /// Canonical text of the input cell.
    pub input: String,
}

impl CacheKey {
    pub fn new(rule: &TransformationRule, input: String) -> Self {
        Self {
            kind: rule.kind,
            params: rule.params.clone(),
            input,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<CacheKey, Value>,
    hits: u64,
    misses: u64,
}

/// Thread-safe transform cache.
#[derive(Debug, Default)]
pub struct TransformCache {
    state: Mutex<CacheState>,
}

impl TransformCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key`, computing and storing it on a miss.
    ///
    /// The lock is held while `compute` runs, so concurrent callers never
    /// compute the same key twice. Errors are returned and not cached.
    pub fn get_or_try_insert_with<E>(
        &self,
        key: CacheKey,
        compute: impl FnOnce() -> Result<Value, E>,
    ) -> Result<Value, E> {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(value) = state.entries.get(&key) {
            let value = value.clone();
            state.hits += 1;
            return Ok(value);
        }
        let value = compute()?;
        state.misses += 1;
        state.entries.insert(key, value.clone());
        Ok(value)
    }

    pub fn stats(&self) -> CacheStats {
        let state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        CacheStats {
            entries: state.entries.len(),
            hits: state.hits,
            misses: state.misses,
        }
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&self) {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *state = CacheState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn key(input: &str) -> CacheKey {
        CacheKey::new(&TransformationRule::hash("sha256"), input.to_string())
    }

    #[test]
    fn delimiter_text_in_params_does_not_collide() {
        let joined = TransformationRule::tokenize(16).with_param("key", "k;prefix=P");
        let split = TransformationRule::tokenize(16)
            .with_param("key", "k")
            .with_param("prefix", "P");
        assert_eq!(joined.canonical_params(), split.canonical_params());
        assert_ne!(
            CacheKey::new(&joined, "a".to_string()),
            CacheKey::new(&split, "a".to_string())
        );
    }

    #[test]
    fn second_lookup_is_a_hit() {
        let cache = TransformCache::new();
        let first: Result<Value, ()> = cache.get_or_try_insert_with(key("a"), || Ok(Value::from("x")));
        let second: Result<Value, ()> =
            cache.get_or_try_insert_with(key("a"), || Ok(Value::from("different")));
        assert_eq!(first, Ok(Value::from("x")));
        assert_eq!(second, Ok(Value::from("x")));
        assert_eq!(
            cache.stats(),
            CacheStats {
                entries: 1,
                hits: 1,
                misses: 1
            }
        );
    }

    #[test]
    fn errors_are_not_cached() {
        let cache = TransformCache::new();
        let failed: Result<Value, &str> = cache.get_or_try_insert_with(key("a"), || Err("boom"));
        assert!(failed.is_err());
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn clear_resets_everything() {
        let cache = TransformCache::new();
        let _: Result<Value, ()> = cache.get_or_try_insert_with(key("a"), || Ok(Value::Null));
        cache.clear();
        assert_eq!(cache.stats(), CacheStats::default());
    }

    #[test]
    fn concurrent_callers_compute_once() {
        let cache = Arc::new(TransformCache::new());
        let computed = Arc::new(AtomicUsize::new(0));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let computed = Arc::clone(&computed);
                std::thread::spawn(move || {
                    let out: Result<Value, ()> = cache.get_or_try_insert_with(key("shared"), || {
                        computed.fetch_add(1, Ordering::SeqCst);
                        Ok(Value::from("x"))
                    });
                    out
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), Ok(Value::from("x")));
        }
        assert_eq!(computed.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats().hits, 7);
    }
}
