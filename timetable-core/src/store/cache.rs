//! Read-through caching for key-value stores.
//!
//! Platform preference stores can be slow to read (a bridge call per key),
//! and a timetable screen reads the same few dozen keys on every render.
//! Reads are cached per key, including misses; every write invalidates the
//! keys it touches before returning.

use std::time::Duration;

use moka::sync::Cache as MokaCache;

use super::error::StoreError;
use super::{KeyValueStore, WriteBatch};

/// Configuration for the read cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached reads.
    pub ttl: Duration,

    /// Maximum number of cached keys per value type.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 4096,
        }
    }
}

/// A key-value store with cached reads.
///
/// Wraps any [`KeyValueStore`]. Writes go straight to the inner store.
pub struct CachedStore<S> {
    inner: S,
    strings: MokaCache<String, Option<String>>,
    ints: MokaCache<String, Option<i64>>,
}

impl<S: KeyValueStore> CachedStore<S> {
    /// Create a new cached store with the given configuration.
    pub fn new(inner: S, config: &CacheConfig) -> Self {
        let strings = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        let ints = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            inner,
            strings,
            ints,
        }
    }

    fn invalidate(&self, key: &str) {
        self.strings.invalidate(key);
        self.ints.invalidate(key);
    }
}

impl<S: KeyValueStore> KeyValueStore for CachedStore<S> {
    fn get_string(&self, key: &str) -> Option<String> {
        if let Some(cached) = self.strings.get(key) {
            return cached;
        }
        let value = self.inner.get_string(key);
        self.strings.insert(key.to_string(), value.clone());
        value
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        if let Some(cached) = self.ints.get(key) {
            return cached;
        }
        let value = self.inner.get_int(key);
        self.ints.insert(key.to_string(), value);
        value
    }

    fn contains(&self, key: &str) -> bool {
        self.inner.contains(key)
    }

    fn apply(&mut self, batch: WriteBatch) -> Result<(), StoreError> {
        let touched: Vec<String> = batch.ops().iter().map(|op| op.key().to_string()).collect();
        let result = self.inner.apply(batch);
        // Invalidate even on failure; the inner store may have partially applied
        for key in &touched {
            self.invalidate(key);
        }
        result
    }
}
