//! In-memory key-value store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::StoreError;
use super::{KeyValueStore, WriteBatch, WriteOp};

/// A stored value: the platform store keeps strings and integers apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
    Int(i64),
    Str(String),
}

/// A key-value store held entirely in memory.
///
/// Used directly in tests and as the working set of
/// [`JsonFileStore`](super::JsonFileStore).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryStore {
    values: BTreeMap<String, StoredValue>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub(crate) fn apply_op(&mut self, op: WriteOp) {
        match op {
            WriteOp::SetString(key, value) => {
                self.values.insert(key, StoredValue::Str(value));
            }
            WriteOp::SetInt(key, value) => {
                self.values.insert(key, StoredValue::Int(value));
            }
            WriteOp::Remove(key) => {
                self.values.remove(&key);
            }
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get_string(&self, key: &str) -> Option<String> {
        match self.values.get(key)? {
            StoredValue::Str(s) => Some(s.clone()),
            StoredValue::Int(_) => None,
        }
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        match self.values.get(key)? {
            StoredValue::Int(v) => Some(*v),
            StoredValue::Str(s) => s.trim().parse().ok(),
        }
    }

    fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn apply(&mut self, batch: WriteBatch) -> Result<(), StoreError> {
        for op in batch {
            self.apply_op(op);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let mut store = MemoryStore::new();
        assert!(!store.contains("a"));
        assert_eq!(store.get_string("a"), None);

        store.set_string("a", "hello").unwrap();
        store.set_int("b", 42).unwrap();
        assert!(store.contains("a"));
        assert_eq!(store.get_string("a").as_deref(), Some("hello"));
        assert_eq!(store.get_int("b"), Some(42));

        store.remove("a").unwrap();
        assert!(!store.contains("a"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn types_are_kept_apart() {
        let mut store = MemoryStore::new();
        store.set_int("n", 7).unwrap();
        assert_eq!(store.get_string("n"), None);

        store.set_string("s", "12").unwrap();
        assert_eq!(store.get_int("s"), Some(12));
        store.set_string("t", "twelve").unwrap();
        assert_eq!(store.get_int("t"), None);
    }

    #[test]
    fn batch_applies_in_order() {
        let mut store = MemoryStore::new();
        let mut batch = WriteBatch::new();
        batch.set_string("k", "first");
        batch.remove("k");
        batch.set_string("k", "second");
        store.apply(batch).unwrap();
        assert_eq!(store.get_string("k").as_deref(), Some("second"));
    }

    #[test]
    fn serializes_as_flat_object() {
        let mut store = MemoryStore::new();
        store.set_string("go1linename1", "Chuo").unwrap();
        store.set_int("go1ridetime1", 20).unwrap();
        let json = serde_json::to_string(&store).unwrap();
        assert_eq!(json, r#"{"go1linename1":"Chuo","go1ridetime1":20}"#);

        let back: MemoryStore = serde_json::from_str(&json).unwrap();
        assert_eq!(back, store);
    }
}
