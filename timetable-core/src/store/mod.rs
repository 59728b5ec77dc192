//! Persistent key-value storage.
//!
//! The timetable core never talks to a concrete platform store. It is
//! handed something implementing [`KeyValueStore`]: the in-memory fake in
//! tests, a JSON file for the command-line tool, or a platform preferences
//! adapter in an app, optionally wrapped in a [`CachedStore`].

mod cache;
mod error;
mod file;
mod memory;

pub use cache::{CacheConfig, CachedStore};
pub use error::StoreError;
pub use file::JsonFileStore;
pub use memory::{MemoryStore, StoredValue};

/// A single write in a [`WriteBatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    SetString(String, String),
    SetInt(String, i64),
    Remove(String),
}

impl WriteOp {
    pub fn key(&self) -> &str {
        match self {
            WriteOp::SetString(key, _) | WriteOp::SetInt(key, _) | WriteOp::Remove(key) => key,
        }
    }
}

/// An ordered group of writes committed together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_string(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.ops.push(WriteOp::SetString(key.into(), value.into()));
        self
    }

    pub fn set_int(&mut self, key: impl Into<String>, value: i64) -> &mut Self {
        self.ops.push(WriteOp::SetInt(key.into(), value));
        self
    }

    pub fn remove(&mut self, key: impl Into<String>) -> &mut Self {
        self.ops.push(WriteOp::Remove(key.into()));
        self
    }

    /// Set a string, or remove the key when the value is empty.
    pub fn set_or_remove(&mut self, key: impl Into<String>, value: &str) -> &mut Self {
        if value.is_empty() {
            self.remove(key)
        } else {
            self.set_string(key, value)
        }
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }
}

impl IntoIterator for WriteBatch {
    type Item = WriteOp;
    type IntoIter = std::vec::IntoIter<WriteOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

/// A flat string/integer key-value store.
///
/// Reads never fail: a missing key, or a value of the other type, reads as
/// `None`. Writes may fail if the store is backed by something that can.
pub trait KeyValueStore {
    fn get_string(&self, key: &str) -> Option<String>;

    fn get_int(&self, key: &str) -> Option<i64>;

    fn contains(&self, key: &str) -> bool;

    /// Commit a batch of writes.
    ///
    /// Implementations that can make the batch atomic should.
    fn apply(&mut self, batch: WriteBatch) -> Result<(), StoreError>;

    fn set_string(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut batch = WriteBatch::new();
        batch.set_string(key, value);
        self.apply(batch)
    }

    fn set_int(&mut self, key: &str, value: i64) -> Result<(), StoreError> {
        let mut batch = WriteBatch::new();
        batch.set_int(key, value);
        self.apply(batch)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let mut batch = WriteBatch::new();
        batch.remove(key);
        self.apply(batch)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get_string(&self, key: &str) -> Option<String> {
        (**self).get_string(key)
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        (**self).get_int(key)
    }

    fn contains(&self, key: &str) -> bool {
        (**self).contains(key)
    }

    fn apply(&mut self, batch: WriteBatch) -> Result<(), StoreError> {
        (**self).apply(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_or_remove() {
        let mut batch = WriteBatch::new();
        batch.set_or_remove("a", "x").set_or_remove("b", "");
        assert_eq!(
            batch.ops(),
            &[
                WriteOp::SetString("a".into(), "x".into()),
                WriteOp::Remove("b".into())
            ]
        );
        assert_eq!(batch.ops()[1].key(), "b");
    }

    fn write_owned<S: KeyValueStore>(mut store: S) {
        store.set_string("k", "v").unwrap();
    }

    #[test]
    fn borrowed_store_writes_through() {
        let mut store = MemoryStore::new();
        write_owned(&mut store);
        assert_eq!(store.get_string("k").as_deref(), Some("v"));
    }
}
