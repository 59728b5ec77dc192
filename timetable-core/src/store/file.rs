//! Disk-backed key-value store.

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use super::error::StoreError;
use super::memory::MemoryStore;
use super::{KeyValueStore, WriteBatch};

/// A key-value store persisted as one JSON object.
///
/// The whole store is loaded at open. Every committed batch is written to a
/// temporary file next to the target and renamed over it, so a batch lands
/// on disk completely or not at all.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: MemoryStore,
}

impl JsonFileStore {
    /// Open the store at `path`, starting empty if the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|source| {
                StoreError::Corrupt {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => MemoryStore::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        debug!(path = %path.display(), keys = values.len(), "opened store");
        Ok(Self { path, values })
    }

    /// Get the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Write `values` to disk through a temporary file.
    ///
    /// Creates parent directories if they don't exist.
    fn persist(&self, values: &MemoryStore) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let json = serde_json::to_string_pretty(values)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        std::fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;
        trace!(path = %self.path.display(), keys = values.len(), "persisted store");
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.get_string(key)
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        self.values.get_int(key)
    }

    fn contains(&self, key: &str) -> bool {
        self.values.contains(key)
    }

    /// Apply the batch to a copy, persist the copy, then adopt it.
    ///
    /// On a failed write the in-memory view is left unchanged.
    fn apply(&mut self, batch: WriteBatch) -> Result<(), StoreError> {
        if batch.is_empty() {
            return Ok(());
        }
        let mut next = self.values.clone();
        for op in batch {
            next.apply_op(op);
        }
        self.persist(&next)?;
        self.values = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_opens_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("store.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn writes_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store.set_string("go1line1weekday08", "10 15").unwrap();
        store.set_int("go1ridetime1", 20).unwrap();
        drop(store);

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(
            store.get_string("go1line1weekday08").as_deref(),
            Some("10 15")
        );
        assert_eq!(store.get_int("go1ridetime1"), Some(20));
    }

    #[test]
    fn batch_is_written_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        let mut store = JsonFileStore::open(&path).unwrap();

        let mut batch = WriteBatch::new();
        batch.set_string("a", "1");
        batch.set_string("b", "2");
        batch.remove("a");
        store.apply(batch).unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert!(!reopened.contains("a"));
        assert_eq!(reopened.get_string("b").as_deref(), Some("2"));
        assert!(!dir.path().join("store.json.tmp").exists());
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("dir").join("store.json");
        let mut store = JsonFileStore::open(&path).unwrap();
        store.set_string("k", "v").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(matches!(
            JsonFileStore::open(&path),
            Err(StoreError::Corrupt { .. })
        ));
    }

    #[test]
    fn failed_write_leaves_memory_unchanged() {
        let dir = tempdir().unwrap();
        // A directory where the file should be makes the rename fail
        let path = dir.path().join("store.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("occupied"), "x").unwrap();

        let mut store = JsonFileStore {
            path: path.clone(),
            values: MemoryStore::new(),
        };
        assert!(store.set_string("k", "v").is_err());
        assert!(!store.contains("k"));
    }
}
