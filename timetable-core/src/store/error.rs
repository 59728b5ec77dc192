//! Key-value store error types.

use std::path::PathBuf;

/// Errors from a persistent key-value store.
///
/// Only storage failures are errors. Missing or malformed values are
/// reported as absent and repaired by the caller.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed
    #[error("store I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file is not a JSON object of strings and integers
    #[error("store file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Serializing the store contents failed
    #[error("failed to serialize store: {0}")]
    Serialize(#[from] serde_json::Error),
}
