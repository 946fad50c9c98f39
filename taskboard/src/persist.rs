//! Snapshot persistence through a minimal key-value store.
//!
//! The board state is stored as one JSON envelope under a single key
//! (default `task-store`). [`FileKeyValueStore`] keeps one `<key>.json`
//! file per key in a data directory; [`MemoryKeyValueStore`] is for tests
//! and embedding.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use taskboard_proto::snapshot::{self, BoardSnapshot, CodecError};

/// Errors from reading or writing persisted state.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// Failed to read a stored value.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to write a stored value.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The stored snapshot could not be encoded or decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Keys must be non-empty and made of `[A-Za-z0-9_-]`.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Minimal string key-value storage.
pub trait KeyValueStore {
    /// Returns the value under `key`, or `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, PersistError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if the backing storage cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError>;
}

/// In-memory storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: HashMap<String, String>,
}

impl MemoryKeyValueStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One JSON file per key inside a directory.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Uses `dir` for storage. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The storage directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::InvalidKey`] for keys that could escape the
    /// directory or are empty.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, PersistError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(PersistError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PersistError::Read { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        let path = self.path_for(key)?;
        let write_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| PersistError::Write { path, source }
        };

        std::fs::create_dir_all(&self.dir).map_err(write_err(&self.dir))?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).map_err(write_err(&tmp))?;
        std::fs::rename(&tmp, &path).map_err(write_err(&path))?;
        Ok(())
    }
}

/// Loads the snapshot stored under `key`.
///
/// Returns `Ok(None)` when nothing has been saved yet.
///
/// # Errors
///
/// Returns [`PersistError`] if the value cannot be read or decoded.
pub fn load_snapshot(
    store: &impl KeyValueStore,
    key: &str,
) -> Result<Option<BoardSnapshot>, PersistError> {
    let Some(text) = store.get(key)? else {
        tracing::debug!(key, "no saved snapshot");
        return Ok(None);
    };
    let snapshot = snapshot::decode(&text)?;
    tracing::debug!(key, tasks = snapshot.tasks.len(), "snapshot loaded");
    Ok(Some(snapshot))
}

/// Saves `snapshot` under `key`.
///
/// # Errors
///
/// Returns [`PersistError`] if encoding or writing fails.
pub fn save_snapshot(
    store: &mut impl KeyValueStore,
    key: &str,
    snapshot: &BoardSnapshot,
) -> Result<(), PersistError> {
    let text = snapshot::encode(snapshot)?;
    store.set(key, &text)?;
    tracing::debug!(key, tasks = snapshot.tasks.len(), "snapshot saved");
    Ok(())
}
