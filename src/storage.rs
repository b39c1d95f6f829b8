//! Durable key-value storage for client state.
//!
//! SYSTEM CONTEXT
//! ==============
//! The selection store persists through the small [`KeyValueStore`]
//! interface so it can run against an in-memory map in tests and a JSON file
//! on disk in the CLI. Values are strings; typed callers go through
//! [`load_json`] / [`save_json`].
//!
//! The file backend keeps every key in one JSON object and rewrites it with a
//! temp file plus rename, so a crash mid-write leaves the previous contents.
//! There is no cross-process locking: the last writer wins.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write as _;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ErrorCode;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be serialized for storage.
    #[error("storage encode failed: {0}")]
    Encode(String),

    /// A stored value could not be deserialized.
    #[error("storage decode failed for key {key}: {reason}")]
    Decode { key: String, reason: String },
}

impl ErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Io(_) => "E_STORAGE_IO",
            Self::Encode(_) => "E_STORAGE_ENCODE",
            Self::Decode { .. } => "E_STORAGE_DECODE",
        }
    }
}

/// Synchronous, non-transactional string store.
pub trait KeyValueStore: Send {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backing medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backing medium cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Load a JSON value for `key`. `Ok(None)` when the key is absent.
///
/// # Errors
///
/// Returns [`StorageError::Decode`] when the stored text is not a valid `T`.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>, StorageError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| StorageError::Decode { key: key.to_string(), reason: e.to_string() })
}

/// Save a JSON value for `key`.
///
/// # Errors
///
/// Returns a [`StorageError`] if encoding or the underlying write fails.
pub fn save_json<T: Serialize + ?Sized>(store: &mut dyn KeyValueStore, key: &str, value: &T) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|e| StorageError::Encode(e.to_string()))?;
    store.set(key, &raw)
}

// =============================================================================
// MEMORY BACKEND
// =============================================================================

/// Process-local store. Contents vanish with the value.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// =============================================================================
// FILE BACKEND
// =============================================================================

/// Store backed by a single JSON object file (`{ "key": "value", ... }`).
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<HashMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }
        serde_json::from_str(&content).map_err(|e| StorageError::Decode {
            key: self.path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn write_entries(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let body = serde_json::to_string_pretty(entries).map_err(|e| StorageError::Encode(e.to_string()))?;

        let tmp_path = self.temp_path();
        let mut tmp = File::create(&tmp_path)?;
        tmp.write_all(body.as_bytes())?;
        tmp.sync_all()?;
        drop(tmp);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_entries()?.remove(key))
    }

    /// A corrupt file is replaced rather than blocking every future write.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(StorageError::Decode { reason, .. }) => {
                tracing::warn!(path = %self.path.display(), %reason, "overwriting unreadable store file");
                HashMap::new()
            }
            Err(e) => return Err(e),
        };
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }
}

#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;
