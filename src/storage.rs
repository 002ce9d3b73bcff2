//! Durable key-value storage for session and preference state.
//!
//! [`FileStorage`] keeps one file per key under a directory and replaces files
//! atomically, so an interrupted write never leaves a half-written value
//! behind. [`MemoryStorage`] is the non-persistent variant.

use crate::config;
use crate::error::Result;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

pub type SharedStorage = Arc<dyn KeyValueStorage>;

// ---------------------------------------------------------------------------
// FileStorage
// ---------------------------------------------------------------------------

pub struct FileStorage {
    /// Directory holding one file per key.
    pub dir: PathBuf,
}

impl FileStorage {
    /// Open storage rooted at `dir`, or the platform data directory when `None`.
    ///
    /// Creates the directory if it does not exist.
    pub fn new(dir: Option<PathBuf>) -> Result<Self> {
        let dir = dir.unwrap_or_else(config::default_storage_dir);
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", name))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.persist(self.path_for(key)).map_err(|e| e.error)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryStorage
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// JSON helpers
// ---------------------------------------------------------------------------

/// Load and parse a JSON value, never failing.
///
/// Missing keys and unreadable storage yield `None`. A corrupt value is
/// removed so the next write starts clean.
pub fn load_json<T: DeserializeOwned>(storage: &dyn KeyValueStorage, key: &str) -> Option<T> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read stored value");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "corrupt stored value -- removing");
            if let Err(e) = storage.remove(key) {
                tracing::warn!(key, error = %e, "failed to remove corrupt value");
            }
            None
        }
    }
}

pub fn save_json<T: Serialize>(storage: &dyn KeyValueStorage, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    storage.set(key, &raw)
}
