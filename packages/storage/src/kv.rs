//! Injected key-value store abstraction.
//!
//! Keys in use: `reports` (the serialized collection), `password` (md5
//! hex of the shared secret), `location=<lat>, <lng>` and
//! `namedLocation=<text>` (geocode cache entries). All values are
//! strings.
//!
//! Writes are synchronous: they complete before the call returns, so a
//! read in the same tick observes the latest write. There is no
//! transaction isolation; concurrent writers are last-write-wins.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::StorageError;

/// String key-value storage, the shape browser storage exposed.
pub trait KvStore: Send + Sync {
    /// Returns the value for `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Sets `key` to `value`, completing before returning.
    fn set(&self, key: &str, value: &str);

    /// Removes `key` if present.
    fn remove(&self, key: &str);
}

/// In-memory [`KvStore`]. The default store, and the fake every test
/// runs against.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

/// [`KvStore`] backed by a single JSON object file.
///
/// Gives the CLI the cross-invocation durability browser storage gave
/// the web client. Every `set`/`remove` rewrites the file before
/// returning; a failed write is logged and the in-memory state kept.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Opens (or creates) the store at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file exists but cannot be read or
    /// parsed.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let entries = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&contents)?
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            entries: Mutex::new(entries),
        })
    }

    fn flush(&self, entries: &BTreeMap<String, String>) {
        match serde_json::to_string_pretty(entries) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&self.path, json) {
                    log::error!("failed to write store {}: {e}", self.path.display());
                }
            }
            Err(e) => log::error!("failed to serialize store: {e}"),
        }
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.remove(key).is_some() {
            self.flush(&entries);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryStore::new();
        assert!(store.get("reports").is_none());
        store.set("reports", "[]");
        assert_eq!(store.get("reports").as_deref(), Some("[]"));
        store.remove("reports");
        assert!(store.get("reports").is_none());
    }

    #[test]
    fn memory_store_read_back_in_same_tick() {
        let store = MemoryStore::new();
        store.set("password", "abc");
        store.set("password", "def");
        assert_eq!(store.get("password").as_deref(), Some("def"));
    }

    #[test]
    fn file_store_persists_across_opens() {
        let path = std::env::temp_dir().join("incident_map_kv_test.json");
        let _ = std::fs::remove_file(&path);

        {
            let store = FileStore::open(&path).unwrap();
            store.set("reports", "[]");
            store.set("password", "hash");
        }

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("reports").as_deref(), Some("[]"));
        reopened.remove("password");

        let again = FileStore::open(&path).unwrap();
        assert!(again.get("password").is_none());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn file_store_rejects_corrupt_file() {
        let path = std::env::temp_dir().join("incident_map_kv_corrupt.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(FileStore::open(&path).is_err());
        let _ = std::fs::remove_file(&path);
    }
}
