//! Local persistence for the fetched configuration.
//!
//! The store holds exactly one named slot: the last successfully fetched
//! flat configuration. It is overwritten wholesale on every successful
//! fetch and read wholesale on every typed read.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use log::warn;

use crate::error::StoreError;
use crate::value::Value;

/// The flat configuration: string key to generic value.
pub type ConfigMap = BTreeMap<String, Value>;

/// File name of the single storage slot.
const STORAGE_SLOT: &str = "confetch.config.json";

/// Key-value persistence the dispatcher commits fetched configuration to.
///
/// Implementations must be safe under concurrent `load`/`replace`; the
/// dispatcher does no locking of its own.
pub trait ConfigStore: Send + Sync {
    /// Replaces the stored configuration wholesale. No merging with the
    /// previous contents takes place.
    fn replace(&self, config: &ConfigMap) -> Result<(), StoreError>;

    /// Loads the stored configuration, or `None` if nothing has ever been
    /// stored (or the slot is unreadable).
    fn load(&self) -> Option<ConfigMap>;
}

/// In-memory store for tests and callers that do not need persistence
/// across runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: RwLock<Option<ConfigMap>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigStore for MemoryStore {
    fn replace(&self, config: &ConfigMap) -> Result<(), StoreError> {
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(config.clone());
        Ok(())
    }

    fn load(&self) -> Option<ConfigMap> {
        let slot = self.slot.read().unwrap_or_else(|e| e.into_inner());
        slot.clone()
    }
}

/// File-backed store keeping the configuration as a JSON document under a
/// caller-supplied directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `dir`. The slot file is created on the
    /// first successful fetch.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(STORAGE_SLOT),
        }
    }
}

impl ConfigStore for FileStore {
    fn replace(&self, config: &ConfigMap) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(config)?;

        // Write-then-rename so a concurrent load never sees a torn slot.
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &bytes).map_err(|source| StoreError::Write {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }

    fn load(&self) -> Option<ConfigMap> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("could not read configuration slot '{}': {e}", self.path.display());
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!(
                    "stored configuration at '{}' is corrupt: {e}",
                    self.path.display()
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(entries: &[(&str, Value)]) -> ConfigMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_memory_store_starts_empty() {
        assert!(MemoryStore::new().load().is_none());
    }

    #[test]
    fn test_memory_store_replaces_wholesale() {
        let store = MemoryStore::new();

        store.replace(&config(&[("a", Value::from(1))])).unwrap();
        store.replace(&config(&[("b", Value::from(2))])).unwrap();

        let loaded = store.load().unwrap();
        assert!(!loaded.contains_key("a"));
        assert_eq!(loaded["b"], Value::from(2));
    }

    #[test]
    fn test_file_store_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        assert!(store.load().is_none());

        let stored = config(&[
            ("flag", Value::from(true)),
            ("items", Value::from(vec!["x", "y"])),
        ]);
        store.replace(&stored).unwrap();

        assert_eq!(store.load().unwrap(), stored);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let stored = config(&[("n", Value::from(42))]);

        FileStore::new(dir.path()).replace(&stored).unwrap();

        let reopened = FileStore::new(dir.path());
        assert_eq!(reopened.load().unwrap(), stored);
    }

    #[test]
    fn test_file_store_treats_corrupt_slot_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(STORAGE_SLOT), b"not json").unwrap();

        assert!(FileStore::new(dir.path()).load().is_none());
    }

    #[test]
    fn test_file_store_rejects_unwritable_dir() {
        let store = FileStore::new("/nonexistent/dir");
        let result = store.replace(&config(&[("a", Value::Null)]));
        assert!(matches!(result, Err(StoreError::Write { .. })));
    }
}
