//! # Durable Storage
//!
//! The key-value storage the cart snapshot lives in. The store reads one key
//! at startup and overwrites it after every change; nothing is patched in
//! place.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Storage Backends                                     │
//! │                                                                         │
//! │  CartStorage (trait)                                                   │
//! │  ├── MemoryStorage  - HashMap behind Arc<Mutex>; clones share the map  │
//! │  │                    (tests, previews, reload simulation)             │
//! │  └── FileStorage    - <dir>/<key>.json, written via temp file + rename │
//! │                                                                         │
//! │  A browser host implements the trait over localStorage.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use directories::ProjectDirs;
use tracing::debug;

use panzo_core::validation::validate_storage_key;

use crate::error::{StorageError, StorageResult};

/// String key-value storage, shaped like the browser's `localStorage`.
pub trait CartStorage: Send {
    /// Returns the stored value, or `None` if the key was never written.
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()>;

    /// Deletes `key`. Deleting a missing key is not an error.
    fn remove_item(&mut self, key: &str) -> StorageResult<()>;
}

impl<S: CartStorage + ?Sized> CartStorage for Box<S> {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> StorageResult<()> {
        (**self).remove_item(key)
    }
}

// =============================================================================
// Memory Storage
// =============================================================================

/// In-process storage. Cloning yields a handle to the same map, which is how
/// tests reopen a store "after a page reload".
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // A panicking listener cannot leave the map half-written.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CartStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> StorageResult<()> {
        self.entries().remove(key);
        Ok(())
    }
}

// =============================================================================
// File Storage
// =============================================================================

/// One JSON file per key inside a directory.
///
/// ## Platform-Specific Default Directory
/// - **macOS**: `~/Library/Application Support/ar.panzo.cart/`
/// - **Windows**: `%APPDATA%\panzo\cart\data\`
/// - **Linux**: `~/.local/share/cart/`
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Uses `dir`, creating it on the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStorage { dir: dir.into() }
    }

    /// The platform data directory, if the platform has one.
    pub fn default_dir() -> Option<PathBuf> {
        ProjectDirs::from("ar", "panzo", "cart").map(|dirs| dirs.data_dir().to_path_buf())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Keys become file names, so path separators are rejected here.
    fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        validate_storage_key(key).map_err(StorageError::InvalidKey)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }

    fn temp_path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!(".{}.json.tmp", key))
    }
}

impl CartStorage for FileStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;

        // Rename is atomic on the same filesystem: readers see the old
        // snapshot or the new one, never a torn write.
        let temp = self.temp_path_for(key);
        fs::write(&temp, value)?;
        fs::rename(&temp, path)?;

        debug!(key, bytes = value.len(), "Snapshot file written");
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> StorageResult<()> {
        match fs::remove_file(self.path_for(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_crud() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get_item("panzo_cart").unwrap(), None);

        storage.set_item("panzo_cart", "{}").unwrap();
        assert_eq!(storage.get_item("panzo_cart").unwrap().as_deref(), Some("{}"));

        storage.set_item("panzo_cart", "{\"items\":{}}").unwrap();
        assert_eq!(
            storage.get_item("panzo_cart").unwrap().as_deref(),
            Some("{\"items\":{}}")
        );

        storage.remove_item("panzo_cart").unwrap();
        storage.remove_item("panzo_cart").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_memory_storage_clones_share_entries() {
        let mut writer = MemoryStorage::new();
        let reader = writer.clone();

        writer.set_item("k", "v").unwrap();
        assert_eq!(reader.get_item("k").unwrap().as_deref(), Some("v"));
        assert_eq!(reader.len(), 1);
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("nested"));

        assert_eq!(storage.get_item("panzo_cart").unwrap(), None);

        storage.set_item("panzo_cart", "{\"a\":1}").unwrap();
        assert_eq!(
            storage.get_item("panzo_cart").unwrap().as_deref(),
            Some("{\"a\":1}")
        );
        assert!(dir.path().join("nested/panzo_cart.json").exists());
        assert!(!dir.path().join("nested/.panzo_cart.json.tmp").exists());

        storage.remove_item("panzo_cart").unwrap();
        assert_eq!(storage.get_item("panzo_cart").unwrap(), None);
        storage.remove_item("panzo_cart").unwrap();
    }

    #[test]
    fn test_file_storage_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("carts"));

        for key in ["../escape", "a/b", "a\\b", "..", ""] {
            assert!(matches!(
                storage.set_item(key, "{}"),
                Err(StorageError::InvalidKey(_))
            ));
            assert!(storage.get_item(key).is_err());
            assert!(storage.remove_item(key).is_err());
        }

        assert!(!dir.path().join("escape.json").exists());
        assert!(!dir.path().join("carts").exists());
    }

    #[test]
    fn test_boxed_storage_delegates() {
        let shared = MemoryStorage::new();
        let mut boxed: Box<dyn CartStorage> = Box::new(shared.clone());

        boxed.set_item("k", "v").unwrap();
        assert_eq!(shared.get_item("k").unwrap().as_deref(), Some("v"));
    }
}
