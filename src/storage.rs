//! Durable key/value storage for small JSON documents

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("storage io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A string-keyed store that survives restarts.
///
/// Writes are synchronous: when `set` returns `Ok`, the value is durable.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// One file per key, `<dir>/<key>.json`
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<data_local_dir>/weather-widget`, or the working directory if the
    /// platform has no data dir
    pub fn default_dir() -> PathBuf {
        dirs_next::data_local_dir()
            .map(|dir| dir.join("weather-widget"))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|source| StorageError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.path_for(key);
        fs::write(&path, value).map_err(|source| StorageError::Io { path, source })
    }
}

/// In-process store, for tests and `--no-persist`
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert_eq!(store.get("favorites").unwrap(), None);
    }

    #[test]
    fn test_file_store_creates_dir_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested"));

        store.set("favorites", "[\"Oslo\"]").unwrap();
        store.set("favorites", "[]").unwrap();

        assert_eq!(store.get("favorites").unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("nested").join("favorites.json").exists());
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(store.get("other").unwrap(), None);
    }
}
