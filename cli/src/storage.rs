//! JSON file backend for remembered calculator values
//!
//! The whole store is one JSON object mapping `fitCalc.*` keys to their
//! JSON-encoded values, rewritten on every change.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use fitcalc_shared::{KeyValueStore, StorageError};
use tracing::debug;

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`; a missing file is an empty store
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let items = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(backend(&path, e)),
        };
        debug!(path = %path.display(), entries = items.len(), "Opened preference store");
        Ok(Self { path, items })
    }

    /// An empty store that will overwrite whatever is at `path` on first write
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            items: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| backend(parent, e))?;
        }
        let json = serde_json::to_string_pretty(&self.items)?;
        fs::write(&self.path, json).map_err(|e| backend(&self.path, e))
    }
}

fn backend(path: &Path, error: std::io::Error) -> StorageError {
    StorageError::Backend(format!("{}: {}", path.display(), error))
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        if self.items.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("fitcalc-store-{}-{}", std::process::id(), name))
            .join("preferences.json")
    }

    #[test]
    fn test_missing_file_is_empty() {
        let store = FileStore::open(temp_path("missing")).unwrap();
        assert_eq!(store.get_item("fitCalc.height").unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let path = temp_path("reopen");
        let mut store = FileStore::open(&path).unwrap();
        store.set_item("fitCalc.height", "180").unwrap();
        store.set_item("fitCalc.gender", "\"male\"").unwrap();
        store.remove_item("fitCalc.gender").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get_item("fitCalc.height").unwrap().as_deref(), Some("180"));
        assert_eq!(reopened.get_item("fitCalc.gender").unwrap(), None);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let path = temp_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{not json").unwrap();

        assert!(matches!(FileStore::open(&path), Err(StorageError::Serialization(_))));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
