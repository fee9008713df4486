//! JSON-file backend: one `<key>.json` file per blob.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rollcall_core::error::StorageError;
use rollcall_core::traits::Persistence;

/// Stores each blob as `<data_dir>/<key>.json`.
///
/// Writes go to a sibling `.tmp` file which is then renamed over the target,
/// so a reader never sees a half-written snapshot.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `data_dir`, creating the directory if needed.
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }
}

impl Persistence for JsonFileStore {
    fn name(&self) -> &str {
        "file"
    }

    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                tracing::debug!(path = %path.display(), bytes = content.len(), "loaded blob");
                Ok(Some(content))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: &str, blob: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let tmp = self.data_dir.join(format!("{key}.json.tmp"));
        std::fs::write(&tmp, blob)?;
        if let Err(e) = std::fs::rename(&tmp, &path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }
        tracing::debug!(path = %path.display(), bytes = blob.len(), "saved blob");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        assert!(store.load("students").unwrap().is_none());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        store.save("students", "[]").unwrap();
        assert_eq!(store.load("students").unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("students.json").exists());
        assert!(!dir.path().join("students.json.tmp").exists());
    }

    #[test]
    fn save_replaces_previous_blob() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        store.save("attendance", "{\"a\":1}").unwrap();
        store.save("attendance", "{}").unwrap();
        assert_eq!(store.load("attendance").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn creates_nested_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = JsonFileStore::new(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(store.data_dir(), nested.as_path());
        assert_eq!(store.path_for("students"), nested.join("students.json"));
    }

    #[test]
    fn unreadable_path_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        // A directory where the file should be cannot be read as a string.
        std::fs::create_dir(dir.path().join("students.json")).unwrap();
        assert!(matches!(store.load("students"), Err(StorageError::Io(_))));
    }
}
