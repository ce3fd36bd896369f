//! File-backed durable store.
//!
//! The whole key space lives in a single JSON object on disk:
//!
//! ```text
//! { "settings": "{\"theme\":\"Dracula\",...}", "other": "..." }
//! ```
//!
//! Every `set` or `remove` rewrites the document into a temporary sibling
//! file and renames it over the previous one, so a crash leaves either the old
//! or the new document in place.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::traits::DurableStore;

/// A [`DurableStore`] persisted as one JSON document.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    /// Last committed contents of the document.
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open (or lazily create) the store document at `path`.
    ///
    /// A missing or zero-length file opens as an empty store. So does a
    /// document that is not a JSON object of strings; it is logged and
    /// replaced by the first write. The file is not created until then.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match Self::read_document(&path) {
            Err(StoreError::Corrupt { path: bad, reason }) => {
                warn!(path = %bad.display(), %reason, "store document unreadable, opening empty");
                BTreeMap::new()
            }
            other => other?,
        };
        Ok(Self::with_entries(path, entries))
    }

    /// Like [`FileStore::open`], but a malformed document is an error.
    pub fn open_strict(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = Self::read_document(&path)?;
        Ok(Self::with_entries(path, entries))
    }

    fn with_entries(path: PathBuf, entries: BTreeMap<String, String>) -> Self {
        debug!(path = %path.display(), entries = entries.len(), "file store opened");
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(path: &Path) -> StoreResult<BTreeMap<String, String>> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&contents).map_err(|e| StoreError::Corrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn write_document(&self, entries: &BTreeMap<String, String>) -> StoreResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;

        debug!(path = %self.path.display(), bytes = json.len(), "file store written");
        Ok(())
    }

    /// Apply `change` to a copy of the entries, write it, then commit it.
    ///
    /// The cached entries are untouched if the write fails.
    fn mutate<T>(&self, change: impl FnOnce(&mut BTreeMap<String, String>) -> T) -> StoreResult<T> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::LockPoisoned)?;
        let mut next = entries.clone();
        let out = change(&mut next);
        self.write_document(&next)?;
        *entries = next;
        Ok(out)
    }
}

impl DurableStore for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let entries = self.entries.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.mutate(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        {
            let entries = self.entries.lock().map_err(|_| StoreError::LockPoisoned)?;
            if !entries.contains_key(key) {
                return Ok(false);
            }
        }
        self.mutate(|entries| entries.remove(key).is_some())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let entries = self.entries.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("store.json")).unwrap();
        (dir, store)
    }

    #[test]
    fn missing_file_opens_empty() {
        let (_dir, store) = temp_store();
        assert!(store.get("settings").unwrap().is_none());
        assert!(store.keys().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn values_survive_reopen() {
        let (dir, store) = temp_store();
        store.set("settings", r#"{"theme":"Nord"}"#).unwrap();
        drop(store);

        let reopened = FileStore::open(dir.path().join("store.json")).unwrap();
        assert_eq!(
            reopened.get("settings").unwrap().as_deref(),
            Some(r#"{"theme":"Nord"}"#)
        );
    }

    #[test]
    fn overwrite_keeps_single_entry() {
        let (_dir, store) = temp_store();
        store.set("settings", "a").unwrap();
        store.set("settings", "b").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["settings"]);
        assert_eq!(store.get("settings").unwrap().as_deref(), Some("b"));
    }

    #[test]
    fn remove_persists() {
        let (dir, store) = temp_store();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        assert!(store.remove("a").unwrap());
        assert!(!store.remove("a").unwrap());

        let reopened = FileStore::open(dir.path().join("store.json")).unwrap();
        assert_eq!(reopened.keys().unwrap(), vec!["b"]);
    }

    #[test]
    fn corrupt_document_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, r#"{"settings": "#).unwrap();

        let store = FileStore::open(&path).unwrap();
        assert!(store.keys().unwrap().is_empty());

        store.set("settings", "{}").unwrap();
        let reopened = FileStore::open_strict(&path).unwrap();
        assert_eq!(reopened.get("settings").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn strict_open_rejects_corrupt_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "not json at all").unwrap();

        let err = FileStore::open_strict(&path).unwrap_err();
        assert!(
            matches!(err, StoreError::Corrupt { .. }),
            "expected Corrupt, got: {err}"
        );
    }

    #[test]
    fn non_string_values_count_as_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, r#"{"settings": {"theme": "Nord"}}"#).unwrap();

        assert!(FileStore::open_strict(&path).is_err());
        assert!(FileStore::open(&path).unwrap().get("settings").unwrap().is_none());
    }

    #[test]
    fn empty_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("store.json");
        let store = FileStore::open(&path).unwrap();
        store.set("k", "v").unwrap();
        assert!(path.exists());
    }
}
