//! File-backed retrieval store
//!
//! One JSON file per (role, topic) in the store directory, named by the
//! SHA-256 of the role id and the normalized topic text.

use roundtable_application::{RetrievalStore, RetrievalStoreError, StoredRetrieval};
use roundtable_domain::{RoleId, Topic};
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

const ENTRY_EXTENSION: &str = "json";

/// Persists retrieval entries under a directory
#[derive(Debug, Clone)]
pub struct FileRetrievalStore {
    dir: PathBuf,
}

impl FileRetrievalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<user cache dir>/roundtable/retrieval`
    pub fn default_dir() -> Option<PathBuf> {
        dirs::cache_dir().map(|dir| dir.join("roundtable").join("retrieval"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, role: &RoleId, topic: &Topic) -> PathBuf {
        self.entry_path(role.as_str(), topic.as_str())
    }

    fn entry_path(&self, role: &str, topic: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", entry_hash(role, topic), ENTRY_EXTENSION))
    }
}

fn normalize_topic(topic: &str) -> String {
    topic.trim().to_lowercase()
}

fn entry_hash(role: &str, topic: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(role.as_bytes());
    hasher.update(b"\n");
    hasher.update(normalize_topic(topic).as_bytes());
    format!("{:x}", hasher.finalize())
}

fn is_entry(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == ENTRY_EXTENSION)
}

impl RetrievalStore for FileRetrievalStore {
    fn load(
        &self,
        role: &RoleId,
        topic: &Topic,
    ) -> Result<Option<StoredRetrieval>, RetrievalStoreError> {
        let path = self.path_for(role, topic);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let entry: StoredRetrieval = serde_json::from_str(&content)
            .map_err(|e| RetrievalStoreError::Corrupt(format!("{}: {}", path.display(), e)))?;

        if entry.role != role.as_str()
            || normalize_topic(&entry.topic) != normalize_topic(topic.as_str())
        {
            debug!(path = %path.display(), "Stored retrieval entry belongs to another key");
            return Ok(None);
        }
        Ok(Some(entry))
    }

    fn save(&self, entry: &StoredRetrieval) -> Result<(), RetrievalStoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.entry_path(&entry.role, &entry.topic);
        let json = serde_json::to_string_pretty(entry)
            .map_err(|e| RetrievalStoreError::Corrupt(e.to_string()))?;

        // Write then rename so a reader never sees half an entry
        let partial = path.with_extension("json.partial");
        std::fs::write(&partial, json)?;
        std::fs::rename(&partial, &path)?;
        debug!(path = %path.display(), role = %entry.role, "Saved retrieval entry");
        Ok(())
    }

    fn remove(&self, role: &RoleId, topic: &Topic) -> Result<(), RetrievalStoreError> {
        match std::fs::remove_file(self.path_for(role, topic)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn clear(&self) -> Result<usize, RetrievalStoreError> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        let mut removed = 0;
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && is_entry(&path) {
                std::fs::remove_file(&path)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtable_domain::Reference;

    fn topic(text: &str) -> Topic {
        Topic::new(text).unwrap()
    }

    fn entry(role: &str, topic_text: &str) -> StoredRetrieval {
        StoredRetrieval::new(
            &RoleId::from(role),
            &topic(topic_text),
            3,
            vec![
                Reference::new("Congestion pricing in Stockholm")
                    .with_authors(["Eliasson, J."])
                    .with_source("Transport Policy", "2009")
                    .with_relevance(8.0)
                    .verified(),
            ],
        )
    }

    #[test]
    fn test_entry_survives_a_new_store_instance() {
        let dir = tempfile::tempdir().unwrap();
        let saved = entry("economist", "Should cities ban cars?");
        FileRetrievalStore::new(dir.path()).save(&saved).unwrap();

        let reopened = FileRetrievalStore::new(dir.path());
        let loaded = reopened
            .load(&RoleId::from("economist"), &topic("Should cities ban cars?"))
            .unwrap();
        assert_eq!(loaded, Some(saved));
    }

    #[test]
    fn test_topic_case_and_whitespace_share_an_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRetrievalStore::new(dir.path());
        store.save(&entry("economist", "Should cities ban cars?")).unwrap();

        let loaded = store
            .load(&RoleId::from("economist"), &topic("  SHOULD cities ban cars?"))
            .unwrap();
        assert!(loaded.is_some());
        assert!(
            store
                .load(&RoleId::from("ethicist"), &topic("Should cities ban cars?"))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_missing_directory_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRetrievalStore::new(dir.path().join("not").join("there"));
        let loaded = store
            .load(&RoleId::from("economist"), &topic("Should cities ban cars?"))
            .unwrap();
        assert!(loaded.is_none());
        assert_eq!(store.clear().unwrap(), 0);
    }

    #[test]
    fn test_save_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRetrievalStore::new(dir.path().join("roundtable").join("retrieval"));
        store.save(&entry("economist", "Should cities ban cars?")).unwrap();

        let files: Vec<_> = std::fs::read_dir(store.dir()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_corrupt_entry_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRetrievalStore::new(dir.path());
        let role = RoleId::from("economist");
        let t = topic("Should cities ban cars?");
        std::fs::write(store.path_for(&role, &t), "{ not json").unwrap();

        let result = store.load(&role, &t);
        assert!(matches!(result, Err(RetrievalStoreError::Corrupt(_))));
    }

    #[test]
    fn test_remove_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRetrievalStore::new(dir.path());
        store.save(&entry("economist", "Should cities ban cars?")).unwrap();
        store.save(&entry("ethicist", "Should cities ban cars?")).unwrap();
        store.save(&entry("ethicist", "Is nuclear power green?")).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "keep me").unwrap();

        let t = topic("Should cities ban cars?");
        store.remove(&RoleId::from("economist"), &t).unwrap();
        store.remove(&RoleId::from("economist"), &t).unwrap();
        assert!(store.load(&RoleId::from("economist"), &t).unwrap().is_none());

        assert_eq!(store.clear().unwrap(), 2);
        assert!(dir.path().join("notes.txt").exists());
    }
}
