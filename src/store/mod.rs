use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("seen store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("seen store is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Durable record of every listing id an alert has been attempted for.
/// Ids are only ever added; the set grows for the life of the store.
pub struct SeenStore {
    path: PathBuf,
    ids: HashSet<String>,
}

impl SeenStore {
    /// Read the store from disk. A missing file means no prior state, which
    /// signals the caller that a bootstrap cycle is required. Any other read
    /// or decode failure is surfaced: silently starting from an empty set
    /// would re-alert on the entire feed.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let ids = match fs::read_to_string(&path) {
            Ok(raw) => {
                let list: Vec<String> = serde_json::from_str(&raw)?;
                list.into_iter().collect()
            }
            Err(e) if e.kind() == ErrorKind::NotFound => HashSet::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self { path, ids })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// In-memory only; returns whether the id was newly added.
    pub fn insert(&mut self, id: String) -> bool {
        self.ids.insert(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Write the full set to disk, replacing prior content. Writes go to a
    /// sibling temp file first so an interrupted persist never truncates the
    /// previous state.
    pub fn persist(&self) -> Result<(), StoreError> {
        let raw = serde_json::to_string(&self.ids)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_as_empty_set() {
        let dir = tempfile::tempdir().unwrap();
        let store = SeenStore::load(dir.path().join("seen.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn corrupt_file_is_an_error_not_an_empty_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seen.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(SeenStore::load(&path), Err(StoreError::Decode(_))));
    }

    #[test]
    fn persist_then_load_preserves_membership() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seen.json");

        let mut store = SeenStore::load(&path).unwrap();
        // Insertion order must not matter for the reloaded set.
        for id in ["charlie", "alpha", "bravo"] {
            assert!(store.insert(id.to_string()));
        }
        assert!(!store.insert("alpha".to_string()));
        store.persist().unwrap();

        let reloaded = SeenStore::load(&path).unwrap();
        assert_eq!(reloaded.len(), 3);
        for id in ["alpha", "bravo", "charlie"] {
            assert!(reloaded.contains(id));
        }
    }

    #[test]
    fn persist_replaces_prior_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seen.json");
        fs::write(&path, r#"["old"]"#).unwrap();

        let mut store = SeenStore::load(&path).unwrap();
        store.insert("new".to_string());
        store.persist().unwrap();

        let reloaded = SeenStore::load(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.contains("old") && reloaded.contains("new"));
    }

    #[test]
    fn persist_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = SeenStore::load(dir.path().join("nope").join("seen.json")).unwrap();
        assert!(matches!(store.persist(), Err(StoreError::Io(_))));
    }
}
