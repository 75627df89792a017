// src/storage/file.rs

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;

use super::{DocumentStore, StoreError};

/// Flat-file document store: one pretty-printed JSON file per key under a
/// root data directory.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Rejects anything outside `[a-z0-9_/]`.
    ///
    /// Keys are produced by `QuizKey` and the prefix constants, but the
    /// check keeps a malformed key from ever escaping the root.
    fn check_key(key: &str) -> Result<(), StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '/');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(())
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        Self::check_key(key)?;
        Ok(self.root.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn load(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read(&path).await {
            Ok(bytes) => {
                let value = serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
                    key: key.to_string(),
                    source: e,
                })?;
                Ok(Some(value))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, key: &str, doc: &Value) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(doc).map_err(|e| StoreError::Corrupt {
            key: key.to_string(),
            source: e,
        })?;
        fs::write(&path, bytes).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool, StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        Self::check_key(prefix)?;
        let dir = self.root.join(prefix);
        let mut keys = Vec::new();
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(keys),
            Err(e) => return Err(e.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    keys.push(format!("{}/{}", prefix, stem));
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_store() -> FileStore {
        let root = std::env::temp_dir().join(format!("lms_store_{}", uuid::Uuid::new_v4()));
        FileStore::new(root)
    }

    #[tokio::test]
    async fn load_of_missing_key_is_none() {
        let store = temp_store();
        assert!(store.load("quizzes/1_nothing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let store = temp_store();
        let doc = json!({"id": 1, "title": "Algebra"});
        store.save("quizzes/1_algebra", &doc).await.unwrap();

        let loaded = store.load("quizzes/1_algebra").await.unwrap().unwrap();
        assert_eq!(loaded, doc);
    }

    #[tokio::test]
    async fn save_overwrites_whole_document() {
        let store = temp_store();
        store
            .save("submissions/1_algebra", &json!([{"student_id": "s1"}]))
            .await
            .unwrap();
        store.save("submissions/1_algebra", &json!([])).await.unwrap();

        let loaded = store.load("submissions/1_algebra").await.unwrap().unwrap();
        assert_eq!(loaded, json!([]));
    }

    #[tokio::test]
    async fn remove_reports_existence() {
        let store = temp_store();
        store.save("quizzes/2_x", &json!({})).await.unwrap();

        assert!(store.remove("quizzes/2_x").await.unwrap());
        assert!(!store.remove("quizzes/2_x").await.unwrap());
        assert!(store.load("quizzes/2_x").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_returns_sorted_keys_and_tolerates_missing_dir() {
        let store = temp_store();
        assert!(store.list("quizzes").await.unwrap().is_empty());

        store.save("quizzes/2_b", &json!({})).await.unwrap();
        store.save("quizzes/1_a", &json!({})).await.unwrap();

        let keys = store.list("quizzes").await.unwrap();
        assert_eq!(keys, vec!["quizzes/1_a".to_string(), "quizzes/2_b".to_string()]);
    }

    #[tokio::test]
    async fn traversal_keys_are_rejected() {
        let store = temp_store();
        let err = store.load("../etc/passwd").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidKey(_)));
    }
}
