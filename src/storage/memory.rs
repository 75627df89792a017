// src/storage/memory.rs

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use super::{DocumentStore, StoreError};

/// In-memory document store, used by tests in place of the file backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn load(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.docs.lock().await.get(key).cloned())
    }

    async fn save(&self, key: &str, doc: &Value) -> Result<(), StoreError> {
        self.docs.lock().await.insert(key.to_string(), doc.clone());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.docs.lock().await.remove(key).is_some())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let dir = format!("{}/", prefix);
        let mut keys: Vec<String> = self
            .docs
            .lock()
            .await
            .keys()
            .filter(|k| k.starts_with(&dir))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }
}
