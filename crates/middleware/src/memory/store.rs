use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::store::KvStore;

#[derive(Default)]
struct Rows {
    hashes: HashMap<String, HashMap<String, String>>,
    lists: HashMap<String, Vec<String>>,
}

/// In-memory key-value store with Redis-equivalent hash and list semantics.
pub struct InMemoryStore {
    rows: RwLock<Rows>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Rows::default()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KvStore for InMemoryStore {
    async fn hset_nx(&self, key: &str, field: &str, value: &str) -> Result<bool, StoreError> {
        let mut rows = self.rows.write().await;
        let hash = rows.hashes.entry(key.to_string()).or_default();
        if hash.contains_key(field) {
            return Ok(false);
        }
        hash.insert(field.to_string(), value.to_string());
        Ok(true)
    }

    async fn hget_all(&self, key: &str) -> Result<HashMap<String, String>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows.hashes.get(key).cloned().unwrap_or_default())
    }

    async fn lrange(&self, key: &str) -> Result<Vec<String>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows.lists.get(key).cloned().unwrap_or_default())
    }

    async fn lpush(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;
        rows.lists
            .entry(key.to_string())
            .or_default()
            .insert(0, value.to_string());
        Ok(())
    }
}
