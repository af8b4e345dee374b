use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::StoreError;

/// Key-value store abstraction for hash and list rows.
///
/// The shared handle is used concurrently by every writer and by the query
/// path; implementations carry their own synchronization.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Set a hash field only if it does not exist yet.
    /// Returns true if the field was written, false if it was already present.
    async fn hset_nx(&self, key: &str, field: &str, value: &str) -> Result<bool, StoreError>;

    /// Read all fields of a hash row. Missing key yields an empty map.
    async fn hget_all(&self, key: &str) -> Result<HashMap<String, String>, StoreError>;

    /// Read a whole list row, head first. Missing key yields an empty list.
    async fn lrange(&self, key: &str) -> Result<Vec<String>, StoreError>;

    /// Push a value onto the head of a list row.
    async fn lpush(&self, key: &str, value: &str) -> Result<(), StoreError>;
}
