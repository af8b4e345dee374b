use async_trait::async_trait;
use redis::AsyncCommands;
use std::collections::HashMap;

use crate::error::StoreError;
use crate::store::KvStore;

/// Redis-backed key-value store over a multiplexed async connection.
///
/// The connection handle is cheap to clone and safe for concurrent use, so
/// one `RedisStore` is shared by every writer and the query path.
pub struct RedisStore {
    conn: redis::aio::MultiplexedConnection,
}

impl RedisStore {
    pub async fn connect(redis_url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;
        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        // Test connection
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        tracing::info!("Connected to Redis");
        Ok(Self { conn })
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn hset_nx(&self, key: &str, field: &str, value: &str) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        let inserted: bool = conn
            .hset_nx(key, field, value)
            .await
            .map_err(|e| StoreError::OperationFailed(e.to_string()))?;
        tracing::debug!(key, field, inserted, "HSETNX");
        Ok(inserted)
    }

    async fn hget_all(&self, key: &str) -> Result<HashMap<String, String>, StoreError> {
        let mut conn = self.conn.clone();
        let fields: HashMap<String, String> = conn
            .hgetall(key)
            .await
            .map_err(|e| StoreError::OperationFailed(e.to_string()))?;
        tracing::debug!(key, fields = fields.len(), "HGETALL");
        Ok(fields)
    }

    async fn lrange(&self, key: &str) -> Result<Vec<String>, StoreError> {
        let mut conn = self.conn.clone();
        let items: Vec<String> = conn
            .lrange(key, 0, -1)
            .await
            .map_err(|e| StoreError::OperationFailed(e.to_string()))?;
        tracing::debug!(key, items = items.len(), "LRANGE");
        Ok(items)
    }

    async fn lpush(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        conn.lpush::<_, _, ()>(key, value)
            .await
            .map_err(|e| StoreError::OperationFailed(e.to_string()))?;
        tracing::debug!(key, "LPUSH");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Run: docker run -p 6379:6379 redis:latest

    #[tokio::test]
    #[ignore] // Requires Redis server
    async fn test_hset_nx_roundtrip() {
        let store = RedisStore::connect("redis://localhost:6379").await.unwrap();
        let key = "tickstream:test:hsetnx";
        assert!(store.hset_nx(key, "field", "v1").await.unwrap());
        assert!(!store.hset_nx(key, "field", "v2").await.unwrap());
        let fields = store.hget_all(key).await.unwrap();
        assert_eq!(fields.get("field").map(String::as_str), Some("v1"));
    }
}
