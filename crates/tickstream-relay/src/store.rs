use std::collections::HashMap;
use std::sync::Arc;

use tickstream_middleware::{KvStore, StoreError};
use tickstream_schemas::{TradeBatch, Transaction};

fn transaction_key(trade_id: u64, index: usize) -> String {
    format!("trade:{}:transaction:{}", trade_id, index)
}

fn trade_list_key(trade_id: u64) -> String {
    format!("trade:{}:transactions", trade_id)
}

/// Idempotent persistence of decoded transactions and their per-trade index.
///
/// Every write is set-if-absent, so replaying a message leaves the stored
/// state untouched. Writes are not atomic across the four fields: a crash
/// mid-operation can leave a transaction partially written.
pub struct TransactionStore {
    kv: Arc<dyn KvStore>,
}

impl TransactionStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Persist one transaction under its deterministic key, field by field.
    /// A field that already exists keeps its first-written value; the skip
    /// is logged and is not an error. Returns the row key.
    pub async fn write_transaction(
        &self,
        trade_id: u64,
        index: usize,
        transaction: &Transaction,
    ) -> Result<String, StoreError> {
        let key = transaction_key(trade_id, index);
        let fields = [
            ("trading_pair", transaction.trading_pair.clone()),
            (
                "exchange_id",
                transaction.exchange_id().as_str_name().to_string(),
            ),
            (
                "market_type",
                transaction.market_type().as_str_name().to_string(),
            ),
            (
                "transaction_action",
                transaction.transaction_action().as_str_name().to_string(),
            ),
        ];

        for (field, value) in fields {
            if !self.kv.hset_nx(&key, field, &value).await? {
                tracing::info!(key = %key, field, "field already present, keeping first write");
            }
        }
        Ok(key)
    }

    /// Add a transaction key to its trade's index list unless already
    /// present. The list is scanned linearly; new keys go to the front, so
    /// the list enumerates a trade's transactions newest first.
    pub async fn index_transaction(
        &self,
        trade_id: u64,
        transaction_key: &str,
    ) -> Result<(), StoreError> {
        let list_key = trade_list_key(trade_id);
        let existing = self.kv.lrange(&list_key).await?;
        if existing.iter().any(|k| k == transaction_key) {
            tracing::info!(key = transaction_key, list = %list_key, "already indexed");
            return Ok(());
        }
        self.kv.lpush(&list_key, transaction_key).await
    }

    /// Write and index every (trade, transaction) pair of a decoded batch,
    /// one pair at a time. A backend failure stops the batch; writes already
    /// issued stand.
    pub async fn record_batch(&self, batch: &TradeBatch) -> Result<(), StoreError> {
        for (trade_id, trade) in &batch.trades {
            for (index, transaction) in trade.transactions.iter().enumerate() {
                let key = self.write_transaction(*trade_id, index, transaction).await?;
                self.index_transaction(*trade_id, &key).await?;
            }
        }
        Ok(())
    }

    /// Transaction keys recorded for a trade, newest first. A trade with no
    /// recorded transactions yields an empty list.
    pub async fn transaction_keys(&self, trade_id: u64) -> Result<Vec<String>, StoreError> {
        self.kv.lrange(&trade_list_key(trade_id)).await
    }

    /// All stored fields of one transaction row.
    pub async fn read_transaction(
        &self,
        key: &str,
    ) -> Result<HashMap<String, String>, StoreError> {
        self.kv.hget_all(key).await
    }
}
