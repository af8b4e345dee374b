use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tickstream_middleware::StoreError;
use tickstream_schemas::{ExchangeId, MarketType, Trade, Transaction, TransactionAction};

use crate::store::TransactionStore;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("transaction {key} is missing field {field}")]
    MissingField { key: String, field: &'static str },
    #[error("transaction {key} holds unknown {field} label {value:?}")]
    UnknownLabel {
        key: String,
        field: &'static str,
        value: String,
    },
}

/// Read path: reconstructs trade aggregates from the transaction store.
pub struct QueryService {
    store: Arc<TransactionStore>,
}

impl QueryService {
    pub fn new(store: Arc<TransactionStore>) -> Self {
        Self { store }
    }

    /// Reconstruct a trade and all of its transactions, in index-list order
    /// (newest first). A trade with no recorded transactions is returned
    /// empty; any record that cannot be fully reconstructed fails the whole
    /// query.
    pub async fn get_trade(&self, trade_id: u64) -> Result<Trade, QueryError> {
        let keys = self.store.transaction_keys(trade_id).await?;
        tracing::debug!(trade_id, records = keys.len(), "reconstructing trade");

        let mut transactions = Vec::with_capacity(keys.len());
        for key in keys {
            let fields = self.store.read_transaction(&key).await?;
            transactions.push(reconstruct(&key, &fields)?);
        }

        Ok(Trade {
            id: trade_id,
            transactions,
        })
    }
}

fn required<'a>(
    key: &str,
    fields: &'a HashMap<String, String>,
    field: &'static str,
) -> Result<&'a str, QueryError> {
    fields
        .get(field)
        .map(String::as_str)
        .ok_or_else(|| QueryError::MissingField {
            key: key.to_string(),
            field,
        })
}

fn label<T>(
    key: &str,
    fields: &HashMap<String, String>,
    field: &'static str,
    parse: fn(&str) -> Option<T>,
) -> Result<T, QueryError> {
    let raw = required(key, fields, field)?;
    parse(raw).ok_or_else(|| QueryError::UnknownLabel {
        key: key.to_string(),
        field,
        value: raw.to_string(),
    })
}

fn reconstruct(key: &str, fields: &HashMap<String, String>) -> Result<Transaction, QueryError> {
    let trading_pair = required(key, fields, "trading_pair")?.to_string();
    let exchange_id = label(key, fields, "exchange_id", ExchangeId::from_str_name)?;
    let market_type = label(key, fields, "market_type", MarketType::from_str_name)?;
    let transaction_action = label(
        key,
        fields,
        "transaction_action",
        TransactionAction::from_str_name,
    )?;

    Ok(Transaction {
        trading_pair,
        exchange_id: exchange_id as i32,
        market_type: market_type as i32,
        transaction_action: transaction_action as i32,
    })
}
