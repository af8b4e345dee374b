//! tickstream-schemas: wire schema for the trade envelope
//!
//! `src/trade.rs` is prost-build output generated from `proto/trade.proto`
//! and checked in so the build does not require protoc. Regenerate it after
//! changing the proto file.

pub mod trade;

pub use trade::{ExchangeId, MarketType, Trade, TradeBatch, Transaction, TransactionAction};

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_enum_labels_roundtrip() {
        assert_eq!(ExchangeId::from_str_name("EXCHANGE_A"), Some(ExchangeId::ExchangeA));
        assert_eq!(ExchangeId::ExchangeA.as_str_name(), "EXCHANGE_A");
        assert_eq!(MarketType::from_str_name("SPOT"), Some(MarketType::Spot));
        assert_eq!(TransactionAction::from_str_name("SELL"), Some(TransactionAction::Sell));
        assert_eq!(ExchangeId::from_str_name("EXCHANGE_Z"), None);
    }

    #[test]
    fn test_trade_batch_decode() {
        let mut batch = TradeBatch::default();
        batch.trades.insert(
            42,
            Trade {
                id: 42,
                transactions: vec![Transaction {
                    trading_pair: "BTC/USD".to_string(),
                    exchange_id: ExchangeId::ExchangeA as i32,
                    market_type: MarketType::Spot as i32,
                    transaction_action: TransactionAction::Buy as i32,
                }],
            },
        );

        let decoded = TradeBatch::decode(batch.encode_to_vec().as_slice()).unwrap();
        let trade = &decoded.trades[&42];
        assert_eq!(trade.transactions.len(), 1);
        assert_eq!(trade.transactions[0].exchange_id(), ExchangeId::ExchangeA);
    }

    #[test]
    fn test_garbage_payload_fails_decode() {
        assert!(TradeBatch::decode(&b"\xff\xff\xff"[..]).is_err());
    }
}
