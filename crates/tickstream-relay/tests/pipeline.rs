//! End-to-end pipeline test over the in-memory backends: log partitions →
//! consumer supervisor → handler registry → relay/broadcast → a real
//! WebSocket client, with the trade_dictionary path landing in the store.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures_util::StreamExt;
use prost::Message;
use tokio_tungstenite::tungstenite;

use tickstream_middleware::{EventLog, InMemoryLog, InMemoryStore};
use tickstream_relay::consumer::ConsumerSupervisor;
use tickstream_relay::query::QueryService;
use tickstream_relay::registry::{HandlerRegistry, Topic};
use tickstream_relay::relay::{relay_channel, Broadcast};
use tickstream_relay::server::{create_router, AppState};
use tickstream_relay::store::TransactionStore;
use tickstream_schemas::{
    ExchangeId, MarketType, Trade, TradeBatch, Transaction, TransactionAction,
};

#[tokio::test]
async fn test_log_to_client_and_store() {
    let log = Arc::new(InMemoryLog::new());
    let store = Arc::new(TransactionStore::new(Arc::new(InMemoryStore::new())));
    let query = Arc::new(QueryService::new(Arc::clone(&store)));

    let (relay_tx, relay_rx) = relay_channel();
    let broadcast = Arc::new(Broadcast::new());
    {
        let broadcast = Arc::clone(&broadcast);
        tokio::spawn(async move { broadcast.run(relay_rx).await });
    }

    let registry = Arc::new(HandlerRegistry::new(relay_tx, Arc::clone(&store)));
    let supervisor =
        ConsumerSupervisor::new(Arc::clone(&log) as Arc<dyn EventLog>, registry);
    let mut consumers = supervisor.spawn(&Topic::ALL);
    tokio::spawn(async move { while consumers.join_next().await.is_some() {} });

    let app = create_router(AppState {
        query: Arc::clone(&query),
        broadcast,
    });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let (mut client, _) = tokio_tungstenite::connect_async(format!("ws://{}/ws", addr))
        .await
        .unwrap();

    // Let the session register and the consumers open their tail readers.
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Passthrough: bytes arrive at the client verbatim, in log order.
    let frames: [&[u8]; 2] = [b"{\"bid\":100}", b"{\"bid\":101}"];
    for frame in frames {
        log.append("orderbook", 0, Bytes::from_static(frame)).unwrap();
    }
    for expected in frames {
        let received = tokio::time::timeout(Duration::from_secs(2), client.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(received, tungstenite::Message::Binary(expected.to_vec()));
    }

    // Decode-and-store: a trade batch lands in the store, nothing is relayed.
    let mut batch = TradeBatch::default();
    batch.trades.insert(
        42,
        Trade {
            id: 42,
            transactions: vec![
                Transaction {
                    trading_pair: "BTC/USD".to_string(),
                    exchange_id: ExchangeId::ExchangeA as i32,
                    market_type: MarketType::Spot as i32,
                    transaction_action: TransactionAction::Buy as i32,
                },
                Transaction {
                    trading_pair: "ETH/USD".to_string(),
                    exchange_id: ExchangeId::ExchangeB as i32,
                    market_type: MarketType::Spot as i32,
                    transaction_action: TransactionAction::Sell as i32,
                },
            ],
        },
    );
    log.append("trade_dictionary", 0, Bytes::from(batch.encode_to_vec()))
        .unwrap();

    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    loop {
        if store.transaction_keys(42).await.unwrap().len() == 2 {
            break;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "transactions never stored"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let trade = query.get_trade(42).await.unwrap();
    assert_eq!(trade.id, 42);
    assert_eq!(trade.transactions[0].trading_pair, "ETH/USD");
    assert_eq!(trade.transactions[1].trading_pair, "BTC/USD");
}
