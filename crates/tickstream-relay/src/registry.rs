use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use prost::Message;
use tickstream_schemas::TradeBatch;

use crate::relay::RelaySender;
use crate::store::TransactionStore;

/// Topics consumed from the market data log.
///
/// Closed set: adding a topic means adding a variant here and giving it a
/// capability in [`Topic::handler`], both checked at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Orderbook,
    Pnl,
    Wallet,
    Trade,
    TradeDictionary,
}

impl Topic {
    pub const ALL: [Topic; 5] = [
        Topic::Orderbook,
        Topic::Pnl,
        Topic::Wallet,
        Topic::Trade,
        Topic::TradeDictionary,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Topic::Orderbook => "orderbook",
            Topic::Pnl => "pnl",
            Topic::Wallet => "wallet",
            Topic::Trade => "trade",
            Topic::TradeDictionary => "trade_dictionary",
        }
    }

    fn handler(self) -> Handler {
        match self {
            Topic::TradeDictionary => Handler::DecodeStore,
            Topic::Orderbook | Topic::Pnl | Topic::Wallet | Topic::Trade => Handler::Passthrough,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Handler {
    /// Forward the raw payload unchanged onto the relay channel.
    Passthrough,
    /// Decode a trade batch and persist its transactions; nothing is relayed.
    DecodeStore,
}

/// Routes raw messages to their topic's capability.
pub struct HandlerRegistry {
    handlers: HashMap<&'static str, Handler>,
    relay: RelaySender,
    store: Arc<TransactionStore>,
}

impl HandlerRegistry {
    pub fn new(relay: RelaySender, store: Arc<TransactionStore>) -> Self {
        let handlers = Topic::ALL.iter().map(|t| (t.name(), t.handler())).collect();
        Self {
            handlers,
            relay,
            store,
        }
    }

    /// Route one raw message. A topic with no registered capability is
    /// logged and dropped; a bad message never affects other topics.
    pub async fn dispatch(&self, topic: &str, payload: Bytes) {
        match self.handlers.get(topic) {
            None => {
                tracing::warn!(topic, "no handler registered, dropping message");
            }
            Some(Handler::Passthrough) => {
                if self.relay.send(payload).await.is_err() {
                    tracing::warn!(topic, "relay channel closed, dropping message");
                }
            }
            Some(Handler::DecodeStore) => self.decode_and_store(topic, payload).await,
        }
    }

    async fn decode_and_store(&self, topic: &str, payload: Bytes) {
        let batch = match TradeBatch::decode(payload) {
            Ok(batch) => batch,
            Err(e) => {
                tracing::warn!(topic, error = %e, "discarding undecodable trade batch");
                return;
            }
        };

        // Writes already issued before a failure are not rolled back.
        if let Err(e) = self.store.record_batch(&batch).await {
            tracing::error!(topic, error = %e, "trade batch aborted mid-write");
        }
    }
}
