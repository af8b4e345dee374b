use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use tokio::sync::{mpsc, Mutex};

/// Capacity of the relay queue fed by every passthrough handler. Producers
/// block when the queue is full, so a slow drain throttles consumption
/// rather than dropping or buffering without bound.
pub const RELAY_CAPACITY: usize = 1024;

/// Outbound buffer per client session. The drain task blocks on a full
/// session buffer until the session's writer catches up or disconnects.
const SESSION_BUFFER: usize = 64;

pub type RelaySender = mpsc::Sender<Bytes>;
pub type RelayReceiver = mpsc::Receiver<Bytes>;

/// Create the relay queue carrying passthrough payloads from all consumer
/// tasks to the broadcast drain.
pub fn relay_channel() -> (RelaySender, RelayReceiver) {
    mpsc::channel(RELAY_CAPACITY)
}

pub type SessionId = u64;

/// Registry of connected client sessions and the drain fanning relay
/// payloads out to them.
///
/// Membership mutation and iteration happen from different tasks, so the
/// session map sits behind a single mutex.
pub struct Broadcast {
    sessions: Mutex<HashMap<SessionId, mpsc::Sender<Bytes>>>,
    next_id: AtomicU64,
}

impl Broadcast {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Add a session, returning its id and the receiving end of its
    /// outbound buffer.
    pub async fn register(&self) -> (SessionId, mpsc::Receiver<Bytes>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(SESSION_BUFFER);
        self.sessions.lock().await.insert(id, tx);
        (id, rx)
    }

    /// Remove a session. Safe to call for an already-evicted id.
    pub async fn deregister(&self, id: SessionId) {
        self.sessions.lock().await.remove(&id);
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Drain the relay queue, delivering each payload to every registered
    /// session. A session whose buffer has closed is evicted. Runs until the
    /// relay channel closes.
    pub async fn run(&self, mut relay: RelayReceiver) {
        while let Some(payload) = relay.recv().await {
            let mut sessions = self.sessions.lock().await;
            let mut closed = Vec::new();
            for (id, tx) in sessions.iter() {
                if tx.send(payload.clone()).await.is_err() {
                    closed.push(*id);
                }
            }
            for id in closed {
                sessions.remove(&id);
                tracing::info!(session = id, "evicted closed session");
            }
        }
        tracing::warn!("relay channel closed, broadcast drain stopping");
    }
}

impl Default for Broadcast {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_payload_reaches_every_session() {
        let broadcast = Arc::new(Broadcast::new());
        let (_id_a, mut rx_a) = broadcast.register().await;
        let (_id_b, mut rx_b) = broadcast.register().await;

        let (tx, rx) = relay_channel();
        let drain = Arc::clone(&broadcast);
        tokio::spawn(async move { drain.run(rx).await });

        tx.send(Bytes::from("tick")).await.unwrap();

        assert_eq!(rx_a.recv().await.unwrap(), Bytes::from("tick"));
        assert_eq!(rx_b.recv().await.unwrap(), Bytes::from("tick"));
    }

    #[tokio::test]
    async fn test_queue_order_preserved() {
        let broadcast = Arc::new(Broadcast::new());
        let (_id, mut rx_session) = broadcast.register().await;

        let (tx, rx) = relay_channel();
        let drain = Arc::clone(&broadcast);
        tokio::spawn(async move { drain.run(rx).await });

        for payload in ["a", "b", "c"] {
            tx.send(Bytes::from(payload)).await.unwrap();
        }

        assert_eq!(rx_session.recv().await.unwrap(), Bytes::from("a"));
        assert_eq!(rx_session.recv().await.unwrap(), Bytes::from("b"));
        assert_eq!(rx_session.recv().await.unwrap(), Bytes::from("c"));
    }

    #[tokio::test]
    async fn test_closed_session_is_evicted() {
        let broadcast = Arc::new(Broadcast::new());
        let (_id_a, rx_a) = broadcast.register().await;
        let (_id_b, mut rx_b) = broadcast.register().await;
        drop(rx_a);

        let (tx, rx) = relay_channel();
        let drain = Arc::clone(&broadcast);
        tokio::spawn(async move { drain.run(rx).await });

        tx.send(Bytes::from("tick")).await.unwrap();
        assert_eq!(rx_b.recv().await.unwrap(), Bytes::from("tick"));

        assert_eq!(broadcast.session_count().await, 1);
    }
}
