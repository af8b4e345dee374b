use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use tokio::sync::broadcast;

use crate::error::LogError;
use crate::log::{EventLog, LogReader, RawMessage};

const CHANNEL_BUFFER_SIZE: usize = 1024;

/// In-memory partitioned log backed by broadcast channels.
///
/// A reader only observes messages appended after [`EventLog::tail`] was
/// called, matching the newest-offset policy of the production log. A reader
/// that falls behind by more than the channel buffer loses the overwritten
/// messages, matching the production log's own retention behavior.
pub struct InMemoryLog {
    topics: DashMap<String, Vec<broadcast::Sender<RawMessage>>>,
    partitions_per_topic: u32,
    sequence: AtomicU64,
}

impl InMemoryLog {
    pub fn new() -> Self {
        Self::with_partitions(1)
    }

    pub fn with_partitions(partitions_per_topic: u32) -> Self {
        Self {
            topics: DashMap::new(),
            partitions_per_topic: partitions_per_topic.max(1),
            sequence: AtomicU64::new(0),
        }
    }

    #[inline]
    fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed)
    }

    fn sender(&self, topic: &str, partition: u32) -> Result<broadcast::Sender<RawMessage>, LogError> {
        if partition >= self.partitions_per_topic {
            return Err(LogError::PartitionNotFound {
                topic: topic.to_string(),
                partition,
            });
        }
        let senders = self.topics.entry(topic.to_string()).or_insert_with(|| {
            (0..self.partitions_per_topic)
                .map(|_| broadcast::channel(CHANNEL_BUFFER_SIZE).0)
                .collect()
        });
        Ok(senders[partition as usize].clone())
    }

    /// Append a message to one partition, returning its sequence number.
    pub fn append(&self, topic: &str, partition: u32, payload: Bytes) -> Result<u64, LogError> {
        let tx = self.sender(topic, partition)?;
        let seq = self.next_sequence();
        let msg = RawMessage {
            topic: topic.to_string(),
            partition,
            payload,
            sequence: Some(seq),
        };
        // No receivers yet means the message is simply not retained.
        let _ = tx.send(msg);
        Ok(seq)
    }
}

impl Default for InMemoryLog {
    fn default() -> Self {
        Self::new()
    }
}

struct InMemoryLogReader {
    rx: broadcast::Receiver<RawMessage>,
}

#[async_trait]
impl LogReader for InMemoryLogReader {
    async fn next(&mut self) -> Result<RawMessage, LogError> {
        loop {
            match self.rx.recv().await {
                Ok(msg) => return Ok(msg),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "reader lagged, messages dropped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    return Err(LogError::ReadFailed("log closed".to_string()));
                }
            }
        }
    }
}

#[async_trait]
impl EventLog for InMemoryLog {
    async fn partitions(&self, _topic: &str) -> Result<Vec<u32>, LogError> {
        Ok((0..self.partitions_per_topic).collect())
    }

    async fn tail(&self, topic: &str, partition: u32) -> Result<Box<dyn LogReader>, LogError> {
        let tx = self.sender(topic, partition)?;
        Ok(Box::new(InMemoryLogReader { rx: tx.subscribe() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_tail_then_append() {
        let log = InMemoryLog::new();
        let mut reader = log.tail("orderbook", 0).await.unwrap();
        log.append("orderbook", 0, Bytes::from("tick")).unwrap();
        let msg = reader.next().await.unwrap();
        assert_eq!(msg.topic, "orderbook");
        assert_eq!(msg.payload, Bytes::from("tick"));
    }

    #[tokio::test]
    async fn test_tail_skips_earlier_messages() {
        let log = InMemoryLog::new();
        log.append("orderbook", 0, Bytes::from("old")).unwrap();
        let mut reader = log.tail("orderbook", 0).await.unwrap();
        log.append("orderbook", 0, Bytes::from("new")).unwrap();
        let msg = reader.next().await.unwrap();
        assert_eq!(msg.payload, Bytes::from("new"));
    }

    #[tokio::test]
    async fn test_partitions_are_independent() {
        let log = InMemoryLog::with_partitions(2);
        let mut r0 = log.tail("trade", 0).await.unwrap();
        let mut r1 = log.tail("trade", 1).await.unwrap();
        log.append("trade", 1, Bytes::from("p1")).unwrap();
        log.append("trade", 0, Bytes::from("p0")).unwrap();
        assert_eq!(r0.next().await.unwrap().payload, Bytes::from("p0"));
        assert_eq!(r1.next().await.unwrap().payload, Bytes::from("p1"));
    }

    #[tokio::test]
    async fn test_unknown_partition_rejected() {
        let log = InMemoryLog::new();
        let result = log.tail("trade", 5).await;
        assert!(matches!(
            result,
            Err(LogError::PartitionNotFound { partition: 5, .. })
        ));
    }

    #[tokio::test]
    async fn test_sequence_numbers_increment() {
        let log = InMemoryLog::new();
        let mut reader = log.tail("pnl", 0).await.unwrap();
        log.append("pnl", 0, Bytes::from("1")).unwrap();
        log.append("pnl", 0, Bytes::from("2")).unwrap();
        let first = reader.next().await.unwrap().sequence.unwrap();
        let second = reader.next().await.unwrap().sequence.unwrap();
        assert!(second > first);
    }
}
