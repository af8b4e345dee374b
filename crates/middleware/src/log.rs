use async_trait::async_trait;
use bytes::Bytes;

use crate::error::LogError;

/// A single message pulled from one partition of a topic.
///
/// Exists only while in flight between consumption and dispatch.
#[derive(Debug, Clone)]
pub struct RawMessage {
    pub topic: String,
    pub partition: u32,
    pub payload: Bytes,
    pub sequence: Option<u64>,
}

/// Reader handle over one partition, positioned at the tail.
#[async_trait]
pub trait LogReader: Send {
    /// Receive the next message (blocks until available).
    async fn next(&mut self) -> Result<RawMessage, LogError>;
}

/// Partitioned append-only log abstraction.
///
/// Readers obtained from [`EventLog::tail`] start at the newest offset:
/// messages appended before the reader was opened are never delivered.
#[async_trait]
pub trait EventLog: Send + Sync {
    /// Resolve the partitions backing a topic.
    async fn partitions(&self, topic: &str) -> Result<Vec<u32>, LogError>;

    /// Open a live-tail reader on one partition.
    async fn tail(&self, topic: &str, partition: u32) -> Result<Box<dyn LogReader>, LogError>;
}
