use std::time::Duration;

use async_nats::jetstream::consumer::DeliverPolicy;
use async_nats::jetstream::{self, Context};
use async_trait::async_trait;
use futures_util::StreamExt;

use crate::error::LogError;
use crate::log::{EventLog, LogReader, RawMessage};

/// Partitioned event log over a single JetStream stream.
///
/// Topics are sharded into subjects `{prefix}.{topic}.{partition}`; the
/// partitions backing a topic are discovered from the stream's configured
/// subjects. Readers are ephemeral consumers created with
/// [`DeliverPolicy::New`], so only messages published after the reader was
/// opened are delivered.
pub struct JetStreamLog {
    jetstream: Context,
    stream_name: String,
    prefix: String,
}

impl JetStreamLog {
    /// Connect to the NATS server backing the log.
    ///
    /// An unreachable server is a hard failure: callers are expected to
    /// abort startup rather than retry.
    pub async fn connect(url: &str, stream_name: &str, prefix: &str) -> Result<Self, LogError> {
        let client = async_nats::connect(url)
            .await
            .map_err(|e| LogError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            jetstream: jetstream::new(client),
            stream_name: stream_name.to_string(),
            prefix: prefix.to_string(),
        })
    }

    fn subject(&self, topic: &str, partition: u32) -> String {
        format!("{}.{}.{}", self.prefix, topic, partition)
    }

    async fn stream(&self) -> Result<jetstream::stream::Stream, LogError> {
        self.jetstream
            .get_stream(&self.stream_name)
            .await
            .map_err(|e| LogError::SubscribeFailed(format!("stream lookup failed: {}", e)))
    }
}

struct JetStreamReader {
    messages: jetstream::consumer::pull::Stream,
    topic: String,
    partition: u32,
}

#[async_trait]
impl LogReader for JetStreamReader {
    async fn next(&mut self) -> Result<RawMessage, LogError> {
        let msg = self
            .messages
            .next()
            .await
            .ok_or_else(|| LogError::ReadFailed("subscription closed".to_string()))?
            .map_err(|e| LogError::ReadFailed(e.to_string()))?;

        let sequence = msg.info().map(|i| i.stream_sequence).ok();
        msg.ack()
            .await
            .map_err(|e| LogError::ReadFailed(format!("ack failed: {}", e)))?;

        Ok(RawMessage {
            topic: self.topic.clone(),
            partition: self.partition,
            payload: msg.payload.clone(),
            sequence,
        })
    }
}

#[async_trait]
impl EventLog for JetStreamLog {
    async fn partitions(&self, topic: &str) -> Result<Vec<u32>, LogError> {
        let stream = self.stream().await?;
        let prefix = format!("{}.{}.", self.prefix, topic);

        let mut partitions: Vec<u32> = stream
            .cached_info()
            .config
            .subjects
            .iter()
            .filter_map(|s| s.as_str().strip_prefix(prefix.as_str()))
            .filter_map(|p| p.parse().ok())
            .collect();
        partitions.sort_unstable();

        if partitions.is_empty() {
            return Err(LogError::TopicNotFound(topic.to_string()));
        }
        Ok(partitions)
    }

    async fn tail(&self, topic: &str, partition: u32) -> Result<Box<dyn LogReader>, LogError> {
        let stream = self.stream().await?;
        let subject = self.subject(topic, partition);

        let consumer = stream
            .create_consumer(jetstream::consumer::pull::Config {
                deliver_policy: DeliverPolicy::New,
                filter_subject: subject.clone(),
                ..Default::default()
            })
            .await
            .map_err(|e| LogError::SubscribeFailed(e.to_string()))?;

        // Heartbeat to detect stale connections
        let messages = consumer
            .stream()
            .heartbeat(Duration::from_secs(5))
            .messages()
            .await
            .map_err(|e| LogError::SubscribeFailed(e.to_string()))?;

        tracing::info!(topic, partition, subject = %subject, "tailing partition");

        Ok(Box::new(JetStreamReader {
            messages,
            topic: topic.to_string(),
            partition,
        }))
    }
}
