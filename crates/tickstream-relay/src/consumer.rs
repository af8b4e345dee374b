use std::sync::Arc;

use tokio::task::JoinSet;

use tickstream_middleware::{EventLog, LogReader};

use crate::registry::{HandlerRegistry, Topic};

/// Starts and owns the per-topic consumer tasks.
///
/// The supervisor holds no state of its own beyond the injected collaborators;
/// once spawned, tasks run until the process exits or their data source
/// fails. There is no mechanism to stop an individual topic.
pub struct ConsumerSupervisor {
    log: Arc<dyn EventLog>,
    registry: Arc<HandlerRegistry>,
}

impl ConsumerSupervisor {
    pub fn new(log: Arc<dyn EventLog>, registry: Arc<HandlerRegistry>) -> Self {
        Self { log, registry }
    }

    /// Spawn one task per topic. The returned set must be kept alive for as
    /// long as the tasks should run.
    pub fn spawn(&self, topics: &[Topic]) -> JoinSet<()> {
        let mut tasks = JoinSet::new();
        for &topic in topics {
            let log = Arc::clone(&self.log);
            let registry = Arc::clone(&self.registry);
            tasks.spawn(consume_topic(log, registry, topic));
        }
        tasks
    }
}

/// Consume every partition of one topic. Partition discovery or reader
/// creation failure abandons this topic only; other topics are unaffected.
async fn consume_topic(log: Arc<dyn EventLog>, registry: Arc<HandlerRegistry>, topic: Topic) {
    let name = topic.name();

    let partitions = match log.partitions(name).await {
        Ok(partitions) => partitions,
        Err(e) => {
            tracing::error!(topic = name, error = %e, "partition discovery failed, abandoning topic");
            return;
        }
    };

    let mut readers = Vec::with_capacity(partitions.len());
    for partition in partitions {
        match log.tail(name, partition).await {
            Ok(reader) => readers.push((partition, reader)),
            Err(e) => {
                tracing::error!(topic = name, partition, error = %e, "tail failed, abandoning topic");
                return;
            }
        }
    }

    tracing::info!(topic = name, partitions = readers.len(), "consuming");

    let mut tasks = JoinSet::new();
    for (partition, reader) in readers {
        let registry = Arc::clone(&registry);
        tasks.spawn(consume_partition(registry, topic, partition, reader));
    }
    while tasks.join_next().await.is_some() {}
    tracing::warn!(topic = name, "all partition readers stopped");
}

/// Pump one partition's messages into the registry until the reader fails.
async fn consume_partition(
    registry: Arc<HandlerRegistry>,
    topic: Topic,
    partition: u32,
    mut reader: Box<dyn LogReader>,
) {
    loop {
        match reader.next().await {
            Ok(msg) => registry.dispatch(&msg.topic, msg.payload).await,
            Err(e) => {
                tracing::error!(topic = topic.name(), partition, error = %e, "reader stopped");
                return;
            }
        }
    }
}
