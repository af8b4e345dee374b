use thiserror::Error;

#[derive(Error, Debug)]
pub enum LogError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("topic not found: {0}")]
    TopicNotFound(String),
    #[error("partition {partition} not found for topic {topic}")]
    PartitionNotFound { topic: String, partition: u32 },
    #[error("subscribe failed: {0}")]
    SubscribeFailed(String),
    #[error("read failed: {0}")]
    ReadFailed(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("operation failed: {0}")]
    OperationFailed(String),
}
