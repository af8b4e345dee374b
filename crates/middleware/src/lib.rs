//! tickstream-middleware: pluggable collaborator abstractions
//!
//! Provides trait-based abstractions for the partitioned event log and the
//! key-value store, with in-memory implementations for testing.

pub mod error;
pub mod jetstream;
pub mod log;
pub mod memory;
pub mod redis_store;
pub mod store;

pub use error::{LogError, StoreError};
pub use jetstream::JetStreamLog;
pub use log::{EventLog, LogReader, RawMessage};
pub use memory::{InMemoryLog, InMemoryStore};
pub use redis_store::RedisStore;
pub use store::KvStore;
