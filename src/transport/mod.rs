//! Client capability boundary
//!
//! The producer drives an external streaming client (librdkafka-compatible)
//! exclusively through these traits: stage configuration keys, build a
//! connected handle, enqueue payloads, and drain asynchronous events. All
//! methods are non-blocking except [`ClientHandle::flush`], which is bounded
//! by its timeout. This is the seam used for dependency injection and
//! testing.

use thiserror::Error;

/// Configuration keys understood by librdkafka-compatible clients
pub mod keys {
    pub const BROKER_LIST: &str = "metadata.broker.list";
    pub const MESSAGE_MAX_BYTES: &str = "message.max.bytes";
    pub const MESSAGE_COPY_MAX_BYTES: &str = "message.copy.max.bytes";
    pub const QUEUE_BUFFERING_MAX_KBYTES: &str = "queue.buffering.max.kbytes";
    pub const QUEUE_BUFFERING_MAX_MESSAGES: &str = "queue.buffering.max.messages";
    pub const STATISTICS_INTERVAL_MS: &str = "statistics.interval.ms";
}

/// Partition value meaning "let the broker assign one"
pub const PARTITION_UNASSIGNED: i32 = -1;

/// Errors surfaced by the client capability
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("configuration key '{key}' rejected: {reason}")]
    ConfigRejected { key: String, reason: String },
    #[error("client creation failed: {reason}")]
    CreateFailed { reason: String },
}

/// Numeric delivery failure reported by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("delivery failed with code {0}")]
pub struct DeliveryError(pub i32);

/// Event drained from the client by the status monitor
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// Periodic telemetry payload (JSON text)
    Stats(String),
    /// Client-level error event; `all_brokers_down` marks total loss of
    /// connectivity as opposed to an isolated failure
    Error { code: i32, all_brokers_down: bool },
    /// Log line forwarded by the client
    Log { message: String },
    /// Broker asked the client to back off for `time_ms`
    Throttle { time_ms: i32 },
}

/// A set of staged configuration values, applied when the next handle is
/// built
pub trait ClientConfig: Send {
    /// Stage one key/value pair
    fn set(&mut self, key: &str, value: &str) -> Result<(), ClientError>;

    /// Currently staged pairs, for handle construction and diagnostics
    fn dump(&self) -> Vec<(String, String)>;
}

/// Factory for staged configurations and connected handles
pub trait ClientFactory: Send + Sync {
    /// Create an empty staged configuration
    fn new_config(&self) -> Result<Box<dyn ClientConfig>, ClientError>;

    /// Build a connected handle from the staged configuration
    fn build(&self, config: &dyn ClientConfig) -> Result<Box<dyn ClientHandle>, ClientError>;
}

/// An owned connection to the broker cluster
pub trait ClientHandle: Send {
    /// Enqueue one payload for delivery; `timestamp_ms` is milliseconds
    /// since the Unix epoch
    fn produce(
        &mut self,
        topic: &str,
        partition: i32,
        payload: &[u8],
        timestamp_ms: i64,
    ) -> Result<(), DeliveryError>;

    /// Drain pending client events without blocking
    fn poll(&mut self) -> Vec<ClientEvent>;

    /// Wait up to `timeout_ms` for locally queued messages to drain
    fn flush(&mut self, timeout_ms: u64) -> Result<(), DeliveryError>;
}
