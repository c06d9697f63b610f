//! Error types for producer operations
//!
//! Every public operation returns [`ProducerResult`]; the error variants
//! distinguish caller mistakes (rejected synchronously, no state change)
//! from connectivity failures (recoverable via reconfiguration) and from
//! the terminal faulted state.

use thiserror::Error;

/// Main error type for producer operations
#[derive(Debug, Error)]
pub enum ProducerError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Client rejected configuration key '{key}': {reason}")]
    ConfigRejected { key: String, reason: String },

    #[error("Unable to create producer handle")]
    CreateFailed,

    #[error("Not connected to any broker")]
    NotConnected,

    #[error("Producer failed with error code: {code}")]
    Delivery { code: i32 },

    #[error("Producer is in a permanent failure state")]
    Faulted,

    #[error("Status monitor is already running")]
    MonitorRunning,
}

impl ProducerError {
    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a configuration rejection error
    pub fn config_rejected<K: Into<String>, R: Into<String>>(key: K, reason: R) -> Self {
        Self::ConfigRejected {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// True for errors that leave the producer usable once connectivity
    /// or configuration is restored
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Faulted)
    }
}

/// Result type for producer operations
pub type ProducerResult<T> = Result<T, ProducerError>;
