//! Connection health model
//!
//! Health is derived from broker telemetry and connection lifecycle events,
//! never from individual send results. The integer encoding is part of the
//! host-facing parameter surface and must stay stable.

/// Connection health as reported to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionHealth {
    /// At least one broker is reachable
    Connected,
    /// No broker currently reachable; recovery is expected
    Disconnected,
    /// Telemetry unusable or the connection could not be (re)built
    Error,
}

impl ConnectionHealth {
    /// Host-visible integer encoding (stable contract)
    pub fn as_i32(&self) -> i32 {
        match self {
            ConnectionHealth::Connected => 0,
            ConnectionHealth::Disconnected => 1,
            ConnectionHealth::Error => 2,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionHealth::Connected)
    }
}

/// Health state paired with a human-readable explanation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthStatus {
    pub state: ConnectionHealth,
    pub message: String,
}

impl HealthStatus {
    pub fn new<S: Into<String>>(state: ConnectionHealth, message: S) -> Self {
        Self {
            state,
            message: message.into(),
        }
    }

    pub fn connected<S: Into<String>>(message: S) -> Self {
        Self::new(ConnectionHealth::Connected, message)
    }

    pub fn disconnected<S: Into<String>>(message: S) -> Self {
        Self::new(ConnectionHealth::Disconnected, message)
    }

    pub fn error<S: Into<String>>(message: S) -> Self {
        Self::new(ConnectionHealth::Error, message)
    }
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self::disconnected("not connected")
    }
}
