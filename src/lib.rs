//! Kafka Steward
//!
//! A managed producer connection for streaming payloads into a Kafka-style
//! message broker, built to sit inside a host application that owns the
//! actual parameter database.
//!
//! # Overview
//!
//! This crate provides:
//! - A single owned producer connection with a narrow send/configure API
//! - Staged reconfiguration with rebuild-before-discard handle replacement
//! - Connection health derived from broker telemetry, never from sends
//! - A background monitor task that drains client events
//! - A typed parameter registry for two-way host synchronization
//! - Client capability traits so tests run without a broker
//!
//! # Quick Start
//!
//! ```rust
//! use kafka_steward::testing::mocks::MockClient;
//! use kafka_steward::{Producer, ProducerSettings};
//! use std::sync::Arc;
//!
//! let mut settings = ProducerSettings::default();
//! settings.broker_addr = "localhost:9092".to_string();
//! settings.topic = "events".to_string();
//!
//! // Swap MockClient for a real client binding in production
//! let producer = Producer::new(Arc::new(MockClient::new()), settings);
//! producer.send_now(b"payload").unwrap();
//! assert_eq!(producer.topic(), "events");
//! ```

pub mod config;
pub mod error;
pub mod health;
pub mod logging;
pub mod params;
pub mod producer;
pub mod stats;
pub mod testing;
pub mod transport;

// Re-export the host-facing surface
pub use config::{ProducerSettings, SettingsError};
pub use error::{ProducerError, ProducerResult};
pub use health::{ConnectionHealth, HealthStatus};
pub use params::{
    ParamIndex, ParamKind, Parameter, ParameterHost, ParameterRegistry, RegistryError,
    TypedParameter,
};
pub use producer::{param_names, Producer};
pub use stats::{StatsInterpreter, StatsVerdict};
pub use transport::{
    ClientConfig, ClientError, ClientEvent, ClientFactory, ClientHandle, DeliveryError,
    PARTITION_UNASSIGNED,
};
