//! Producer configuration
//!
//! [`ProducerSettings`] holds the committed configuration values. Runtime
//! changes go through the `Producer` setters, which validate and stage each
//! value with the client before committing it here; this struct only knows
//! how to load, default, and validate itself.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Committed producer configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProducerSettings {
    /// Broker address list ("host:port[,host:port...]"); empty means not
    /// yet connectable
    #[serde(default)]
    pub broker_addr: String,
    /// Destination topic, applied per send
    #[serde(default)]
    pub topic: String,
    /// Largest accepted payload in bytes
    #[serde(default = "default_max_message_size")]
    pub max_message_size: usize,
    /// Client-side buffer budget in kilobytes
    #[serde(default = "default_message_buffer_kb")]
    pub message_buffer_kb: usize,
    /// Maximum number of locally queued messages
    #[serde(default = "default_queue_length")]
    pub queue_length: usize,
    /// How often the client emits telemetry, in milliseconds
    #[serde(default = "default_stats_interval_ms")]
    pub stats_interval_ms: u64,
    /// Whether a rebuild flushes the outgoing queue before dropping the
    /// old handle
    #[serde(default = "default_flush_on_rebuild")]
    pub flush_on_rebuild: bool,
    /// Upper bound for that flush, in milliseconds
    #[serde(default = "default_flush_timeout_ms")]
    pub flush_timeout_ms: u64,
}

fn default_max_message_size() -> usize {
    1_000_000
}

fn default_message_buffer_kb() -> usize {
    500_000
}

fn default_queue_length() -> usize {
    100_000
}

fn default_stats_interval_ms() -> u64 {
    500
}

fn default_flush_on_rebuild() -> bool {
    true
}

fn default_flush_timeout_ms() -> u64 {
    500
}

impl Default for ProducerSettings {
    fn default() -> Self {
        Self {
            broker_addr: String::new(),
            topic: String::new(),
            max_message_size: default_max_message_size(),
            message_buffer_kb: default_message_buffer_kb(),
            queue_length: default_queue_length(),
            stats_interval_ms: default_stats_interval_ms(),
            flush_on_rebuild: default_flush_on_rebuild(),
            flush_timeout_ms: default_flush_timeout_ms(),
        }
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}

impl ProducerSettings {
    /// Load settings from a TOML file and validate them
    pub fn load_from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        let settings: ProducerSettings = toml::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check value ranges; the broker address and topic may be empty here
    /// because both can be supplied later through the setters
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.max_message_size == 0 {
            return Err(SettingsError::InvalidSettings(
                "max_message_size must be greater than zero".to_string(),
            ));
        }
        if self.message_buffer_kb == 0 {
            return Err(SettingsError::InvalidSettings(
                "message_buffer_kb must be greater than zero".to_string(),
            ));
        }
        if self.queue_length == 0 {
            return Err(SettingsError::InvalidSettings(
                "queue_length must be greater than zero".to_string(),
            ));
        }
        if self.stats_interval_ms == 0 {
            return Err(SettingsError::InvalidSettings(
                "stats_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let settings = ProducerSettings::default();
        assert_eq!(settings.broker_addr, "");
        assert_eq!(settings.topic, "");
        assert_eq!(settings.max_message_size, 1_000_000);
        assert_eq!(settings.message_buffer_kb, 500_000);
        assert_eq!(settings.queue_length, 100_000);
        assert_eq!(settings.stats_interval_ms, 500);
        assert!(settings.flush_on_rebuild);
        assert_eq!(settings.flush_timeout_ms, 500);
    }

    #[test]
    fn test_full_toml_round() {
        let toml_content = r#"
broker_addr = "kafka-1:9092,kafka-2:9092"
topic = "detector-frames"
max_message_size = 2000000
message_buffer_kb = 250000
queue_length = 50000
stats_interval_ms = 1000
flush_on_rebuild = false
flush_timeout_ms = 200
"#;
        let settings: ProducerSettings = toml::from_str(toml_content).unwrap();
        assert_eq!(settings.broker_addr, "kafka-1:9092,kafka-2:9092");
        assert_eq!(settings.topic, "detector-frames");
        assert_eq!(settings.max_message_size, 2_000_000);
        assert_eq!(settings.message_buffer_kb, 250_000);
        assert_eq!(settings.queue_length, 50_000);
        assert_eq!(settings.stats_interval_ms, 1000);
        assert!(!settings.flush_on_rebuild);
        assert_eq!(settings.flush_timeout_ms, 200);
    }

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let toml_content = r#"
broker_addr = "localhost:9092"
topic = "events"
"#;
        let settings: ProducerSettings = toml::from_str(toml_content).unwrap();
        assert_eq!(settings.broker_addr, "localhost:9092");
        assert_eq!(settings.max_message_size, 1_000_000);
        assert_eq!(settings.stats_interval_ms, 500);
    }

    #[test]
    fn test_validate_rejects_zero_sizes() {
        let mut settings = ProducerSettings::default();
        settings.max_message_size = 0;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvalidSettings(_))
        ));

        let mut settings = ProducerSettings::default();
        settings.queue_length = 0;
        assert!(settings.validate().is_err());

        let mut settings = ProducerSettings::default();
        settings.stats_interval_ms = 0;
        assert!(settings.validate().is_err());

        let mut settings = ProducerSettings::default();
        settings.message_buffer_kb = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_empty_broker_and_topic_are_valid() {
        let settings = ProducerSettings::default();
        assert!(settings.validate().is_ok());
    }
}
