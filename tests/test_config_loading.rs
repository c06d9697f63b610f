//! Configuration loading and validation tests
//!
//! Tests focus on BEHAVIOR of configuration loading, validation, and error
//! handling. We test observable outcomes, not implementation details of
//! TOML parsing.

use kafka_steward::config::{ProducerSettings, SettingsError};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_settings_load_successfully_from_valid_toml() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(
        temp_file,
        r#"
broker_addr = "kafka-1:9092,kafka-2:9092"
topic = "detector-frames"
max_message_size = 2000000
message_buffer_kb = 250000
queue_length = 50000
stats_interval_ms = 1000
flush_on_rebuild = false
flush_timeout_ms = 200
"#
    )
    .unwrap();

    let settings = ProducerSettings::load_from_file(temp_file.path()).unwrap();

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
fn test_settings_apply_defaults_for_missing_fields() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(
        temp_file,
        r#"
broker_addr = "localhost:9092"
topic = "events"
"#
    )
    .unwrap();

    let settings = ProducerSettings::load_from_file(temp_file.path()).unwrap();

    assert_eq!(settings.broker_addr, "localhost:9092");
    assert_eq!(settings.topic, "events");
    assert_eq!(settings.max_message_size, 1_000_000);
    assert_eq!(settings.message_buffer_kb, 500_000);
    assert_eq!(settings.queue_length, 100_000);
    assert_eq!(settings.stats_interval_ms, 500);
    assert!(settings.flush_on_rebuild);
    assert_eq!(settings.flush_timeout_ms, 500);
}

#[test]
fn test_empty_file_loads_pure_defaults() {
    // Every field has a default; the broker address and topic can be
    // supplied later through the setters
    let temp_file = NamedTempFile::new().unwrap();

    let settings = ProducerSettings::load_from_file(temp_file.path()).unwrap();

    assert_eq!(settings, ProducerSettings::default());
    assert!(settings.broker_addr.is_empty());
    assert!(settings.topic.is_empty());
}

#[test]
fn test_settings_return_error_for_invalid_toml_syntax() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(
        temp_file,
        r#"
broker_addr = "localhost:9092
topic =
"#
    )
    .unwrap();

    let result = ProducerSettings::load_from_file(temp_file.path());

    assert!(result.is_err());
    match result {
        Err(SettingsError::TomlParse(_)) => {}
        _ => panic!("Expected TomlParse error for invalid TOML syntax"),
    }
}

#[test]
fn test_settings_return_error_for_wrong_field_type() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(
        temp_file,
        r#"
broker_addr = "localhost:9092"
max_message_size = "one million"
"#
    )
    .unwrap();

    let result = ProducerSettings::load_from_file(temp_file.path());

    assert!(result.is_err());
    match result {
        Err(SettingsError::TomlParse(_)) => {}
        _ => panic!("Expected TomlParse error for wrong field type"),
    }
}

#[test]
fn test_settings_return_error_when_file_not_found() {
    use std::path::Path;

    let result = ProducerSettings::load_from_file(Path::new("/nonexistent/settings.toml"));

    assert!(result.is_err());
    match result {
        Err(SettingsError::FileRead(_)) => {}
        _ => panic!("Expected FileRead error for nonexistent file"),
    }
}

#[test]
fn test_settings_return_error_for_zero_max_message_size() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(
        temp_file,
        r#"
broker_addr = "localhost:9092"
max_message_size = 0
"#
    )
    .unwrap();

    let result = ProducerSettings::load_from_file(temp_file.path());

    assert!(result.is_err());
    match result {
        Err(SettingsError::InvalidSettings(message)) => {
            assert!(message.contains("max_message_size"));
        }
        _ => panic!("Expected InvalidSettings error for zero max_message_size"),
    }
}

#[test]
fn test_settings_return_error_for_zero_queue_length() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(
        temp_file,
        r#"
queue_length = 0
"#
    )
    .unwrap();

    let result = ProducerSettings::load_from_file(temp_file.path());

    assert!(result.is_err());
    match result {
        Err(SettingsError::InvalidSettings(message)) => {
            assert!(message.contains("queue_length"));
        }
        _ => panic!("Expected InvalidSettings error for zero queue_length"),
    }
}

#[test]
fn test_settings_return_error_for_zero_stats_interval() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(
        temp_file,
        r#"
stats_interval_ms = 0
"#
    )
    .unwrap();

    let result = ProducerSettings::load_from_file(temp_file.path());

    assert!(result.is_err());
    assert!(matches!(result, Err(SettingsError::InvalidSettings(_))));
}

#[test]
fn test_settings_accept_multi_broker_address_lists() {
    let test_cases = vec![
        "localhost:9092",
        "kafka-1:9092,kafka-2:9092,kafka-3:9092",
        "10.0.0.5:9093",
    ];

    for broker_addr in test_cases {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
broker_addr = "{broker_addr}"
topic = "events"
"#
        )
        .unwrap();

        let settings = ProducerSettings::load_from_file(temp_file.path()).unwrap();
        assert_eq!(settings.broker_addr, broker_addr);
    }
}

#[test]
fn test_loaded_settings_drive_a_working_producer() {
    use kafka_steward::testing::mocks::MockClient;
    use kafka_steward::Producer;
    use std::sync::Arc;

    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(
        temp_file,
        r#"
broker_addr = "localhost:9092"
topic = "events"
max_message_size = 64
"#
    )
    .unwrap();

    let settings = ProducerSettings::load_from_file(temp_file.path()).unwrap();
    let client = MockClient::new();
    let producer = Producer::new(Arc::new(client.clone()), settings);

    assert_eq!(producer.max_message_size(), 64);
    producer.send_now(b"from file").unwrap();
    assert_eq!(client.produced().len(), 1);
    assert_eq!(client.produced()[0].topic, "events");
}
