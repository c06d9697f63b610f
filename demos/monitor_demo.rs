//! Producer monitoring demonstration
//!
//! Runs the full producer lifecycle against the mock client, feeding it
//! scripted telemetry so the health transitions are visible without a
//! running broker.
//!
//! Usage:
//!   cargo run --example monitor-demo
//!   LOG_FORMAT=pretty LOG_LEVEL=DEBUG cargo run --example monitor-demo

use kafka_steward::logging;
use kafka_steward::producer::param_names;
use kafka_steward::testing::mocks::{MockClient, MockHost};
use kafka_steward::transport::ClientEvent;
use kafka_steward::{ParameterRegistry, Producer, ProducerSettings};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_default_logging();

    let client = MockClient::new();
    let mut settings = ProducerSettings::default();
    settings.broker_addr = "localhost:9092".to_string();
    settings.topic = "demo-frames".to_string();

    let mut producer = Producer::new(Arc::new(client.clone()), settings);

    let host = Arc::new(MockHost::new());
    let registry = Arc::new(ParameterRegistry::new(host.clone()));
    producer.install_parameters(Arc::clone(&registry))?;

    producer.start()?;
    info!(health = ?producer.health(), "Monitor started");

    client.push_event(ClientEvent::Stats(
        r#"{"brokers": [{"name": "localhost:9092/1", "state": "UP"}], "msg_cnt": 0}"#.to_string(),
    ));
    tokio::time::sleep(Duration::from_millis(200)).await;
    info!(health = ?producer.health(), "After UP telemetry");

    for n in 0..3 {
        producer.send_now(format!("frame-{n}").as_bytes())?;
    }
    info!(sent = client.produced().len(), "Frames queued with the client");

    producer.set_max_message_size(2_000_000)?;
    info!(
        max = producer.max_message_size(),
        builds = client.build_count(),
        "Reconfigured and rebuilt"
    );

    client.push_event(ClientEvent::Stats(
        r#"{"brokers": [{"name": "localhost:9092/1", "state": "DOWN"}], "msg_cnt": 3}"#
            .to_string(),
    ));
    tokio::time::sleep(Duration::from_millis(200)).await;
    info!(
        health = ?producer.health(),
        unsent = producer.unsent_messages(),
        "After DOWN telemetry"
    );

    // The host-side parameter database tracked every transition
    if let Some(index) = host.index_of(param_names::CONNECTION_MESSAGE) {
        info!(message = ?host.latest_text(index), "Host sees connection message");
    }
    if let Some(index) = host.index_of(param_names::UNSENT_MESSAGES) {
        info!(unsent = ?host.latest_int64(index), "Host sees queue depth");
    }

    producer.shutdown().await?;
    info!("Demo complete");
    Ok(())
}
