//! Broker telemetry interpretation
//!
//! The client periodically emits a JSON statistics payload. This module
//! contains the pure logic that turns one payload into a health verdict and
//! a queued-message count. It never touches producer state; the monitor
//! task applies the verdict.

use crate::health::HealthStatus;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

/// Health message when at least one broker is up
pub const STATUS_NO_ERRORS: &str = "no errors";
/// Health message when telemetry lists no brokers at all
pub const STATUS_NO_BROKERS: &str = "status message: no brokers";
/// Health message when the payload is not valid JSON
pub const STATUS_UNPARSEABLE: &str = "status message: unable to parse";
/// Health message when brokers are listed but none is up
pub const STATUS_BROKERS_DOWN: &str = "brokers down, attempting reconnection";

const BROKER_STATE_UP: &str = "UP";

/// Per-broker section of the telemetry payload
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BrokerStats {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: String,
}

/// Telemetry payload; unknown fields are ignored
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StatsPayload {
    /// Clients emit `brokers` either as an array or as an object keyed by
    /// broker name; both normalize to a list here
    #[serde(default, deserialize_with = "brokers_as_list")]
    pub brokers: Vec<BrokerStats>,
    /// Messages currently queued inside the client
    #[serde(default)]
    pub msg_cnt: i64,
}

fn brokers_as_list<'de, D>(deserializer: D) -> Result<Vec<BrokerStats>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BrokerShape {
        List(Vec<BrokerStats>),
        Map(HashMap<String, BrokerStats>),
    }

    Ok(match BrokerShape::deserialize(deserializer)? {
        BrokerShape::List(list) => list,
        BrokerShape::Map(map) => {
            let mut list: Vec<BrokerStats> = map.into_values().collect();
            list.sort_by(|a, b| a.name.cmp(&b.name));
            list
        }
    })
}

/// Outcome of interpreting one telemetry payload
#[derive(Debug, Clone, PartialEq)]
pub struct StatsVerdict {
    pub health: HealthStatus,
    /// Queued-message count; `None` when the payload was unparseable, in
    /// which case the previously reported count stands
    pub queued_messages: Option<i64>,
}

/// Pure telemetry-to-verdict logic
pub struct StatsInterpreter;

impl StatsInterpreter {
    /// Interpret one raw payload
    pub fn interpret(raw: &str) -> StatsVerdict {
        let payload: StatsPayload = match serde_json::from_str(raw) {
            Ok(payload) => payload,
            Err(err) => {
                debug!("Discarding unparseable telemetry: {}", err);
                return StatsVerdict {
                    health: HealthStatus::error(STATUS_UNPARSEABLE),
                    queued_messages: None,
                };
            }
        };

        StatsVerdict {
            health: Self::broker_verdict(&payload.brokers),
            queued_messages: Some(payload.msg_cnt),
        }
    }

    /// One broker in state "UP" is enough to count as connected
    fn broker_verdict(brokers: &[BrokerStats]) -> HealthStatus {
        if brokers.is_empty() {
            return HealthStatus::error(STATUS_NO_BROKERS);
        }
        if brokers.iter().any(|b| b.state == BROKER_STATE_UP) {
            HealthStatus::connected(STATUS_NO_ERRORS)
        } else {
            HealthStatus::disconnected(STATUS_BROKERS_DOWN)
        }
    }
}
