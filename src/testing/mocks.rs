//! Mock implementations for testing
//!
//! Provides a scripted client capability ([`MockClient`]) and a recording
//! parameter host ([`MockHost`]) to enable comprehensive testing without
//! external dependencies.

use crate::params::registry::{ParamIndex, ParameterHost};
use crate::params::ParamKind;
use crate::transport::{
    ClientConfig, ClientError, ClientEvent, ClientFactory, ClientHandle, DeliveryError,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One payload accepted by a mock handle
#[derive(Debug, Clone, PartialEq)]
pub struct ProducedRecord {
    /// Serial number of the handle that accepted it (1 = first build)
    pub handle: usize,
    pub topic: String,
    pub partition: i32,
    pub payload: Vec<u8>,
    pub timestamp_ms: i64,
}

#[derive(Default)]
struct MockClientState {
    fail_config: AtomicBool,
    fail_builds: AtomicBool,
    build_count: AtomicUsize,
    poll_count: AtomicUsize,
    reject_keys: Mutex<Vec<String>>,
    staged_history: Mutex<Vec<(String, String)>>,
    built_configs: Mutex<Vec<Vec<(String, String)>>>,
    pending_events: Mutex<VecDeque<ClientEvent>>,
    produce_error: Mutex<Option<i32>>,
    produced: Mutex<Vec<ProducedRecord>>,
    flush_calls: Mutex<Vec<(usize, u64)>>,
}

/// Scripted client capability
///
/// Clones share state, so tests keep one clone for inspection while the
/// producer owns another.
#[derive(Clone, Default)]
pub struct MockClient {
    state: Arc<MockClientState>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// A client whose configuration object cannot be created at all
    pub fn with_config_failure() -> Self {
        let client = Self::new();
        client.state.fail_config.store(true, Ordering::SeqCst);
        client
    }

    /// Reject future staging of the given key
    pub fn reject_key(&self, key: &str) {
        lock(&self.state.reject_keys).push(key.to_string());
    }

    /// Accept the key again
    pub fn accept_key(&self, key: &str) {
        lock(&self.state.reject_keys).retain(|k| k != key);
    }

    /// Make every `build` call fail until turned off
    pub fn set_build_failure(&self, fail: bool) {
        self.state.fail_builds.store(fail, Ordering::SeqCst);
    }

    /// Queue an event for the next poll
    pub fn push_event(&self, event: ClientEvent) {
        lock(&self.state.pending_events).push_back(event);
    }

    /// Make produce fail with the given code until cleared with `None`
    pub fn set_produce_error(&self, code: Option<i32>) {
        *lock(&self.state.produce_error) = code;
    }

    pub fn build_count(&self) -> usize {
        self.state.build_count.load(Ordering::SeqCst)
    }

    pub fn poll_count(&self) -> usize {
        self.state.poll_count.load(Ordering::SeqCst)
    }

    /// Every key/value staged across all config objects, in call order
    pub fn staged_history(&self) -> Vec<(String, String)> {
        lock(&self.state.staged_history).clone()
    }

    /// Snapshot of the staged configuration at each successful build
    pub fn built_configs(&self) -> Vec<Vec<(String, String)>> {
        lock(&self.state.built_configs).clone()
    }

    pub fn produced(&self) -> Vec<ProducedRecord> {
        lock(&self.state.produced).clone()
    }

    /// Flush calls as (handle serial, timeout_ms)
    pub fn flush_calls(&self) -> Vec<(usize, u64)> {
        lock(&self.state.flush_calls).clone()
    }

    pub fn clear_history(&self) {
        lock(&self.state.staged_history).clear();
        lock(&self.state.built_configs).clear();
        lock(&self.state.produced).clear();
        lock(&self.state.flush_calls).clear();
    }
}

impl ClientFactory for MockClient {
    fn new_config(&self) -> Result<Box<dyn ClientConfig>, ClientError> {
        if self.state.fail_config.load(Ordering::SeqCst) {
            return Err(ClientError::CreateFailed {
                reason: "mock configuration failure".to_string(),
            });
        }
        Ok(Box::new(MockConfig {
            state: Arc::clone(&self.state),
            staged: Vec::new(),
        }))
    }

    fn build(&self, config: &dyn ClientConfig) -> Result<Box<dyn ClientHandle>, ClientError> {
        if self.state.fail_builds.load(Ordering::SeqCst) {
            return Err(ClientError::CreateFailed {
                reason: "mock build failure".to_string(),
            });
        }
        let serial = self.state.build_count.fetch_add(1, Ordering::SeqCst) + 1;
        lock(&self.state.built_configs).push(config.dump());
        Ok(Box::new(MockHandle {
            state: Arc::clone(&self.state),
            serial,
        }))
    }
}

struct MockConfig {
    state: Arc<MockClientState>,
    staged: Vec<(String, String)>,
}

impl ClientConfig for MockConfig {
    fn set(&mut self, key: &str, value: &str) -> Result<(), ClientError> {
        if lock(&self.state.reject_keys).iter().any(|k| k == key) {
            return Err(ClientError::ConfigRejected {
                key: key.to_string(),
                reason: "mock rejection".to_string(),
            });
        }
        lock(&self.state.staged_history).push((key.to_string(), value.to_string()));
        match self.staged.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => self.staged.push((key.to_string(), value.to_string())),
        }
        Ok(())
    }

    fn dump(&self) -> Vec<(String, String)> {
        self.staged.clone()
    }
}

struct MockHandle {
    state: Arc<MockClientState>,
    serial: usize,
}

impl ClientHandle for MockHandle {
    fn produce(
        &mut self,
        topic: &str,
        partition: i32,
        payload: &[u8],
        timestamp_ms: i64,
    ) -> Result<(), DeliveryError> {
        if let Some(code) = *lock(&self.state.produce_error) {
            return Err(DeliveryError(code));
        }
        lock(&self.state.produced).push(ProducedRecord {
            handle: self.serial,
            topic: topic.to_string(),
            partition,
            payload: payload.to_vec(),
            timestamp_ms,
        });
        Ok(())
    }

    fn poll(&mut self) -> Vec<ClientEvent> {
        self.state.poll_count.fetch_add(1, Ordering::SeqCst);
        lock(&self.state.pending_events).drain(..).collect()
    }

    fn flush(&mut self, timeout_ms: u64) -> Result<(), DeliveryError> {
        lock(&self.state.flush_calls).push((self.serial, timeout_ms));
        Ok(())
    }
}

/// Recording parameter host with sequential index assignment
#[derive(Default)]
pub struct MockHost {
    next_index: AtomicI32,
    created: Mutex<Vec<(String, ParamKind, ParamIndex)>>,
    text_values: Mutex<Vec<(ParamIndex, String)>>,
    int32_values: Mutex<Vec<(ParamIndex, i32)>>,
    int64_values: Mutex<Vec<(ParamIndex, i64)>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slots in creation order as (name, kind, index)
    pub fn created_slots(&self) -> Vec<(String, ParamKind, ParamIndex)> {
        lock(&self.created).clone()
    }

    /// Index assigned to the named slot, if it was created
    pub fn index_of(&self, name: &str) -> Option<ParamIndex> {
        lock(&self.created)
            .iter()
            .find(|(n, _, _)| n == name)
            .map(|(_, _, index)| *index)
    }

    pub fn text_history(&self) -> Vec<(ParamIndex, String)> {
        lock(&self.text_values).clone()
    }

    pub fn int32_history(&self) -> Vec<(ParamIndex, i32)> {
        lock(&self.int32_values).clone()
    }

    pub fn int64_history(&self) -> Vec<(ParamIndex, i64)> {
        lock(&self.int64_values).clone()
    }

    /// Most recent text value pushed to the given slot
    pub fn latest_text(&self, index: ParamIndex) -> Option<String> {
        lock(&self.text_values)
            .iter()
            .rev()
            .find(|(i, _)| *i == index)
            .map(|(_, v)| v.clone())
    }

    pub fn latest_int32(&self, index: ParamIndex) -> Option<i32> {
        lock(&self.int32_values)
            .iter()
            .rev()
            .find(|(i, _)| *i == index)
            .map(|(_, v)| *v)
    }

    pub fn latest_int64(&self, index: ParamIndex) -> Option<i64> {
        lock(&self.int64_values)
            .iter()
            .rev()
            .find(|(i, _)| *i == index)
            .map(|(_, v)| *v)
    }
}

impl ParameterHost for MockHost {
    fn create_slot(&self, name: &str, kind: ParamKind) -> ParamIndex {
        let index = self.next_index.fetch_add(1, Ordering::SeqCst);
        lock(&self.created).push((name.to_string(), kind, index));
        index
    }

    fn set_text(&self, index: ParamIndex, value: &str) {
        lock(&self.text_values).push((index, value.to_string()));
    }

    fn set_int32(&self, index: ParamIndex, value: i32) {
        lock(&self.int32_values).push((index, value));
    }

    fn set_int64(&self, index: ParamIndex, value: i64) {
        lock(&self.int64_values).push((index, value));
    }
}
