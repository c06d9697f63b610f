//! Producer façade and connection management
//!
//! [`Producer`] owns one outbound connection to a broker cluster behind the
//! client capability traits. Configuration changes stage values with the
//! client, commit them, and rebuild the connection handle; a background
//! monitor task drains client events and derives the connection health
//! published through the parameter registry.
//!
//! Locking is layered: the handle slot first, then the staged config;
//! settings, health, and counters are leaf locks. Host callbacks are never
//! invoked while the handle or staged-config lock is held.

use crate::config::ProducerSettings;
use crate::error::{ProducerError, ProducerResult};
use crate::health::{ConnectionHealth, HealthStatus};
use crate::params::parameter::{Parameter, TypedParameter};
use crate::params::registry::ParameterRegistry;
use crate::stats::StatsInterpreter;
use crate::transport::{
    keys, ClientConfig, ClientError, ClientEvent, ClientFactory, ClientHandle,
    PARTITION_UNASSIGNED,
};
use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, timeout, Duration};
use tracing::{debug, error, info, warn};

/// Host-facing parameter names
pub mod param_names {
    pub const CONNECTION_STATUS: &str = "KAFKA_CONNECTION_STATUS";
    pub const CONNECTION_MESSAGE: &str = "KAFKA_CONNECTION_MESSAGE";
    pub const UNSENT_MESSAGES: &str = "KAFKA_UNSENT_MESSAGES";
    pub const MAX_MESSAGE_SIZE: &str = "KAFKA_MAX_MESSAGE_SIZE";
    pub const MESSAGE_BUFFER_SIZE: &str = "KAFKA_MESSAGE_BUFFER_SIZE";
}

/// Fixed cadence of the status monitor, independent of the configured
/// telemetry interval
const POLL_INTERVAL_MS: u64 = 50;

const MSG_CREATE_FAILED: &str = "unable to create producer";
const MSG_INIT_FAILED: &str = "unable to initialize client subsystem";
const MSG_MONITOR_STARTING: &str = "starting status monitor";
const MSG_ALL_BROKERS_DOWN: &str = "brokers down, attempting to reconnect";
const MSG_FAULTED: &str = "producer entered permanent failure state";

struct MonitorTask {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Managed, reconfigurable producer for a streaming transport
pub struct Producer {
    core: Arc<ProducerCore>,
    monitor: Option<MonitorTask>,
}

impl Producer {
    /// Create a producer over the given client capability
    ///
    /// Construction is infallible; if the client configuration object
    /// cannot be created or a base setting is refused, the producer starts
    /// in the permanent failure state and every operation reports it.
    /// A non-empty broker address in `settings` triggers an immediate
    /// connection attempt, with the outcome reflected in the health state.
    pub fn new(factory: Arc<dyn ClientFactory>, settings: ProducerSettings) -> Self {
        Self {
            core: ProducerCore::new(factory, settings),
            monitor: None,
        }
    }

    /// Register this producer's parameters with the host-owned registry
    /// and push their current values so the host starts synchronized
    ///
    /// May be called once; the indices assigned by the host stay stable
    /// for the producer's lifetime.
    pub fn install_parameters(&self, registry: Arc<ParameterRegistry>) -> ProducerResult<()> {
        let params = ProducerParams::bind(&self.core);

        if self.core.registry.set(Arc::clone(&registry)).is_err() {
            return Err(ProducerError::invalid_argument(
                "parameters already installed",
            ));
        }
        let _ = self.core.params.set(params);

        let params = self
            .core
            .params
            .get()
            .ok_or_else(|| ProducerError::invalid_argument("parameters already installed"))?;
        registry.register(Arc::clone(&params.status));
        registry.register(Arc::clone(&params.message));
        registry.register(Arc::clone(&params.unsent));
        registry.register(Arc::clone(&params.max_size));
        registry.register(Arc::clone(&params.buffer_size));
        registry.push_all();

        info!("Producer parameters installed");
        Ok(())
    }

    /// Start the background status monitor
    ///
    /// Must be called from within a Tokio runtime. Fails when the producer
    /// is faulted or the monitor is already running.
    pub fn start(&mut self) -> ProducerResult<()> {
        if self.core.is_faulted() {
            self.core.set_health(HealthStatus::error(MSG_INIT_FAILED));
            return Err(ProducerError::Faulted);
        }
        if self.monitor.is_some() {
            return Err(ProducerError::MonitorRunning);
        }

        self.core
            .set_health(HealthStatus::disconnected(MSG_MONITOR_STARTING));

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let core = Arc::clone(&self.core);
        let handle = tokio::spawn(async move {
            info!("Status monitor started");
            let mut ticker = interval(Duration::from_millis(POLL_INTERVAL_MS));
            loop {
                tokio::select! {
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        core.poll_once();
                    }
                }
            }
            info!("Status monitor stopped");
        });

        self.monitor = Some(MonitorTask {
            shutdown_tx,
            handle,
        });
        Ok(())
    }

    /// Stop the status monitor and wait for it to finish
    ///
    /// After this returns, no further poll of the client handle happens.
    /// Safe to call more than once and without a prior `start`.
    pub async fn shutdown(&mut self) -> ProducerResult<()> {
        let Some(monitor) = self.monitor.take() else {
            return Ok(());
        };

        let _ = monitor.shutdown_tx.send(true);
        let abort = monitor.handle.abort_handle();
        match timeout(Duration::from_secs(2), monitor.handle).await {
            Ok(Ok(())) => info!("Status monitor shut down gracefully"),
            Ok(Err(err)) if !err.is_cancelled() => {
                warn!("Status monitor ended with error: {}", err)
            }
            Err(_) => {
                warn!("Status monitor did not stop in time, aborting");
                abort.abort();
            }
            _ => {}
        }
        Ok(())
    }

    /// True while the monitor task is running
    pub fn is_running(&self) -> bool {
        self.monitor.is_some()
    }

    // ----- data path -----

    /// Enqueue one payload for delivery with the given timestamp
    pub fn send(&self, payload: &[u8], timestamp: DateTime<Utc>) -> ProducerResult<()> {
        self.core.send(payload, timestamp)
    }

    /// Enqueue one payload stamped with the current time
    pub fn send_now(&self, payload: &[u8]) -> ProducerResult<()> {
        self.core.send(payload, Utc::now())
    }

    // ----- configuration -----

    /// Point the producer at a new broker address list and reconnect
    pub fn set_broker_addr(&self, addr: &str) -> ProducerResult<()> {
        self.core.set_broker_addr(addr)
    }

    /// Change the largest accepted payload size and reconnect
    pub fn set_max_message_size(&self, bytes: usize) -> ProducerResult<()> {
        self.core.set_max_message_size(bytes)
    }

    /// Change the client-side buffer budget and reconnect
    pub fn set_message_buffer_size_kb(&self, kb: usize) -> ProducerResult<()> {
        self.core.set_message_buffer_size_kb(kb)
    }

    /// Change the local queue length limit and reconnect
    pub fn set_message_queue_length(&self, length: usize) -> ProducerResult<()> {
        self.core.set_message_queue_length(length)
    }

    /// Change how often the client emits telemetry and reconnect
    pub fn set_stats_interval_ms(&self, interval_ms: u64) -> ProducerResult<()> {
        self.core.set_stats_interval_ms(interval_ms)
    }

    /// Change the destination topic; applies to subsequent sends without
    /// a reconnect
    pub fn set_topic(&self, topic: &str) -> ProducerResult<()> {
        self.core.set_topic(topic)
    }

    /// Control whether a rebuild flushes the old handle first
    pub fn set_flush_on_rebuild(&self, enabled: bool, timeout_ms: u64) -> ProducerResult<()> {
        self.core.set_flush_on_rebuild(enabled, timeout_ms)
    }

    // ----- status -----

    pub fn health(&self) -> HealthStatus {
        self.core.health()
    }

    pub fn is_connected(&self) -> bool {
        self.core.health().state.is_connected()
    }

    pub fn is_faulted(&self) -> bool {
        self.core.is_faulted()
    }

    /// Messages queued inside the client, from the latest telemetry
    pub fn unsent_messages(&self) -> i64 {
        self.core.unsent.load(Ordering::SeqCst)
    }

    /// Snapshot of the committed configuration
    pub fn settings(&self) -> ProducerSettings {
        self.core.lock_settings().clone()
    }

    pub fn broker_addr(&self) -> String {
        self.core.lock_settings().broker_addr.clone()
    }

    pub fn topic(&self) -> String {
        self.core.lock_settings().topic.clone()
    }

    pub fn max_message_size(&self) -> usize {
        self.core.lock_settings().max_message_size
    }

    pub fn message_buffer_size_kb(&self) -> usize {
        self.core.lock_settings().message_buffer_kb
    }

    pub fn message_queue_length(&self) -> usize {
        self.core.lock_settings().queue_length
    }

    pub fn stats_interval_ms(&self) -> u64 {
        self.core.lock_settings().stats_interval_ms
    }
}

impl Drop for Producer {
    fn drop(&mut self) {
        // Cannot await in Drop; signal and abort. Callers wanting a clean
        // stop go through shutdown().
        if let Some(monitor) = self.monitor.take() {
            let _ = monitor.shutdown_tx.send(true);
            monitor.handle.abort();
        }
    }
}

/// Parameters owned by the producer, bound to its internals via weak
/// references so the host-held registry never keeps the core alive
struct ProducerParams {
    status: Arc<TypedParameter>,
    message: Arc<TypedParameter>,
    unsent: Arc<TypedParameter>,
    max_size: Arc<TypedParameter>,
    buffer_size: Arc<TypedParameter>,
}

impl ProducerParams {
    fn bind(core: &Arc<ProducerCore>) -> Self {
        let status = {
            let weak = Arc::downgrade(core);
            Arc::new(TypedParameter::Int32(Parameter::read_only(
                param_names::CONNECTION_STATUS,
                move || match weak.upgrade() {
                    Some(core) => core.health().state.as_i32(),
                    None => ConnectionHealth::Error.as_i32(),
                },
            )))
        };
        let message = {
            let weak = Arc::downgrade(core);
            Arc::new(TypedParameter::Text(Parameter::read_only(
                param_names::CONNECTION_MESSAGE,
                move || match weak.upgrade() {
                    Some(core) => core.health().message,
                    None => String::new(),
                },
            )))
        };
        let unsent = {
            let weak = Arc::downgrade(core);
            Arc::new(TypedParameter::Int64(Parameter::read_only(
                param_names::UNSENT_MESSAGES,
                move || match weak.upgrade() {
                    Some(core) => core.unsent.load(Ordering::SeqCst),
                    None => 0,
                },
            )))
        };
        let max_size = {
            let read_weak = Arc::downgrade(core);
            let write_weak = Arc::downgrade(core);
            Arc::new(TypedParameter::Int64(Parameter::new(
                param_names::MAX_MESSAGE_SIZE,
                move || match read_weak.upgrade() {
                    Some(core) => core.lock_settings().max_message_size as i64,
                    None => 0,
                },
                move |value: i64| match (write_weak.upgrade(), usize::try_from(value)) {
                    (Some(core), Ok(bytes)) => core.set_max_message_size(bytes).is_ok(),
                    _ => false,
                },
            )))
        };
        let buffer_size = {
            let read_weak = Arc::downgrade(core);
            let write_weak = Arc::downgrade(core);
            Arc::new(TypedParameter::Int64(Parameter::new(
                param_names::MESSAGE_BUFFER_SIZE,
                move || match read_weak.upgrade() {
                    Some(core) => core.lock_settings().message_buffer_kb as i64,
                    None => 0,
                },
                move |value: i64| match (write_weak.upgrade(), usize::try_from(value)) {
                    (Some(core), Ok(kb)) => core.set_message_buffer_size_kb(kb).is_ok(),
                    _ => false,
                },
            )))
        };

        Self {
            status,
            message,
            unsent,
            max_size,
            buffer_size,
        }
    }
}

/// Shared state behind the façade; also reachable from the monitor task
/// and from parameter accessors
struct ProducerCore {
    factory: Arc<dyn ClientFactory>,
    /// Staged client configuration; `None` only when construction failed
    staged: Mutex<Option<Box<dyn ClientConfig>>>,
    /// The owned connection handle; `None` means not connected
    handle: Mutex<Option<Box<dyn ClientHandle>>>,
    settings: Mutex<ProducerSettings>,
    health: Mutex<HealthStatus>,
    unsent: AtomicI64,
    faulted: AtomicBool,
    registry: OnceCell<Arc<ParameterRegistry>>,
    params: OnceCell<ProducerParams>,
}

impl ProducerCore {
    fn new(factory: Arc<dyn ClientFactory>, settings: ProducerSettings) -> Arc<Self> {
        let staged = match factory.new_config() {
            Ok(config) => Some(config),
            Err(err) => {
                error!("Unable to create client configuration: {}", err);
                None
            }
        };
        let config_failed = staged.is_none();

        let core = Arc::new(Self {
            factory,
            staged: Mutex::new(staged),
            handle: Mutex::new(None),
            settings: Mutex::new(settings),
            health: Mutex::new(HealthStatus::default()),
            unsent: AtomicI64::new(0),
            faulted: AtomicBool::new(false),
            registry: OnceCell::new(),
            params: OnceCell::new(),
        });

        if config_failed {
            core.faulted.store(true, Ordering::SeqCst);
            core.set_health(HealthStatus::error(MSG_INIT_FAILED));
            return core;
        }
        if let Err(err) = core.stage_base_keys() {
            error!("Unable to stage base configuration: {}", err);
            core.mark_faulted();
            return core;
        }
        if !core.lock_settings().broker_addr.is_empty() {
            // Outcome lands in the health state; construction stays
            // infallible.
            let _ = core.rebuild();
        }
        core
    }

    /// Stage every committed setting into the fresh client configuration
    fn stage_base_keys(&self) -> ProducerResult<()> {
        let settings = self.lock_settings().clone();
        self.stage(
            keys::STATISTICS_INTERVAL_MS,
            &settings.stats_interval_ms.to_string(),
        )?;
        self.stage(
            keys::QUEUE_BUFFERING_MAX_MESSAGES,
            &settings.queue_length.to_string(),
        )?;
        self.stage(
            keys::QUEUE_BUFFERING_MAX_KBYTES,
            &settings.message_buffer_kb.to_string(),
        )?;
        self.stage_max_message_size(settings.max_message_size)?;
        if !settings.broker_addr.is_empty() {
            self.stage(keys::BROKER_LIST, &settings.broker_addr)?;
        }
        Ok(())
    }

    // ----- configuration -----

    fn set_broker_addr(&self, addr: &str) -> ProducerResult<()> {
        self.ensure_not_faulted()?;
        if addr.is_empty() {
            return Err(ProducerError::invalid_argument(
                "broker address must not be empty",
            ));
        }
        self.stage(keys::BROKER_LIST, addr)?;
        self.lock_settings().broker_addr = addr.to_string();
        info!(broker = addr, "Broker address updated");
        self.rebuild()
    }

    fn set_max_message_size(&self, bytes: usize) -> ProducerResult<()> {
        self.ensure_not_faulted()?;
        if bytes == 0 {
            return Err(ProducerError::invalid_argument(
                "max message size must be greater than zero",
            ));
        }
        self.stage_max_message_size(bytes)?;
        self.lock_settings().max_message_size = bytes;
        self.push_param(|params| &params.max_size);
        self.rebuild()
    }

    fn set_message_buffer_size_kb(&self, kb: usize) -> ProducerResult<()> {
        self.ensure_not_faulted()?;
        if kb == 0 {
            return Err(ProducerError::invalid_argument(
                "message buffer size must be greater than zero",
            ));
        }
        self.stage(keys::QUEUE_BUFFERING_MAX_KBYTES, &kb.to_string())?;
        self.lock_settings().message_buffer_kb = kb;
        self.push_param(|params| &params.buffer_size);
        self.rebuild()
    }

    fn set_message_queue_length(&self, length: usize) -> ProducerResult<()> {
        self.ensure_not_faulted()?;
        if length == 0 {
            return Err(ProducerError::invalid_argument(
                "message queue length must be greater than zero",
            ));
        }
        self.stage(keys::QUEUE_BUFFERING_MAX_MESSAGES, &length.to_string())?;
        self.lock_settings().queue_length = length;
        self.rebuild()
    }

    fn set_stats_interval_ms(&self, interval_ms: u64) -> ProducerResult<()> {
        self.ensure_not_faulted()?;
        if interval_ms == 0 {
            return Err(ProducerError::invalid_argument(
                "stats interval must be greater than zero",
            ));
        }
        self.stage(keys::STATISTICS_INTERVAL_MS, &interval_ms.to_string())?;
        self.lock_settings().stats_interval_ms = interval_ms;
        self.rebuild()
    }

    fn set_topic(&self, topic: &str) -> ProducerResult<()> {
        self.ensure_not_faulted()?;
        if topic.is_empty() {
            return Err(ProducerError::invalid_argument("topic must not be empty"));
        }
        self.lock_settings().topic = topic.to_string();
        debug!(topic, "Topic updated");
        Ok(())
    }

    fn set_flush_on_rebuild(&self, enabled: bool, timeout_ms: u64) -> ProducerResult<()> {
        self.ensure_not_faulted()?;
        let mut settings = self.lock_settings();
        settings.flush_on_rebuild = enabled;
        settings.flush_timeout_ms = timeout_ms;
        Ok(())
    }

    /// The client keeps a separate copy threshold; both limits move
    /// together
    fn stage_max_message_size(&self, bytes: usize) -> ProducerResult<()> {
        let value = bytes.to_string();
        self.stage(keys::MESSAGE_MAX_BYTES, &value)?;
        self.stage(keys::MESSAGE_COPY_MAX_BYTES, &value)?;
        Ok(())
    }

    /// Stage one key, surfacing a rejection through the health state
    fn stage(&self, key: &str, value: &str) -> ProducerResult<()> {
        let result = {
            let mut staged = self.lock_staged();
            match staged.as_mut() {
                Some(config) => config.set(key, value),
                None => return Err(ProducerError::Faulted),
            }
        };
        match result {
            Ok(()) => Ok(()),
            Err(err) => {
                warn!(key, "Client rejected configuration: {}", err);
                self.set_health(HealthStatus::error(format!("unable to set {key}")));
                Err(match err {
                    ClientError::ConfigRejected { key, reason } => {
                        ProducerError::config_rejected(key, reason)
                    }
                    ClientError::CreateFailed { reason } => {
                        ProducerError::config_rejected(key, reason)
                    }
                })
            }
        }
    }

    /// Replace the connection handle with one built from the staged
    /// configuration
    ///
    /// The new handle is built and confirmed before the old one is given
    /// up; a failed build keeps whatever handle was there. With no broker
    /// address configured this is a no-op.
    fn rebuild(&self) -> ProducerResult<()> {
        let mut slot = self.lock_handle();

        if self.lock_settings().broker_addr.is_empty() {
            return Ok(());
        }

        let built = {
            let staged = self.lock_staged();
            match staged.as_ref() {
                Some(config) => self.factory.build(config.as_ref()),
                None => return Err(ProducerError::Faulted),
            }
        };

        match built {
            Ok(new_handle) => {
                if let Some(old) = slot.as_mut() {
                    let (do_flush, flush_timeout) = {
                        let settings = self.lock_settings();
                        (settings.flush_on_rebuild, settings.flush_timeout_ms)
                    };
                    if do_flush {
                        if let Err(err) = old.flush(flush_timeout) {
                            warn!("Flush before handle replacement failed: {}", err);
                        }
                    }
                }
                *slot = Some(new_handle);
                drop(slot);
                info!("Producer handle rebuilt");
                Ok(())
            }
            Err(err) => {
                drop(slot);
                error!("Unable to create producer handle: {}", err);
                self.set_health(HealthStatus::error(MSG_CREATE_FAILED));
                Err(ProducerError::CreateFailed)
            }
        }
    }

    // ----- data path -----

    fn send(&self, payload: &[u8], timestamp: DateTime<Utc>) -> ProducerResult<()> {
        self.ensure_not_faulted()?;
        if payload.is_empty() {
            return Err(ProducerError::invalid_argument("payload is empty"));
        }

        let max = self.lock_settings().max_message_size;
        if payload.len() > max {
            info!(
                payload_bytes = payload.len(),
                max_bytes = max,
                "Growing max message size for oversized payload"
            );
            if let Err(err) = self.set_max_message_size(payload.len()) {
                error!("Unable to grow max message size: {}", err);
                self.mark_faulted();
                return Err(ProducerError::Faulted);
            }
        }

        let topic = self.lock_settings().topic.clone();
        let timestamp_ms = timestamp.timestamp_millis();
        let result = {
            let mut slot = self.lock_handle();
            match slot.as_mut() {
                Some(handle) => {
                    handle.produce(&topic, PARTITION_UNASSIGNED, payload, timestamp_ms)
                }
                None => return Err(ProducerError::NotConnected),
            }
        };

        match result {
            Ok(()) => Ok(()),
            Err(err) => {
                self.set_health(HealthStatus::error(format!(
                    "producer failed with error code: {}",
                    err.0
                )));
                Err(ProducerError::Delivery { code: err.0 })
            }
        }
    }

    // ----- monitoring -----

    /// One monitor iteration: drain client events under the handle lock,
    /// then apply them with the lock released
    fn poll_once(&self) {
        let events = {
            let mut slot = self.lock_handle();
            match slot.as_mut() {
                Some(handle) => handle.poll(),
                None => Vec::new(),
            }
        };
        for event in events {
            self.apply_event(event);
        }
    }

    fn apply_event(&self, event: ClientEvent) {
        match event {
            ClientEvent::Stats(raw) => {
                let verdict = StatsInterpreter::interpret(&raw);
                if let Some(count) = verdict.queued_messages {
                    self.set_unsent(count);
                }
                self.set_health(verdict.health);
            }
            ClientEvent::Error {
                code,
                all_brokers_down,
            } => {
                if all_brokers_down {
                    self.set_health(HealthStatus::disconnected(MSG_ALL_BROKERS_DOWN));
                } else {
                    self.set_health(HealthStatus::disconnected(format!(
                        "event error received: {code}"
                    )));
                }
            }
            ClientEvent::Log { message } => {
                debug!(target: "client", "{}", message);
            }
            ClientEvent::Throttle { time_ms } => {
                debug!(target: "client", throttle_ms = time_ms, "Broker throttled producer");
            }
        }
    }

    // ----- state cells -----

    fn health(&self) -> HealthStatus {
        self.lock_health().clone()
    }

    fn set_health(&self, status: HealthStatus) {
        let changed = {
            let mut health = self.lock_health();
            let changed = health.state != status.state;
            *health = status.clone();
            changed
        };
        if changed {
            info!(state = ?status.state, message = %status.message, "Connection health changed");
        } else {
            debug!(state = ?status.state, message = %status.message, "Connection health updated");
        }
        self.push_param(|params| &params.status);
        self.push_param(|params| &params.message);
    }

    fn set_unsent(&self, count: i64) {
        self.unsent.store(count, Ordering::SeqCst);
        self.push_param(|params| &params.unsent);
    }

    fn is_faulted(&self) -> bool {
        self.faulted.load(Ordering::SeqCst)
    }

    fn ensure_not_faulted(&self) -> ProducerResult<()> {
        if self.is_faulted() {
            Err(ProducerError::Faulted)
        } else {
            Ok(())
        }
    }

    fn mark_faulted(&self) {
        self.faulted.store(true, Ordering::SeqCst);
        self.set_health(HealthStatus::error(MSG_FAULTED));
    }

    /// Push one parameter's current value to the host; a no-op until
    /// install_parameters has run
    fn push_param(&self, pick: fn(&ProducerParams) -> &Arc<TypedParameter>) {
        if let (Some(registry), Some(params)) = (self.registry.get(), self.params.get()) {
            registry.update_host_value(pick(params));
        }
    }

    // Critical sections never run caller code, so a poisoned lock cannot
    // hold a torn invariant; recover instead of propagating the panic.

    fn lock_settings(&self) -> MutexGuard<'_, ProducerSettings> {
        self.settings.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_health(&self) -> MutexGuard<'_, HealthStatus> {
        self.health.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_handle(&self) -> MutexGuard<'_, Option<Box<dyn ClientHandle>>> {
        self.handle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_staged(&self) -> MutexGuard<'_, Option<Box<dyn ClientConfig>>> {
        self.staged.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
