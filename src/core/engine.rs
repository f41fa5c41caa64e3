//! Configuration registry: the single source of truth for levels and sinks
//!
//! The engine holds one published [`EngineState`] snapshot. Readers clone the
//! snapshot's `Arc` and work against it without further locking; writers
//! build a complete replacement and swap it in. Writers are serialised, so a
//! reader sees either the whole previous configuration or the whole new one,
//! never a sink map half rebuilt.
//!
//! # Example
//!
//! ```
//! use rust_klogging::config::{KloggingConfiguration, LoggingConfig, SinkConfiguration};
//! use rust_klogging::{BaseLogger, KloggingEngine, Level, LogEvent};
//! use std::sync::Arc;
//!
//! let engine = Arc::new(KloggingEngine::new());
//! engine.set_config(
//!     KloggingConfiguration::builder()
//!         .sink("stdout", SinkConfiguration::from_fn(|event: &LogEvent| {
//!             println!("{} {}", event.level(), event.message());
//!             Ok(())
//!         }))
//!         .logging(LoggingConfig::new().from_min_level(Level::Info, ["stdout"]))
//!         .build(),
//! );
//!
//! let logger = engine.logger("com.example.Service");
//! assert!(logger.is_info_enabled());
//! assert!(!logger.is_debug_enabled());
//! logger.info("Service started");
//! ```

use super::diagnostics;
use super::error::{KloggingError, Result};
use super::event::LogEvent;
use super::level::Level;
use super::logger::Logger;
use super::metrics::DispatchMetrics;
use super::sink::Sink;
use crate::config::{KloggingConfiguration, LoggingConfig, SinkConfiguration};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

const COMPONENT: &str = "KloggingEngine";

/// Whether a configuration has been put in place
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigStatus {
    /// The empty default configuration is in effect
    Unconfigured,
    /// A configuration was set, appended or adopted by bootstrap
    Configured,
}

/// One published configuration together with the sinks built from it
#[derive(Debug)]
pub struct EngineState {
    config: KloggingConfiguration,
    sinks: HashMap<String, Arc<Sink>>,
    status: ConfigStatus,
}

impl EngineState {
    fn unconfigured() -> Self {
        Self {
            config: KloggingConfiguration::default(),
            sinks: HashMap::new(),
            status: ConfigStatus::Unconfigured,
        }
    }

    pub fn config(&self) -> &KloggingConfiguration {
        &self.config
    }

    pub fn sinks(&self) -> &HashMap<String, Arc<Sink>> {
        &self.sinks
    }

    pub fn status(&self) -> ConfigStatus {
        self.status
    }
}

#[derive(Debug, Default)]
struct WriterState {
    /// Bootstrap is a one-time step
    bootstrap_done: bool,
}

pub struct KloggingEngine {
    state: RwLock<Arc<EngineState>>,
    writer: Mutex<WriterState>,
    metrics: Arc<DispatchMetrics>,
}

impl KloggingEngine {
    /// Create an engine running the empty default configuration
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(Arc::new(EngineState::unconfigured())),
            writer: Mutex::new(WriterState::default()),
            metrics: Arc::new(DispatchMetrics::new()),
        }
    }

    /// Create an engine with `config` already set
    #[must_use]
    pub fn with_config(config: KloggingConfiguration) -> Self {
        let engine = Self::new();
        engine.set_config(config);
        engine
    }

    /// Current snapshot; stays valid even if the configuration changes later
    pub fn snapshot(&self) -> Arc<EngineState> {
        Arc::clone(&*self.state.read())
    }

    /// Replace the configuration and rebuild every sink from it
    pub fn set_config(&self, config: KloggingConfiguration) {
        let _writer = self.writer.lock();
        self.publish(config, "Setting configuration");
    }

    /// Merge `config` into the current configuration and rebuild every sink
    /// from the merged sink definitions
    pub fn append_config(&self, config: KloggingConfiguration) {
        let _writer = self.writer.lock();
        let mut merged = self.snapshot().config.clone();
        merged.append(config);
        self.publish(merged, "Appending configuration");
    }

    /// Adopt a configuration found by an external loader, once.
    ///
    /// Ignored if a configuration has already been set or appended, or if
    /// bootstrap already ran. Returns `true` if `loaded` was adopted.
    pub fn bootstrap(&self, loaded: Option<KloggingConfiguration>) -> bool {
        self.bootstrap_with(|| Ok(loaded))
    }

    /// Bootstrap from the configuration file discovered by
    /// [`crate::config::file::load_configuration`].
    ///
    /// The file is only read while the engine is still unconfigured. A file
    /// that exists but cannot be loaded is reported as a diagnostic and
    /// leaves the engine unchanged.
    pub fn bootstrap_from_file(&self) -> bool {
        self.bootstrap_with(crate::config::file::load_configuration)
    }

    /// Run `load` and adopt its configuration, once.
    ///
    /// `load` is not called at all if bootstrap already ran or a
    /// configuration is already in place. It runs under the writer lock, so
    /// it must not call back into this engine's setters.
    pub fn bootstrap_with<F>(&self, load: F) -> bool
    where
        F: FnOnce() -> Result<Option<KloggingConfiguration>>,
    {
        let mut writer = self.writer.lock();
        if writer.bootstrap_done {
            return false;
        }
        writer.bootstrap_done = true;

        if self.snapshot().status == ConfigStatus::Configured {
            self.diagnostic(Level::Debug, "Configuration already set; skipping bootstrap");
            return false;
        }
        match load() {
            Ok(Some(config)) => {
                self.publish(config, "Bootstrapping configuration");
                true
            }
            Ok(None) => {
                self.diagnostic(Level::Debug, "No configuration found; staying unconfigured");
                false
            }
            Err(e) => {
                self.diagnostic(Level::Error, format!("Failed to load configuration: {}", e));
                false
            }
        }
    }

    /// Build the live sinks for `config` and publish both. Caller holds the
    /// writer lock.
    fn publish(&self, config: KloggingConfiguration, action: &str) {
        diagnostics::emit(
            config.klogging_min_log_level,
            Level::Debug,
            COMPONENT,
            format!(
                "{}: {} rule(s), {} sink(s)",
                action,
                config.configs.len(),
                config.sinks.len()
            ),
        );
        let sinks = self.build_sinks(&config.sinks, config.klogging_min_log_level);
        let next = Arc::new(EngineState {
            config,
            sinks,
            status: ConfigStatus::Configured,
        });
        *self.state.write() = next;
    }

    /// One fresh `Sink` per definition; nothing survives from earlier sinks
    fn build_sinks(
        &self,
        sink_configs: &HashMap<String, SinkConfiguration>,
        diagnostics_level: Level,
    ) -> HashMap<String, Arc<Sink>> {
        sink_configs
            .iter()
            .map(|(name, config)| {
                let sink = Sink::from_config(name, config, &self.metrics, diagnostics_level);
                (name.clone(), Arc::new(sink))
            })
            .collect()
    }

    pub fn status(&self) -> ConfigStatus {
        self.state.read().status
    }

    pub fn minimum_level_of(&self, name: &str) -> Level {
        self.state.read().config.minimum_level_of(name)
    }

    pub fn sinks(&self) -> HashMap<String, Arc<Sink>> {
        self.state.read().sinks.clone()
    }

    pub fn sink_configs(&self) -> HashMap<String, SinkConfiguration> {
        self.state.read().config.sinks.clone()
    }

    pub fn configs(&self) -> Vec<LoggingConfig> {
        self.state.read().config.configs.clone()
    }

    pub fn klogging_min_log_level(&self) -> Level {
        self.state.read().config.klogging_min_log_level
    }

    pub fn metrics(&self) -> &DispatchMetrics {
        &self.metrics
    }

    /// Create a logger bound to this engine
    pub fn logger(self: &Arc<Self>, name: impl Into<String>) -> Logger {
        Logger::new(name, Arc::clone(self))
    }

    /// Fan `event` out to the sinks its logger and level route to.
    ///
    /// Events at or above the configuration's direct level skip sink queues.
    /// Failures are counted and reported as diagnostics, never returned.
    /// Returns the number of sinks that accepted the event.
    pub fn dispatch(&self, event: &LogEvent) -> usize {
        let state = self.snapshot();
        let config = &state.config;
        self.metrics.record_dispatched();

        let direct = event.level() >= config.min_direct_log_level;
        let mut accepted = 0;
        for name in config.sinks_for(event.logger(), event.level()) {
            let Some(sink) = state.sinks.get(name) else {
                diagnostics::emit(
                    config.klogging_min_log_level,
                    Level::Debug,
                    COMPONENT,
                    format!("No live sink named '{}'", name),
                );
                continue;
            };

            let queued = sink.is_queued() && !direct;
            let result = if queued {
                sink.send(event)
            } else {
                sink.send_direct(event)
            };
            match result {
                Ok(()) => {
                    // Queued deliveries are counted by the sink's worker
                    if !queued {
                        self.metrics.record_delivered();
                    }
                    accepted += 1;
                }
                Err(e @ KloggingError::QueueFull { .. }) => {
                    let dropped = self.metrics.record_dropped();
                    // Alert on the first drop and periodically thereafter
                    if dropped == 0 || (dropped + 1) % 1000 == 0 {
                        diagnostics::emit(
                            config.klogging_min_log_level,
                            Level::Warn,
                            COMPONENT,
                            format!("{}; {} event(s) dropped so far", e, dropped + 1),
                        );
                    }
                }
                Err(e) => {
                    self.metrics.record_failed();
                    diagnostics::emit(
                        config.klogging_min_log_level,
                        Level::Warn,
                        COMPONENT,
                        e.to_string(),
                    );
                }
            }
        }
        accepted
    }

    /// Flush every live sink, reporting failures as diagnostics
    pub fn flush(&self) {
        let state = self.snapshot();
        for sink in state.sinks.values() {
            if let Err(e) = sink.flush() {
                self.diagnostic(
                    Level::Warn,
                    format!("Sink '{}' flush failed: {}", sink.name(), e),
                );
            }
        }
    }

    /// Shut down every live sink, waiting up to `timeout` for each queue to
    /// drain. Returns `true` if all sinks finished in time.
    pub fn shutdown(&self, timeout: Duration) -> bool {
        let state = self.snapshot();
        let mut clean = true;
        for sink in state.sinks.values() {
            if !sink.shutdown(timeout) {
                self.diagnostic(
                    Level::Warn,
                    format!(
                        "Sink '{}' did not finish within {:?}; some events may be lost",
                        sink.name(),
                        timeout
                    ),
                );
                clean = false;
            }
        }
        clean
    }

    fn diagnostic(&self, level: Level, message: impl AsRef<str>) {
        diagnostics::emit(self.klogging_min_log_level(), level, COMPONENT, message);
    }
}

impl Default for KloggingEngine {
    fn default() -> Self {
        Self::new()
    }
}
