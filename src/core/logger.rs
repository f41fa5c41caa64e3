//! Loggers: the level gate and the emit path
//!
//! [`BaseLogger`] carries the gate every emit call passes before an event is
//! built. [`Logger`] adds the emit operations: gate, build, dispatch.

use super::engine::KloggingEngine;
use super::event::LogEvent;
use super::event_builder::{event_from_at, Loggable};
use super::exception::Exception;
use super::items::ContextItems;
use super::level::Level;
use chrono::Utc;
use std::fmt;
use std::sync::Arc;

/// Level policy shared by all loggers
pub trait BaseLogger {
    /// Name of the logger, used to look up its level rules
    fn name(&self) -> &str;

    /// Registry holding the configuration this logger reads
    fn engine(&self) -> &KloggingEngine;

    /// Minimum level at which this logger emits, from the current configuration
    fn min_level(&self) -> Level {
        self.engine().minimum_level_of(self.name())
    }

    /// Whether an event at `level` would be emitted. Always `false` for `Level::None`.
    fn is_level_enabled(&self, level: Level) -> bool {
        !level.is_none() && self.min_level() <= level
    }

    fn is_trace_enabled(&self) -> bool {
        self.is_level_enabled(Level::Trace)
    }

    fn is_debug_enabled(&self) -> bool {
        self.is_level_enabled(Level::Debug)
    }

    fn is_info_enabled(&self) -> bool {
        self.is_level_enabled(Level::Info)
    }

    fn is_warn_enabled(&self) -> bool {
        self.is_level_enabled(Level::Warn)
    }

    fn is_error_enabled(&self) -> bool {
        self.is_level_enabled(Level::Error)
    }

    fn is_fatal_enabled(&self) -> bool {
        self.is_level_enabled(Level::Fatal)
    }

    /// Build the event for a logging call, stamped with the current time.
    /// See [`event_from_at`] for the rules, including the requirement that
    /// `level` is not `Level::None`.
    fn event_from(
        &self,
        level: Level,
        exception: Option<&Exception>,
        event_object: Loggable,
        items: ContextItems,
    ) -> LogEvent {
        event_from_at(self.name(), level, exception, event_object, items, Utc::now())
    }
}

/// A named logger bound to an engine
///
/// # Example
///
/// ```
/// use rust_klogging::prelude::*;
/// use std::sync::Arc;
///
/// let engine = Arc::new(KloggingEngine::new());
/// let logger = Logger::new("com.example.Db", Arc::clone(&engine))
///     .with_items(ContextItems::new().with_item("service", "orders"));
///
/// // Nothing is configured yet, so every level is disabled
/// assert!(!logger.is_fatal_enabled());
/// logger.info("dropped before an event is built");
/// ```
#[derive(Clone)]
pub struct Logger {
    name: String,
    engine: Arc<KloggingEngine>,
    items: ContextItems,
}

impl Logger {
    pub fn new(name: impl Into<String>, engine: Arc<KloggingEngine>) -> Self {
        Self {
            name: name.into(),
            engine,
            items: ContextItems::new(),
        }
    }

    /// Attach items added to every event this logger emits. Items given at a
    /// call site take priority.
    #[must_use]
    pub fn with_items(mut self, items: ContextItems) -> Self {
        self.items.merge(&items);
        self
    }

    pub fn items(&self) -> &ContextItems {
        &self.items
    }

    pub fn log(&self, level: Level, event_object: impl Into<Loggable>) {
        if self.is_level_enabled(level) {
            self.emit(level, None, event_object.into(), ContextItems::new());
        }
    }

    /// Log with an accompanying exception and call-site items
    pub fn log_with(
        &self,
        level: Level,
        exception: Option<&Exception>,
        event_object: impl Into<Loggable>,
        items: ContextItems,
    ) {
        if self.is_level_enabled(level) {
            self.emit(level, exception, event_object.into(), items);
        }
    }

    /// Log a value that is only computed if `level` is enabled
    pub fn log_lazy<T, F>(&self, level: Level, build: F)
    where
        T: Into<Loggable>,
        F: FnOnce() -> T,
    {
        if self.is_level_enabled(level) {
            self.emit(level, None, build().into(), ContextItems::new());
        }
    }

    #[inline]
    pub fn trace(&self, event_object: impl Into<Loggable>) {
        self.log(Level::Trace, event_object);
    }

    #[inline]
    pub fn debug(&self, event_object: impl Into<Loggable>) {
        self.log(Level::Debug, event_object);
    }

    #[inline]
    pub fn info(&self, event_object: impl Into<Loggable>) {
        self.log(Level::Info, event_object);
    }

    #[inline]
    pub fn warn(&self, event_object: impl Into<Loggable>) {
        self.log(Level::Warn, event_object);
    }

    #[inline]
    pub fn error(&self, event_object: impl Into<Loggable>) {
        self.log(Level::Error, event_object);
    }

    #[inline]
    pub fn fatal(&self, event_object: impl Into<Loggable>) {
        self.log(Level::Fatal, event_object);
    }

    /// Build and dispatch; only reached after the gate passed
    fn emit(
        &self,
        level: Level,
        exception: Option<&Exception>,
        event_object: Loggable,
        items: ContextItems,
    ) {
        let items = if self.items.is_empty() {
            items
        } else {
            items.merged_under(&self.items)
        };
        let event = self.event_from(level, exception, event_object, items);
        self.engine.dispatch(&event);
    }
}

impl BaseLogger for Logger {
    fn name(&self) -> &str {
        &self.name
    }

    fn engine(&self) -> &KloggingEngine {
        &self.engine
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{KloggingConfiguration, LoggingConfig, SinkConfiguration};
    use crate::core::items::ItemValue;
    use parking_lot::Mutex;

    fn capturing_engine(min_level: Level) -> (Arc<KloggingEngine>, Arc<Mutex<Vec<LogEvent>>>) {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let sink_events = Arc::clone(&captured);
        let config = KloggingConfiguration::builder()
            .sink(
                "memory",
                SinkConfiguration::from_fn(move |event: &LogEvent| {
                    sink_events.lock().push(event.clone());
                    Ok(())
                }),
            )
            .logging(LoggingConfig::new().from_min_level(min_level, ["memory"]))
            .build();
        (Arc::new(KloggingEngine::with_config(config)), captured)
    }

    #[test]
    fn test_gate_follows_min_level() {
        let (engine, _) = capturing_engine(Level::Warn);
        let logger = engine.logger("svc");

        assert_eq!(logger.min_level(), Level::Warn);
        assert!(!logger.is_trace_enabled());
        assert!(!logger.is_debug_enabled());
        assert!(!logger.is_info_enabled());
        assert!(logger.is_warn_enabled());
        assert!(logger.is_error_enabled());
        assert!(logger.is_fatal_enabled());
        assert!(!logger.is_level_enabled(Level::None));
    }

    #[test]
    fn test_disabled_levels_are_not_dispatched() {
        let (engine, captured) = capturing_engine(Level::Info);
        let logger = engine.logger("svc");

        logger.debug("hidden");
        logger.info("shown");

        let events = captured.lock();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message(), "shown");
        assert_eq!(events[0].logger(), "svc");
    }

    #[test]
    fn test_lazy_value_not_built_when_disabled() {
        let (engine, captured) = capturing_engine(Level::Error);
        let logger = engine.logger("svc");
        let mut built = false;

        logger.log_lazy(Level::Debug, || {
            built = true;
            "expensive"
        });

        assert!(!built);
        assert!(captured.lock().is_empty());
    }

    #[test]
    fn test_logger_items_sit_under_call_items() {
        let (engine, captured) = capturing_engine(Level::Info);
        let logger = engine.logger("svc").with_items(
            ContextItems::new()
                .with_item("service", "orders")
                .with_item("key", "logger"),
        );

        logger.log_with(
            Level::Info,
            None,
            "hello",
            ContextItems::new().with_item("key", "call"),
        );

        let events = captured.lock();
        assert_eq!(events[0].items().get("service"), Some(&ItemValue::from("orders")));
        assert_eq!(events[0].items().get("key"), Some(&ItemValue::from("call")));
    }

    #[test]
    fn test_exception_is_formatted_into_event() {
        let (engine, captured) = capturing_engine(Level::Info);
        let logger = engine.logger("svc");
        let exception = Exception::new("IoError", Some("disk full".to_string()));

        logger.log_with(Level::Error, Some(&exception), "write failed", ContextItems::new());

        let events = captured.lock();
        assert_eq!(events[0].message(), "write failed");
        assert!(events[0].stack_trace().unwrap().starts_with("IoError: disk full"));
    }
}
