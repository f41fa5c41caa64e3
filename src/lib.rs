//! # Rust Klogging
//!
//! A logging facade with named loggers, rule-based levels and pluggable sinks.
//!
//! ## Features
//!
//! - **Cheap level checks**: a disabled level costs one snapshot read and no event is built
//! - **Rule-based configuration**: levels and sinks are chosen per logger name
//! - **Atomic reconfiguration**: configurations are replaced or appended as a whole
//! - **Pluggable sinks**: console, file and any [`EventSender`](config::EventSender), called directly or through a bounded queue
//!
//! ## Example
//!
//! ```
//! use rust_klogging::prelude::*;
//! use std::sync::Arc;
//!
//! let engine = Arc::new(KloggingEngine::new());
//! engine.set_config(
//!     KloggingConfiguration::builder()
//!         .sink("console", SinkConfiguration::new(ConsoleSink::new()))
//!         .logging(LoggingConfig::new().from_min_level(Level::Info, ["console"]))
//!         .build(),
//! );
//!
//! let logger = engine.logger("com.example.App");
//! logger.info("Application started");
//! rust_klogging::debug!(logger, "Not built: {}", "debug is disabled");
//! ```

pub mod config;
pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::config::{
        DispatchMode, EventSender, KloggingConfiguration, LoggingConfig, SinkConfiguration,
    };
    pub use crate::core::{
        BaseLogger, ConfigStatus, ContextItems, Exception, ItemValue, KloggingEngine,
        KloggingError, Level, LogEvent, Loggable, Logger, Result,
    };
    #[cfg(feature = "console")]
    pub use crate::sinks::ConsoleSink;
    pub use crate::sinks::{FileSink, Renderer};
}

pub use core::{
    event_from_at, message_and_stack_trace, BaseLogger, ConfigStatus, ContextItems,
    DispatchMetrics, EngineState, Exception, ItemValue, KloggingEngine, KloggingError, Level,
    LogEvent, Loggable, Logger, Result, Sink,
};
