//! Core facade types: levels, events, loggers and the configuration registry

pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod event;
pub mod event_builder;
pub mod exception;
pub mod items;
pub mod level;
pub mod logger;
pub mod metrics;
pub mod sink;

pub use engine::{ConfigStatus, EngineState, KloggingEngine};
pub use error::{KloggingError, Result};
pub use event::LogEvent;
pub use event_builder::{event_from_at, message_and_stack_trace, Loggable};
pub use exception::Exception;
pub use items::{ContextItems, ItemValue};
pub use level::Level;
pub use logger::{BaseLogger, Logger};
pub use metrics::DispatchMetrics;
pub use sink::Sink;
