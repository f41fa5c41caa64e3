//! Configuration: logging rules, sink definitions and file loading

pub mod configuration;
pub mod file;
pub mod sink_config;

pub use configuration::{
    ConfigurationBuilder, KloggingConfiguration, LevelRange, LoggingConfig, NameMatch,
    DEFAULT_KLOGGING_MIN_LOG_LEVEL, DEFAULT_MIN_DIRECT_LOG_LEVEL,
};
pub use sink_config::{DispatchMode, EventSender, SinkConfiguration};
