//! Logging configuration: per-logger rules plus sink definitions
//!
//! # Example
//!
//! ```
//! use rust_klogging::config::{KloggingConfiguration, LoggingConfig, SinkConfiguration};
//! use rust_klogging::{Level, LogEvent};
//!
//! let config = KloggingConfiguration::builder()
//!     .sink("stdout", SinkConfiguration::from_fn(|event: &LogEvent| {
//!         println!("{}", event.message());
//!         Ok(())
//!     }))
//!     .logging(
//!         LoggingConfig::from_logger_base("com.example")
//!             .from_min_level(Level::Info, ["stdout"]),
//!     )
//!     .build();
//!
//! assert_eq!(config.minimum_level_of("com.example.Service"), Level::Info);
//! assert_eq!(config.minimum_level_of("org.other"), Level::None);
//! ```

use super::sink_config::SinkConfiguration;
use crate::core::{KloggingError, Level, Result};
use std::collections::HashMap;

/// Internal diagnostics level when nothing else is configured
pub const DEFAULT_KLOGGING_MIN_LOG_LEVEL: Level = Level::Info;

/// Events at or above this level bypass sink queues by default
pub const DEFAULT_MIN_DIRECT_LOG_LEVEL: Level = Level::Warn;

/// Which logger names a rule applies to
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NameMatch {
    /// Every logger
    #[default]
    All,
    /// Exactly this logger name
    Exact(String),
    /// Logger names starting with this prefix
    Base(String),
}

impl NameMatch {
    pub fn matches(&self, name: &str) -> bool {
        match self {
            NameMatch::All => true,
            NameMatch::Exact(exact) => name == exact,
            NameMatch::Base(base) => name.starts_with(base.as_str()),
        }
    }
}

/// Inclusive range of levels routed to a set of sinks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelRange {
    pub min_level: Level,
    pub max_level: Level,
    pub sink_names: Vec<String>,
}

impl LevelRange {
    pub fn new<I, S>(min_level: Level, max_level: Level, sinks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            min_level,
            max_level,
            sink_names: sinks.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, level: Level) -> bool {
        !level.is_none() && self.min_level <= level && level <= self.max_level
    }
}

/// One logging rule
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoggingConfig {
    pub name_match: NameMatch,
    /// Stop evaluating later rules once this one matches
    pub stop_on_match: bool,
    pub ranges: Vec<LevelRange>,
}

impl LoggingConfig {
    /// Rule applying to every logger
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_logger_base(base: impl Into<String>) -> Self {
        Self {
            name_match: NameMatch::Base(base.into()),
            ..Self::default()
        }
    }

    pub fn exact_logger(name: impl Into<String>) -> Self {
        Self {
            name_match: NameMatch::Exact(name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn stop_on_match(mut self) -> Self {
        self.stop_on_match = true;
        self
    }

    /// Route `min_level` and everything above it to `sinks`
    #[must_use]
    pub fn from_min_level<I, S>(self, min_level: Level, sinks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.level_range(min_level, Level::Fatal, sinks)
    }

    #[must_use]
    pub fn level_range<I, S>(mut self, min_level: Level, max_level: Level, sinks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ranges.push(LevelRange::new(min_level, max_level, sinks));
        self
    }

    pub fn matches(&self, name: &str) -> bool {
        self.name_match.matches(name)
    }
}

/// The full configuration: rules, sink definitions and facade-wide levels
#[derive(Debug, Clone)]
pub struct KloggingConfiguration {
    pub configs: Vec<LoggingConfig>,
    pub sinks: HashMap<String, SinkConfiguration>,
    /// Minimum level of the facade's own diagnostics
    pub klogging_min_log_level: Level,
    /// Events at or above this level are sent directly, bypassing sink queues
    pub min_direct_log_level: Level,
}

impl Default for KloggingConfiguration {
    fn default() -> Self {
        Self {
            configs: Vec::new(),
            sinks: HashMap::new(),
            klogging_min_log_level: DEFAULT_KLOGGING_MIN_LOG_LEVEL,
            min_direct_log_level: DEFAULT_MIN_DIRECT_LOG_LEVEL,
        }
    }
}

impl KloggingConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::new()
    }

    /// Rules that apply to `name`, in order, ending at the first matching
    /// rule marked stop-on-match
    pub fn matching_configs<'a, 'b>(
        &'a self,
        name: &'b str,
    ) -> impl Iterator<Item = &'a LoggingConfig> + 'b
    where
        'a: 'b,
    {
        let mut stopped = false;
        self.configs.iter().filter(move |config| {
            if stopped || !config.matches(name) {
                return false;
            }
            stopped = config.stop_on_match;
            true
        })
    }

    /// Lowest level routed anywhere for `name`; `Level::None` when no rule applies
    pub fn minimum_level_of(&self, name: &str) -> Level {
        self.matching_configs(name)
            .flat_map(|config| config.ranges.iter())
            .map(|range| range.min_level)
            .min()
            .unwrap_or(Level::None)
    }

    /// Names of the sinks an event from `name` at `level` goes to
    pub fn sinks_for(&self, name: &str, level: Level) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for range in self
            .matching_configs(name)
            .flat_map(|config| config.ranges.iter())
            .filter(|range| range.contains(level))
        {
            for sink in &range.sink_names {
                if !names.contains(&sink.as_str()) {
                    names.push(sink.as_str());
                }
            }
        }
        names
    }

    /// Merge `other` into this configuration. Rules are added after the
    /// existing ones, sinks are unioned with `other` winning on a name clash,
    /// and `other`'s facade-wide levels take effect.
    pub fn append(&mut self, other: KloggingConfiguration) {
        self.configs.extend(other.configs);
        self.sinks.extend(other.sinks);
        self.klogging_min_log_level = other.klogging_min_log_level;
        self.min_direct_log_level = other.min_direct_log_level;
    }

    /// Check that every sink a rule routes to is defined
    pub fn validate(&self) -> Result<()> {
        for config in &self.configs {
            for range in &config.ranges {
                if range.min_level > range.max_level {
                    return Err(KloggingError::config(
                        "logging",
                        format!(
                            "level range {}..{} is empty",
                            range.min_level, range.max_level
                        ),
                    ));
                }
                if let Some(missing) = range
                    .sink_names
                    .iter()
                    .find(|name| !self.sinks.contains_key(name.as_str()))
                {
                    return Err(KloggingError::unknown_sink(missing.clone()));
                }
            }
        }
        Ok(())
    }
}

/// Fluent builder for [`KloggingConfiguration`]
#[derive(Debug, Default)]
pub struct ConfigurationBuilder {
    config: KloggingConfiguration,
}

impl ConfigurationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value"]
    pub fn sink(mut self, name: impl Into<String>, sink: SinkConfiguration) -> Self {
        self.config.sinks.insert(name.into(), sink);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.config.configs.push(logging);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn klogging_min_log_level(mut self, level: Level) -> Self {
        self.config.klogging_min_log_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_direct_log_level(mut self, level: Level) -> Self {
        self.config.min_direct_log_level = level;
        self
    }

    pub fn build(self) -> KloggingConfiguration {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogEvent;

    fn noop() -> SinkConfiguration {
        SinkConfiguration::from_fn(|_event: &LogEvent| Ok(()))
    }

    #[test]
    fn test_empty_configuration_disables_everything() {
        let config = KloggingConfiguration::default();
        assert_eq!(config.minimum_level_of("anything"), Level::None);
        assert!(config.sinks_for("anything", Level::Fatal).is_empty());
        assert_eq!(config.klogging_min_log_level, Level::Info);
        assert_eq!(config.min_direct_log_level, Level::Warn);
    }

    #[test]
    fn test_name_matching() {
        assert!(NameMatch::All.matches("x"));
        assert!(NameMatch::Exact("a.b".into()).matches("a.b"));
        assert!(!NameMatch::Exact("a.b".into()).matches("a.b.c"));
        assert!(NameMatch::Base("a.b".into()).matches("a.b.c"));
        assert!(!NameMatch::Base("a.b".into()).matches("a"));
    }

    #[test]
    fn test_lowest_matching_level_wins() {
        let config = KloggingConfiguration::builder()
            .sink("out", noop())
            .logging(LoggingConfig::new().from_min_level(Level::Warn, ["out"]))
            .logging(
                LoggingConfig::from_logger_base("com.example")
                    .from_min_level(Level::Debug, ["out"]),
            )
            .build();

        assert_eq!(config.minimum_level_of("com.example.Db"), Level::Debug);
        assert_eq!(config.minimum_level_of("org.other"), Level::Warn);
    }

    #[test]
    fn test_stop_on_match_hides_later_rules() {
        let config = KloggingConfiguration::builder()
            .sink("out", noop())
            .logging(
                LoggingConfig::exact_logger("noisy")
                    .stop_on_match()
                    .from_min_level(Level::Error, ["out"]),
            )
            .logging(LoggingConfig::new().from_min_level(Level::Trace, ["out"]))
            .build();

        assert_eq!(config.minimum_level_of("noisy"), Level::Error);
        assert_eq!(config.minimum_level_of("quiet"), Level::Trace);
    }

    #[test]
    fn test_sinks_for_respects_ranges() {
        let config = KloggingConfiguration::builder()
            .sink("debug_log", noop())
            .sink("alerts", noop())
            .logging(
                LoggingConfig::new()
                    .level_range(Level::Debug, Level::Info, ["debug_log"])
                    .from_min_level(Level::Error, ["alerts", "debug_log"]),
            )
            .build();

        assert_eq!(config.sinks_for("x", Level::Info), vec!["debug_log"]);
        assert!(config.sinks_for("x", Level::Warn).is_empty());
        assert_eq!(config.sinks_for("x", Level::Fatal), vec!["alerts", "debug_log"]);
        assert!(config.sinks_for("x", Level::None).is_empty());
    }

    #[test]
    fn test_sink_names_outlive_logger_name() {
        let config = KloggingConfiguration::builder()
            .sink("out", noop())
            .logging(LoggingConfig::from_logger_base("svc").from_min_level(Level::Info, ["out"]))
            .build();

        let sinks = {
            let name = format!("svc.{}", "worker");
            config.sinks_for(&name, Level::Warn)
        };
        assert_eq!(sinks, vec!["out"]);
    }

    #[test]
    fn test_append_is_additive() {
        let mut first = KloggingConfiguration::builder()
            .sink("a", noop())
            .logging(LoggingConfig::from_logger_base("a").from_min_level(Level::Info, ["a"]))
            .build();
        let second = KloggingConfiguration::builder()
            .sink("b", noop())
            .logging(LoggingConfig::from_logger_base("b").from_min_level(Level::Debug, ["b"]))
            .klogging_min_log_level(Level::Debug)
            .build();

        first.append(second);

        assert_eq!(first.sinks.len(), 2);
        assert_eq!(first.configs.len(), 2);
        assert_eq!(first.minimum_level_of("a.x"), Level::Info);
        assert_eq!(first.minimum_level_of("b.x"), Level::Debug);
        assert_eq!(first.klogging_min_log_level, Level::Debug);
    }

    #[test]
    fn test_validate_reports_unknown_sink() {
        let config = KloggingConfiguration::builder()
            .logging(LoggingConfig::new().from_min_level(Level::Info, ["missing"]))
            .build();

        match config.validate() {
            Err(KloggingError::UnknownSink { sink }) => assert_eq!(sink, "missing"),
            other => panic!("Expected unknown sink error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let config = KloggingConfiguration::builder()
            .sink("out", noop())
            .logging(LoggingConfig::new().level_range(Level::Error, Level::Debug, ["out"]))
            .build();

        assert!(matches!(
            config.validate(),
            Err(KloggingError::InvalidConfiguration { .. })
        ));
    }
}
