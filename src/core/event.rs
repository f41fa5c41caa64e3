//! Log event structure

use super::items::ContextItems;
use super::level::Level;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Canonical event handed to sinks. Immutable once built: "updating" an
/// event produces a new one through [`LogEvent::copy_with`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEvent {
    timestamp: DateTime<Utc>,
    logger: String,
    #[serde(deserialize_with = "deserialize_event_level")]
    level: Level,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stack_trace: Option<String>,
    #[serde(default, skip_serializing_if = "ContextItems::is_empty")]
    items: ContextItems,
}

impl LogEvent {
    /// Create an event stamped with the current time
    pub fn new(
        logger: impl Into<String>,
        level: Level,
        message: impl Into<String>,
        stack_trace: Option<String>,
        items: ContextItems,
    ) -> Self {
        Self::at(Utc::now(), logger, level, message, stack_trace, items)
    }

    /// Create an event with an explicit timestamp.
    ///
    /// `level` must not be `Level::None`; debug builds panic on it.
    pub fn at(
        timestamp: DateTime<Utc>,
        logger: impl Into<String>,
        level: Level,
        message: impl Into<String>,
        stack_trace: Option<String>,
        items: ContextItems,
    ) -> Self {
        debug_assert!(!level.is_none(), "log events never carry Level::None");
        Self {
            timestamp,
            logger: logger.into(),
            level,
            message: message.into(),
            stack_trace,
            items,
        }
    }

    /// Copy this event with a new level, the given stack trace if any, and
    /// `items` merged over the existing ones. Logger, message and timestamp
    /// are preserved.
    #[must_use]
    pub fn copy_with(
        &self,
        level: Level,
        stack_trace: Option<String>,
        items: &ContextItems,
    ) -> LogEvent {
        debug_assert!(!level.is_none(), "log events never carry Level::None");
        let mut merged = self.items.clone();
        merged.merge(items);
        LogEvent {
            timestamp: self.timestamp,
            logger: self.logger.clone(),
            level,
            message: self.message.clone(),
            stack_trace: stack_trace.or_else(|| self.stack_trace.clone()),
            items: merged,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn logger(&self) -> &str {
        &self.logger
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn stack_trace(&self) -> Option<&str> {
        self.stack_trace.as_deref()
    }

    pub fn items(&self) -> &ContextItems {
        &self.items
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse from JSON string. A `"NONE"` level is rejected.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn deserialize_event_level<'de, D>(deserializer: D) -> Result<Level, D::Error>
where
    D: Deserializer<'de>,
{
    let level = Level::deserialize(deserializer)?;
    if level.is_none() {
        return Err(serde::de::Error::custom("log events never carry level NONE"));
    }
    Ok(level)
}
