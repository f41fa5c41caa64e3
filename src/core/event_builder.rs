//! Normalization of caller inputs into one canonical `LogEvent`

use super::event::LogEvent;
use super::exception::Exception;
use super::items::ContextItems;
use super::level::Level;
use chrono::{DateTime, Utc};

/// Message used when the logged object is absent
pub const NULL_MESSAGE: &str = "null";

/// Message used for an exception that carries no message of its own
pub const EXCEPTION_MESSAGE: &str = "Exception";

/// Anything a caller may pass to a logging call.
#[derive(Debug, Clone, PartialEq)]
pub enum Loggable {
    /// A pre-built event, updated rather than rebuilt
    Event(LogEvent),
    /// An exception logged as the object itself
    Exception(Exception),
    /// The string representation of any other value
    Value(String),
    /// No object at all
    Null,
}

impl Loggable {
    /// Wrap any displayable value
    pub fn display(value: impl std::fmt::Display) -> Self {
        Loggable::Value(value.to_string())
    }
}

impl From<LogEvent> for Loggable {
    fn from(event: LogEvent) -> Self {
        Loggable::Event(event)
    }
}

impl From<Exception> for Loggable {
    fn from(exception: Exception) -> Self {
        Loggable::Exception(exception)
    }
}

impl From<String> for Loggable {
    fn from(value: String) -> Self {
        Loggable::Value(value)
    }
}

impl From<&str> for Loggable {
    fn from(value: &str) -> Self {
        Loggable::Value(value.to_string())
    }
}

impl From<&String> for Loggable {
    fn from(value: &String) -> Self {
        Loggable::Value(value.clone())
    }
}

macro_rules! loggable_from_display {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Loggable {
                fn from(value: $ty) -> Self {
                    Loggable::Value(value.to_string())
                }
            }
        )*
    };
}

loggable_from_display!(i32, i64, u32, u64, usize, f64, bool, char);

impl<T: Into<Loggable>> From<Option<T>> for Loggable {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Loggable::Null)
    }
}

/// Build the event for a logging call.
///
/// - A pre-built event keeps its logger, message and timestamp; it takes the
///   requested level, the exception's stack trace when one is supplied, and
///   `items` merged over its own.
/// - Anything else becomes a fresh event for `logger` using
///   [`message_and_stack_trace`].
///
/// The result depends only on the arguments.
///
/// `level` must be an event level, never `Level::None`; debug builds panic
/// on it. Loggers only get here after the level gate, which rejects `None`.
pub fn event_from_at(
    logger: &str,
    level: Level,
    exception: Option<&Exception>,
    event_object: Loggable,
    items: ContextItems,
    timestamp: DateTime<Utc>,
) -> LogEvent {
    match event_object {
        Loggable::Event(event) => event.copy_with(
            level,
            exception.map(Exception::stack_trace_to_string),
            &items,
        ),
        other => {
            let (message, stack_trace) = message_and_stack_trace(&other, exception);
            LogEvent::at(timestamp, logger, level, message, stack_trace, items)
        }
    }
}

/// Extract the message and stack trace for a non-event object.
///
/// An exception object supplies both and the separate `exception` is
/// ignored. Any other object supplies its string form (or `"null"`) and the
/// stack trace comes from `exception`.
pub fn message_and_stack_trace(
    object: &Loggable,
    exception: Option<&Exception>,
) -> (String, Option<String>) {
    match object {
        Loggable::Exception(ex) => (
            ex.message().unwrap_or(EXCEPTION_MESSAGE).to_string(),
            Some(ex.stack_trace_to_string()),
        ),
        Loggable::Value(value) => (
            value.clone(),
            exception.map(Exception::stack_trace_to_string),
        ),
        Loggable::Null => (
            NULL_MESSAGE.to_string(),
            exception.map(Exception::stack_trace_to_string),
        ),
        Loggable::Event(event) => (
            event.message().to_string(),
            exception
                .map(Exception::stack_trace_to_string)
                .or_else(|| event.stack_trace().map(str::to_string)),
        ),
    }
}
