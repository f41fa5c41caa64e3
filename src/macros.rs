//! Logging macros for ergonomic log message formatting.
//!
//! These macros check the level before formatting, so the arguments of a
//! disabled call are never turned into a string.
//!
//! # Examples
//!
//! ```
//! use rust_klogging::prelude::*;
//! use rust_klogging::info;
//! use std::sync::Arc;
//!
//! let engine = Arc::new(KloggingEngine::new());
//! let logger = engine.logger("com.example.Server");
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a formatted message at `level`.
///
/// # Examples
///
/// ```
/// # use rust_klogging::prelude::*;
/// # use std::sync::Arc;
/// # let logger = Arc::new(KloggingEngine::new()).logger("demo");
/// use rust_klogging::log;
/// log!(logger, Level::Info, "Simple message");
/// log!(logger, Level::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        let level = $level;
        if $crate::BaseLogger::is_level_enabled(logger, level) {
            logger.log(level, format!($($arg)+));
        }
    }};
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use rust_klogging::prelude::*;
/// # use std::sync::Arc;
/// # let logger = Arc::new(KloggingEngine::new()).logger("demo");
/// use rust_klogging::info;
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Fatal, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::config::{KloggingConfiguration, LoggingConfig, SinkConfiguration};
    use crate::core::{KloggingEngine, Level, LogEvent, Logger};
    use parking_lot::Mutex;
    use std::cell::Cell;
    use std::fmt;
    use std::sync::Arc;

    fn capturing_logger(min_level: Level) -> (Logger, Arc<Mutex<Vec<LogEvent>>>) {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let sink_events = Arc::clone(&captured);
        let engine = Arc::new(KloggingEngine::with_config(
            KloggingConfiguration::builder()
                .sink(
                    "memory",
                    SinkConfiguration::from_fn(move |event: &LogEvent| {
                        sink_events.lock().push(event.clone());
                        Ok(())
                    }),
                )
                .logging(LoggingConfig::new().from_min_level(min_level, ["memory"]))
                .build(),
        ));
        (engine.logger("macros"), captured)
    }

    /// Counts how often it is formatted
    struct Tracked<'a>(&'a Cell<usize>);

    impl fmt::Display for Tracked<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            self.0.set(self.0.get() + 1);
            write!(f, "tracked")
        }
    }

    #[test]
    fn test_log_macro_formats_message() {
        let (logger, captured) = capturing_logger(Level::Trace);
        log!(logger, Level::Info, "Formatted: {}", 42);

        let events = captured.lock();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message(), "Formatted: 42");
        assert_eq!(events[0].level(), Level::Info);
    }

    #[test]
    fn test_level_macros() {
        let (logger, captured) = capturing_logger(Level::Trace);
        trace!(logger, "Value: {}", 10);
        debug!(logger, "Count: {}", 5);
        info!(logger, "Items: {}", 100);
        warn!(logger, "Retry {} of {}", 1, 3);
        error!(logger, "Code: {}", 500);
        fatal!(logger, "Critical failure: {}", "system");

        let levels: Vec<Level> = captured.lock().iter().map(|e| e.level()).collect();
        assert_eq!(levels, Level::EVENT_LEVELS.to_vec());
    }

    #[test]
    fn test_disabled_macro_skips_formatting() {
        let (logger, captured) = capturing_logger(Level::Warn);
        let formatted = Cell::new(0);

        debug!(logger, "{}", Tracked(&formatted));
        assert_eq!(formatted.get(), 0);

        warn!(logger, "{}", Tracked(&formatted));
        assert_eq!(formatted.get(), 1);
        assert_eq!(captured.lock().len(), 1);
    }
}
