//! Error types for the logging facade
//!
//! Level checks, configuration lookups and event construction never fail.
//! Errors only arise while loading configuration files and while sinks
//! hand events to their destinations.

pub type Result<T> = std::result::Result<T, KloggingError>;

#[derive(Debug, thiserror::Error)]
pub enum KloggingError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Configuration document could not be parsed
    #[error("Failed to parse configuration from '{path}': {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// A level range routes events to a sink that is not defined
    #[error("Logging configuration references unknown sink '{sink}'")]
    UnknownSink { sink: String },

    /// A sink failed to send an event
    #[error("Sink '{sink}' failed to send event: {message}")]
    SinkSend { sink: String, message: String },

    /// A sink's sender panicked while handling an event
    #[error("Sink '{sink}' panicked: {message}")]
    SinkPanicked { sink: String, message: String },

    /// Queue of a queued sink is full
    #[error("Queue of sink '{sink}' full: {capacity} events buffered")]
    QueueFull { sink: String, capacity: usize },

    /// Sink no longer accepts events
    #[error("Sink '{sink}' is shut down")]
    SinkClosed { sink: String },
}

impl KloggingError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        KloggingError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        KloggingError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    pub fn unknown_sink(sink: impl Into<String>) -> Self {
        KloggingError::UnknownSink { sink: sink.into() }
    }

    /// Create a sink send error
    pub fn sink_send(sink: impl Into<String>, message: impl Into<String>) -> Self {
        KloggingError::SinkSend {
            sink: sink.into(),
            message: message.into(),
        }
    }

    pub fn sink_panicked(sink: impl Into<String>, message: impl Into<String>) -> Self {
        KloggingError::SinkPanicked {
            sink: sink.into(),
            message: message.into(),
        }
    }

    pub fn queue_full(sink: impl Into<String>, capacity: usize) -> Self {
        KloggingError::QueueFull {
            sink: sink.into(),
            capacity,
        }
    }

    pub fn sink_closed(sink: impl Into<String>) -> Self {
        KloggingError::SinkClosed { sink: sink.into() }
    }
}
