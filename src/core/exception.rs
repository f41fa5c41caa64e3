//! Caller-supplied error data attached to log events
//!
//! Rust errors carry no stack trace of their own, so `Exception` captures
//! one when it is created. After that it is plain data: formatting the same
//! `Exception` twice always yields the same text.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exception {
    kind: String,
    message: Option<String>,
    frames: Option<String>,
    causes: Vec<String>,
}

impl Exception {
    /// Create an exception of the given kind.
    ///
    /// Backtrace frames are captured when `RUST_BACKTRACE` enables capture.
    pub fn new(kind: impl Into<String>, message: Option<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.filter(|m| !m.is_empty()),
            frames: capture_frames(),
            causes: Vec::new(),
        }
    }

    /// Create an exception from any error, recording its `source()` chain.
    ///
    /// An error whose `Display` output is empty has no message.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_klogging::Exception;
    ///
    /// let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
    /// let exception = Exception::from_error(&io_err);
    /// assert_eq!(exception.message(), Some("disk full"));
    /// ```
    pub fn from_error<E: Error + ?Sized>(error: &E) -> Self {
        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }

        Self {
            kind: std::any::type_name::<E>().to_string(),
            message: Some(error.to_string()).filter(|m| !m.is_empty()),
            frames: capture_frames(),
            causes,
        }
    }

    /// Replace captured frames with fixed text, mostly useful in tests
    #[must_use]
    pub fn with_frames(mut self, frames: impl Into<String>) -> Self {
        self.frames = Some(frames.into());
        self
    }

    #[must_use]
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.causes.push(cause.into());
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Render the full trace: header line, frames, then each cause. Never empty.
    pub fn stack_trace_to_string(&self) -> String {
        let mut trace = match &self.message {
            Some(message) => format!("{}: {}", self.kind, message),
            None => self.kind.clone(),
        };
        if let Some(frames) = &self.frames {
            for line in frames.lines() {
                trace.push_str("\n\t");
                trace.push_str(line.trim_start());
            }
        }
        for cause in &self.causes {
            trace.push_str("\nCaused by: ");
            trace.push_str(cause);
        }
        trace
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.kind, message),
            None => write!(f, "{}", self.kind),
        }
    }
}

fn capture_frames() -> Option<String> {
    let backtrace = Backtrace::capture();
    match backtrace.status() {
        BacktraceStatus::Captured => Some(backtrace.to_string()),
        _ => None,
    }
}
