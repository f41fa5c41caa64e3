//! Sink definitions held by a configuration

use crate::core::{LogEvent, Result};
use std::fmt;
use std::sync::Arc;

/// The capability a sink wraps: hand one event to a destination.
///
/// Implementations must tolerate concurrent calls. Failures are reported
/// through the returned error; the facade never retries.
pub trait EventSender: Send + Sync {
    fn send(&self, event: &LogEvent) -> Result<()>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

/// Adapter turning a closure into an [`EventSender`]
struct FnSender<F>(F);

impl<F> EventSender for FnSender<F>
where
    F: Fn(&LogEvent) -> Result<()> + Send + Sync,
{
    fn send(&self, event: &LogEvent) -> Result<()> {
        (self.0)(event)
    }
}

/// How a live sink hands events to its sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchMode {
    /// Call the sender on the logging thread
    #[default]
    Direct,
    /// Buffer events in a bounded queue drained by a worker thread
    Queued { capacity: usize },
}

/// Definition of one sink: its sender plus how it is dispatched to
#[derive(Clone)]
pub struct SinkConfiguration {
    event_sender: Arc<dyn EventSender>,
    dispatch: DispatchMode,
}

impl SinkConfiguration {
    pub fn new(sender: impl EventSender + 'static) -> Self {
        Self {
            event_sender: Arc::new(sender),
            dispatch: DispatchMode::Direct,
        }
    }

    /// Build a sink definition from a closure
    ///
    /// # Example
    ///
    /// ```
    /// use rust_klogging::config::SinkConfiguration;
    /// use rust_klogging::LogEvent;
    ///
    /// let sink = SinkConfiguration::from_fn(|event: &LogEvent| {
    ///     println!("{} {}", event.level(), event.message());
    ///     Ok(())
    /// });
    /// ```
    pub fn from_fn<F>(send: F) -> Self
    where
        F: Fn(&LogEvent) -> Result<()> + Send + Sync + 'static,
    {
        Self::new(FnSender(send))
    }

    /// Send through a bounded queue drained by a worker thread
    #[must_use]
    pub fn queued(mut self, capacity: usize) -> Self {
        self.dispatch = DispatchMode::Queued {
            capacity: capacity.max(1),
        };
        self
    }

    pub fn event_sender(&self) -> &Arc<dyn EventSender> {
        &self.event_sender
    }

    pub fn dispatch(&self) -> DispatchMode {
        self.dispatch
    }
}

impl fmt::Debug for SinkConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkConfiguration")
            .field("dispatch", &self.dispatch)
            .finish_non_exhaustive()
    }
}
