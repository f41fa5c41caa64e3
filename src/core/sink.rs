//! Live sinks built from sink configurations
//!
//! A `Sink` pairs a name with the event sender of its configuration. Sinks
//! are rebuilt from scratch on every configuration change, so a `Sink` is
//! never reconfigured in place.

use super::diagnostics;
use super::error::{KloggingError, Result};
use super::event::LogEvent;
use super::level::Level;
use super::metrics::DispatchMetrics;
use crate::config::{DispatchMode, EventSender, SinkConfiguration};
use crossbeam_channel::{bounded, Sender, TrySendError};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

pub struct Sink {
    name: String,
    sender: Arc<dyn EventSender>,
    queue: Option<SinkQueue>,
}

/// Bounded queue drained by a worker thread
struct SinkQueue {
    capacity: usize,
    channel: RwLock<Option<Sender<LogEvent>>>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
}

impl Sink {
    /// Sink that calls its sender on the logging thread
    pub fn direct(name: impl Into<String>, sender: Arc<dyn EventSender>) -> Self {
        Self {
            name: name.into(),
            sender,
            queue: None,
        }
    }

    /// Sink that buffers up to `capacity` events for a worker thread.
    ///
    /// A full queue drops the event and reports it; it never blocks the caller.
    pub fn queued(
        name: impl Into<String>,
        sender: Arc<dyn EventSender>,
        capacity: usize,
        metrics: Arc<DispatchMetrics>,
        diagnostics_level: Level,
    ) -> Self {
        let name = name.into();
        let capacity = capacity.max(1);
        let (tx, rx) = bounded::<LogEvent>(capacity);
        let worker_sender = Arc::clone(&sender);
        let worker_name = name.clone();

        let handle = thread::Builder::new()
            .name(format!("klogging-sink-{}", name))
            .spawn(move || {
                // Ends once every channel sender is gone and the queue is drained
                for event in rx.iter() {
                    match send_isolated(&worker_name, worker_sender.as_ref(), &event) {
                        Ok(()) => {
                            metrics.record_delivered();
                        }
                        Err(e) => {
                            metrics.record_failed();
                            diagnostics::emit(
                                diagnostics_level,
                                Level::Warn,
                                "Sink",
                                e.to_string(),
                            );
                        }
                    }
                }
                if let Err(e) = worker_sender.flush() {
                    diagnostics::emit(
                        diagnostics_level,
                        Level::Warn,
                        "Sink",
                        format!("Sink '{}' flush failed: {}", worker_name, e),
                    );
                }
            });

        let (channel, worker) = match handle {
            Ok(handle) => (Some(tx), Some(handle)),
            Err(e) => {
                diagnostics::emit(
                    diagnostics_level,
                    Level::Error,
                    "Sink",
                    format!("Could not start worker for sink '{}': {}", name, e),
                );
                (None, None)
            }
        };

        Self {
            name,
            sender,
            queue: Some(SinkQueue {
                capacity,
                channel: RwLock::new(channel),
                worker: Mutex::new(worker),
            }),
        }
    }

    /// Materialize a live sink from its configuration
    pub fn from_config(
        name: &str,
        config: &SinkConfiguration,
        metrics: &Arc<DispatchMetrics>,
        diagnostics_level: Level,
    ) -> Self {
        let sender = Arc::clone(config.event_sender());
        match config.dispatch() {
            DispatchMode::Direct => Sink::direct(name, sender),
            DispatchMode::Queued { capacity } => {
                Sink::queued(name, sender, capacity, Arc::clone(metrics), diagnostics_level)
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_queued(&self) -> bool {
        self.queue.is_some()
    }

    /// Hand an event to this sink.
    ///
    /// For a queued sink `Ok` means the event was accepted by the queue; the
    /// worker reports delivery failures itself.
    pub fn send(&self, event: &LogEvent) -> Result<()> {
        let Some(queue) = &self.queue else {
            return self.send_direct(event);
        };

        let channel = queue.channel.read();
        let Some(tx) = channel.as_ref() else {
            return Err(KloggingError::sink_closed(&self.name));
        };
        match tx.try_send(event.clone()) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                Err(KloggingError::queue_full(&self.name, queue.capacity))
            }
            Err(TrySendError::Disconnected(_)) => Err(KloggingError::sink_closed(&self.name)),
        }
    }

    /// Call the sender on this thread, bypassing any queue
    pub fn send_direct(&self, event: &LogEvent) -> Result<()> {
        send_isolated(&self.name, self.sender.as_ref(), event)
    }

    pub fn flush(&self) -> Result<()> {
        self.sender.flush()
    }

    /// Stop accepting events and wait up to `timeout` for the queue to drain
    ///
    /// Returns `true` if the worker finished in time (always `true` for a
    /// direct sink).
    pub fn shutdown(&self, timeout: Duration) -> bool {
        let Some(queue) = &self.queue else {
            return self.flush().is_ok();
        };

        // Close the channel to signal the worker thread
        drop(queue.channel.write().take());

        let Some(handle) = queue.worker.lock().take() else {
            return true;
        };
        let start = Instant::now();
        loop {
            if handle.is_finished() {
                return handle.join().is_ok();
            }
            if start.elapsed() >= timeout {
                return false;
            }
            // Small sleep to avoid busy-waiting
            thread::sleep(Duration::from_millis(10));
        }
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink")
            .field("name", &self.name)
            .field("queued", &self.is_queued())
            .finish()
    }
}

/// Call `sender`, turning a panic into an error so one sink cannot take
/// down the caller or the other sinks
fn send_isolated(name: &str, sender: &dyn EventSender, event: &LogEvent) -> Result<()> {
    match catch_unwind(AssertUnwindSafe(|| sender.send(event))) {
        Ok(result) => result,
        Err(payload) => Err(KloggingError::sink_panicked(
            name,
            diagnostics::panic_message(payload.as_ref()),
        )),
    }
}
