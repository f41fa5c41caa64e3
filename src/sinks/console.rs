//! Console sink implementation

use super::render::Renderer;
use crate::config::EventSender;
use crate::core::{Level, LogEvent, Result};
use std::io::Write;

/// Which standard stream a console sink writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleStream {
    #[default]
    Stdout,
    Stderr,
    /// Error and Fatal to stderr, everything else to stdout
    Split,
}

pub struct ConsoleSink {
    stream: ConsoleStream,
    renderer: Renderer,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            stream: ConsoleStream::Stdout,
            renderer: Renderer::Simple,
        }
    }

    pub fn stderr() -> Self {
        Self {
            stream: ConsoleStream::Stderr,
            renderer: Renderer::Simple,
        }
    }

    /// Stdout sink with coloured levels
    pub fn ansi() -> Self {
        Self {
            stream: ConsoleStream::Stdout,
            renderer: Renderer::Ansi,
        }
    }

    /// Set the stream for this sink
    #[must_use]
    pub fn with_stream(mut self, stream: ConsoleStream) -> Self {
        self.stream = stream;
        self
    }

    /// Set the renderer for this sink
    ///
    /// # Example
    ///
    /// ```
    /// use rust_klogging::sinks::{ConsoleSink, Renderer};
    ///
    /// let sink = ConsoleSink::new().with_renderer(Renderer::Json);
    /// ```
    #[must_use]
    pub fn with_renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = renderer;
        self
    }

    fn uses_stderr(&self, level: Level) -> bool {
        match self.stream {
            ConsoleStream::Stdout => false,
            ConsoleStream::Stderr => true,
            ConsoleStream::Split => matches!(level, Level::Error | Level::Fatal),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSender for ConsoleSink {
    fn send(&self, event: &LogEvent) -> Result<()> {
        let output = self.renderer.render(event)?;
        if self.uses_stderr(event.level()) {
            writeln!(std::io::stderr().lock(), "{}", output)?;
        } else {
            writeln!(std::io::stdout().lock(), "{}", output)?;
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        // Split sinks write to both streams
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }
}
