//! File sink implementation

use super::render::Renderer;
use crate::config::EventSender;
use crate::core::{KloggingError, LogEvent, Result};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends one rendered record per event to a file
pub struct FileSink {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
    renderer: Renderer,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_renderer(path, Renderer::Simple)
    }

    /// Create a file sink writing JSON lines
    pub fn json(path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_renderer(path, Renderer::Json)
    }

    pub fn with_renderer(path: impl Into<PathBuf>, renderer: Renderer) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                KloggingError::io_operation(
                    "opening log file",
                    path.display().to_string(),
                    e,
                )
            })?;

        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
            renderer,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventSender for FileSink {
    fn send(&self, event: &LogEvent) -> Result<()> {
        let mut output = self.renderer.render(event)?;
        output.push('\n');
        self.writer.lock().write_all(output.as_bytes())?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Errors cannot be reported from drop
        let _ = self.writer.get_mut().flush();
    }
}
