//! Built-in event senders
//!
//! Each type here implements [`EventSender`](crate::config::EventSender) and
//! can back a sink definition directly or be named in a configuration file.

#[cfg(feature = "console")]
pub mod console;
pub mod file;
pub mod render;

#[cfg(feature = "console")]
pub use console::{ConsoleSink, ConsoleStream};
pub use file::FileSink;
pub use render::Renderer;
