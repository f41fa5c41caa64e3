//! Internal diagnostics: the facade reporting on itself
//!
//! Sinks cannot be used to report sink problems, so diagnostics go straight
//! to stderr. Output is gated by the configuration's `kloggingMinLogLevel`.

use super::level::Level;

/// Write a diagnostic line if `level` passes `min_level`
pub fn emit(min_level: Level, level: Level, component: &str, message: impl AsRef<str>) {
    if enabled(min_level, level) {
        eprintln!("{}", format_line(level, component, message.as_ref()));
    }
}

#[inline]
pub fn enabled(min_level: Level, level: Level) -> bool {
    !level.is_none() && min_level <= level
}

fn format_line(level: Level, component: &str, message: &str) -> String {
    format!("[KLOGGING {}] {}: {}", level, component, message)
}

/// Extract a readable message from a panic payload
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
