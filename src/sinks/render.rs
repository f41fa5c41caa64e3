//! Rendering of events into single output records
//!
//! - Simple: `2025-01-08T10:30:45.123456Z  INFO com.example : Request processed key=value`
//! - Ansi: Simple with the level coloured (feature `console`)
//! - Json: the serialized `LogEvent`, one object per line

use crate::core::{LogEvent, Result};
use chrono::SecondsFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Renderer {
    #[default]
    Simple,
    Ansi,
    Json,
}

impl Renderer {
    pub fn render(&self, event: &LogEvent) -> Result<String> {
        match self {
            Renderer::Simple => Ok(render_simple(event, false)),
            Renderer::Ansi => Ok(render_simple(event, true)),
            Renderer::Json => Ok(event.to_json()?),
        }
    }
}

/// Escape line breaks so caller-supplied text can never forge additional records
fn sanitize_message(message: &str) -> String {
    message
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

fn render_simple(event: &LogEvent, colors: bool) -> String {
    let level = format!("{:>5}", event.level().to_str());
    let level = if colors { colorize(&level, event) } else { level };

    let mut output = format!(
        "{} {} {} : {}",
        event.timestamp().to_rfc3339_opts(SecondsFormat::Micros, true),
        level,
        sanitize_message(event.logger()),
        sanitize_message(event.message())
    );

    if !event.items().is_empty() {
        output.push(' ');
        output.push_str(&sanitize_message(&event.items().format_items()));
    }

    // Stack traces keep their own line structure
    if let Some(trace) = event.stack_trace() {
        output.push('\n');
        output.push_str(trace);
    }

    output
}

#[cfg(feature = "console")]
fn colorize(level: &str, event: &LogEvent) -> String {
    use colored::Colorize;
    level.color(event.level().color_code()).to_string()
}

#[cfg(not(feature = "console"))]
fn colorize(level: &str, _event: &LogEvent) -> String {
    level.to_string()
}
