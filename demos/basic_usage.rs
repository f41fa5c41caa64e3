//! Basic logger usage example
//!
//! Demonstrates configuring the engine with a console sink and logging at
//! different levels.
//!
//! Run with: cargo run --example basic_usage

use rust_klogging::prelude::*;
use std::sync::Arc;

fn console_at(level: Level) -> KloggingConfiguration {
    KloggingConfiguration::builder()
        .sink("console", SinkConfiguration::new(ConsoleSink::ansi()))
        .logging(LoggingConfig::new().from_min_level(level, ["console"]))
        .build()
}

fn main() {
    println!("=== Rust Klogging - Basic Usage Example ===\n");

    let engine = Arc::new(KloggingEngine::new());
    engine.set_config(console_at(Level::Trace));

    let logger = engine.logger("demo.BasicUsage");

    println!("1. Logging at different levels:");
    logger.trace("This is a trace message");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.warn("This is a warning message");
    logger.error("This is an error message");
    logger.fatal("This is a fatal message");

    println!("\n2. Logging with different minimum levels:");
    engine.set_config(console_at(Level::Info));
    println!("   Minimum level set to INFO - trace and debug won't show:");
    logger.trace("Trace message (hidden)");
    logger.debug("Debug message (hidden)");
    logger.info("Info message (visible)");
    logger.warn("Warning message (visible)");

    println!("\n3. Context items and exceptions:");
    let request_logger =
        logger.with_items(ContextItems::new().with_item("requestId", "r-1001"));
    request_logger.info("Handling request");
    let exception = Exception::new("TimeoutError", Some("upstream took 30s".to_string()));
    request_logger.log_with(Level::Error, Some(&exception), "Request failed", ContextItems::new());

    engine.flush();
    println!("\n=== Example completed successfully! ===");
}
