//! Basic facade usage example
//!
//! Demonstrates the level methods, structured messages and context, and
//! listening for log events, with records going to the error log (stderr).
//!
//! Run with: cargo run --example basic_usage

use rust_log_facade::prelude::*;
use rust_log_facade::{info, warning};
use serde::Serialize;
use std::sync::{Arc, Weak};

#[derive(Serialize)]
struct Order {
    id: u32,
    total_cents: u64,
}

fn main() -> Result<()> {
    println!("=== Rust Log Facade - Basic Usage Example ===\n");

    let mut writer = Writer::new(Logger::new("demo"));
    writer.use_error_log("debug")?;

    println!("1. Logging at every level:");
    writer.debug("This is a debug message", LogContext::new())?;
    writer.info("This is an info message", LogContext::new())?;
    writer.notice("This is a notice message", LogContext::new())?;
    writer.warning("This is a warning message", LogContext::new())?;
    writer.error("This is an error message", LogContext::new())?;
    writer.critical("This is a critical message", LogContext::new())?;
    writer.alert("This is an alert message", LogContext::new())?;
    writer.emergency("This is an emergency message", LogContext::new())?;

    println!("\n2. Level by name, with context:");
    writer.log(
        "notice",
        "User signed in",
        LogContext::new().with_field("user_id", 42).with_field("method", "sso"),
    )?;
    if let Err(e) = writer.log("verbose", "never written", LogContext::new()) {
        println!("   rejected: {}", e);
    }

    println!("\n3. Structured messages:");
    let order = Order {
        id: 1001,
        total_cents: 4_250,
    };
    writer.info(Message::serialized(&order)?, LogContext::new())?;

    println!("\n4. Log events:");
    let bus = Arc::new(EventBus::new());
    writer.set_event_dispatcher(Arc::downgrade(&bus) as Weak<dyn EventDispatcher>);
    writer.listen(|event| println!("   event: {} {}", event.level, event.message));
    info!(writer, "Processed {} items", 100)?;
    warning!(writer, "Retry attempt {} of {}", 3, 5)?;

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
