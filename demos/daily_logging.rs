//! Daily file logging example
//!
//! Builds the facade from configuration the way an application host would,
//! then writes a few records into dated files under a temporary storage root.
//!
//! Run with: cargo run --example daily_logging

use rust_log_facade::prelude::*;
use std::fs;

fn main() -> Result<()> {
    println!("=== Rust Log Facade - Daily Logging Example ===\n");

    let storage = std::env::temp_dir().join("rust_log_facade_demo");

    let mut host = Host::new()
        .with_environment("staging")
        .with_storage_path(&storage)
        .with_config(
            MapConfig::new()
                .with("app.log", "daily")
                .with("app.log_level", "info")
                .with("app.log_max_files", "3"),
        );

    bootstrap(&mut host)?;
    let writer = host
        .writer()
        .ok_or_else(|| LoggerError::other("bootstrap produced no writer"))?;

    writer.debug("Below the threshold, not written", LogContext::new())?;
    writer.info("Service started", LogContext::new().with_field("port", 8080))?;
    writer.error(
        "Payment gateway timeout",
        LogContext::new().with_field("gateway", "acme").with_field("attempt", 2),
    )?;
    writer.flush()?;

    let log_dir = storage.join("logs");
    println!("Log files in {}:", log_dir.display());
    for entry in fs::read_dir(&log_dir)? {
        let path = entry?.path();
        println!("--- {} ---", path.display());
        print!("{}", fs::read_to_string(&path)?);
    }

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
