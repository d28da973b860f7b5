//! File logging example
//!
//! Demonstrates the asynchronous file sink alongside console output,
//! including the backup of a previous log file on attach.
//!
//! Run with: cargo run --example file_logging

use sinklog::prelude::*;

fn main() -> Result<()> {
    println!("=== sinklog - File Logging Example ===\n");

    let logger = Logger::builder()
        .min_level(LogLevel::Debug)
        .format("[{level}] [T{thread}] {message} [{timestamp}]")
        .build();

    // A previous run's log is moved to application.log.bak
    let file = FileSink::builder("application.log")
        .min_level(LogLevel::Info)
        .attach(&logger)?;
    match file.backed_up_path() {
        Some(backup) => println!("Previous log moved to {}", backup.display()),
        None => println!("No previous log to back up"),
    }

    println!("\n1. Logging to both console and file:");
    logger.info("Application started");
    logger.debug("Loading configuration... (console only)");
    logger.info("Configuration loaded successfully");
    logger.warn("Using default settings for some options");
    logger.error("Failed to load optional plugin");

    println!("\n2. Logging from worker threads:");
    std::thread::scope(|scope| {
        for worker in 1..=3 {
            let logger = &logger;
            scope.spawn(move || {
                for item in 1..=2 {
                    sinklog::info!(logger: logger, "worker {} processed item {}", worker, item);
                }
            });
        }
    });

    logger.info("All operations completed");

    // Detaching waits until every queued line is on disk
    let queued = file.metrics().queued();
    file.detach();

    println!("\n=== Example completed successfully! ===");
    println!("{} lines written to 'application.log'", queued);

    Ok(())
}
