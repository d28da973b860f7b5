//! Basic logger usage example
//!
//! Demonstrates the process-wide logger, level filtering, line templates and
//! the logging macros.
//!
//! Run with: cargo run --example basic_usage

use sinklog::prelude::*;
use sinklog::{debug, error, info, warn};

fn main() -> Result<()> {
    println!("=== sinklog - Basic Usage Example ===\n");

    let logger = sinklog::logger();
    logger.set_min_level(LogLevel::Debug);

    println!("1. Logging at different levels with the default format:");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.warn("This is a warning message");
    logger.error("This is an error message (stderr)");

    println!("\n2. Minimum level set to WARN - debug and info won't show:");
    logger.set_min_level(LogLevel::Warn);
    debug!("Debug message (hidden)");
    info!("Info message (hidden)");
    warn!("Warning message (visible)");
    error!("Error code: {}", 500);

    println!("\n3. Custom line template:");
    logger.set_min_level(LogLevel::Info);
    logger.set_format("{timestamp} <{level}> T{thread}: {message}");
    info!("Processing {} items", 3);
    println!(
        "   format_only renders without dispatching: {}",
        logger.format_only(LogLevel::Warn, "preview")
    );

    println!("\n4. Hooks see every rendered line:");
    let hook = logger.on_log(|line, level| {
        if level >= LogLevel::Warn {
            println!("   hook saw: {}", line);
        }
    });
    warn!("Something needs attention");
    drop(hook);

    println!("\n5. Loading configuration from JSON:");
    let config = LoggerConfig::from_json(
        r#"{ "min_level": "debug", "format": "[{level}] {message}", "console": { "error": "stdout" } }"#,
    )?;
    logger.apply_config(&config);
    debug!("Configured from JSON");
    error!("Errors now go to stdout");

    logger.reset();
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
