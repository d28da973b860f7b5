//! Channel filtering example
//!
//! Channels are an 8-bit tag independent of severity. Channel 0 is the
//! broadcast channel and always passes.
//!
//! Run with: cargo run --example channels

use sinklog::prelude::*;

const NETWORK: ChannelFlags = ChannelFlags::bit(0);
const STORAGE: ChannelFlags = ChannelFlags::bit(1);
const AUDIO: ChannelFlags = ChannelFlags::bit(2);

fn emit(logger: &Logger) {
    sinklog::info!(logger: logger, channel: NETWORK, "socket opened");
    sinklog::info!(logger: logger, channel: STORAGE, "cache flushed");
    sinklog::info!(logger: logger, channel: AUDIO, "buffer underrun");
    sinklog::info!(logger: logger, channel: NETWORK | STORAGE, "remote volume mounted");
    sinklog::info!(logger: logger, "broadcast message");
}

fn main() {
    println!("=== sinklog - Channels Example ===\n");

    let logger = Logger::builder()
        .min_level(LogLevel::Debug)
        .format("[{level}] {message}")
        .build();

    println!("1. All channels enabled ({}):", logger.channels());
    emit(&logger);

    println!("\n2. Only NETWORK enabled:");
    let enabled = logger.set_channels(NETWORK, ChannelFlags::ALL);
    println!("   mask is now {}", enabled);
    emit(&logger);

    println!("\n3. STORAGE added, NETWORK removed in one update:");
    logger.set_channels(STORAGE, NETWORK);
    emit(&logger);

    println!("\n4. Everything disabled, broadcast still passes:");
    logger.disable_channels(ChannelFlags::ALL);
    emit(&logger);

    println!(
        "\n{} dispatched, {} filtered",
        logger.metrics().dispatched(),
        logger.metrics().filtered()
    );
}
