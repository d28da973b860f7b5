//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`. The message is only
//! formatted if the level and channel would pass the logger's filters.
//!
//! Every macro accepts two optional prefixes, in this order:
//!
//! - `logger: <&Logger>,` to use a specific logger instead of [`logger()`](crate::logger)
//! - `channel: <ChannelFlags or u8>,` to tag the message with a channel
//!
//! # Examples
//!
//! ```
//! use sinklog::prelude::*;
//! use sinklog::{info, warn};
//!
//! let logger = Logger::builder().without_console().build();
//!
//! // Basic logging
//! info!(logger: &logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger: &logger, "Server listening on port {}", port);
//!
//! // Tagged with a channel
//! const NET: ChannelFlags = ChannelFlags::bit(1);
//! warn!(logger: &logger, channel: NET, "retrying {} in {}ms", "connect", 250);
//!
//! // Through the process-wide logger
//! info!("hello from the global logger");
//! ```

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use sinklog::prelude::*;
/// # let logger = Logger::builder().without_console().build();
/// use sinklog::log;
/// log!(logger: &logger, LogLevel::Info, "Simple message");
/// log!(logger: &logger, channel: ChannelFlags::bit(0), LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    (logger: $logger:expr, channel: $channel:expr, $level:expr, $($arg:tt)+) => {{
        let logger: &$crate::Logger = $logger;
        let level: $crate::LogLevel = $level;
        let channel = $crate::ChannelFlags::from($channel);
        if logger.is_enabled(level, channel) {
            logger.log_channel(level, channel, ::std::format!($($arg)+));
        } else {
            logger.metrics().record_filtered();
        }
    }};
    (logger: $logger:expr, $level:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, channel: $crate::ChannelFlags::BROADCAST, $level, $($arg)+)
    };
    (channel: $channel:expr, $level:expr, $($arg:tt)+) => {
        $crate::log!(logger: $crate::logger(), channel: $channel, $level, $($arg)+)
    };
    ($level:expr, $($arg:tt)+) => {
        $crate::log!(logger: $crate::logger(), channel: $crate::ChannelFlags::BROADCAST, $level, $($arg)+)
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use sinklog::prelude::*;
/// # let logger = Logger::builder().without_console().build();
/// use sinklog::debug;
/// debug!(logger: &logger, "Debug information");
/// debug!(logger: &logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    (logger: $logger:expr, channel: $channel:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, channel: $channel, $crate::LogLevel::Debug, $($arg)+)
    };
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::LogLevel::Debug, $($arg)+)
    };
    (channel: $channel:expr, $($arg:tt)+) => {
        $crate::log!(channel: $channel, $crate::LogLevel::Debug, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use sinklog::prelude::*;
/// # let logger = Logger::builder().without_console().build();
/// use sinklog::info;
/// info!(logger: &logger, "Application started");
/// info!(logger: &logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    (logger: $logger:expr, channel: $channel:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, channel: $channel, $crate::LogLevel::Info, $($arg)+)
    };
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::LogLevel::Info, $($arg)+)
    };
    (channel: $channel:expr, $($arg:tt)+) => {
        $crate::log!(channel: $channel, $crate::LogLevel::Info, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use sinklog::prelude::*;
/// # let logger = Logger::builder().without_console().build();
/// use sinklog::warn;
/// warn!(logger: &logger, "Deprecated API usage");
/// warn!(logger: &logger, "Memory usage at {}%", 85);
/// ```
#[macro_export]
macro_rules! warn {
    (logger: $logger:expr, channel: $channel:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, channel: $channel, $crate::LogLevel::Warn, $($arg)+)
    };
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::LogLevel::Warn, $($arg)+)
    };
    (channel: $channel:expr, $($arg:tt)+) => {
        $crate::log!(channel: $channel, $crate::LogLevel::Warn, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use sinklog::prelude::*;
/// # let logger = Logger::builder().without_console().build();
/// use sinklog::error;
/// error!(logger: &logger, "Failed to connect to database");
/// error!(logger: &logger, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! error {
    (logger: $logger:expr, channel: $channel:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, channel: $channel, $crate::LogLevel::Error, $($arg)+)
    };
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::LogLevel::Error, $($arg)+)
    };
    (channel: $channel:expr, $($arg:tt)+) => {
        $crate::log!(channel: $channel, $crate::LogLevel::Error, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Error, $($arg)+)
    };
}
