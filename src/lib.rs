//! # sinklog
//!
//! A small process-wide logging facility.
//!
//! Messages carry a [`LogLevel`] and an optional 8-bit [`ChannelFlags`] tag.
//! Each message that passes the level and channel filters is rendered once
//! with the current line template and handed, in order, to every attached
//! [`Sink`], every "on log" hook, and the console (stderr for errors, stdout
//! otherwise).
//!
//! ## Features
//!
//! - **Filtering**: minimum level plus channel masks, changeable at runtime
//! - **Templates**: `{level}`, `{thread}`, `{message}` and `{timestamp}` placeholders
//! - **RAII registration**: sinks and hooks stay attached while their handle lives
//! - **Async file sink**: background writer thread, backup of the previous log on attach
//!
//! ```no_run
//! use sinklog::prelude::*;
//!
//! # fn main() -> sinklog::Result<()> {
//! let log = sinklog::logger();
//! log.set_format("[{level}] {message}");
//! let _file = FileSink::attach(log, "app.log")?;
//!
//! sinklog::info!("listening on port {}", 8080);
//! sinklog::warn!(channel: ChannelFlags::bit(2), "cache miss for {}", "user:42");
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        CallbackToken, ChannelFlags, ConsoleRouting, ConsoleTarget, LogLevel, Logger,
        LoggerBuilder, LoggerConfig, LoggerError, Result, Sink, SinkHandle,
    };
    pub use crate::sinks::{FileSink, FileSinkBuilder, FileSinkHandle};
}

pub use crate::core::{
    format_only, log, log_channel, logger, this_thread_id, CallbackList, CallbackToken,
    ChannelFlags, ConsoleRouting, ConsoleTarget, ConsoleWriter, FileSinkMetrics, LineFormat,
    LogLevel, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, OnLog, Result, Sink,
    SinkHandle, DEFAULT_FORMAT,
};
pub use sinks::{FileSink, FileSinkBuilder, FileSinkHandle};
