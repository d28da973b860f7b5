//! Core logger types and traits

pub mod callback_list;
pub mod channel;
pub mod config;
pub mod error;
pub mod format;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod sink;
pub mod thread_id;

pub use callback_list::{CallbackList, CallbackToken};
pub use channel::ChannelFlags;
pub use config::{ConsoleRouting, ConsoleTarget, LoggerConfig};
pub use error::{LoggerError, Result};
pub use format::{LineFormat, DEFAULT_FORMAT, TIMESTAMP_FORMAT};
pub use log_level::LogLevel;
pub use logger::{
    format_only, log, log_channel, logger, ConsoleWriter, Logger, LoggerBuilder, OnLog,
};
pub use metrics::{FileSinkMetrics, LoggerMetrics};
pub use sink::{Sink, SinkHandle};
pub use thread_id::{this_thread_id, ThreadIdTable};
