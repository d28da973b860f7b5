//! Logger configuration
//!
//! [`LoggerConfig`] is the serializable description of everything a
//! [`Logger`](super::Logger) can be configured with. It can be built in code,
//! through [`LoggerBuilder`](super::LoggerBuilder), or loaded from JSON.

use super::channel::ChannelFlags;
use super::error::{LoggerError, Result};
use super::format::{LineFormat, DEFAULT_FORMAT};
use super::log_level::LogLevel;
use serde::{Deserialize, Serialize};

/// Where console output for a level goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleTarget {
    Stdout,
    Stderr,
    /// No console output; sinks and hooks still run
    None,
}

impl ConsoleTarget {
    pub(crate) const fn as_u8(self) -> u8 {
        match self {
            ConsoleTarget::Stdout => 0,
            ConsoleTarget::Stderr => 1,
            ConsoleTarget::None => 2,
        }
    }

    pub(crate) const fn from_u8(value: u8) -> Self {
        match value {
            0 => ConsoleTarget::Stdout,
            1 => ConsoleTarget::Stderr,
            _ => ConsoleTarget::None,
        }
    }
}

/// Console target per level. Errors go to stderr, everything else to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleRouting {
    pub debug: ConsoleTarget,
    pub info: ConsoleTarget,
    pub warn: ConsoleTarget,
    pub error: ConsoleTarget,
}

impl ConsoleRouting {
    /// Route every level to `target`.
    pub const fn uniform(target: ConsoleTarget) -> Self {
        Self {
            debug: target,
            info: target,
            warn: target,
            error: target,
        }
    }

    pub const fn get(&self, level: LogLevel) -> ConsoleTarget {
        match level {
            LogLevel::Debug => self.debug,
            LogLevel::Info => self.info,
            LogLevel::Warn => self.warn,
            LogLevel::Error => self.error,
        }
    }

    pub fn set(&mut self, level: LogLevel, target: ConsoleTarget) {
        match level {
            LogLevel::Debug => self.debug = target,
            LogLevel::Info => self.info = target,
            LogLevel::Warn => self.warn = target,
            LogLevel::Error => self.error = target,
        }
    }
}

impl Default for ConsoleRouting {
    fn default() -> Self {
        Self {
            debug: ConsoleTarget::Stdout,
            info: ConsoleTarget::Stdout,
            warn: ConsoleTarget::Stdout,
            error: ConsoleTarget::Stderr,
        }
    }
}

/// Full logger configuration.
///
/// Missing fields take their defaults when deserializing:
///
/// ```
/// use sinklog::{LogLevel, LoggerConfig};
///
/// let config = LoggerConfig::from_json(r#"{ "min_level": "warn", "channels": 3 }"#).unwrap();
/// assert_eq!(config.min_level, LogLevel::Warn);
/// assert_eq!(config.channels.bits(), 3);
/// assert_eq!(config.format, sinklog::DEFAULT_FORMAT);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub min_level: LogLevel,
    pub format: String,
    pub channels: ChannelFlags,
    pub console: ConsoleRouting,
}

impl LoggerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LoggerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject templates that would log nothing of the caller's text.
    pub fn validate(&self) -> Result<()> {
        if !LineFormat::parse(self.format.as_str()).uses_message() {
            return Err(LoggerError::config(
                "format",
                format!("template '{}' has no {{message}} placeholder", self.format),
            ));
        }
        Ok(())
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::default_min(),
            format: DEFAULT_FORMAT.to_string(),
            channels: ChannelFlags::ALL,
            console: ConsoleRouting::default(),
        }
    }
}
