//! Main logger implementation
//!
//! A [`Logger`] filters each message by level and channel, renders it once
//! with the current [`LineFormat`], and hands the line to every attached sink,
//! every "on log" hook and finally the console.
//!
//! Minimum level and enabled channels are plain atomics read with relaxed
//! ordering on the hot path. A call racing with `set_min_level` or
//! `set_channels` may observe the previous value; it never observes a torn
//! one. The sink registry is guarded by a single fair lock that serializes
//! attach and detach against dispatch, so a detached sink is never invoked
//! after its handle has been dropped, and a busy logger cannot hold off an
//! attach or detach indefinitely.

use super::{
    callback_list::{isolate, CallbackList, CallbackToken},
    channel::ChannelFlags,
    config::{ConsoleRouting, ConsoleTarget, LoggerConfig},
    format::LineFormat,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    sink::{Sink, SinkHandle},
};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, LazyLock};

/// Callback invoked with every rendered line, after the sinks.
pub type OnLog = dyn Fn(&str, LogLevel) + Send + Sync;

/// Replacement for a standard console stream
pub type ConsoleWriter = Box<dyn Write + Send>;

/// Where each console target currently writes; `None` is the process stream.
#[derive(Default)]
struct ConsoleStreams {
    stdout: Mutex<Option<ConsoleWriter>>,
    stderr: Mutex<Option<ConsoleWriter>>,
}

impl ConsoleStreams {
    fn slot(&self, target: ConsoleTarget) -> Option<&Mutex<Option<ConsoleWriter>>> {
        match target {
            ConsoleTarget::Stdout => Some(&self.stdout),
            ConsoleTarget::Stderr => Some(&self.stderr),
            ConsoleTarget::None => None,
        }
    }

    fn write_line(&self, target: ConsoleTarget, line: &str) {
        let Some(slot) = self.slot(target) else {
            return;
        };
        // Console failures (closed pipe, etc.) are ignored like any sink failure.
        let mut redirected = slot.lock();
        let _ = match (redirected.as_mut(), target) {
            (Some(writer), _) => writeln!(writer, "{line}").and_then(|()| writer.flush()),
            (None, ConsoleTarget::Stderr) => writeln!(io::stderr().lock(), "{line}"),
            (None, _) => writeln!(io::stdout().lock(), "{line}"),
        };
    }
}

pub struct Logger {
    min_level: AtomicU8,
    channels: AtomicU8,
    format: RwLock<Arc<LineFormat>>,
    console: [AtomicU8; 4],
    streams: ConsoleStreams,
    sinks: CallbackList<dyn Sink>,
    hooks: CallbackList<OnLog>,
    /// Metrics for observability
    metrics: LoggerMetrics,
}

impl Logger {
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&LoggerConfig::default())
    }

    #[must_use]
    pub fn from_config(config: &LoggerConfig) -> Self {
        let logger = Self {
            min_level: AtomicU8::new(config.min_level.as_u8()),
            channels: AtomicU8::new(config.channels.bits()),
            format: RwLock::new(Arc::new(LineFormat::parse(config.format.as_str()))),
            console: std::array::from_fn(|_| AtomicU8::new(ConsoleTarget::Stdout.as_u8())),
            streams: ConsoleStreams::default(),
            sinks: CallbackList::new(),
            hooks: CallbackList::new(),
            metrics: LoggerMetrics::new(),
        };
        logger.set_console_routing(config.console);
        logger
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use sinklog::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .min_level(LogLevel::Warn)
    ///     .format("[{level}] {message}")
    ///     .build();
    /// assert_eq!(logger.format_only(LogLevel::Error, "boom"), "[E] boom");
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    // --- configuration -------------------------------------------------

    pub fn set_min_level(&self, level: LogLevel) {
        self.min_level.store(level.as_u8(), Ordering::Relaxed);
    }

    pub fn min_level(&self) -> LogLevel {
        LogLevel::from_u8(self.min_level.load(Ordering::Relaxed))
    }

    /// Replace the line template. See [`LineFormat`] for the placeholders.
    pub fn set_format(&self, template: impl Into<String>) {
        let format = Arc::new(LineFormat::parse(template));
        *self.format.write() = format;
    }

    pub fn format(&self) -> String {
        self.format.read().as_str().to_string()
    }

    /// The parsed template currently in use
    pub fn line_format(&self) -> Arc<LineFormat> {
        Arc::clone(&self.format.read())
    }

    /// Clear `unset`, then set `set`, as one atomic update. A bit present in
    /// both ends up set. Returns the new mask.
    pub fn set_channels(
        &self,
        set: impl Into<ChannelFlags>,
        unset: impl Into<ChannelFlags>,
    ) -> ChannelFlags {
        let (set, unset) = (set.into(), unset.into());
        let update = |prev: u8| ChannelFlags::new(prev).update(set, unset).bits();
        let prev = match self
            .channels
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |prev| Some(update(prev)))
        {
            Ok(prev) | Err(prev) => prev,
        };
        ChannelFlags::new(update(prev))
    }

    pub fn enable_channels(&self, set: impl Into<ChannelFlags>) -> ChannelFlags {
        self.set_channels(set, ChannelFlags::NONE)
    }

    pub fn disable_channels(&self, unset: impl Into<ChannelFlags>) -> ChannelFlags {
        self.set_channels(ChannelFlags::NONE, unset)
    }

    pub fn channels(&self) -> ChannelFlags {
        ChannelFlags::new(self.channels.load(Ordering::Relaxed))
    }

    pub fn set_console_target(&self, level: LogLevel, target: ConsoleTarget) {
        self.console[level.index()].store(target.as_u8(), Ordering::Relaxed);
    }

    pub fn console_target(&self, level: LogLevel) -> ConsoleTarget {
        ConsoleTarget::from_u8(self.console[level.index()].load(Ordering::Relaxed))
    }

    pub fn set_console_routing(&self, routing: ConsoleRouting) {
        for level in LogLevel::ALL {
            self.set_console_target(level, routing.get(level));
        }
    }

    pub fn console_routing(&self) -> ConsoleRouting {
        let mut routing = ConsoleRouting::default();
        for level in LogLevel::ALL {
            routing.set(level, self.console_target(level));
        }
        routing
    }

    /// Send console output meant for `target` to `writer` instead of the
    /// process stream. Ignored for [`ConsoleTarget::None`].
    pub fn redirect_console(&self, target: ConsoleTarget, writer: ConsoleWriter) {
        if let Some(slot) = self.streams.slot(target) {
            *slot.lock() = Some(writer);
        }
    }

    /// Undo [`redirect_console`](Self::redirect_console) for `target`.
    pub fn restore_console(&self, target: ConsoleTarget) {
        if let Some(slot) = self.streams.slot(target) {
            slot.lock().take();
        }
    }

    /// Apply every setting of `config`. Attached sinks and hooks are kept.
    pub fn apply_config(&self, config: &LoggerConfig) {
        self.set_min_level(config.min_level);
        self.set_format(config.format.as_str());
        self.channels.store(config.channels.bits(), Ordering::Relaxed);
        self.set_console_routing(config.console);
    }

    /// Snapshot of the current settings
    pub fn config(&self) -> LoggerConfig {
        LoggerConfig {
            min_level: self.min_level(),
            format: self.format(),
            channels: self.channels(),
            console: self.console_routing(),
        }
    }

    /// Restore the default configuration and zero the metrics. Attached sinks,
    /// hooks and console redirections are not touched.
    pub fn reset(&self) {
        self.apply_config(&LoggerConfig::default());
        self.metrics.reset();
    }

    // --- registration --------------------------------------------------

    /// Attach a sink; it receives every line until the handle is dropped.
    ///
    /// Must not be called from inside a sink or hook of this same logger.
    pub fn attach_sink<S: Sink + 'static>(&self, sink: S) -> SinkHandle {
        self.attach_boxed(Box::new(sink))
    }

    pub fn attach_boxed(&self, sink: Box<dyn Sink>) -> SinkHandle {
        SinkHandle::new(self.sinks.add(sink))
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Register a hook called with `(line, level)` for every dispatched line.
    #[must_use = "dropping the token immediately unregisters the hook"]
    pub fn on_log<F>(&self, hook: F) -> CallbackToken
    where
        F: Fn(&str, LogLevel) + Send + Sync + 'static,
    {
        self.hooks.add(Box::new(hook))
    }

    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    // --- dispatch ------------------------------------------------------

    /// Whether a message at `level` on `channel` would be dispatched.
    #[inline]
    pub fn is_enabled(&self, level: LogLevel, channel: ChannelFlags) -> bool {
        level >= self.min_level() && channel.passes(self.channels())
    }

    /// Render `text` exactly as sinks would see it, without dispatching.
    pub fn format_only(&self, level: LogLevel, text: &str) -> String {
        let format = self.line_format();
        format.render(level, text)
    }

    /// Log on the broadcast channel.
    pub fn log(&self, level: LogLevel, text: impl AsRef<str>) {
        self.log_channel(level, ChannelFlags::BROADCAST, text);
    }

    pub fn log_channel(
        &self,
        level: LogLevel,
        channel: impl Into<ChannelFlags>,
        text: impl AsRef<str>,
    ) {
        if !self.is_enabled(level, channel.into()) {
            self.metrics.record_filtered();
            return;
        }
        self.dispatch(level, text.as_ref());
    }

    fn dispatch(&self, level: LogLevel, text: &str) {
        let line = self.format_only(level, text);
        self.metrics.record_dispatched();

        self.sinks.for_each(|sink| {
            if !isolate(sink.name(), || sink.receive(level, &line)) {
                self.metrics.record_sink_failure();
            }
        });
        self.hooks.for_each(|hook| {
            if !isolate("on_log hook", || hook(&line, level)) {
                self.metrics.record_sink_failure();
            }
        });
        self.streams.write_line(self.console_target(level), &line);
    }

    #[inline]
    pub fn debug(&self, text: impl AsRef<str>) {
        self.log(LogLevel::Debug, text);
    }

    #[inline]
    pub fn info(&self, text: impl AsRef<str>) {
        self.log(LogLevel::Info, text);
    }

    #[inline]
    pub fn warn(&self, text: impl AsRef<str>) {
        self.log(LogLevel::Warn, text);
    }

    #[inline]
    pub fn error(&self, text: impl AsRef<str>) {
        self.log(LogLevel::Error, text);
    }

    /// Get the logger metrics for detailed observability
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("min_level", &self.min_level())
            .field("channels", &self.channels())
            .field("format", &self.format())
            .field("sinks", &self.sink_count())
            .field("hooks", &self.hook_count())
            .finish()
    }
}

static GLOBAL: LazyLock<Logger> = LazyLock::new(Logger::new);

/// The process-wide logger used by the free functions and the macros.
pub fn logger() -> &'static Logger {
    &GLOBAL
}

/// Log `text` through the process-wide logger.
pub fn log(level: LogLevel, text: impl AsRef<str>) {
    logger().log(level, text);
}

/// Log `text` on `channel` through the process-wide logger.
pub fn log_channel(level: LogLevel, channel: impl Into<ChannelFlags>, text: impl AsRef<str>) {
    logger().log_channel(level, channel, text);
}

/// Render `text` with the process-wide logger's format.
pub fn format_only(level: LogLevel, text: &str) -> String {
    logger().format_only(level, text)
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use sinklog::prelude::*;
///
/// let logger = Logger::builder()
///     .min_level(LogLevel::Debug)
///     .channels(0b0000_0011u8)
///     .console_target(LogLevel::Warn, ConsoleTarget::Stderr)
///     .build();
/// assert_eq!(logger.channels().bits(), 0b0000_0011);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LoggerBuilder {
    config: LoggerConfig,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.config.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn format(mut self, template: impl Into<String>) -> Self {
        self.config.format = template.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn channels(mut self, channels: impl Into<ChannelFlags>) -> Self {
        self.config.channels = channels.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn console_target(mut self, level: LogLevel, target: ConsoleTarget) -> Self {
        self.config.console.set(level, target);
        self
    }

    /// Suppress console output for every level
    #[must_use = "builder methods return a new value"]
    pub fn without_console(mut self) -> Self {
        self.config.console = ConsoleRouting::uniform(ConsoleTarget::None);
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        Logger::from_config(&self.config)
    }
}
