//! Sink trait for log output destinations

use super::callback_list::CallbackToken;
use super::log_level::LogLevel;

/// A destination for rendered log lines.
///
/// `receive` is called synchronously on the logging thread, possibly from
/// several threads at once. It must not block on slow I/O; hand the line off
/// instead, the way [`FileSink`](crate::sinks::FileSink) does. Panics are
/// contained by the dispatcher.
///
/// `receive` may log again through the same logger. It must not attach a sink
/// to, or drop a [`SinkHandle`] of, the logger that is calling it: both wait
/// for the dispatch in progress on the calling thread and deadlock.
pub trait Sink: Send + Sync {
    fn receive(&self, level: LogLevel, line: &str);

    fn name(&self) -> &str {
        "sink"
    }
}

impl<F> Sink for F
where
    F: Fn(LogLevel, &str) + Send + Sync,
{
    fn receive(&self, level: LogLevel, line: &str) {
        self(level, line)
    }

    fn name(&self) -> &str {
        "closure"
    }
}

/// Ownership token for an attached sink.
///
/// The sink stays registered while the handle lives. Dropping the handle, or
/// calling [`SinkHandle::detach`], unregisters it and drops the sink before
/// returning.
#[must_use = "dropping the handle immediately detaches the sink"]
#[derive(Debug)]
pub struct SinkHandle {
    token: CallbackToken,
}

impl SinkHandle {
    pub(crate) fn new(token: CallbackToken) -> Self {
        Self { token }
    }

    pub fn id(&self) -> u64 {
        self.token.id()
    }

    /// Whether the logger this sink was attached to still exists.
    pub fn is_attached(&self) -> bool {
        self.token.is_live()
    }

    /// Detach the sink now; equivalent to dropping the handle.
    pub fn detach(self) {}
}
