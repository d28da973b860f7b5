//! Logger metrics for observability
//!
//! Delivery is best effort, so failures are never reported to callers. These
//! counters are where they show up instead.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for the dispatcher.
///
/// # Example
///
/// ```
/// use sinklog::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_dispatched();
/// metrics.record_filtered();
///
/// assert_eq!(metrics.dispatched(), 1);
/// assert_eq!(metrics.filtered(), 1);
/// ```
#[derive(Debug, Default)]
pub struct LoggerMetrics {
    /// Messages that passed the filters and were rendered
    dispatched: AtomicU64,

    /// Messages rejected by level or channel
    filtered: AtomicU64,

    /// Sink or hook invocations that panicked
    sink_failures: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            dispatched: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            sink_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dispatched(&self) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_filtered(&self) {
        self.filtered.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_sink_failure(&self) {
        self.sink_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.dispatched.store(0, Ordering::Relaxed);
        self.filtered.store(0, Ordering::Relaxed);
        self.sink_failures.store(0, Ordering::Relaxed);
    }
}

/// Counters for one file sink.
#[derive(Debug, Default)]
pub struct FileSinkMetrics {
    queued: AtomicU64,
    written: AtomicU64,
    dropped: AtomicU64,
    write_failures: AtomicU64,
}

impl FileSinkMetrics {
    pub const fn new() -> Self {
        Self {
            queued: AtomicU64::new(0),
            written: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
        }
    }

    /// Lines accepted into the pending queue
    #[inline]
    pub fn queued(&self) -> u64 {
        self.queued.load(Ordering::Relaxed)
    }

    /// Lines written to the file
    #[inline]
    pub fn written(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    /// Lines lost to a full queue or a failed write
    #[inline]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Batches whose open or write failed
    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    pub(crate) fn record_queued(&self) {
        self.queued.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_written(&self, lines: usize) {
        self.written.fetch_add(lines as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_dropped(&self, lines: usize) {
        self.dropped.fetch_add(lines as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_write_failure(&self) {
        self.write_failures.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_metrics_reset() {
        let metrics = LoggerMetrics::new();
        metrics.record_dispatched();
        metrics.record_sink_failure();
        metrics.reset();
        assert_eq!(metrics.dispatched(), 0);
        assert_eq!(metrics.sink_failures(), 0);
    }

    #[test]
    fn test_file_sink_metrics() {
        let metrics = FileSinkMetrics::new();
        metrics.record_queued();
        metrics.record_queued();
        metrics.record_written(1);
        metrics.record_dropped(1);
        metrics.record_write_failure();

        assert_eq!(metrics.queued(), 2);
        assert_eq!(metrics.written(), 1);
        assert_eq!(metrics.dropped(), 1);
        assert_eq!(metrics.write_failures(), 1);
    }
}
