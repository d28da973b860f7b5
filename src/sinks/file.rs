//! Asynchronous file sink
//!
//! Lines are queued by the logging thread and written by a dedicated worker
//! thread, so `receive` never waits on the disk. Attaching moves any existing
//! file at the target path aside (`app.log` → `app.log.bak`) and starts from
//! an empty file.

use crate::core::{
    FileSinkMetrics, LogLevel, Logger, LoggerError, Result, Sink, SinkHandle,
};
use parking_lot::{Condvar, Mutex};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Suffix appended to the previous log file's name on attach
pub const DEFAULT_BACKUP_SUFFIX: &str = ".bak";

#[derive(Debug, Default)]
struct Pending {
    lines: Vec<String>,
    stop: bool,
}

#[derive(Debug, Default)]
struct Shared {
    pending: Mutex<Pending>,
    wakeup: Condvar,
    metrics: FileSinkMetrics,
}

impl Shared {
    /// Queue `line` unless `max_pending` lines are already waiting.
    fn push(&self, line: &str, max_pending: Option<usize>) -> bool {
        let mut pending = self.pending.lock();
        if max_pending.is_some_and(|max| pending.lines.len() >= max) {
            return false;
        }
        pending.lines.push(line.to_string());
        true
    }
}

/// A sink writing each line to a file from a background thread.
///
/// # Example
///
/// ```no_run
/// use sinklog::prelude::*;
///
/// # fn main() -> sinklog::Result<()> {
/// let logger = Logger::new();
/// let file = FileSink::builder("app.log")
///     .min_level(LogLevel::Info)
///     .attach(&logger)?;
///
/// logger.info("written to app.log");
/// println!("previous log kept at {:?}", file.backed_up_path());
/// drop(file); // joins the worker after the queue is drained
/// # Ok(())
/// # }
/// ```
pub struct FileSink {
    path: PathBuf,
    backup_path: Option<PathBuf>,
    min_level: LogLevel,
    max_pending: Option<usize>,
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl FileSink {
    pub fn builder(path: impl Into<PathBuf>) -> FileSinkBuilder {
        FileSinkBuilder::new(path)
    }

    /// Attach a file sink with the default backup suffix and the logger's
    /// current minimum level.
    pub fn attach(logger: &Logger, path: impl Into<PathBuf>) -> Result<FileSinkHandle> {
        Self::builder(path).attach(logger)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where the file previously at [`path`](Self::path) was moved, if there was one.
    pub fn backed_up_path(&self) -> Option<&Path> {
        self.backup_path.as_deref()
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    pub fn metrics(&self) -> &FileSinkMetrics {
        &self.shared.metrics
    }

    fn spawn(
        path: PathBuf,
        backup_path: Option<PathBuf>,
        min_level: LogLevel,
        max_pending: Option<usize>,
    ) -> Result<Self> {
        let shared = Arc::new(Shared::default());
        let worker_shared = Arc::clone(&shared);
        let worker_path = path.clone();
        let worker = thread::Builder::new()
            .name("sinklog-file".to_string())
            .spawn(move || run_worker(&worker_path, &worker_shared))
            .map_err(|e| {
                LoggerError::io_operation(
                    "starting file sink worker",
                    format!("cannot spawn writer for {}", path.display()),
                    e,
                )
            })?;

        Ok(Self {
            path,
            backup_path,
            min_level,
            max_pending,
            shared,
            worker: Some(worker),
        })
    }
}

impl Sink for FileSink {
    fn receive(&self, level: LogLevel, line: &str) {
        if level < self.min_level {
            return;
        }
        if self.shared.push(line, self.max_pending) {
            self.shared.metrics.record_queued();
            self.shared.wakeup.notify_one();
        } else {
            self.shared.metrics.record_dropped(1);
        }
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        self.shared.pending.lock().stop = true;
        self.shared.wakeup.notify_one();

        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                eprintln!(
                    "[LOGGER ERROR] File sink worker for {} panicked",
                    self.path.display()
                );
            }
        }
    }
}

/// Drain the queue into the file until asked to stop with nothing pending.
fn run_worker(path: &Path, shared: &Shared) {
    loop {
        let batch = {
            let mut pending = shared.pending.lock();
            while pending.lines.is_empty() && !pending.stop {
                shared.wakeup.wait(&mut pending);
            }
            if pending.lines.is_empty() {
                // stop raised and nothing left to write
                return;
            }
            std::mem::take(&mut pending.lines)
        };

        match append_lines(path, &batch) {
            Ok(()) => shared.metrics.record_written(batch.len()),
            Err(_) => {
                // Best effort: the batch is lost, the next one tries again.
                shared.metrics.record_write_failure();
                shared.metrics.record_dropped(batch.len());
            }
        }
    }
}

fn append_lines(path: &Path, lines: &[String]) -> std::io::Result<()> {
    let file = OpenOptions::new().append(true).create(true).open(path)?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

/// Move an existing file at `path` to `path + suffix`.
///
/// Returns the backup location, or `None` if there was nothing to move.
fn make_backup(path: &Path, suffix: &str) -> Result<Option<PathBuf>> {
    if !path.exists() {
        return Ok(None);
    }

    let mut backup = OsString::from(path.as_os_str());
    backup.push(suffix);
    let backup = PathBuf::from(backup);

    fs::rename(path, &backup).map_err(|e| {
        LoggerError::backup(
            path.display().to_string(),
            format!("cannot rename to {}: {}", backup.display(), e),
        )
    })?;
    if path.exists() || !backup.exists() {
        return Err(LoggerError::backup(
            path.display().to_string(),
            format!("rename to {} did not take effect", backup.display()),
        ));
    }
    Ok(Some(backup))
}

/// Builder for [`FileSink`]
#[derive(Debug, Clone)]
pub struct FileSinkBuilder {
    path: PathBuf,
    backup_suffix: String,
    min_level: Option<LogLevel>,
    max_pending: Option<usize>,
}

impl FileSinkBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            backup_suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
            min_level: None,
            max_pending: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn backup_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.backup_suffix = suffix.into();
        self
    }

    /// Minimum level for this sink; defaults to the logger's level at attach time.
    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = Some(level);
        self
    }

    /// Bound the pending queue; lines arriving while it is full are dropped.
    #[must_use = "builder methods return a new value"]
    pub fn max_pending(mut self, max: usize) -> Self {
        self.max_pending = Some(max);
        self
    }

    /// Back up any existing file, truncate the target, start the worker and
    /// register the sink with `logger`.
    pub fn attach(self, logger: &Logger) -> Result<FileSinkHandle> {
        if self.backup_suffix.is_empty() {
            return Err(LoggerError::config(
                "FileSink",
                "backup suffix must not be empty",
            ));
        }
        if self.max_pending == Some(0) {
            return Err(LoggerError::config(
                "FileSink",
                "max_pending must be greater than zero",
            ));
        }

        let min_level = self.min_level.unwrap_or_else(|| logger.min_level());
        let backup_path = make_backup(&self.path, &self.backup_suffix)?;

        File::create(&self.path).map_err(|e| {
            LoggerError::file_sink(self.path.display().to_string(), format!("not writable: {}", e))
        })?;

        let sink = Arc::new(FileSink::spawn(
            self.path,
            backup_path,
            min_level,
            self.max_pending,
        )?);
        let handle = logger.attach_sink(Registered(Arc::clone(&sink)));
        Ok(FileSinkHandle { handle, sink })
    }
}

/// The logger's reference to an attached file sink.
struct Registered(Arc<FileSink>);

impl Sink for Registered {
    fn receive(&self, level: LogLevel, line: &str) {
        self.0.receive(level, line);
    }

    fn name(&self) -> &str {
        self.0.name()
    }
}

/// Ownership token for an attached [`FileSink`].
///
/// Dereferences to the sink for its accessors. Dropping the handle detaches
/// the sink, then waits for the worker to write out every queued line.
#[must_use = "dropping the handle immediately detaches the sink"]
pub struct FileSinkHandle {
    // Field order matters: unregister first, then release the last reference.
    handle: SinkHandle,
    sink: Arc<FileSink>,
}

impl FileSinkHandle {
    pub fn id(&self) -> u64 {
        self.handle.id()
    }

    /// Detach now, blocking until the file is up to date.
    pub fn detach(self) {}
}

impl Deref for FileSinkHandle {
    type Target = FileSink;

    fn deref(&self) -> &FileSink {
        &self.sink
    }
}

impl std::fmt::Debug for FileSinkHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSinkHandle")
            .field("id", &self.handle.id())
            .field("path", &self.sink.path)
            .field("backup_path", &self.sink.backup_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn quiet_logger() -> Logger {
        Logger::builder()
            .min_level(LogLevel::Debug)
            .format("{message}")
            .without_console()
            .build()
    }

    #[test]
    fn test_attach_creates_empty_file_without_backup() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("fresh.log");
        let logger = quiet_logger();

        let file = FileSink::attach(&logger, &path).expect("Failed to attach");
        assert_eq!(file.path(), path.as_path());
        assert!(file.backed_up_path().is_none());
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
        assert_eq!(logger.sink_count(), 1);
    }

    #[test]
    fn test_attach_backs_up_existing_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("app.log");
        fs::write(&path, "old contents\n").unwrap();
        let logger = quiet_logger();

        let file = FileSink::builder(&path)
            .backup_suffix(".old")
            .attach(&logger)
            .expect("Failed to attach");

        let backup = dir.path().join("app.log.old");
        assert_eq!(file.backed_up_path(), Some(backup.as_path()));
        assert_eq!(fs::read_to_string(&backup).unwrap(), "old contents\n");
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_lines_written_in_order_after_detach() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("ordered.log");
        let logger = quiet_logger();
        let file = FileSink::attach(&logger, &path).expect("Failed to attach");

        for i in 0..100 {
            logger.info(format!("line {i}"));
        }
        file.detach();
        assert_eq!(logger.sink_count(), 0);

        let expected: String = (0..100).map(|i| format!("line {i}\n")).collect();
        assert_eq!(fs::read_to_string(&path).unwrap(), expected);
    }

    #[test]
    fn test_per_sink_min_level() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("warn.log");
        let logger = quiet_logger();
        let file = FileSink::builder(&path)
            .min_level(LogLevel::Warn)
            .attach(&logger)
            .expect("Failed to attach");
        assert_eq!(file.min_level(), LogLevel::Warn);

        logger.info("skipped");
        logger.warn("kept");
        logger.error("also kept");
        drop(file);

        assert_eq!(fs::read_to_string(&path).unwrap(), "kept\nalso kept\n");
    }

    #[test]
    fn test_min_level_defaults_to_logger_level() {
        let dir = tempdir().expect("Failed to create temp dir");
        let logger = quiet_logger();
        logger.set_min_level(LogLevel::Error);
        let file = FileSink::attach(&logger, dir.path().join("a.log")).expect("Failed to attach");
        assert_eq!(file.min_level(), LogLevel::Error);
    }

    #[test]
    fn test_attach_fails_for_unwritable_path() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("missing").join("nested.log");
        let logger = quiet_logger();

        let err = FileSink::attach(&logger, &path).unwrap_err();
        assert!(matches!(err, LoggerError::FileSinkError { .. }));
        assert_eq!(logger.sink_count(), 0);
    }

    #[test]
    fn test_rejects_invalid_builder_settings() {
        let dir = tempdir().expect("Failed to create temp dir");
        let logger = quiet_logger();
        let path = dir.path().join("x.log");

        let err = FileSink::builder(&path).backup_suffix("").attach(&logger).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = FileSink::builder(&path).max_pending(0).attach(&logger).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_bounded_queue_drops_newest() {
        let shared = Shared::default();
        assert!(shared.push("a", Some(2)));
        assert!(shared.push("b", Some(2)));
        assert!(!shared.push("c", Some(2)));
        assert_eq!(shared.pending.lock().lines, vec!["a", "b"]);

        let unbounded = Shared::default();
        assert!((0..1000).all(|i| unbounded.push(&i.to_string(), None)));
    }

    #[test]
    fn test_worker_drains_queue_before_stopping() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("drain.log");
        let shared = Arc::new(Shared::default());
        {
            let mut pending = shared.pending.lock();
            pending.lines.extend(["x".to_string(), "y".to_string()]);
            pending.stop = true;
        }

        let worker_shared = Arc::clone(&shared);
        let worker_path = path.clone();
        thread::spawn(move || run_worker(&worker_path, &worker_shared))
            .join()
            .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "x\ny\n");
        assert_eq!(shared.metrics.written(), 2);
    }

    #[test]
    fn test_failed_write_drops_batch() {
        let dir = tempdir().expect("Failed to create temp dir");
        let shared = Shared::default();
        {
            let mut pending = shared.pending.lock();
            pending.lines.push("lost".to_string());
            pending.stop = true;
        }

        // A directory cannot be opened for appending.
        run_worker(dir.path(), &shared);
        assert_eq!(shared.metrics.write_failures(), 1);
        assert_eq!(shared.metrics.dropped(), 1);
        assert!(shared.pending.lock().lines.is_empty());
    }

    #[test]
    fn test_metrics_count_written_lines() {
        let dir = tempdir().expect("Failed to create temp dir");
        let logger = quiet_logger();
        let file = FileSink::attach(&logger, dir.path().join("m.log")).expect("Failed to attach");
        logger.info("one");
        logger.info("two");

        let shared = Arc::clone(&file.sink.shared);
        drop(file);
        assert_eq!(shared.metrics.queued(), 2);
        assert_eq!(shared.metrics.written(), 2);
        assert_eq!(shared.metrics.dropped(), 0);
    }
}
