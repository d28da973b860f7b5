//! Error types for the logger system
//!
//! Only configuration-time operations can fail: attaching a file sink and
//! parsing a configuration. Dispatching a log line never returns an error.

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON configuration error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Moving an existing log file out of the way failed
    #[error("Backup of '{path}' failed: {message}")]
    BackupFailed { path: String, message: String },

    /// File sink error with path
    #[error("File sink error for '{path}': {message}")]
    FileSinkError { path: String, message: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a backup error
    pub fn backup(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::BackupFailed {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a file sink error
    pub fn file_sink(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileSinkError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::backup("app.log", "rename failed");
        assert!(matches!(err, LoggerError::BackupFailed { .. }));

        let err = LoggerError::config("FileSink", "max_pending must be non-zero");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = LoggerError::file_sink("/var/log/app.log", "Permission denied");
        assert!(matches!(err, LoggerError::FileSinkError { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::backup("/var/log/app.log", "source still exists");
        assert_eq!(
            err.to_string(),
            "Backup of '/var/log/app.log' failed: source still exists"
        );

        let err = LoggerError::config("FileSink", "max_pending must be non-zero");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for FileSink: max_pending must be non-zero"
        );
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::io_operation("spawning file sink worker", "thread spawn failed", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("spawning file sink worker"));
        assert!(err.to_string().contains("thread spawn failed"));
    }
}
