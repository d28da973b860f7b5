//! Sink implementations

pub mod file;

pub use file::{FileSink, FileSinkBuilder, FileSinkHandle, DEFAULT_BACKUP_SUFFIX};

// Re-export the trait for convenience
pub use crate::core::Sink;
