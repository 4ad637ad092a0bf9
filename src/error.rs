use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Callback that receives a human-readable description of every internal
/// failure. It is cloned out of the logger before being invoked, so it runs
/// without any logger lock held.
pub type ErrorHandler = Arc<dyn Fn(&str) + Send + Sync + 'static>;

/// Failures the engine reports through its error channel.
///
/// None of these ever escape a logging call. They are collected while the
/// engine holds its lock and handed to the error handler afterwards.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to create log directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to open log file {path}: {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("failed to reopen log file {path}: {source}")]
    Reopen { path: PathBuf, source: io::Error },

    #[error("failed to write to log file {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to flush log file {path}: {source}")]
    Flush { path: PathBuf, source: io::Error },

    #[error("failed to inspect log file {path}: {source}")]
    Inspect { path: PathBuf, source: io::Error },

    #[error("failed to list log directory {path}: {source}")]
    ListDir { path: PathBuf, source: io::Error },

    #[error("failed to delete old log file {path}: {source}")]
    Delete { path: PathBuf, source: io::Error },
}

impl LogError {
    /// The file or directory the failed operation was working on.
    pub fn path(&self) -> &PathBuf {
        match self {
            LogError::CreateDir { path, .. }
            | LogError::Open { path, .. }
            | LogError::Reopen { path, .. }
            | LogError::Write { path, .. }
            | LogError::Flush { path, .. }
            | LogError::Inspect { path, .. }
            | LogError::ListDir { path, .. }
            | LogError::Delete { path, .. } => path,
        }
    }
}
