//! Error types for hexflash
//!
//! This module defines all error types used throughout the application,
//! providing detailed error information for diagnostics and user feedback.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for hexflash operations
#[derive(Error, Debug)]
pub enum HexflashError {
    /// I/O error during file operations
    #[error("I/O error at '{path}': {source}")]
    Io {
        /// Path the operation was touching
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// File or directory not found
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failed to establish the directory watch
    #[error("Cannot watch '{path}': {source}")]
    Watch {
        /// Directory the watch was requested on
        path: PathBuf,
        /// Error from the watch backend
        #[source]
        source: notify::Error,
    },

    /// Watch backend error
    #[error("Watcher error: {0}")]
    Notify(#[from] notify::Error),

    /// Operation cancelled
    #[error("Operation cancelled")]
    Cancelled,

    /// Background worker failed to complete
    #[error("Worker task failed: {0}")]
    TaskJoin(String),
}

impl HexflashError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this error is a permission issue
    pub fn is_permission_error(&self) -> bool {
        match self {
            Self::Io { source, .. } => source.kind() == std::io::ErrorKind::PermissionDenied,
            _ => false,
        }
    }

    /// Get the path associated with this error, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } | Self::NotFound(path) | Self::Watch { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Result type alias for hexflash operations
pub type Result<T> = std::result::Result<T, HexflashError>;

impl From<std::io::Error> for HexflashError {
    fn from(err: std::io::Error) -> Self {
        HexflashError::Io {
            path: PathBuf::new(),
            source: err,
        }
    }
}

/// Extension trait for adding path context to std::io::Result
pub trait IoResultExt<T> {
    /// Add path context to an I/O error
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| HexflashError::io(path, e))
    }
}
