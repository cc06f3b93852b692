//! Error types for the media organizer

use std::path::PathBuf;
use thiserror::Error;
use tracing::Level;

/// Result type alias for media organizer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the media organizer
///
/// Per-file failures carry the offending path and the underlying I/O
/// cause so the worker that catches them can log something actionable.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Cannot access {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read metadata from {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy {path}: {source}")]
    Copy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported media format: {path}")]
    InvalidFormat { path: PathBuf },

    #[error("Directory traversal error: {0}")]
    Walk(#[from] walkdir::Error),
}

impl Error {
    /// Log severity for this error when caught at the worker level
    ///
    /// Access and copy failures mean data did not land where it should.
    /// A metadata failure only degrades the destination bucket, and a
    /// rejected format is routine noise.
    pub fn severity(&self) -> Level {
        match self {
            Error::FileAccess { .. } | Error::Copy { .. } => Level::ERROR,
            Error::Metadata { .. } => Level::WARN,
            Error::InvalidFormat { .. } => Level::DEBUG,
            Error::Walk(_) => Level::ERROR,
        }
    }
}
