//! Media Organizer - a CLI tool for date-based media organization
//!
//! This library scans a source tree for photos and videos and copies
//! them into a destination tree organized by media type and capture
//! date:
//! - EXIF metadata extraction for images, with file system fallback
//! - Skip-set pruning of directories by base name
//! - A bounded work queue feeding a fixed pool of workers
//! - Idempotent copies (existing destinations are skipped, not touched)
//! - Progress events for an external presentation layer

pub mod cli;
pub mod config;
pub mod copy;
pub mod error;
pub mod metadata;
pub mod pipeline;
pub mod planner;
pub mod progress;
pub mod scanner;

pub use cli::Cli;
pub use config::{Config, ConfigError, DateGranularity};
pub use copy::CopyOutcome;
pub use error::{Error, Result};
pub use metadata::FileMetadata;
pub use pipeline::{Pipeline, RunStats};
pub use progress::{ProgressEvent, ProgressState};
