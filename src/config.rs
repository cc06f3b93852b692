//! Configuration types for the media organizer

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Default number of concurrent workers
pub const DEFAULT_WORKERS: usize = 4;

/// Default depth of the bounded work queue
pub const DEFAULT_QUEUE_DEPTH: usize = 100;

/// Date bucketing granularity below the Photos/Videos split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DateGranularity {
    /// Bucket by year and month: YYYY/MM/
    #[default]
    Month,
    /// Bucket by year, month and day: YYYY/MM/DD/
    Day,
}

/// Configuration for the media organizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Source directory to scan for media files
    pub source_dir: PathBuf,

    /// Destination directory for organized files
    pub output_dir: PathBuf,

    /// Directory base names to skip entirely (the whole subtree is pruned)
    #[serde(default = "default_skip_dirs")]
    pub skip_dirs: HashSet<String>,

    /// Number of concurrent workers
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Depth of the bounded work queue between traversal and workers
    #[serde(default = "default_queue_depth")]
    pub queue_depth: usize,

    /// Date bucketing granularity
    #[serde(default)]
    pub granularity: DateGranularity,

    /// Supported image extensions
    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,

    /// Supported video extensions
    #[serde(default = "default_video_extensions")]
    pub video_extensions: Vec<String>,
}

fn default_skip_dirs() -> HashSet<String> {
    // Synology thumbnail directories are the classic offender
    HashSet::from(["@eaDir".to_string()])
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

fn default_queue_depth() -> usize {
    DEFAULT_QUEUE_DEPTH
}

fn default_image_extensions() -> Vec<String> {
    vec![
        "jpg".into(),
        "jpeg".into(),
        "png".into(),
        "raw".into(),
        "cr2".into(),
        "nef".into(),
        "arw".into(),
    ]
}

fn default_video_extensions() -> Vec<String> {
    vec![
        "mp4".into(),
        "mov".into(),
        "avi".into(),
        "mkv".into(),
        "wmv".into(),
        "flv".into(),
        "m4v".into(),
        "3gp".into(),
        "webm".into(),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::new(),
            output_dir: PathBuf::from("output"),
            skip_dirs: default_skip_dirs(),
            workers: default_workers(),
            queue_depth: default_queue_depth(),
            granularity: DateGranularity::default(),
            image_extensions: default_image_extensions(),
            video_extensions: default_video_extensions(),
        }
    }
}

impl Config {
    /// Check if a file extension is a supported image format
    pub fn is_image(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.image_extensions.iter().any(|e| e == &ext_lower)
    }

    /// Check if a file extension is a supported video format
    pub fn is_video(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.video_extensions.iter().any(|e| e == &ext_lower)
    }

    /// Check if a file extension is supported at all
    pub fn is_media(&self, ext: &str) -> bool {
        self.is_image(ext) || self.is_video(ext)
    }

    /// Check if a directory base name is in the skip set
    pub fn should_skip_dir(&self, name: &str) -> bool {
        self.skip_dirs.contains(name)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(config)
    }
}

/// Errors that can occur when loading configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read configuration file
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse configuration file
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError { path, source } => {
                write!(f, "Failed to read config file '{}': {}", path.display(), source)
            }
            ConfigError::ParseError { path, source } => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ReadError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_extensions() {
        let config = Config::default();
        assert!(config.is_image("jpg"));
        assert!(config.is_image("JPG"));
        assert!(config.is_image("nef"));
        assert!(config.is_video("mov"));
        assert!(config.is_video("WEBM"));
        assert!(!config.is_media("txt"));
        assert!(!config.is_media(""));
    }

    #[test]
    fn test_default_skip_set() {
        let config = Config::default();
        assert!(config.should_skip_dir("@eaDir"));
        assert!(!config.should_skip_dir("Photos"));
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.workers, 4);
        assert_eq!(config.queue_depth, 100);
        assert_eq!(config.granularity, DateGranularity::Month);
    }

    #[test]
    fn test_load_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
source_dir = "/media/import"
output_dir = "/media/library"
skip_dirs = ["@eaDir", ".thumbnails"]
workers = 8
granularity = "day"
"#,
        )
        .unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.source_dir, PathBuf::from("/media/import"));
        assert_eq!(config.workers, 8);
        assert_eq!(config.queue_depth, 100);
        assert_eq!(config.granularity, DateGranularity::Day);
        assert!(config.should_skip_dir(".thumbnails"));
        assert!(config.is_image("jpg"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load_from_file("/nonexistent/config.toml");
        assert!(matches!(err, Err(ConfigError::ReadError { .. })));
    }
}
