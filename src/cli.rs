//! CLI argument parsing with clap

use crate::config::{Config, DateGranularity};
use clap::Parser;
use std::path::PathBuf;

/// Media Organizer - date-based photo and video organization tool
///
/// Scans a source directory for media files and copies them into a
/// destination tree bucketed by media type and capture date, using
/// EXIF timestamps where available.
#[derive(Parser, Debug)]
#[command(name = "media-organizer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (TOML format)
    ///
    /// When specified, settings from the config file are used as
    /// defaults. CLI arguments override config file settings.
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Source directory to scan for media files
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Destination directory for organized files
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// Directory names to skip entirely, comma separated
    #[arg(long, value_delimiter = ',')]
    pub skip: Option<Vec<String>>,

    /// Number of concurrent workers
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Depth of the work queue between traversal and workers
    #[arg(long)]
    pub queue_depth: Option<usize>,

    /// Date bucketing granularity below Photos/Videos
    #[arg(short, long, value_enum)]
    pub granularity: Option<DateGranularity>,

    /// Log file path (default: logs/media-organizer-<timestamp>.log)
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// Quiet mode, log only to file
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Merge CLI arguments with config from file
    ///
    /// CLI arguments take precedence over config file settings.
    pub fn merge_with_config(&self, mut config: Config) -> Config {
        if let Some(ref source) = self.source {
            config.source_dir = source.clone();
        }
        if let Some(ref dest) = self.dest {
            config.output_dir = dest.clone();
        }
        if let Some(ref skip) = self.skip {
            config.skip_dirs = skip.iter().map(|s| s.trim().to_string()).collect();
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(queue_depth) = self.queue_depth {
            config.queue_depth = queue_depth;
        }
        if let Some(granularity) = self.granularity {
            config.granularity = granularity;
        }

        config
    }

    /// Convert CLI arguments to Config (when no config file is used)
    pub fn to_config(&self) -> Config {
        self.merge_with_config(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config_file() {
        let cli = Cli::parse_from([
            "media-organizer",
            "--source",
            "/import",
            "--dest",
            "/library",
            "--workers",
            "8",
        ]);

        let file_config = Config {
            source_dir: PathBuf::from("/old"),
            workers: 2,
            ..Config::default()
        };

        let config = cli.merge_with_config(file_config);
        assert_eq!(config.source_dir, PathBuf::from("/import"));
        assert_eq!(config.output_dir, PathBuf::from("/library"));
        assert_eq!(config.workers, 8);
        // Untouched fields keep the file values
        assert_eq!(config.queue_depth, 100);
    }

    #[test]
    fn test_skip_list_is_comma_separated() {
        let cli = Cli::parse_from([
            "media-organizer",
            "--source",
            "/import",
            "--dest",
            "/library",
            "--skip",
            "@eaDir, .thumbnails",
        ]);

        let config = cli.to_config();
        assert!(config.should_skip_dir("@eaDir"));
        assert!(config.should_skip_dir(".thumbnails"));
        assert!(!config.should_skip_dir("Photos"));
    }

    #[test]
    fn test_defaults_without_flags() {
        let cli = Cli::parse_from(["media-organizer"]);
        let config = cli.to_config();
        assert_eq!(config.workers, 4);
        assert!(config.should_skip_dir("@eaDir"));
        assert_eq!(config.granularity, DateGranularity::Month);
    }
}
