//! Media Organizer - date-based photo and video organization tool
//!
//! Binary entry point: argument parsing, log setup, progress rendering.
//! The pipeline itself only emits events; everything terminal-facing
//! lives here.

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use crossbeam_channel::Receiver;
use crossterm::{
    ExecutableCommand,
    cursor::MoveToColumn,
    style::{Print, Stylize},
    terminal::{Clear, ClearType},
};
use media_organizer::{Cli, Config, Pipeline, ProgressEvent, ProgressState, RunStats};
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use tracing::{Level, error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = cli.log.clone().unwrap_or_else(default_log_path);
    let _guard = setup_logging(&cli, &log_path)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Media organizer starting"
    );

    let config = load_config(&cli)?;
    validate_config(&config)?;
    info!(
        source = %config.source_dir.display(),
        dest = %config.output_dir.display(),
        workers = config.workers,
        "Configuration loaded"
    );

    // The renderer is a plain subscriber of the event channel; the
    // pipeline never talks to the terminal directly.
    let (events_tx, events_rx) = crossbeam_channel::unbounded();
    let quiet = cli.quiet;
    let renderer = std::thread::spawn(move || render_progress(events_rx, quiet));

    let pipeline = Pipeline::new(config);
    let result = pipeline.run(&events_tx);
    drop(events_tx);
    let _ = renderer.join();

    match result {
        Ok(stats) => {
            if !quiet {
                print_summary(&stats, &log_path);
            }
            info!(log_file = %log_path.display(), "Processing complete");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Processing failed");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Default log file path: logs/media-organizer-<timestamp>.log
fn default_log_path() -> PathBuf {
    let timestamp = Local::now().format("%Y-%m-%d-%H-%M-%S");
    PathBuf::from("logs").join(format!("media-organizer-{timestamp}.log"))
}

/// Load configuration from file and/or CLI arguments
fn load_config(cli: &Cli) -> Result<Config> {
    let config = if let Some(ref config_path) = cli.config {
        info!(config_file = %config_path.display(), "Loading configuration from file");
        let file_config = Config::load_from_file(config_path)?;
        cli.merge_with_config(file_config)
    } else {
        cli.to_config()
    };

    if config.source_dir.as_os_str().is_empty() {
        anyhow::bail!("Source directory is required (--source or config file)");
    }
    if cli.config.is_none() && cli.dest.is_none() {
        anyhow::bail!("Destination directory is required (--dest or config file)");
    }

    Ok(config)
}

/// Validate configuration before processing
fn validate_config(config: &Config) -> Result<()> {
    if !config.source_dir.is_dir() {
        anyhow::bail!(
            "Source directory does not exist: {}",
            config.source_dir.display()
        );
    }

    if config.output_dir.starts_with(&config.source_dir) {
        anyhow::bail!(
            "Destination {} is inside source {}",
            config.output_dir.display(),
            config.source_dir.display()
        );
    }

    Ok(())
}

/// Setup logging: file always, stderr unless quiet
fn setup_logging(cli: &Cli, log_path: &Path) -> Result<Option<WorkerGuard>> {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_ansi(false).with_writer(non_blocking));

    if cli.quiet {
        subscriber.init();
    } else {
        subscriber
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(Some(guard))
}

/// Consume pipeline events and keep a single progress line updated
fn render_progress(events: Receiver<ProgressEvent>, quiet: bool) {
    let mut state = ProgressState::default();

    for event in events {
        state.apply(event);
        if quiet {
            continue;
        }

        let _ = stdout().execute(Clear(ClearType::CurrentLine));
        let _ = stdout().execute(MoveToColumn(0));

        if let Some(ref err) = state.error {
            let _ = stdout().execute(Print(format!("{} {err}\n", "✗".red().bold())));
        } else if state.done {
            let _ = stdout().execute(Print(format!(
                "{} {}/{} files processed\n",
                "✓".green().bold(),
                state.current,
                state.total
            )));
        } else {
            let file = state
                .current_file
                .as_deref()
                .and_then(Path::file_name)
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let _ = stdout().execute(Print(format!(
                "[{}/{}] {}",
                state.current, state.total, file
            )));
        }
    }
}

/// Print the end-of-run summary
fn print_summary(stats: &RunStats, log_path: &Path) {
    let copied = stats.copied.load(Ordering::Relaxed);
    let skipped = stats.skipped.load(Ordering::Relaxed);
    let failed = stats.failed.load(Ordering::Relaxed);

    let _ = stdout().execute(Print(format!(
        "  {}: {}\n",
        "Copied".dark_grey(),
        copied.to_string().green().bold()
    )));
    let _ = stdout().execute(Print(format!(
        "  {}: {}\n",
        "Skipped".dark_grey(),
        skipped.to_string().yellow().bold()
    )));
    let _ = stdout().execute(Print(format!(
        "  {}: {}\n",
        "Failed".dark_grey(),
        failed.to_string().red().bold()
    )));
    let _ = stdout().execute(Print(format!(
        "  {}: {}\n",
        "Log".dark_grey(),
        log_path.display()
    )));
}
