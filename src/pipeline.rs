//! Concurrent processing pipeline
//!
//! One traversal producer feeds a bounded queue; a fixed pool of
//! workers drains it, each running resolve -> plan -> copy per file.
//! Workers only ever coordinate through the queue, a shared processed
//! counter and the progress event channel.

use crate::config::Config;
use crate::copy::{self, CopyOutcome};
use crate::error::{Error, Result};
use crate::metadata;
use crate::planner;
use crate::progress::ProgressEvent;
use crate::scanner;
use crossbeam_channel::{Receiver, Sender};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use tracing::{Level, debug, error, info, warn};

/// Counters for a single run
#[derive(Debug, Default)]
pub struct RunStats {
    pub total: AtomicUsize,
    pub copied: AtomicUsize,
    pub skipped: AtomicUsize,
    pub failed: AtomicUsize,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary(&self) -> String {
        format!(
            "Total: {}, Copied: {}, Skipped: {}, Failed: {}",
            self.total.load(Ordering::Relaxed),
            self.copied.load(Ordering::Relaxed),
            self.skipped.load(Ordering::Relaxed),
            self.failed.load(Ordering::Relaxed)
        )
    }
}

/// The organizing pipeline
pub struct Pipeline {
    config: Config,
    stats: Arc<RunStats>,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            stats: Arc::new(RunStats::new()),
        }
    }

    /// Shared handle to the run counters
    pub fn stats(&self) -> Arc<RunStats> {
        Arc::clone(&self.stats)
    }

    /// Run the pipeline to completion
    ///
    /// Counts eligible files first so the progress total is fixed, then
    /// streams paths to the worker pool. Per-file failures are logged
    /// and counted but never stop the pool; a traversal failure closes
    /// the queue, lets in-flight work finish, and supersedes the normal
    /// `Done` event with `Error`.
    pub fn run(&self, events: &Sender<ProgressEvent>) -> Result<Arc<RunStats>> {
        std::fs::create_dir_all(&self.config.output_dir).map_err(|e| Error::FileAccess {
            path: self.config.output_dir.clone(),
            source: e,
        })?;

        info!(source = %self.config.source_dir.display(), "Counting media files");
        let total = match scanner::count(&self.config) {
            Ok(total) => total,
            Err(e) => {
                let _ = events.send(ProgressEvent::Error(e.to_string()));
                return Err(e);
            }
        };
        self.stats.total.store(total, Ordering::Relaxed);
        info!(total, "Found media files");

        let (work_tx, work_rx) = crossbeam_channel::bounded::<PathBuf>(self.config.queue_depth);
        let counter = AtomicUsize::new(0);

        let traversal = thread::scope(|scope| {
            for worker_id in 0..self.config.workers.max(1) {
                let work_rx = work_rx.clone();
                let events = events.clone();
                let counter = &counter;
                scope.spawn(move || {
                    worker_loop(worker_id, &self.config, &self.stats, work_rx, events, counter, total)
                });
            }
            drop(work_rx);

            let result = scanner::stream(&self.config, &work_tx);
            // Close the queue so workers drain and exit
            drop(work_tx);
            result
        });

        match traversal {
            Ok(()) => {
                info!("{}", self.stats.summary());
                let _ = events.send(ProgressEvent::Done);
                Ok(Arc::clone(&self.stats))
            }
            Err(e) => {
                error!(error = %e, "Traversal failed, aborting run");
                let _ = events.send(ProgressEvent::Error(e.to_string()));
                Err(e)
            }
        }
    }
}

/// Worker body: pull paths until the queue is closed and drained
fn worker_loop(
    worker_id: usize,
    config: &Config,
    stats: &RunStats,
    work_rx: Receiver<PathBuf>,
    events: Sender<ProgressEvent>,
    counter: &AtomicUsize,
    total: usize,
) {
    debug!(worker_id, "Worker started");

    for path in work_rx {
        match process_file(&path, config) {
            Ok(outcome) => {
                match outcome {
                    CopyOutcome::Copied => stats.copied.fetch_add(1, Ordering::Relaxed),
                    CopyOutcome::Skipped => stats.skipped.fetch_add(1, Ordering::Relaxed),
                };
                let current = counter.fetch_add(1, Ordering::Relaxed) + 1;
                let _ = events.send(ProgressEvent::Progress {
                    current,
                    total,
                    file: path,
                });
            }
            Err(e) => {
                stats.failed.fetch_add(1, Ordering::Relaxed);
                log_failure(&path, &e);
            }
        }
    }

    debug!(worker_id, "Worker finished");
}

/// Log a per-file failure at the severity its kind calls for
fn log_failure(path: &Path, err: &Error) {
    match err.severity() {
        Level::WARN => warn!(path = %path.display(), error = %err, "File failed"),
        Level::DEBUG => debug!(path = %path.display(), error = %err, "File rejected"),
        _ => error!(path = %path.display(), error = ?err, "File failed"),
    }
}

/// Resolve, plan and copy a single file
fn process_file(path: &Path, config: &Config) -> Result<CopyOutcome> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    if !config.is_media(ext) {
        return Err(Error::InvalidFormat {
            path: path.to_path_buf(),
        });
    }

    let meta = metadata::resolve(path, config)?;
    let dest_dir = planner::plan(
        &meta.timestamp,
        meta.is_video,
        &config.output_dir,
        config.granularity,
    );
    let outcome = copy::copy(path, &dest_dir)?;

    if outcome == CopyOutcome::Copied {
        info!(
            source = %path.display(),
            dest = %dest_dir.display(),
            is_video = meta.is_video,
            "Processed file"
        );
    }

    Ok(outcome)
}
