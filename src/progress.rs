//! Progress events and their aggregation
//!
//! Workers send events over a channel; a single consumer folds them
//! into a [`ProgressState`] for whatever presentation layer is
//! subscribed. The pipeline itself never touches a terminal.

use std::path::PathBuf;

/// Event emitted by the pipeline during a run
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// A file finished processing (copied or skipped)
    Progress {
        /// New value of the shared processed counter
        current: usize,
        /// Fixed total from the counting pass
        total: usize,
        /// The file that was just processed
        file: PathBuf,
    },
    /// All workers drained and exited normally
    Done,
    /// Traversal failed; the run is over
    Error(String),
}

/// Aggregated view of a run in flight
#[derive(Debug, Clone, Default)]
pub struct ProgressState {
    pub current: usize,
    pub total: usize,
    pub current_file: Option<PathBuf>,
    pub done: bool,
    pub error: Option<String>,
}

impl ProgressState {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Fold one event into the state
    ///
    /// Counter events may arrive out of order across workers; `current`
    /// never moves backwards.
    pub fn apply(&mut self, event: ProgressEvent) {
        match event {
            ProgressEvent::Progress {
                current,
                total,
                file,
            } => {
                if current > self.current {
                    self.current = current;
                    self.current_file = Some(file);
                }
                self.total = total;
            }
            ProgressEvent::Done => {
                self.done = true;
            }
            ProgressEvent::Error(message) => {
                self.error = Some(message);
            }
        }
    }

    /// Whether the run has reached a terminal state
    pub fn is_finished(&self) -> bool {
        self.done || self.error.is_some()
    }

    /// Completion ratio in [0, 1]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.current as f64 / self.total as f64
    }
}
