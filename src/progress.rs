// src/progress.rs

use crate::model::{CommitInfo, TransitionStats};
use indicatif::ProgressBar;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Receives per-commit counters while a walk runs. Write-only: nothing a sink
/// does feeds back into the walk.
pub trait Progress {
    fn commit_processed(&self, done: usize, total: usize, commit: &CommitInfo, stats: &TransitionStats);
}

/// Discards progress.
pub struct NoProgress;

impl Progress for NoProgress {
    fn commit_processed(&self, _: usize, _: usize, _: &CommitInfo, _: &TransitionStats) {}
}

impl Progress for ProgressBar {
    fn commit_processed(&self, done: usize, total: usize, _: &CommitInfo, stats: &TransitionStats) {
        self.set_length(total as u64);
        self.set_position(done as u64);
        self.set_message(format!("{} live lines", stats.live));
    }
}

/// Cooperative cancellation, observed between commit transitions.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
