// src/analyzer.rs

use crate::config::LongevityConfig;
use crate::error::{LongevityError, Result};
use crate::model::*;
use crate::progress::{CancelFlag, NoProgress, Progress};
use crate::source::{FileChange, GitSource, HistorySource};
use crate::tracker::{FileEdit, LineProvenanceTracker};
use git2::Oid;
use rayon::prelude::*;
use std::path::Path;
use tracing::{info, warn};

/// Walks a repository's history and reconstructs the lifetime of every line.
pub struct CodeLongevity<S> {
    source: S,
    config: LongevityConfig,
    cancel: Option<CancelFlag>,
}

impl CodeLongevity<GitSource> {
    pub fn open<P: AsRef<Path>>(repo_path: P, config: LongevityConfig) -> Result<Self> {
        let source = GitSource::open(repo_path, config)?;
        Ok(Self::new(source, config))
    }
}

/// Both sides of one changed file, read and ready to diff.
struct PendingDiff {
    old_path: Option<FilePath>,
    old_lines: Option<Vec<String>>,
    new_path: Option<FilePath>,
    new_lines: Option<Vec<String>>,
}

impl PendingDiff {
    fn into_edit(self) -> FileEdit {
        FileEdit::between(self.old_path, self.old_lines.as_deref(), self.new_path, self.new_lines)
    }
}

impl<S: HistorySource> CodeLongevity<S> {
    pub fn new(source: S, config: LongevityConfig) -> Self {
        Self {
            source,
            config,
            cancel: None,
        }
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn compute(&self) -> Result<Longevity> {
        self.compute_with(&NoProgress)
    }

    pub fn compute_with(&self, progress: &dyn Progress) -> Result<Longevity> {
        // 1. Collect the commits to walk, oldest first
        let commits = self.source.commits()?;
        let total = commits.len();
        info!("Walking {} commits", total);

        let mut tracker = LineProvenanceTracker::new();
        let mut diagnostics = Vec::new();
        let mut parent: Option<Oid> = None;

        // 2. Fold every transition into the tracker
        for (i, commit) in commits.iter().enumerate() {
            if self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled) {
                info!("Walk cancelled after {} of {} commits", i, total);
                return Err(LongevityError::Cancelled {
                    processed: i,
                    total,
                    partial: Box::new(Longevity {
                        lines: tracker.finish(),
                        commits: commits[..i].to_vec(),
                        diagnostics,
                    }),
                });
            }

            let changes = self.source.changes(parent, commit.id)?;
            let edits = self.edits(commit.id, changes, &tracker, &mut diagnostics);

            let (stats, rejected) = match parent {
                None => tracker.start(commit.id, edits),
                Some(_) => tracker.apply(commit.id, edits),
            };
            diagnostics.extend(rejected.into_iter().map(|error| Diagnostic {
                commit: commit.id,
                error,
            }));

            progress.commit_processed(i + 1, total, commit, &stats);
            parent = Some(commit.id);
        }

        let lines = tracker.finish();
        info!(
            "Walk complete: {} lines tracked, {} diagnostics",
            lines.len(),
            diagnostics.len()
        );

        Ok(Longevity {
            lines,
            commits,
            diagnostics,
        })
    }

    /// Diff every changed file from the lines the tracker holds for it to the
    /// child blob. Files whose child blob cannot be read are reported and left
    /// out of the transition.
    fn edits(
        &self,
        commit: Oid,
        changes: Vec<FileChange>,
        tracker: &LineProvenanceTracker,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<FileEdit> {
        let mut pending = Vec::with_capacity(changes.len());

        // Blob reads go through the repository handle one at a time
        for change in changes {
            let new_lines = match change.new.as_ref().map(|file| self.source.read(file)) {
                Some(Ok(lines)) => lines,
                None => None,
                Some(Err(error)) => {
                    warn!("{} at {}, file left unchanged", error, commit);
                    diagnostics.push(Diagnostic { commit, error });
                    continue;
                }
            };

            // Parent side is the tracked text, which differs from the parent
            // blob after a skipped transition
            let old_path = change.old.map(|f| f.path);
            let old_lines = old_path.as_deref().and_then(|path| tracker.current_lines(path));

            pending.push(PendingDiff {
                old_path,
                old_lines,
                new_path: change.new.map(|f| f.path),
                new_lines,
            });
        }

        // Files are independent key spaces, so their diffs can run in parallel
        if self.config.parallel {
            pending.into_par_iter().map(PendingDiff::into_edit).collect()
        } else {
            pending.into_iter().map(PendingDiff::into_edit).collect()
        }
    }
}
