// src/tracker.rs

//! Line provenance tracking across commit transitions.
//!
//! The tracker owns every `LineIdentity` created during a walk in an arena,
//! plus the live map from `(file, line index)` to the identity sitting there
//! now. Each transition takes the touched files' live vectors out of the map,
//! rebuilds them from the edit scripts and puts them back, so a transition is
//! applied file by file as a unit and a rejected script leaves its file as it was.

use crate::diff::{self, EditOp, EditScript};
use crate::error::FileError;
use crate::model::{FilePath, LineIdentity, Position, TransitionStats};
use git2::Oid;
use std::collections::HashMap;
use std::ops::Range;
use tracing::{debug, warn};

/// Index of an identity in the tracker's arena
pub type LineId = usize;

/// The edit script of one file for one transition.
#[derive(Debug, Clone)]
pub struct FileEdit {
    /// Path in the parent revision, `None` if the file is new
    pub old_path: Option<FilePath>,
    /// Path in the child revision, `None` if the file was deleted
    pub new_path: Option<FilePath>,
    pub script: EditScript,
    /// Content of the child revision, source of inserted lines' text
    pub new_lines: Vec<String>,
}

impl FileEdit {
    /// Diff two revisions of a file into an edit.
    pub fn between(
        old_path: Option<FilePath>,
        old_lines: Option<&[String]>,
        new_path: Option<FilePath>,
        new_lines: Option<Vec<String>>,
    ) -> Self {
        let script = diff::diff_lines(old_lines, new_lines.as_deref());
        Self {
            old_path,
            new_path,
            script,
            new_lines: new_lines.unwrap_or_default(),
        }
    }

    fn sort_key(&self) -> Option<&str> {
        self.new_path.as_deref().or(self.old_path.as_deref())
    }

    fn display_path(&self) -> String {
        self.sort_key().unwrap_or("").to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BatchOrder {
    /// Initial content, read top to bottom
    Ascending,
    /// Later insertions, highest index first
    Descending,
}

/// The commit being applied and the one before it in the walk.
#[derive(Debug, Clone, Copy)]
struct Step {
    commit: Oid,
    parent: Option<Oid>,
    order: BatchOrder,
}

/// Live lines only have their `last_known` position rewritten when their file
/// is touched. Their commit is resolved to the last applied commit when read,
/// since an untouched line exists unchanged in every later commit.
///
/// `live_at`, `snapshot` and `finish` are the only read paths that do this
/// resolution. The arena itself holds stale commits for live lines.
#[derive(Debug, Default)]
pub struct LineProvenanceTracker {
    lines: Vec<LineIdentity>,
    /// Arena ranges created by each transition, oldest first
    batches: Vec<Range<LineId>>,
    live: HashMap<FilePath, Vec<LineId>>,
    live_count: usize,
    /// Last applied commit
    current: Option<Oid>,
}

impl LineProvenanceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the tracker with the first commit of the walk. Every line is a new
    /// identity; they are listed in path then line order.
    pub fn start(&mut self, commit: Oid, edits: Vec<FileEdit>) -> (TransitionStats, Vec<FileError>) {
        self.transition(commit, edits, BatchOrder::Ascending)
    }

    /// Advance the state across one parent → child transition.
    ///
    /// Returns the counters of the transition and one error per file whose
    /// script did not fit the tracked state; those files are left untouched.
    pub fn apply(&mut self, commit: Oid, edits: Vec<FileEdit>) -> (TransitionStats, Vec<FileError>) {
        self.transition(commit, edits, BatchOrder::Descending)
    }

    fn transition(
        &mut self,
        commit: Oid,
        mut edits: Vec<FileEdit>,
        order: BatchOrder,
    ) -> (TransitionStats, Vec<FileError>) {
        edits.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        let step = Step {
            commit,
            parent: self.current,
            order,
        };
        let batch_start = self.lines.len();
        let mut stats = TransitionStats::default();
        let mut errors = Vec::new();

        // 1. Take every touched file out of the live map
        let taken: Vec<Vec<LineId>> = edits
            .iter()
            .map(|edit| {
                edit.old_path
                    .as_ref()
                    .and_then(|p| self.live.remove(p))
                    .unwrap_or_default()
            })
            .collect();

        // 2. Rebuild each file, putting rejected ones back as they were
        let mut rebuilt: Vec<(FilePath, Vec<LineId>)> = Vec::with_capacity(edits.len());
        let mut restored: Vec<(FilePath, Vec<LineId>)> = Vec::new();

        for (edit, old_ids) in edits.into_iter().zip(taken) {
            if let Err(reason) = diff::validate(&edit.script, old_ids.len(), edit.new_lines.len()) {
                let error = FileError::diff(edit.display_path(), reason);
                warn!("{} at {}", error, commit);
                errors.push(error);
                if let Some(path) = edit.old_path {
                    if !old_ids.is_empty() {
                        restored.push((path, old_ids));
                    }
                }
                continue;
            }

            let new_ids = self.rebuild_file(step, edit.new_path.clone(), &edit.script, edit.new_lines, &old_ids, &mut stats);
            if let Some(path) = edit.new_path {
                rebuilt.push((path, new_ids));
            }
        }

        // 3. Put everything back; a vector displaced by a path collision is deleted
        for (path, ids) in restored.into_iter().chain(rebuilt) {
            if ids.is_empty() {
                continue;
            }
            if let Some(displaced) = self.live.insert(path.clone(), ids) {
                warn!("{} lines of {} displaced at {}", displaced.len(), path, commit);
                for id in displaced {
                    self.terminate(id, step.parent);
                    stats.deleted += 1;
                }
            }
        }

        if self.lines.len() > batch_start {
            self.batches.push(batch_start..self.lines.len());
        }

        self.current = Some(commit);
        self.live_count = self.live_count + stats.inserted - stats.deleted;
        stats.live = self.live_count;

        debug!(
            "{}: +{} -{} ={} (live {})",
            commit, stats.inserted, stats.deleted, stats.carried, stats.live
        );
        (stats, errors)
    }

    /// Apply one validated script, returning the file's new live vector.
    fn rebuild_file(
        &mut self,
        step: Step,
        new_path: Option<FilePath>,
        script: &[EditOp],
        mut new_lines: Vec<String>,
        old_ids: &[LineId],
        stats: &mut TransitionStats,
    ) -> Vec<LineId> {
        let mut new_ids: Vec<Option<LineId>> = vec![None; new_lines.len()];
        let mut inserted = Vec::new();

        for op in script {
            match *op {
                EditOp::Equal { old, new } => {
                    let id = old_ids[old];
                    if let Some(path) = &new_path {
                        self.lines[id].last_known = Position::new(step.commit, path.clone(), new);
                    }
                    new_ids[new] = Some(id);
                    stats.carried += 1;
                }
                EditOp::Delete { old } => {
                    self.terminate(old_ids[old], step.parent);
                    stats.deleted += 1;
                }
                EditOp::Insert { new } => inserted.push(new),
            }
        }

        if let Some(path) = &new_path {
            if step.order == BatchOrder::Descending {
                inserted.reverse();
            }
            for new in inserted {
                let id = self.lines.len();
                let text = std::mem::take(&mut new_lines[new]);
                self.lines
                    .push(LineIdentity::new(Position::new(step.commit, path.clone(), new), text));
                new_ids[new] = Some(id);
                stats.inserted += 1;
            }
        }

        new_ids.into_iter().flatten().collect()
    }

    /// Freeze a deleted line at the last commit it existed in.
    fn terminate(&mut self, id: LineId, parent: Option<Oid>) {
        if let Some(parent) = parent {
            self.lines[id].last_known.commit = parent;
        }
    }

    /// Number of identities still live.
    pub fn live_count(&self) -> usize {
        self.live_count
    }

    /// Number of identities ever created, live and terminal.
    pub fn total_count(&self) -> usize {
        self.lines.len()
    }

    /// The live identity at `(path, line)`, if any.
    pub fn live_at(&self, path: &str, line: usize) -> Option<LineIdentity> {
        let id = *self.live.get(path)?.get(line)?;
        let mut identity = self.lines[id].clone();
        if let Some(head) = self.current {
            identity.last_known.commit = head;
        }
        Some(identity)
    }

    /// Text of the lines currently tracked for `path`, in file order.
    ///
    /// This is the parent side every later diff of `path` must be computed
    /// against. It can differ from the parent blob when an earlier
    /// transition of the file was skipped.
    pub fn current_lines(&self, path: &str) -> Option<Vec<String>> {
        let ids = self.live.get(path)?;
        Some(ids.iter().map(|&id| self.lines[id].text.clone()).collect())
    }

    /// Number of lines currently tracked for `path`.
    pub fn file_len(&self, path: &str) -> usize {
        self.live.get(path).map_or(0, Vec::len)
    }

    /// The ordered result so far, without ending the walk.
    pub fn snapshot(&self) -> Vec<LineIdentity> {
        let mut lines = self.lines.clone();
        resolve_live(&self.live, self.current, &mut lines);
        self.batches
            .iter()
            .rev()
            .flat_map(|range| lines[range.clone()].iter().cloned())
            .collect()
    }

    /// End the walk and return every identity, live and terminal.
    ///
    /// Newest batch first; within the initial batch lines are in path/line
    /// order, within later batches files are in path order and lines from
    /// the highest index down.
    pub fn finish(self) -> Vec<LineIdentity> {
        let mut lines = self.lines;
        resolve_live(&self.live, self.current, &mut lines);

        let mut out = Vec::with_capacity(lines.len());
        // Batches are contiguous and chronological, so the newest is always the tail
        for range in self.batches.into_iter().rev() {
            out.extend(lines.drain(range));
        }
        out
    }
}

fn resolve_live(live: &HashMap<FilePath, Vec<LineId>>, head: Option<Oid>, lines: &mut [LineIdentity]) {
    let Some(head) = head else { return };
    for &id in live.values().flatten() {
        lines[id].last_known.commit = head;
    }
}
