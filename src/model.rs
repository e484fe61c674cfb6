// src/model.rs

use crate::error::FileError;
use git2::Oid;
use serde::{Serialize, Serializer};
use std::sync::Arc;

/// A repository-relative file path, shared between every position in that file.
pub type FilePath = Arc<str>;

/// Where a line sits at one point in history.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    #[serde(serialize_with = "serialize_oid")]
    pub commit: Oid,
    pub path: FilePath,
    /// Zero-based line index within the file at `commit`
    pub line: usize,
}

impl Position {
    pub fn new(commit: Oid, path: FilePath, line: usize) -> Self {
        Self { commit, path, line }
    }
}

/// The lifetime record of one logical line of code.
///
/// `origin` is fixed at creation. `last_known` moves forward every time the
/// walk passes a commit in which the line survives unchanged, and freezes once
/// the line is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineIdentity {
    pub origin: Position,
    pub last_known: Position,
    pub text: String,
}

impl LineIdentity {
    pub fn new(at: Position, text: String) -> Self {
        Self {
            last_known: at.clone(),
            origin: at,
            text,
        }
    }
}

/// A commit as the walk sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitInfo {
    #[serde(serialize_with = "serialize_oid")]
    pub id: Oid,
    #[serde(serialize_with = "serialize_oids")]
    pub parents: Vec<Oid>,
    /// Author time, seconds since the epoch
    pub time: i64,
    pub summary: String,
}

/// A recoverable per-file problem met during the walk.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    #[serde(serialize_with = "serialize_oid")]
    pub commit: Oid,
    #[serde(serialize_with = "serialize_display")]
    pub error: FileError,
}

/// Line counters for one commit transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransitionStats {
    pub inserted: usize,
    pub deleted: usize,
    pub carried: usize,
    pub live: usize,
}

/// The complete result of walking one repository
#[derive(Debug, Clone, Default, Serialize)]
pub struct Longevity {
    /// Newest insertion batch first, see `LineProvenanceTracker::finish`
    pub lines: Vec<LineIdentity>,
    pub commits: Vec<CommitInfo>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Longevity {
    /// Lines confirmed present at the last walked commit.
    pub fn live_lines(&self) -> impl Iterator<Item = &LineIdentity> {
        let head = self.commits.last().map(|c| c.id);
        self.lines
            .iter()
            .filter(move |l| Some(l.last_known.commit) == head)
    }

    pub fn start_time(&self) -> Option<i64> {
        self.commits.first().map(|c| c.time)
    }

    pub fn end_time(&self) -> Option<i64> {
        self.commits.last().map(|c| c.time)
    }
}

fn serialize_oid<S: Serializer>(oid: &Oid, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(oid)
}

fn serialize_oids<S: Serializer>(oids: &[Oid], s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(oids.iter().map(|o| o.to_string()))
}

fn serialize_display<S: Serializer, T: std::fmt::Display>(v: &T, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(v)
}
