// src/source.rs

//! Access to repository history.
//!
//! `HistorySource` is everything the longevity walk needs from a repository:
//! the ordered commits, the files changed between two commits (renames
//! paired), and the text of a file version. `GitSource` implements it on
//! libgit2.

use crate::config::LongevityConfig;
use crate::diff::split_lines;
use crate::error::{FileError, LongevityError, Result};
use crate::model::{CommitInfo, FilePath};
use crate::walker::RevisionGraphWalker;
use git2::{Delta, DiffFile, DiffFindOptions, DiffOptions, FileMode, Oid, Repository};
use std::path::Path;
use tracing::debug;

/// One side of a changed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileVersion {
    pub path: FilePath,
    pub blob: Oid,
}

/// A file touched by a transition. Both sides present is a modification, or a
/// rename when the paths differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub old: Option<FileVersion>,
    pub new: Option<FileVersion>,
}

impl FileChange {
    pub fn path(&self) -> &str {
        self.new
            .as_ref()
            .or(self.old.as_ref())
            .map_or("", |f| &*f.path)
    }
}

pub trait HistorySource {
    /// Commits to walk, oldest first.
    fn commits(&self) -> Result<Vec<CommitInfo>>;

    /// Files changed from `parent` to `child`. With no parent every file of
    /// `child` is an addition.
    fn changes(&self, parent: Option<Oid>, child: Oid) -> Result<Vec<FileChange>>;

    /// Lines of a file version, or `None` for binary content.
    fn read(&self, file: &FileVersion) -> std::result::Result<Option<Vec<String>>, FileError>;
}

pub struct GitSource {
    repo: Repository,
    config: LongevityConfig,
}

impl GitSource {
    pub fn open<P: AsRef<Path>>(path: P, config: LongevityConfig) -> Result<Self> {
        let repo = Repository::discover(&path).map_err(|source| LongevityError::RepositoryUnreadable {
            path: path.as_ref().display().to_string(),
            source,
        })?;
        debug!("Opened git repository at {:?}", repo.path());
        Ok(Self { repo, config })
    }

    pub fn from_repository(repo: Repository, config: LongevityConfig) -> Self {
        Self { repo, config }
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }
}

impl HistorySource for GitSource {
    fn commits(&self) -> Result<Vec<CommitInfo>> {
        RevisionGraphWalker::new(&self.repo, self.config.first_parent).walk()
    }

    fn changes(&self, parent: Option<Oid>, child: Oid) -> Result<Vec<FileChange>> {
        let child_tree = self.repo.find_commit(child)?.tree()?;
        let parent_tree = parent
            .map(|p| self.repo.find_commit(p).and_then(|c| c.tree()))
            .transpose()?;

        let mut diff_opts = DiffOptions::new();
        diff_opts.ignore_filemode(true);
        diff_opts.ignore_submodules(true);

        let mut diff = self.repo.diff_tree_to_tree(
            parent_tree.as_ref(),
            Some(&child_tree),
            Some(&mut diff_opts),
        )?;

        if self.config.detect_renames {
            let mut find_opts = DiffFindOptions::new();
            find_opts.renames(true);
            find_opts.rename_threshold(self.config.rename_threshold);
            diff.find_similar(Some(&mut find_opts))?;
        }

        let mut changes = Vec::new();
        for delta in diff.deltas() {
            let (old, new) = match delta.status() {
                Delta::Added | Delta::Copied => (None, version(&delta.new_file())),
                Delta::Deleted => (version(&delta.old_file()), None),
                Delta::Modified | Delta::Renamed | Delta::Typechange => {
                    (version(&delta.old_file()), version(&delta.new_file()))
                }
                _ => continue,
            };
            if old.is_none() && new.is_none() {
                continue;
            }
            changes.push(FileChange { old, new });
        }

        Ok(changes)
    }

    fn read(&self, file: &FileVersion) -> std::result::Result<Option<Vec<String>>, FileError> {
        let blob = self
            .repo
            .find_blob(file.blob)
            .map_err(|e| FileError::read(&*file.path, e.message()))?;

        if blob.is_binary() {
            debug!("Skipping binary file {}", file.path);
            return Ok(None);
        }

        let text = std::str::from_utf8(blob.content())
            .map_err(|e| FileError::read(&*file.path, format!("not valid UTF-8: {}", e)))?;
        Ok(Some(split_lines(text)))
    }
}

/// The blob side of a diff entry. Submodule entries have no lines to track.
fn version(file: &DiffFile) -> Option<FileVersion> {
    if file.mode() == FileMode::Commit || file.id().is_zero() {
        return None;
    }
    let path = file.path()?.to_string_lossy();
    Some(FileVersion {
        path: FilePath::from(path.as_ref()),
        blob: file.id(),
    })
}
