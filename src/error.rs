//! Error types for the longevity walk.
//!
//! Two levels:
//! - `LongevityError`: repository-level, aborts the walk and reaches the caller
//! - `FileError`: one file in one transition, reported as a `Diagnostic` while
//!   the walk carries on with that file's lines untouched

use thiserror::Error;

use crate::model::Longevity;

#[derive(Error, Debug)]
pub enum LongevityError {
    #[error("Repository unreadable: {path}: {source}")]
    RepositoryUnreadable {
        path: String,
        #[source]
        source: git2::Error,
    },

    #[error("History walk failed: {0}")]
    HistoryWalkFailed(#[from] git2::Error),

    #[error("Cancelled after {processed} of {total} commits")]
    Cancelled {
        processed: usize,
        total: usize,
        partial: Box<Longevity>,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FileError {
    #[error("Failed to read {path}: {reason}")]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to diff {path}: {reason}")]
    DiffComputationFailed { path: String, reason: String },
}

impl FileError {
    pub fn read(path: impl Into<String>, reason: impl ToString) -> Self {
        FileError::FileReadFailed {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn diff(path: impl Into<String>, reason: impl ToString) -> Self {
        FileError::DiffComputationFailed {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            FileError::FileReadFailed { path, .. } | FileError::DiffComputationFailed { path, .. } => path,
        }
    }
}

pub type Result<T> = std::result::Result<T, LongevityError>;
