//! Line-level code longevity for git repositories.
//!
//! Walks a repository's history oldest commit first, diffs every changed
//! file between consecutive commits, and follows each line from the commit
//! that introduced it to the last commit it was seen in.
//!
//! ```no_run
//! use code_longevity::{CodeLongevity, LongevityConfig};
//!
//! let analysis = CodeLongevity::open("/path/to/repo", LongevityConfig::default()).unwrap();
//! let result = analysis.compute().unwrap();
//! for line in &result.lines {
//!     println!("{:?} -> {:?}: {}", line.origin, line.last_known, line.text);
//! }
//! ```

pub mod analyzer;
pub mod config;
pub mod diff;
pub mod error;
pub mod model;
pub mod progress;
pub mod report;
pub mod source;
pub mod tracker;
pub mod walker;

pub use analyzer::CodeLongevity;
pub use config::LongevityConfig;
pub use diff::{diff_lines, EditOp, EditScript};
pub use error::{FileError, LongevityError};
pub use model::{CommitInfo, Diagnostic, LineIdentity, Longevity, Position, TransitionStats};
pub use progress::{CancelFlag, NoProgress, Progress};
pub use source::{FileChange, FileVersion, GitSource, HistorySource};
pub use tracker::{FileEdit, LineProvenanceTracker};
pub use walker::RevisionGraphWalker;
