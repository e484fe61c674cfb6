// src/config.rs

/// How a repository walk is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongevityConfig {
    /// Follow only the first-parent chain from HEAD. When false every reachable
    /// commit is walked in topological order and diffed against its predecessor
    /// in that order.
    pub first_parent: bool,
    /// Pair deleted and added files by content similarity
    pub detect_renames: bool,
    /// Similarity percentage (0-100) above which a delete/add pair is a rename
    pub rename_threshold: u16,
    /// Compute per-file diffs of a transition on the rayon pool
    pub parallel: bool,
}

impl Default for LongevityConfig {
    fn default() -> Self {
        Self {
            first_parent: true,
            detect_renames: true,
            rename_threshold: 50,
            parallel: true,
        }
    }
}
