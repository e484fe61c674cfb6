// src/cli.rs

use clap::Parser;
use code_longevity::LongevityConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the git repository to analyze
    #[arg(short, long, default_value = ".")]
    pub repo: PathBuf,

    /// File to write the report to (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value_t = Format::Summary)]
    pub format: Format,

    /// Walk every reachable commit instead of the first-parent chain
    #[arg(long)]
    pub all_commits: bool,

    /// Do not pair deleted and added files as renames
    #[arg(long)]
    pub no_renames: bool,

    /// Similarity percentage for rename detection
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u16).range(0..=100))]
    pub rename_threshold: u16,

    /// Diff files one at a time instead of on the thread pool
    #[arg(long)]
    pub sequential: bool,

    /// Log filter, e.g. "info" or "code_longevity=debug" (overrides RUST_LOG)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Hide the progress bar
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum Format {
    /// Every line record as JSON
    Json,
    /// Counts and the commit span
    Summary,
}

impl Args {
    pub fn config(&self) -> LongevityConfig {
        LongevityConfig {
            first_parent: !self.all_commits,
            detect_renames: !self.no_renames,
            rename_threshold: self.rename_threshold,
            parallel: !self.sequential,
        }
    }
}
