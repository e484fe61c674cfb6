// src/report.rs

//! Writing a finished walk out: the full record list as JSON, or a short
//! human-readable summary.

use crate::model::Longevity;
use chrono::{TimeZone, Utc};
use serde::Serialize;
use std::io::{self, Write};

#[derive(Serialize)]
struct JsonReport<'a> {
    head: Option<String>,
    commit_count: usize,
    #[serde(flatten)]
    longevity: &'a Longevity,
}

pub fn write_json<W: Write>(longevity: &Longevity, out: W) -> io::Result<()> {
    let report = JsonReport {
        head: longevity.commits.last().map(|c| c.id.to_string()),
        commit_count: longevity.commits.len(),
        longevity,
    };
    serde_json::to_writer_pretty(out, &report)?;
    Ok(())
}

pub fn write_summary<W: Write>(longevity: &Longevity, mut out: W) -> io::Result<()> {
    let live = longevity.live_lines().count();
    let total = longevity.lines.len();

    writeln!(out, "Commits walked: {}", longevity.commits.len())?;
    if let (Some(start), Some(end)) = (longevity.start_time(), longevity.end_time()) {
        writeln!(out, "History spans {} to {}", format_time(start), format_time(end))?;
    }
    writeln!(out, "Lines tracked:  {}", total)?;
    writeln!(out, "  live:         {}", live)?;
    writeln!(out, "  deleted:      {}", total - live)?;

    if !longevity.diagnostics.is_empty() {
        writeln!(out, "Skipped files:  {}", longevity.diagnostics.len())?;
        for diagnostic in &longevity.diagnostics {
            writeln!(out, "  {} {}", short(&diagnostic.commit.to_string()), diagnostic.error)?;
        }
    }
    Ok(())
}

fn format_time(seconds: i64) -> String {
    Utc.timestamp_opt(seconds, 0)
        .single()
        .map_or_else(|| seconds.to_string(), |t| t.to_rfc2822())
}

fn short(id: &str) -> &str {
    &id[..id.len().min(10)]
}
