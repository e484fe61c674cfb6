// src/main.rs

mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{Args, Format};
use code_longevity::{report, CodeLongevity};
use indicatif::ProgressBar;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = match &args.log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let start_time = Instant::now();
    let analysis = CodeLongevity::open(&args.repo, args.config())
        .with_context(|| format!("Failed to open repository at {}", args.repo.display()))?;

    let bar = if args.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(0)
    };
    bar.set_message("Walking commits");

    let longevity = analysis
        .compute_with(&bar)
        .with_context(|| format!("Failed to analyze {}", args.repo.display()))?;
    bar.finish_with_message("Analysis complete");

    tracing::info!(
        "Analysis finished in {:.2?}: {} lines over {} commits",
        start_time.elapsed(),
        longevity.lines.len(),
        longevity.commits.len()
    );

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut out = BufWriter::new(file);
            write_report(&longevity, args.format, &mut out)?;
            out.flush()?;
        }
        None => write_report(&longevity, args.format, io::stdout().lock())?,
    }

    Ok(())
}

fn write_report<W: Write>(longevity: &code_longevity::Longevity, format: Format, out: W) -> io::Result<()> {
    match format {
        Format::Json => report::write_json(longevity, out),
        Format::Summary => report::write_summary(longevity, out),
    }
}
