//! `parley analyze`: transcript to rankings in one run.

use std::path::{Path, PathBuf};

use clap::Args;
use parley_core::config::ParleyConfig;
use parley_metrics::CentralityReport;
use serde::Serialize;
use tracing::debug;

use crate::cmd::build::{BuildSummary, build_retained, render_summary_pretty, render_summary_text};
use crate::cmd::stats::{StatsDocument, rankings_pretty, rankings_text};
use crate::output::{OutputMode, print_summary, write_document};

/// Arguments for `parley analyze`.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Transcript CSV file.
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Also write the retained network document here.
    #[arg(long, value_name = "FILE")]
    pub network_out: Option<PathBuf>,

    /// Write the stats document here instead of stdout.
    #[arg(long, value_name = "FILE")]
    pub stats_out: Option<PathBuf>,

    /// Keep only the K most talkative speakers (overrides `[retention] top_speakers`).
    #[arg(long, value_name = "K")]
    pub top_speakers: Option<usize>,

    /// Speakers per ranking (overrides `[ranking] top_n`).
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,

    /// Include full per-speaker scores and graph statistics.
    #[arg(long)]
    pub scores: bool,
}

#[derive(Debug, Serialize)]
struct AnalyzeSummary<'a> {
    network: &'a BuildSummary,
    stats: &'a Path,
    rankings: &'a CentralityReport,
}

/// Execute `parley analyze`.
///
/// The network is ranked in memory; it is written to disk only when
/// `--network-out` is given.
///
/// # Errors
///
/// Returns an error if the transcript cannot be loaded or an output cannot
/// be written.
pub fn run_analyze(
    args: &AnalyzeArgs,
    config: &ParleyConfig,
    output: OutputMode,
    quiet: bool,
) -> anyhow::Result<()> {
    let (network, mut summary) = build_retained(&args.input, config, args.top_speakers)?;

    if let Some(path) = &args.network_out {
        write_document(Some(path.as_path()), &network)?;
        debug!(path = %path.display(), "wrote network document");
    }

    let top_n = args.top.unwrap_or(config.ranking.top_n);
    let document = StatsDocument::compute(&network, top_n, args.scores);
    write_document(args.stats_out.as_deref(), &document)?;

    let Some(stats_path) = args.stats_out.as_deref() else {
        return Ok(());
    };
    if quiet {
        return Ok(());
    }

    summary.output.clone_from(&args.network_out);
    let report = AnalyzeSummary {
        network: &summary,
        stats: stats_path,
        rankings: &document.rankings,
    };
    print_summary(
        output,
        &report,
        |r, w| {
            render_summary_text(r.network, w)?;
            rankings_text(r.rankings, r.stats, w)
        },
        |r, w| {
            render_summary_pretty(r.network, w)?;
            writeln!(w)?;
            rankings_pretty(r.rankings, r.stats, w)
        },
    )
}
