//! `parley stats`: centrality rankings for a network document.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use parley_core::InteractionGraph;
use parley_core::config::ParleyConfig;
use parley_metrics::{CentralityReport, CentralityScores, GraphStats, score_network};
use serde::Serialize;

use crate::output::{OutputMode, pretty, print_summary, write_document};

/// Arguments for `parley stats`.
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Network document produced by `parley build`.
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Write the stats document here instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Speakers per ranking (overrides `[ranking] top_n`).
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,

    /// Include full per-speaker scores and graph statistics.
    #[arg(long)]
    pub scores: bool,
}

/// The stats document.
///
/// Without `--scores` this is exactly the four rankings.
#[derive(Debug, Clone, Serialize)]
pub struct StatsDocument {
    #[serde(flatten)]
    pub rankings: CentralityReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<CentralityScores>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph: Option<GraphStats>,
}

impl StatsDocument {
    /// Rank the speakers of `network`.
    #[must_use]
    pub fn compute(network: &InteractionGraph, top_n: usize, with_scores: bool) -> Self {
        let (ig, scores) = score_network(network);
        let rankings = scores.top(top_n);

        if with_scores {
            Self {
                rankings,
                scores: Some(scores),
                graph: Some(GraphStats::from_graph(&ig)),
            }
        } else {
            Self {
                rankings,
                scores: None,
                graph: None,
            }
        }
    }
}

/// Load and validate a network document.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid network.
pub fn load_network(path: &Path) -> anyhow::Result<InteractionGraph> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read network {}", path.display()))?;
    InteractionGraph::from_json_str(&text)
        .with_context(|| format!("invalid network document {}", path.display()))
}

/// Execute `parley stats`.
///
/// # Errors
///
/// Returns an error if the network cannot be loaded or the document cannot
/// be written.
pub fn run_stats(
    args: &StatsArgs,
    config: &ParleyConfig,
    output: OutputMode,
    quiet: bool,
) -> anyhow::Result<()> {
    let network = load_network(&args.input)?;
    let top_n = args.top.unwrap_or(config.ranking.top_n);
    let document = StatsDocument::compute(&network, top_n, args.scores);
    write_document(args.output.as_deref(), &document)?;

    match &args.output {
        Some(path) if !quiet => render_rankings(output, &document.rankings, path),
        _ => Ok(()),
    }
}

/// Print the rankings after the document went to `path`.
pub fn render_rankings(
    mode: OutputMode,
    rankings: &CentralityReport,
    path: &Path,
) -> anyhow::Result<()> {
    print_summary(
        mode,
        rankings,
        |r, w| rankings_text(r, path, w),
        |r, w| rankings_pretty(r, path, w),
    )
}

pub fn rankings_text(r: &CentralityReport, path: &Path, w: &mut dyn Write) -> io::Result<()> {
    for (measure, names) in measures(r) {
        writeln!(w, "{measure}\t{}", names.join("\t"))?;
    }
    writeln!(w, "stats={}", path.display())
}

pub fn rankings_pretty(r: &CentralityReport, path: &Path, w: &mut dyn Write) -> io::Result<()> {
    pretty::section(w, "Most central speakers")?;
    for (measure, names) in measures(r) {
        pretty::field(w, measure, names.join(", "))?;
    }
    pretty::field(w, "Written to", path.display().to_string())
}

fn measures(r: &CentralityReport) -> [(&'static str, &[String]); 4] {
    [
        ("degree", r.degree.as_slice()),
        ("weighted_degree", r.weighted_degree.as_slice()),
        ("closeness", r.closeness.as_slice()),
        ("betweenness", r.betweenness.as_slice()),
    ]
}
