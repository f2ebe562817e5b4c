//! `parley build`: transcript to retained network document.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use parley_core::config::ParleyConfig;
use parley_core::transcript::read_turns;
use parley_core::{InferenceStats, InteractionGraph, build_network};
use serde::Serialize;
use tracing::info;

use crate::output::{OutputMode, pretty, print_summary, write_document};

/// Arguments for `parley build`.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Transcript CSV file.
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Write the network document here instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Keep only the K most talkative speakers (overrides `[retention] top_speakers`).
    #[arg(long, value_name = "K")]
    pub top_speakers: Option<usize>,
}

/// What happened while turning a transcript into a network.
#[derive(Debug, Clone, Serialize)]
pub struct BuildSummary {
    pub input: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    pub inference: InferenceStats,
    pub speakers_seen: usize,
    pub speakers_kept: usize,
    pub nodes: usize,
    pub edges: usize,
    pub total_weight: u64,
}

/// Read, infer, accumulate, and retain.
///
/// # Errors
///
/// Returns an error if the transcript cannot be read or parsed.
pub fn build_retained(
    input: &Path,
    config: &ParleyConfig,
    top_speakers: Option<usize>,
) -> anyhow::Result<(InteractionGraph, BuildSummary)> {
    let turns = read_turns(input, &config.transcript)
        .with_context(|| format!("failed to load transcript {}", input.display()))?;

    let (graph, inference) = build_network(&turns, config.inference.exclusion_set());
    let k = top_speakers.unwrap_or(config.retention.top_speakers);
    let kept = graph.retain_top_speakers(k);

    info!(
        speakers_seen = graph.source_count(),
        speakers_kept = kept.source_count(),
        k,
        "retained top speakers"
    );

    let summary = BuildSummary {
        input: input.to_path_buf(),
        output: None,
        inference,
        speakers_seen: graph.source_count(),
        speakers_kept: kept.source_count(),
        nodes: kept.node_count(),
        edges: kept.edge_count(),
        total_weight: kept.total_weight(),
    };
    Ok((kept, summary))
}

/// Execute `parley build`.
///
/// # Errors
///
/// Returns an error if the transcript cannot be loaded or the document
/// cannot be written.
pub fn run_build(
    args: &BuildArgs,
    config: &ParleyConfig,
    output: OutputMode,
    quiet: bool,
) -> anyhow::Result<()> {
    let (network, mut summary) = build_retained(&args.input, config, args.top_speakers)?;
    write_document(args.output.as_deref(), &network)?;

    // With no output file the document itself is the stdout payload.
    if args.output.is_none() || quiet {
        return Ok(());
    }
    summary.output.clone_from(&args.output);
    render_summary(output, &summary)
}

pub fn render_summary(mode: OutputMode, summary: &BuildSummary) -> anyhow::Result<()> {
    print_summary(mode, summary, render_summary_text, render_summary_pretty)
}

pub fn render_summary_text(s: &BuildSummary, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        w,
        "turns={} interactions={} speakers_seen={} speakers_kept={} nodes={} edges={} weight={}",
        s.inference.turns,
        s.inference.interactions,
        s.speakers_seen,
        s.speakers_kept,
        s.nodes,
        s.edges,
        s.total_weight
    )?;
    if let Some(path) = &s.output {
        writeln!(w, "network={}", path.display())?;
    }
    Ok(())
}

pub fn render_summary_pretty(s: &BuildSummary, w: &mut dyn Write) -> std::io::Result<()> {
    pretty::section(w, "Network")?;
    pretty::field(w, "Transcript", s.input.display().to_string())?;
    if let Some(path) = &s.output {
        pretty::field(w, "Written to", path.display().to_string())?;
    }
    pretty::field(w, "Turns", s.inference.turns.to_string())?;
    pretty::field(w, "Interactions", s.inference.interactions.to_string())?;
    pretty::field(
        w,
        "Skipped",
        format!(
            "{} repeats, {} excluded, {} episode starts",
            s.inference.repeats, s.inference.excluded, s.inference.episode_resets
        ),
    )?;
    pretty::field(
        w,
        "Speakers",
        format!("{} kept of {}", s.speakers_kept, s.speakers_seen),
    )?;
    pretty::field(w, "Nodes", s.nodes.to_string())?;
    pretty::field(w, "Edges", s.edges.to_string())?;
    pretty::field(w, "Total weight", s.total_weight.to_string())
}
