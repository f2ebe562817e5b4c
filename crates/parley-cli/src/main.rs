#![forbid(unsafe_code)]

mod cmd;
mod output;

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};
use output::{ErrorReport, OutputMode, resolve_output_mode};
use parley_core::config::resolve_config;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "parley: who-talks-to-whom networks from dialogue transcripts",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress run summaries.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format for summaries and errors.
    #[arg(long, value_enum, global = true)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Read configuration from this file instead of `parley.toml`.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags, `FORMAT`, and the terminal.
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Pipeline",
        about = "Build an interaction network from a transcript",
        long_about = "Infer who-talks-to-whom from consecutive turns, keep the most talkative speakers, and write the network document.",
        after_help = "EXAMPLES:\n    # Write the network to a file\n    parley build -i transcript.csv -o network.json\n\n    # Keep the top 20 speakers and print the document\n    parley build -i transcript.csv --top-speakers 20"
    )]
    Build(cmd::build::BuildArgs),

    #[command(
        next_help_heading = "Pipeline",
        about = "Rank speakers in a network by centrality",
        long_about = "Compute degree, weighted degree, closeness, and betweenness centrality for a network document and write the top speakers per measure.",
        after_help = "EXAMPLES:\n    # Top 3 per measure\n    parley stats -i network.json -o stats.json\n\n    # Top 10 with full score tables\n    parley stats -i network.json --top 10 --scores"
    )]
    Stats(cmd::stats::StatsArgs),

    #[command(
        next_help_heading = "Pipeline",
        about = "Run build and stats in one step",
        long_about = "Build the network from a transcript and rank its speakers without an intermediate file.",
        after_help = "EXAMPLES:\n    # Rankings on stdout\n    parley analyze -i transcript.csv\n\n    # Keep both documents\n    parley analyze -i transcript.csv --network-out network.json --stats-out stats.json"
    )]
    Analyze(cmd::analyze::AnalyzeArgs),

    #[command(
        next_help_heading = "Shell",
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    parley completions bash\n\n    # Generate zsh completions\n    parley completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("PARLEY_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "parley=debug,info"
        } else {
            "parley=info,warn"
        })
    });

    let format = env::var("PARLEY_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn run(cli: &Cli, output: OutputMode) -> anyhow::Result<()> {
    if let Commands::Completions(args) = &cli.command {
        let mut command = Cli::command();
        return cmd::completions::run_completions(args.shell, &mut command);
    }

    let project_root = env::current_dir()?;
    let effective = resolve_config(cli.config.as_deref(), &project_root)?;
    debug!(source = ?effective.source, "configuration resolved");
    let config = &effective.config;

    match &cli.command {
        Commands::Build(args) => cmd::build::run_build(args, config, output, cli.quiet),
        Commands::Stats(args) => cmd::stats::run_stats(args, config, output, cli.quiet),
        Commands::Analyze(args) => cmd::analyze::run_analyze(args, config, output, cli.quiet),
        Commands::Completions(_) => Ok(()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let output = cli.output_mode();
    match run(&cli, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if ErrorReport::new(&err).print(output).is_err() {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}
