#![forbid(unsafe_code)]
//! parley-metrics library.
//!
//! Ranks the speakers of an [`InteractionGraph`](parley_core::InteractionGraph)
//! by four centrality measures.
//!
//! ```text
//! InteractionGraph (retained network document)
//!        ↓  graph::InteractionDiGraph::from_network()
//! InteractionDiGraph (petgraph DiGraph, weights = interaction counts)
//!        ↓  metrics::{degree, closeness, betweenness}
//! CentralityScores
//!        ↓  CentralityScores::top()
//! CentralityReport → JSON stats document
//! ```
//!
//! # Conventions
//!
//! - **Errors**: Metric computation is infallible; I/O lives in the CLI.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod engine;
pub mod graph;
pub mod metrics;
pub mod scores;

pub use engine::{
    CentralityReport, CentralityScores, DEFAULT_TOP_N, compute_centrality, score_network,
};
pub use graph::{GraphStats, InteractionDiGraph};
pub use scores::NodeScores;
