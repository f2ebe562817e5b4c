#![forbid(unsafe_code)]
//! parley-core library.
//!
//! Turns an ordered dialogue transcript into a weighted, directed
//! "who-talks-to-whom" network.
//!
//! ```text
//! transcript.csv
//!        ↓  transcript::read_turns()
//! Vec<Turn>
//!        ↓  infer::InteractionInferer (adjacency heuristic)
//! Interaction stream
//!        ↓  network::GraphAccumulator
//! InteractionGraph
//!        ↓  InteractionGraph::retain_top_speakers()
//! retained InteractionGraph → JSON network document
//! ```
//!
//! # Conventions
//!
//! - **Errors**: Typed `thiserror` enums for parsers, `anyhow::Result` for
//!   file-level operations.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod exclusion;
pub mod infer;
pub mod json;
pub mod network;
pub mod transcript;
pub mod turn;

pub use exclusion::ExclusionSet;
pub use infer::{InferenceStats, Interaction, InteractionInferer, infer_interactions};
pub use network::{
    DEFAULT_TOP_SPEAKERS, GraphAccumulator, InteractionGraph, NetworkError, build_network,
};
pub use transcript::{TranscriptError, TranscriptLayout};
pub use turn::Turn;
