//! Speaker graph module for centrality computation.
//!
//! ## Pipeline
//!
//! ```text
//! parley_core::InteractionGraph
//!        ↓  build::InteractionDiGraph::from_network()
//! InteractionDiGraph (petgraph DiGraph<String, u64>)
//!        ↓  stats::GraphStats::from_graph()
//! GraphStats (density, components, weight totals, …)
//! ```
//!
//! ## Change Detection
//!
//! [`InteractionDiGraph::content_hash`] is a BLAKE3 hash of the weighted edge
//! set. Two runs over the same network produce the same hash.

pub mod build;
pub mod stats;

pub use build::InteractionDiGraph;
pub use stats::GraphStats;
