//! Centrality metrics for the speaker graph.
//!
//! # Overview
//!
//! Each metric answers a different question about who matters in the
//! dialogue:
//!
//! - **Degree** (`degree`): Who talks with the most distinct partners?
//! - **Weighted degree** (`degree`): Who speaks right before others most often?
//! - **Closeness** (`closeness`): Whom can the rest of the cast reach in few hops?
//! - **Betweenness** (`betweenness`): Who sits on the shortest routes between
//!   other speakers?
//!
//! # Usage
//!
//! All metrics take an [`InteractionDiGraph`](crate::graph::InteractionDiGraph)
//! and return [`NodeScores`](crate::NodeScores) in node insertion order.
//!
//! ```rust,ignore
//! use parley_metrics::graph::InteractionDiGraph;
//! use parley_metrics::metrics::{betweenness::betweenness_centrality, closeness::closeness_centrality};
//!
//! let ig = InteractionDiGraph::from_network(&network);
//! let bc = betweenness_centrality(&ig);
//! let cc = closeness_centrality(&ig);
//! ```

pub mod betweenness;
pub mod closeness;
pub mod degree;
