//! Summary statistics for a speaker graph.
//!
//! # Statistics Provided
//!
//! - **node_count** / **edge_count**: speakers and directed speaker pairs.
//! - **total_weight**: sum of all interaction counts.
//! - **density**: `edge_count / (node_count * (node_count - 1))`. Zero for
//!   graphs with fewer than two nodes.
//! - **speaker_count**: nodes with at least one outgoing edge.
//! - **scc_count**: strongly connected components.
//! - **weakly_connected_component_count**: disjoint conversation groups.
//! - **isolated_node_count**: nodes with no edges at all.
//! - **max_in_degree** / **max_out_degree**: distinct partners, not weights.

use petgraph::{
    Direction,
    algo::{connected_components, tarjan_scc},
    graph::NodeIndex,
    visit::IntoNodeIdentifiers,
};
use serde::Serialize;

use crate::graph::build::InteractionDiGraph;

// ---------------------------------------------------------------------------
// GraphStats
// ---------------------------------------------------------------------------

/// Summary statistics for a speaker graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub total_weight: u64,
    pub density: f64,
    pub speaker_count: usize,
    pub scc_count: usize,
    pub weakly_connected_component_count: usize,
    pub isolated_node_count: usize,
    pub max_in_degree: usize,
    pub max_out_degree: usize,
    /// Copied from [`InteractionDiGraph::content_hash`].
    pub content_hash: String,
}

impl GraphStats {
    /// Compute statistics from an [`InteractionDiGraph`].
    #[must_use]
    pub fn from_graph(ig: &InteractionDiGraph) -> Self {
        let g = &ig.graph;
        let node_count = g.node_count();
        let edge_count = g.edge_count();

        let in_degree = |idx: NodeIndex| g.neighbors_directed(idx, Direction::Incoming).count();
        let out_degree = |idx: NodeIndex| g.neighbors_directed(idx, Direction::Outgoing).count();

        let isolated_node_count = g
            .node_identifiers()
            .filter(|&idx| in_degree(idx) == 0 && out_degree(idx) == 0)
            .count();
        let speaker_count = g.node_identifiers().filter(|&idx| out_degree(idx) > 0).count();

        Self {
            node_count,
            edge_count,
            total_weight: g.edge_weights().fold(0u64, |acc, &w| acc.saturating_add(w)),
            density: compute_density(node_count, edge_count),
            speaker_count,
            scc_count: tarjan_scc(g).len(),
            weakly_connected_component_count: connected_components(g),
            isolated_node_count,
            max_in_degree: g.node_identifiers().map(in_degree).max().unwrap_or(0),
            max_out_degree: g.node_identifiers().map(out_degree).max().unwrap_or(0),
            content_hash: ig.content_hash.clone(),
        }
    }

    /// Return `true` if the graph has no interactions.
    #[must_use]
    pub const fn is_silent(&self) -> bool {
        self.edge_count == 0
    }
}

#[allow(clippy::cast_precision_loss)]
fn compute_density(node_count: usize, edge_count: usize) -> f64 {
    if node_count < 2 {
        return 0.0_f64;
    }
    let max_edges = (node_count * (node_count - 1)) as f64;
    edge_count as f64 / max_edges
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
