//! Degree-based metrics: normalized degree centrality and weighted out-degree.

use petgraph::Direction;
use tracing::instrument;

use crate::graph::InteractionDiGraph;
use crate::scores::NodeScores;

// ---------------------------------------------------------------------------
// Degree Counts
// ---------------------------------------------------------------------------

/// Raw per-speaker edge counts.
#[derive(Debug, Clone, PartialEq)]
pub struct DegreeCounts {
    /// Distinct speakers who spoke right before this one.
    pub in_degree: NodeScores<usize>,
    /// Distinct speakers this one spoke right before.
    pub out_degree: NodeScores<usize>,
    /// `in_degree + out_degree`.
    pub total_degree: NodeScores<usize>,
}

/// Count incoming, outgoing, and total edges for every node.
#[must_use]
pub fn degree_counts(ig: &InteractionDiGraph) -> DegreeCounts {
    let g = &ig.graph;
    let mut ins = Vec::with_capacity(g.node_count());
    let mut outs = Vec::with_capacity(g.node_count());
    let mut totals = Vec::with_capacity(g.node_count());

    for idx in g.node_indices() {
        let in_d = g.neighbors_directed(idx, Direction::Incoming).count();
        let out_d = g.neighbors_directed(idx, Direction::Outgoing).count();
        ins.push(in_d);
        outs.push(out_d);
        totals.push(in_d + out_d);
    }

    DegreeCounts {
        in_degree: NodeScores::from_indexed(ig, ins),
        out_degree: NodeScores::from_indexed(ig, outs),
        total_degree: NodeScores::from_indexed(ig, totals),
    }
}

// ---------------------------------------------------------------------------
// Degree Centrality
// ---------------------------------------------------------------------------

/// Degree centrality: `(in + out) / (n - 1)`.
///
/// Values above 1.0 are possible when a speaker both precedes and follows
/// most of the cast. Graphs with fewer than two nodes score 0.0.
#[must_use]
#[instrument(skip(ig))]
#[allow(clippy::cast_precision_loss)]
pub fn degree_centrality(ig: &InteractionDiGraph) -> NodeScores {
    let n = ig.node_count();
    let totals = degree_counts(ig).total_degree;
    let scale = if n < 2 { 0.0 } else { 1.0 / (n - 1) as f64 };
    let values = totals.iter().map(|(_, d)| d as f64 * scale).collect();
    NodeScores::from_indexed(ig, values)
}

// ---------------------------------------------------------------------------
// Weighted Degree
// ---------------------------------------------------------------------------

/// Sum of outgoing interaction counts per speaker.
///
/// Only outgoing edges count: a speaker's weighted degree is how often
/// someone else spoke right after them.
#[must_use]
#[instrument(skip(ig))]
pub fn weighted_out_degree(ig: &InteractionDiGraph) -> NodeScores<u64> {
    let g = &ig.graph;
    let values = g
        .node_indices()
        .map(|idx| {
            g.edges_directed(idx, Direction::Outgoing)
                .map(|e| *e.weight())
                .fold(0u64, u64::saturating_add)
        })
        .collect();
    NodeScores::from_indexed(ig, values)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
