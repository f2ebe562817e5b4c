//! Weighted betweenness centrality via Brandes' algorithm.
//!
//! # Overview
//!
//! Betweenness centrality measures how often a speaker lies on shortest
//! paths between two other speakers. High-betweenness speakers connect
//! groups that would otherwise rarely follow one another.
//!
//! # Algorithm
//!
//! Brandes (2001), weighted variant:
//!
//! 1. For each source `s`, run Dijkstra to get shortest-path distances and
//!    path counts `sigma`. A strictly shorter route resets a node's count and
//!    predecessors; an equally short route adds to them.
//! 2. Accumulate dependencies in reverse settle order (farthest first).
//! 3. Sum dependencies over all sources, then normalize.
//!
//! Complexity: O(V * E log V).
//!
//! # Edge Length
//!
//! Each edge's length is its **interaction count**. Frequent pairs are
//! therefore treated as *far apart*, the opposite of "frequent partners are
//! close". Published rankings were computed this way and must stay
//! reproducible. Do not invert the weights here.
//!
//! # Normalization
//!
//! [`betweenness_centrality`] divides by `(n - 1) * (n - 2)`, the number of
//! ordered pairs excluding the node itself. Graphs with two or fewer nodes
//! are left unscaled (every score is 0.0 there anyway).

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use petgraph::{Direction, graph::NodeIndex, visit::EdgeRef};
use tracing::instrument;

use crate::graph::InteractionDiGraph;
use crate::scores::NodeScores;

/// Normalized betweenness for every speaker.
#[must_use]
#[instrument(skip(ig))]
#[allow(clippy::cast_precision_loss)]
pub fn betweenness_centrality(ig: &InteractionDiGraph) -> NodeScores {
    let n = ig.node_count();
    let mut cb = brandes(ig);

    if n > 2 {
        let scale = 1.0 / ((n - 1) * (n - 2)) as f64;
        for value in &mut cb {
            *value *= scale;
        }
    }

    NodeScores::from_indexed(ig, cb)
}

/// Unnormalized betweenness: the sum of pair dependencies per speaker.
#[must_use]
pub fn raw_betweenness(ig: &InteractionDiGraph) -> NodeScores {
    NodeScores::from_indexed(ig, brandes(ig))
}

fn brandes(ig: &InteractionDiGraph) -> Vec<f64> {
    let g = &ig.graph;
    let n = g.node_count();

    // Node-indexed betweenness accumulator.
    let mut cb: Vec<f64> = vec![0.0; n];

    for s in g.node_indices() {
        let si = s.index();

        // Nodes in settle order (farthest popped first).
        let mut stack: Vec<usize> = Vec::with_capacity(n);
        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];

        // sigma[t]: number of shortest paths from s to t.
        let mut sigma: Vec<f64> = vec![0.0; n];
        sigma[si] = 1.0;

        let mut dist: Vec<Option<u64>> = vec![None; n];
        dist[si] = Some(0);
        let mut settled = vec![false; n];

        let mut heap = BinaryHeap::new();
        heap.push(Reverse((0u64, si)));

        while let Some(Reverse((d, vi))) = heap.pop() {
            if settled[vi] {
                continue;
            }
            settled[vi] = true;
            stack.push(vi);

            for edge in g.edges_directed(NodeIndex::new(vi), Direction::Outgoing) {
                let wi = edge.target().index();
                let alt = d.saturating_add(*edge.weight());

                match dist[wi] {
                    Some(current) if alt > current => {}
                    Some(current) if alt == current => {
                        sigma[wi] += sigma[vi];
                        predecessors[wi].push(vi);
                    }
                    _ => {
                        dist[wi] = Some(alt);
                        sigma[wi] = sigma[vi];
                        predecessors[wi].clear();
                        predecessors[wi].push(vi);
                        heap.push(Reverse((alt, wi)));
                    }
                }
            }
        }

        // Accumulate dependencies in reverse settle order.
        let mut delta: Vec<f64> = vec![0.0; n];

        while let Some(wi) = stack.pop() {
            for &vi in &predecessors[wi] {
                if sigma[wi] > 0.0 {
                    delta[vi] += (sigma[vi] / sigma[wi]) * (1.0 + delta[wi]);
                }
            }
            if wi != si {
                cb[wi] += delta[wi];
            }
        }
    }

    cb
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::InteractionGraph;

    fn graph(edges: &[(&str, &str, u64)]) -> InteractionDiGraph {
        let mut net = InteractionGraph::new();
        for (a, b, w) in edges {
            net.add_edge(a, b, *w).expect("valid edge");
        }
        InteractionDiGraph::from_network(&net)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-10
    }

    #[test]
    fn empty_graph() {
        let ig = InteractionDiGraph::from_network(&InteractionGraph::new());
        assert!(betweenness_centrality(&ig).is_empty());
    }

    #[test]
    fn chain_middle_nodes() {
        // a → b → c → d, unit weights
        let ig = graph(&[("a", "b", 1), ("b", "c", 1), ("c", "d", 1)]);
        let raw = raw_betweenness(&ig);
        assert!(close(raw["a"], 0.0));
        assert!(close(raw["b"], 2.0), "b on a→c and a→d");
        assert!(close(raw["c"], 2.0), "c on a→d and b→d");
        assert!(close(raw["d"], 0.0));

        let bc = betweenness_centrality(&ig);
        assert!(close(bc["b"], 1.0 / 3.0));
        assert!(close(bc["c"], 1.0 / 3.0));
    }

    #[test]
    fn lighter_route_wins() {
        // a → b → d costs 2, a → c → d costs 6
        let raw = raw_betweenness(&graph(&[("a", "b", 1), ("b", "d", 1), ("a", "c", 1), ("c", "d", 5)]));
        assert!(close(raw["b"], 1.0));
        assert!(close(raw["c"], 0.0));
    }

    #[test]
    fn equal_routes_split_credit() {
        // a → b → d and a → c → d both cost 4
        let raw = raw_betweenness(&graph(&[("a", "b", 2), ("b", "d", 2), ("a", "c", 1), ("c", "d", 3)]));
        assert!(close(raw["b"], 0.5));
        assert!(close(raw["c"], 0.5));
    }

    #[test]
    fn frequent_direct_pair_routes_through_intermediary() {
        // a spoke before c 30 times: that direct edge is *longer* than the
        // 10 + 10 detour through b, so b gets the credit.
        let frequent = raw_betweenness(&graph(&[("a", "b", 10), ("b", "c", 10), ("a", "c", 30)]));
        assert!(close(frequent["b"], 1.0));

        let rare = raw_betweenness(&graph(&[("a", "b", 10), ("b", "c", 10), ("a", "c", 15)]));
        assert!(close(rare["b"], 0.0));
    }

    #[test]
    fn shorter_path_found_late_resets_counts() {
        // Settling order reaches d via the heavy edge first, then finds the
        // lighter two-hop route through c.
        let raw = raw_betweenness(&graph(&[("a", "d", 5), ("a", "b", 1), ("b", "c", 1), ("c", "d", 1)]));
        assert!(close(raw["b"], 2.0), "b on a→c and a→d");
        assert!(close(raw["c"], 2.0), "c on a→d and b→d");
    }

    #[test]
    fn directed_cycle_is_symmetric() {
        let bc = betweenness_centrality(&graph(&[("a", "b", 1), ("b", "c", 1), ("c", "a", 1)]));
        for name in ["a", "b", "c"] {
            assert!(close(bc[name], 0.5), "{name}: {}", bc[name]);
        }
    }

    #[test]
    fn two_nodes_are_not_scaled() {
        let bc = betweenness_centrality(&graph(&[("a", "b", 1), ("b", "a", 1)]));
        assert!(close(bc["a"], 0.0));
        assert!(close(bc["b"], 0.0));
    }

    #[test]
    fn isolated_speaker_scores_zero() {
        let mut net = InteractionGraph::new();
        net.add_edge("a", "b", 1).expect("edge");
        net.add_edge("b", "c", 1).expect("edge");
        net.declare_source("quiet");
        let bc = betweenness_centrality(&InteractionDiGraph::from_network(&net));
        assert!(close(bc["quiet"], 0.0));
        assert!(close(bc["b"], 1.0 / 6.0));
    }
}
