//! Closeness centrality on incoming distances.
//!
//! # Definition
//!
//! For a node `v`, let `R(v)` be the set of other nodes that can reach `v`
//! along directed edges, and `D(v)` the sum of their hop distances to `v`.
//! Then
//!
//! ```text
//! closeness(v) = (|R(v)| / D(v)) * (|R(v)| / (n - 1))
//! ```
//!
//! The second factor scales down nodes that only part of the graph can reach,
//! so scores stay comparable across disconnected conversation groups. A node
//! nobody reaches, or a graph with one node, scores 0.0.
//!
//! Distances are hop counts: interaction weights are ignored.

use std::collections::VecDeque;

use petgraph::{Direction, graph::NodeIndex};
use tracing::instrument;

use crate::graph::InteractionDiGraph;
use crate::scores::NodeScores;

/// Compute closeness centrality for every speaker.
#[must_use]
#[instrument(skip(ig))]
pub fn closeness_centrality(ig: &InteractionDiGraph) -> NodeScores {
    let n = ig.node_count();
    let values = ig
        .graph
        .node_indices()
        .map(|v| {
            let (reached, total) = incoming_distances(ig, v, n);
            closeness_from(reached, total, n)
        })
        .collect();
    NodeScores::from_indexed(ig, values)
}

/// BFS over reversed edges from `target`.
///
/// Returns the number of other nodes that reach `target` and the sum of
/// their distances to it.
fn incoming_distances(ig: &InteractionDiGraph, target: NodeIndex, n: usize) -> (usize, usize) {
    let g = &ig.graph;
    let mut dist: Vec<Option<usize>> = vec![None; n];
    dist[target.index()] = Some(0);

    let mut queue = VecDeque::from([target]);
    let mut reached = 0usize;
    let mut total = 0usize;

    while let Some(v) = queue.pop_front() {
        let dv = dist[v.index()].unwrap_or(0);
        for u in g.neighbors_directed(v, Direction::Incoming) {
            if dist[u.index()].is_none() {
                dist[u.index()] = Some(dv + 1);
                reached += 1;
                total += dv + 1;
                queue.push_back(u);
            }
        }
    }

    (reached, total)
}

#[allow(clippy::cast_precision_loss)]
fn closeness_from(reached: usize, total: usize, n: usize) -> f64 {
    if total == 0 || n < 2 {
        return 0.0;
    }
    let r = reached as f64;
    (r / total as f64) * (r / (n - 1) as f64)
}

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

    #[test]
    fn chain_uses_incoming_distances() {
        // a → b → c
        let cc = closeness_centrality(&graph(&[("a", "b", 1), ("b", "c", 1)]));
        assert!((cc["a"] - 0.0).abs() < f64::EPSILON, "nobody reaches a");
        // b: reached by a at distance 1 → (1/1) * (1/2)
        assert!((cc["b"] - 0.5).abs() < 1e-10);
        // c: a at 2, b at 1 → (2/3) * (2/2)
        assert!((cc["c"] - 2.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn weights_are_ignored() {
        let light = closeness_centrality(&graph(&[("a", "b", 1), ("b", "c", 1)]));
        let heavy = closeness_centrality(&graph(&[("a", "b", 50), ("b", "c", 2)]));
        assert_eq!(light, heavy);
    }

    #[test]
    fn partial_reach_is_scaled_down() {
        // x → y in a 4-node graph: y is reached by 1 of 3 others.
        let cc = closeness_centrality(&graph(&[("x", "y", 1), ("p", "q", 1)]));
        assert!((cc["y"] - 1.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn cycle_is_symmetric() {
        let cc = closeness_centrality(&graph(&[("a", "b", 1), ("b", "c", 1), ("c", "a", 1)]));
        // each node: others at 1 and 2 → (2/3) * (2/2)
        for name in ["a", "b", "c"] {
            assert!((cc[name] - 2.0 / 3.0).abs() < 1e-10, "{name}");
        }
    }

    #[test]
    fn single_node_scores_zero() {
        let mut net = InteractionGraph::new();
        net.declare_source("solo");
        let cc = closeness_centrality(&InteractionDiGraph::from_network(&net));
        assert!((cc["solo"] - 0.0).abs() < f64::EPSILON);
    }
}
