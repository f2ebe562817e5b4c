//! Graph construction from an interaction network.
//!
//! # Node Order
//!
//! Nodes are added while walking the network document: each source in
//! document order, then each of its targets not seen before. Ranking ties
//! are broken by this order, so it is part of the output contract.
//!
//! # Edge Weights
//!
//! An edge `A → B` carries the number of times B spoke right after A. The
//! weight is a count, not a distance; see [`crate::metrics::betweenness`]
//! for how it is used there.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use parley_core::InteractionGraph;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::instrument;

// ---------------------------------------------------------------------------
// InteractionDiGraph
// ---------------------------------------------------------------------------

/// A directed, weighted speaker graph ready for centrality computation.
#[derive(Debug, Clone)]
pub struct InteractionDiGraph {
    /// Directed graph: nodes = speaker names, edges = interaction counts.
    pub graph: DiGraph<String, u64>,
    /// Mapping from speaker name to petgraph `NodeIndex`.
    pub node_map: HashMap<String, NodeIndex>,
    /// BLAKE3 content hash of the weighted edge set.
    pub content_hash: String,
}

impl InteractionDiGraph {
    /// Build the graph from a network document.
    ///
    /// The content hash is taken over the sorted `(from, to, weight)` list,
    /// so two documents with the same edges in a different order hash the
    /// same.
    #[must_use]
    #[instrument(skip(network), fields(sources = network.source_count()))]
    pub fn from_network(network: &InteractionGraph) -> Self {
        let mut graph = DiGraph::<String, u64>::with_capacity(network.node_count(), network.edge_count());
        let mut node_map: HashMap<String, NodeIndex> = HashMap::with_capacity(network.node_count());

        for source in network.sources() {
            let from = intern(&mut graph, &mut node_map, source);
            for (target, weight) in network.targets_of(source) {
                let to = intern(&mut graph, &mut node_map, target);
                graph.add_edge(from, to, weight);
            }
        }

        let mut edges: Vec<(&str, &str, u64)> = network.edges().collect();
        edges.sort_unstable();
        let content_hash = compute_edge_hash(&edges);

        Self {
            graph,
            node_map,
            content_hash,
        }
    }

    /// Return the number of speakers in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of directed speaker pairs in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Look up the `NodeIndex` for a speaker.
    #[must_use]
    pub fn node_index(&self, name: &str) -> Option<NodeIndex> {
        self.node_map.get(name).copied()
    }

    /// Return the speaker name for a node.
    #[must_use]
    pub fn name(&self, idx: NodeIndex) -> Option<&str> {
        self.graph.node_weight(idx).map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn intern(
    graph: &mut DiGraph<String, u64>,
    node_map: &mut HashMap<String, NodeIndex>,
    name: &str,
) -> NodeIndex {
    if let Some(&idx) = node_map.get(name) {
        return idx;
    }
    let idx = graph.add_node(name.to_string());
    node_map.insert(name.to_string(), idx);
    idx
}

/// Compute a BLAKE3 hash of the sorted weighted edge list.
fn compute_edge_hash(edges: &[(&str, &str, u64)]) -> String {
    let mut hasher = blake3::Hasher::new();
    for (from, to, weight) in edges {
        hasher.update(from.as_bytes());
        hasher.update(b"\x00");
        hasher.update(to.as_bytes());
        hasher.update(b"\x00");
        hasher.update(&weight.to_le_bytes());
        hasher.update(b"\n");
    }
    format!("blake3:{}", hasher.finalize().to_hex())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
