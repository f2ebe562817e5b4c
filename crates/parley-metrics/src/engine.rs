//! Centrality engine: runs every metric and reduces them to top-N rankings.

use std::time::Instant;

use parley_core::InteractionGraph;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::graph::InteractionDiGraph;
use crate::metrics::betweenness::betweenness_centrality;
use crate::metrics::closeness::closeness_centrality;
use crate::metrics::degree::{degree_centrality, weighted_out_degree};
use crate::scores::NodeScores;

/// Default number of speakers kept per ranking.
pub const DEFAULT_TOP_N: usize = 3;

/// Full per-speaker scores for all four measures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CentralityScores {
    pub degree: NodeScores,
    pub weighted_degree: NodeScores<u64>,
    pub closeness: NodeScores,
    pub betweenness: NodeScores,
}

/// Top-N speaker names per measure, highest first.
///
/// Serializes to the stats document: one key per measure, in this order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CentralityReport {
    pub degree: Vec<String>,
    pub weighted_degree: Vec<String>,
    pub closeness: Vec<String>,
    pub betweenness: Vec<String>,
}

impl CentralityScores {
    /// Run every metric over `ig`.
    #[must_use]
    #[instrument(skip(ig), fields(nodes = ig.node_count(), edges = ig.edge_count()))]
    pub fn compute(ig: &InteractionDiGraph) -> Self {
        let started = Instant::now();

        let degree = degree_centrality(ig);
        let weighted_degree = weighted_out_degree(ig);
        let closeness = closeness_centrality(ig);
        let betweenness = betweenness_centrality(ig);

        debug!(elapsed_ms = started.elapsed().as_millis(), "centrality computed");
        Self {
            degree,
            weighted_degree,
            closeness,
            betweenness,
        }
    }

    /// Reduce to the `n` best speakers per measure.
    #[must_use]
    pub fn top(&self, n: usize) -> CentralityReport {
        CentralityReport {
            degree: self.degree.top(n),
            weighted_degree: self.weighted_degree.top(n),
            closeness: self.closeness.top(n),
            betweenness: self.betweenness.top(n),
        }
    }
}

/// Build the speaker graph from `network` and score every speaker.
///
/// The graph is returned alongside the scores for callers that also want
/// its structural statistics.
#[must_use]
pub fn score_network(network: &InteractionGraph) -> (InteractionDiGraph, CentralityScores) {
    let ig = InteractionDiGraph::from_network(network);
    let scores = CentralityScores::compute(&ig);
    info!(
        nodes = ig.node_count(),
        edges = ig.edge_count(),
        hash = %ig.content_hash,
        "scored speakers"
    );
    (ig, scores)
}

/// Build the speaker graph from `network` and rank its top `n` speakers.
#[must_use]
pub fn compute_centrality(network: &InteractionGraph, n: usize) -> CentralityReport {
    score_network(network).1.top(n)
}
