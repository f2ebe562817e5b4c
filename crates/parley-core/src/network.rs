//! Weighted interaction network: accumulation, retention, and JSON codec.
//!
//! # Representation
//!
//! [`InteractionGraph`] is an adjacency structure keyed by interned node
//! ids. Character names are interned once on first sight, so the repeated
//! `(from, to)` lookups during accumulation never compare strings.
//!
//! Two orders are tracked because downstream tie-breaking depends on them:
//!
//! - **node order**: first appearance of a name anywhere (source or target);
//! - **source order**: first appearance of a name as an edge source.
//!
//! Targets of each source are kept in first-observation order.
//!
//! # Invariants
//!
//! - No self-loops: `from != to` for every edge.
//! - Every weight is ≥ 1; parallel observations sum into one edge.
//!
//! # Document format
//!
//! The graph serializes as a JSON object mapping each source (in source
//! order) to an object mapping targets to integer weights:
//!
//! ```json
//! {
//!     "twilight sparkle": { "spike": 12, "rarity": 4 },
//!     "spike": { "twilight sparkle": 9 }
//! }
//! ```
//!
//! Decoding preserves document order, so a document round-trips to a graph
//! with the same source and target orders.

use std::collections::HashMap;
use std::fmt;
use std::io::Write;

use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{debug, info, instrument, warn};

use crate::exclusion::ExclusionSet;
use crate::infer::{InferenceStats, Interaction, InteractionInferer};
use crate::turn::Turn;

/// Number of speakers kept by [`InteractionGraph::retain_top_speakers`] by default.
pub const DEFAULT_TOP_SPEAKERS: usize = 101;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while constructing or decoding a network.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// An edge from a character to itself.
    #[error("self-loop on {0:?}: a character cannot address itself")]
    SelfLoop(String),

    /// An edge with weight 0.
    #[error("edge {from:?} -> {to:?} has zero weight")]
    ZeroWeight { from: String, to: String },

    /// A source key appeared twice in one document.
    #[error("source {0:?} appears more than once")]
    DuplicateSource(String),

    /// A target key appeared twice under the same source.
    #[error("edge {from:?} -> {to:?} appears more than once")]
    DuplicateEdge { from: String, to: String },

    /// Malformed JSON or a failed write.
    #[error("network document error: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// InteractionGraph
// ---------------------------------------------------------------------------

/// Directed, weighted who-talks-to-whom graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionGraph {
    /// Interned names, indexed by node id.
    names: Vec<String>,
    /// Name → node id.
    lookup: HashMap<String, usize>,
    /// Outgoing `(target, weight)` lists, indexed by node id.
    outgoing: Vec<Vec<(usize, u64)>>,
    /// `(from, to)` → position in `outgoing[from]`.
    slots: HashMap<(usize, usize), usize>,
    /// Node ids in first-appearance-as-source order.
    sources: Vec<usize>,
    /// Whether a node id has been declared a source.
    is_source: Vec<bool>,
}

impl InteractionGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `weight` to the edge `from → to`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::SelfLoop`] if `from == to` and
    /// [`NetworkError::ZeroWeight`] if `weight == 0`.
    pub fn add_edge(&mut self, from: &str, to: &str, weight: u64) -> Result<(), NetworkError> {
        if from == to {
            return Err(NetworkError::SelfLoop(from.to_owned()));
        }
        if weight == 0 {
            return Err(NetworkError::ZeroWeight {
                from: from.to_owned(),
                to: to.to_owned(),
            });
        }
        self.bump(from, to, weight);
        Ok(())
    }

    /// Register `name` as a source even if it has no outgoing edges yet.
    ///
    /// A source without edges is left out of the network document.
    pub fn declare_source(&mut self, name: &str) {
        let id = self.intern(name);
        self.mark_source(id);
    }

    /// Number of distinct characters (sources and targets).
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    /// Number of distinct directed edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of characters that act as a source.
    #[must_use]
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Sum of all edge weights, saturating at `u64::MAX`.
    #[must_use]
    pub fn total_weight(&self) -> u64 {
        self.outgoing
            .iter()
            .flatten()
            .map(|&(_, w)| w)
            .fold(0u64, u64::saturating_add)
    }

    /// Returns `true` if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns `true` if `name` is a node.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.lookup.contains_key(name)
    }

    /// Weight of the edge `from → to`, if present.
    #[must_use]
    pub fn weight(&self, from: &str, to: &str) -> Option<u64> {
        let from = *self.lookup.get(from)?;
        let to = *self.lookup.get(to)?;
        let slot = *self.slots.get(&(from, to))?;
        Some(self.outgoing[from][slot].1)
    }

    /// Total outgoing weight of `name` (0 if unknown or never a source).
    #[must_use]
    pub fn out_weight(&self, name: &str) -> u64 {
        self.lookup
            .get(name)
            .map_or(0, |&id| self.out_weight_of(id))
    }

    /// Node names in first-appearance order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(String::as_str)
    }

    /// Source names in first-appearance-as-source order.
    pub fn sources(&self) -> impl Iterator<Item = &str> + '_ {
        self.sources.iter().map(|&id| self.names[id].as_str())
    }

    /// All edges as `(from, to, weight)`, grouped by source in source order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, u64)> + '_ {
        self.sources.iter().flat_map(move |&from| {
            self.outgoing[from]
                .iter()
                .map(move |&(to, w)| (self.names[from].as_str(), self.names[to].as_str(), w))
        })
    }

    /// Outgoing `(target, weight)` pairs of `source` in observation order.
    #[must_use]
    pub fn targets_of(&self, source: &str) -> Vec<(&str, u64)> {
        self.lookup.get(source).map_or_else(Vec::new, |&id| {
            self.outgoing[id]
                .iter()
                .map(|&(to, w)| (self.names[to].as_str(), w))
                .collect()
        })
    }

    /// Sources ranked by total outgoing weight, heaviest first.
    ///
    /// Ties keep source order (the sort is stable).
    #[must_use]
    pub fn speaker_ranking(&self) -> Vec<(&str, u64)> {
        self.ranked_sources()
            .into_iter()
            .map(|(id, w)| (self.names[id].as_str(), w))
            .collect()
    }

    /// Keep only the `k` heaviest speakers and their outgoing edges.
    ///
    /// Edges pointing at speakers that were dropped are kept; those
    /// characters remain nodes but lose their own outgoing edges. The
    /// retained graph lists sources in rank order.
    #[must_use]
    pub fn retain_top_speakers(&self, k: usize) -> Self {
        let mut kept = Self::new();
        for (id, _) in self.ranked_sources().into_iter().take(k) {
            let from = &self.names[id];
            kept.declare_source(from);
            for &(to, w) in &self.outgoing[id] {
                kept.bump(from, &self.names[to], w);
            }
        }
        kept
    }

    /// Add every edge weight of `other` into `self`.
    pub fn absorb(&mut self, other: &Self) {
        for &src in &other.sources {
            let from = &other.names[src];
            self.declare_source(from);
            for &(to, w) in &other.outgoing[src] {
                self.bump(from, &other.names[to], w);
            }
        }
    }

    /// Decode a network document.
    ///
    /// Sources with an empty listener map are skipped: a document only
    /// contributes nodes through its edges.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed JSON, non-integer or zero weights,
    /// self-loops, or duplicate keys.
    pub fn from_json_str(document: &str) -> Result<Self, NetworkError> {
        Ok(serde_json::from_str(document)?)
    }

    /// Write the network document with four-space indentation.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying write fails.
    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), NetworkError> {
        Ok(crate::json::to_writer_indented(writer, self)?)
    }

    /// Render the network document as a string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_string(&self) -> Result<String, NetworkError> {
        Ok(crate::json::to_string_indented(self)?)
    }

    // -- internals ----------------------------------------------------------

    fn intern(&mut self, name: &str) -> usize {
        if let Some(&id) = self.lookup.get(name) {
            return id;
        }
        let id = self.names.len();
        self.names.push(name.to_owned());
        self.lookup.insert(name.to_owned(), id);
        self.outgoing.push(Vec::new());
        self.is_source.push(false);
        id
    }

    fn mark_source(&mut self, id: usize) {
        if !self.is_source[id] {
            self.is_source[id] = true;
            self.sources.push(id);
        }
    }

    /// Unchecked edge increment; callers uphold the invariants.
    fn bump(&mut self, from: &str, to: &str, weight: u64) {
        let from = self.intern(from);
        let to = self.intern(to);
        self.mark_source(from);

        if let Some(&slot) = self.slots.get(&(from, to)) {
            let entry = &mut self.outgoing[from][slot].1;
            *entry = entry.saturating_add(weight);
        } else {
            self.slots.insert((from, to), self.outgoing[from].len());
            self.outgoing[from].push((to, weight));
        }
    }

    fn out_weight_of(&self, id: usize) -> u64 {
        self.outgoing[id]
            .iter()
            .map(|&(_, w)| w)
            .fold(0u64, u64::saturating_add)
    }

    fn ranked_sources(&self) -> Vec<(usize, u64)> {
        let mut ranking: Vec<(usize, u64)> = self
            .sources
            .iter()
            .map(|&id| (id, self.out_weight_of(id)))
            .collect();
        ranking.sort_by(|a, b| b.1.cmp(&a.1));
        ranking
    }

    fn insert_document_source(
        &mut self,
        source: &str,
        targets: Vec<(String, u64)>,
    ) -> Result<(), NetworkError> {
        if self
            .lookup
            .get(source)
            .is_some_and(|&id| self.is_source[id])
        {
            return Err(NetworkError::DuplicateSource(source.to_owned()));
        }
        if targets.is_empty() {
            debug!(source, "skipping source with no listeners");
            return Ok(());
        }
        for (target, weight) in targets {
            if self.weight(source, &target).is_some() {
                return Err(NetworkError::DuplicateEdge {
                    from: source.to_owned(),
                    to: target,
                });
            }
            self.add_edge(source, &target, weight)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Serde
// ---------------------------------------------------------------------------

struct TargetsRef<'a> {
    graph: &'a InteractionGraph,
    source: usize,
}

impl Serialize for TargetsRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let edges = &self.graph.outgoing[self.source];
        let mut map = serializer.serialize_map(Some(edges.len()))?;
        for &(to, w) in edges {
            map.serialize_entry(&self.graph.names[to], &w)?;
        }
        map.end()
    }
}

impl Serialize for InteractionGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let speaking: Vec<usize> = self
            .sources
            .iter()
            .copied()
            .filter(|&src| !self.outgoing[src].is_empty())
            .collect();
        let mut map = serializer.serialize_map(Some(speaking.len()))?;
        for src in speaking {
            map.serialize_entry(
                &self.names[src],
                &TargetsRef {
                    graph: self,
                    source: src,
                },
            )?;
        }
        map.end()
    }
}

/// Target map of one source, in document order.
struct OrderedTargets(Vec<(String, u64)>);

impl<'de> Deserialize<'de> for OrderedTargets {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TargetsVisitor;

        impl<'de> Visitor<'de> for TargetsVisitor {
            type Value = OrderedTargets;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of listener names to interaction counts")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut targets = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, weight)) = map.next_entry::<String, u64>()? {
                    targets.push((name, weight));
                }
                Ok(OrderedTargets(targets))
            }
        }

        deserializer.deserialize_map(TargetsVisitor)
    }
}

impl<'de> Deserialize<'de> for InteractionGraph {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NetworkVisitor;

        impl<'de> Visitor<'de> for NetworkVisitor {
            type Value = InteractionGraph;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of speaker names to listener maps")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut graph = InteractionGraph::new();
                while let Some(source) = map.next_key::<String>()? {
                    let OrderedTargets(targets) = map.next_value()?;
                    graph
                        .insert_document_source(&source, targets)
                        .map_err(de::Error::custom)?;
                }
                Ok(graph)
            }
        }

        deserializer.deserialize_map(NetworkVisitor)
    }
}

// ---------------------------------------------------------------------------
// GraphAccumulator
// ---------------------------------------------------------------------------

/// Folds a stream of [`Interaction`]s into an [`InteractionGraph`].
///
/// Accumulation is a sum per `(from, to)` pair, so the resulting weights do
/// not depend on how the stream is batched.
#[derive(Debug, Clone, Default)]
pub struct GraphAccumulator {
    graph: InteractionGraph,
    recorded: usize,
}

impl GraphAccumulator {
    /// Start with an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one observation of `interaction`.
    ///
    /// Self-addressed interactions are dropped with a warning; the inferer
    /// never produces them.
    pub fn record(&mut self, interaction: &Interaction) {
        if interaction.from == interaction.to {
            warn!(character = %interaction.from, "dropping self-addressed interaction");
            return;
        }
        self.graph.bump(&interaction.from, &interaction.to, 1);
        self.recorded += 1;
    }

    /// Count every interaction in `interactions`.
    pub fn record_all<'a, I>(&mut self, interactions: I)
    where
        I: IntoIterator<Item = &'a Interaction>,
    {
        for interaction in interactions {
            self.record(interaction);
        }
    }

    /// Interactions counted so far.
    #[must_use]
    pub const fn recorded(&self) -> usize {
        self.recorded
    }

    /// The graph built so far.
    #[must_use]
    pub const fn graph(&self) -> &InteractionGraph {
        &self.graph
    }

    /// Hand over the accumulated graph.
    #[must_use]
    pub fn finish(self) -> InteractionGraph {
        self.graph
    }
}

/// Run inference and accumulation over a whole transcript.
///
/// Returns the full (unretained) graph and the inferer's counters.
#[must_use]
#[instrument(skip_all, fields(turns = turns.len()))]
pub fn build_network(turns: &[Turn], exclusions: ExclusionSet) -> (InteractionGraph, InferenceStats) {
    let mut inferer = InteractionInferer::new(exclusions);
    let mut accumulator = GraphAccumulator::new();

    for turn in turns {
        if let Some(interaction) = inferer.observe(turn) {
            accumulator.record(&interaction);
        }
    }

    let stats = inferer.stats();
    let graph = accumulator.finish();
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        interactions = stats.interactions,
        episode_resets = stats.episode_resets,
        "accumulated interaction graph"
    );
    (graph, stats)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
