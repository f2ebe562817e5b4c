//! Per-speaker score vectors in graph insertion order.

use std::cmp::Ordering;
use std::ops::Index;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::graph::InteractionDiGraph;

/// One score per node, in the order nodes were added to the graph.
///
/// Insertion order matters: [`NodeScores::top`] breaks ties by it.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeScores<T = f64> {
    entries: Vec<(String, T)>,
}

impl<T: Copy + PartialOrd> NodeScores<T> {
    /// Pair node-indexed `values` with the node names of `g`.
    ///
    /// `values[i]` must belong to the node with index `i`.
    #[must_use]
    pub fn from_indexed(g: &InteractionDiGraph, values: Vec<T>) -> Self {
        debug_assert_eq!(values.len(), g.node_count());
        let entries = g
            .graph
            .node_weights()
            .cloned()
            .zip(values)
            .collect();
        Self { entries }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<T> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, T)> + '_ {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of the `n` highest-scoring nodes, highest first.
    ///
    /// The sort is stable, so equal scores keep insertion order. Fewer than
    /// `n` names come back when the graph is smaller than `n`.
    #[must_use]
    pub fn top(&self, n: usize) -> Vec<String> {
        let mut order: Vec<usize> = (0..self.entries.len()).collect();
        order.sort_by(|&a, &b| {
            self.entries[b]
                .1
                .partial_cmp(&self.entries[a].1)
                .unwrap_or(Ordering::Equal)
        });
        order
            .into_iter()
            .take(n)
            .map(|i| self.entries[i].0.clone())
            .collect()
    }
}

impl<T> Index<&str> for NodeScores<T> {
    type Output = T;

    fn index(&self, name: &str) -> &T {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
            .unwrap_or_else(|| panic!("no score for node {name:?}"))
    }
}

impl<T: Serialize> Serialize for NodeScores<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
