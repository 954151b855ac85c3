//! Undirected airport graph built from delay-filtered flights

use crate::core::models::FlightRecord;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

/// Simple undirected graph of stations connected by at least one flight
///
/// Nodes keep the order in which their codes first appear. Self-loops are
/// never stored and repeated flights between the same pair collapse into one
/// edge.
#[derive(Debug, Clone, Default)]
pub struct FlightNetwork {
    graph: UnGraph<String, ()>,
    index: HashMap<String, NodeIndex>,
}

impl FlightNetwork {
    /// Create an empty network
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the network from records, skipping rows with a blank code
    #[must_use]
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a FlightRecord>,
    {
        let mut network = Self::new();
        for (origin, destination) in records.into_iter().filter_map(FlightRecord::stations) {
            network.add_connection(origin, destination);
        }
        network
    }

    fn node(&mut self, code: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(code) {
            return idx;
        }
        let idx = self.graph.add_node(code.to_string());
        self.index.insert(code.to_string(), idx);
        idx
    }

    /// Connect two stations. Returns `false` for a self-loop.
    pub fn add_connection(&mut self, a: &str, b: &str) -> bool {
        if a == b {
            return false;
        }
        let a = self.node(a);
        let b = self.node(b);
        self.graph.update_edge(a, b, ());
        true
    }

    /// Number of stations
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of distinct connections
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether the network has no stations
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Station codes in first-appearance order
    pub fn codes(&self) -> impl Iterator<Item = &str> + '_ {
        self.graph.node_weights().map(String::as_str)
    }

    /// Number of distinct neighbours of `code` (0 if absent)
    #[must_use]
    pub fn degree(&self, code: &str) -> usize {
        self.index
            .get(code)
            .map_or(0, |&idx| self.graph.neighbors(idx).count())
    }

    /// Degrees in node order
    #[must_use]
    pub fn degrees(&self) -> Vec<usize> {
        self.graph
            .node_indices()
            .map(|idx| self.graph.neighbors(idx).count())
            .collect()
    }

    /// Edges as node-position pairs, in insertion order
    #[must_use]
    pub fn edge_positions(&self) -> Vec<(usize, usize)> {
        self.graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index()))
            .collect()
    }
}
