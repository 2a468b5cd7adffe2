//! Compressed sparse representation of the similarity graph

use std::collections::BTreeSet;
use std::mem;

use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};

use crate::graph::Edge;

/// Undirected, simple graph over image identifiers.
///
/// Every undirected edge is stored twice, once in each endpoint's
/// neighbour list. Node `i` is `node_ids[i]`, and `node_ids` is sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarityGraph {
    /// Number of nodes in the graph
    pub node_count: usize,

    /// Offset array: `offsets[i]..offsets[i+1]` is the neighbour range of node i
    pub offsets: Vec<u32>,

    /// Concatenated, sorted neighbour lists
    pub neighbours: Vec<u32>,

    /// Identifier of each node, ascending
    pub node_ids: Vec<String>,
}

impl SimilarityGraph {
    /// Create an empty graph with pre-allocated capacity
    pub fn with_capacity(node_count: usize, edge_count: usize) -> Self {
        Self {
            node_count: 0,
            offsets: Vec::with_capacity(node_count + 1),
            neighbours: Vec::with_capacity(edge_count * 2),
            node_ids: Vec::with_capacity(node_count),
        }
    }

    /// Neighbours of a node
    pub fn neighbours(&self, node: usize) -> &[u32] {
        let start = self.offsets[node] as usize;
        let end = self.offsets[node + 1] as usize;
        &self.neighbours[start..end]
    }

    /// Check whether two nodes are adjacent
    pub fn has_edge(&self, a: usize, b: u32) -> bool {
        self.neighbours(a).binary_search(&b).is_ok()
    }

    pub fn degree(&self, node: usize) -> usize {
        self.neighbours(node).len()
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.neighbours.len() / 2
    }

    /// Index of a node by identifier
    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.node_ids
            .binary_search_by(|node| node.as_str().cmp(id))
            .ok()
    }

    /// Iterate over undirected edges as index pairs with `a < b`
    pub fn edge_indices(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.node_count).flat_map(move |a| {
            self.neighbours(a)
                .iter()
                .map(|&b| b as usize)
                .filter(move |&b| a < b)
                .map(move |b| (a, b))
        })
    }

    /// Edge set keyed by identifier
    pub fn edge_set(&self) -> BTreeSet<Edge> {
        self.edge_indices()
            .filter_map(|(a, b)| Edge::new(self.node_ids[a].as_str(), self.node_ids[b].as_str()))
            .collect()
    }

    /// Export to a petgraph undirected graph with the same node order
    pub fn to_petgraph(&self) -> UnGraph<String, ()> {
        let mut graph = UnGraph::with_capacity(self.node_count, self.edge_count());
        for id in &self.node_ids {
            graph.add_node(id.clone());
        }
        for (a, b) in self.edge_indices() {
            graph.add_edge(NodeIndex::new(a), NodeIndex::new(b), ());
        }
        graph
    }

    /// Estimate memory usage in bytes
    pub fn memory_usage(&self) -> usize {
        let base = mem::size_of::<Self>();
        let offsets = self.offsets.capacity() * mem::size_of::<u32>();
        let neighbours = self.neighbours.capacity() * mem::size_of::<u32>();
        let ids = self.node_ids.iter().map(|s| s.capacity()).sum::<usize>();

        base + offsets + neighbours + ids
    }
}
