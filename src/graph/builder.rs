//! Graph construction module

use std::collections::HashMap;

use crate::error::ClusterError;
use crate::graph::{Edge, SimilarityGraph};

/// Builder for a [`SimilarityGraph`] over a fixed node set
pub struct GraphBuilder {
    /// Node identifiers, ascending
    node_ids: Vec<String>,

    /// Mapping from identifiers to node indices
    id_to_index: HashMap<String, u32>,

    /// Adjacency lists for each node
    adjacency_lists: Vec<Vec<u32>>,
}

impl GraphBuilder {
    /// Start a graph containing every given identifier as a node.
    /// Repeated identifiers collapse into one node.
    pub fn with_nodes<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut node_ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        node_ids.sort_unstable();
        node_ids.dedup();

        let id_to_index = node_ids
            .iter()
            .enumerate()
            .map(|(idx, id)| (id.clone(), idx as u32))
            .collect();
        let adjacency_lists = vec![Vec::new(); node_ids.len()];

        Self {
            node_ids,
            id_to_index,
            adjacency_lists,
        }
    }

    fn index_of(&self, id: &str) -> Result<u32, ClusterError> {
        self.id_to_index
            .get(id)
            .copied()
            .ok_or_else(|| ClusterError::UnknownNode(id.to_string()))
    }

    /// Add an undirected edge between two existing nodes
    pub fn add_edge(&mut self, edge: &Edge) -> Result<(), ClusterError> {
        let a = self.index_of(&edge.a)?;
        let b = self.index_of(&edge.b)?;
        if a == b {
            return Ok(());
        }

        self.adjacency_lists[a as usize].push(b);
        self.adjacency_lists[b as usize].push(a);
        Ok(())
    }

    /// Add every edge from an iterator
    pub fn add_edges<'a, I>(&mut self, edges: I) -> Result<(), ClusterError>
    where
        I: IntoIterator<Item = &'a Edge>,
    {
        for edge in edges {
            self.add_edge(edge)?;
        }
        Ok(())
    }

    /// Build the compressed graph
    pub fn build(mut self) -> SimilarityGraph {
        let node_count = self.node_ids.len();

        // Sort for binary search and drop parallel edges
        for list in &mut self.adjacency_lists {
            list.sort_unstable();
            list.dedup();
        }

        let edge_count: usize = self.adjacency_lists.iter().map(|list| list.len()).sum();
        let mut graph = SimilarityGraph::with_capacity(node_count, edge_count / 2);

        graph.offsets.push(0);
        let mut offset = 0;
        for list in &self.adjacency_lists {
            offset += list.len() as u32;
            graph.offsets.push(offset);
            graph.neighbours.extend_from_slice(list);
        }

        graph.node_count = node_count;
        graph.node_ids = self.node_ids;

        log::debug!(
            "Built graph with {} nodes and {} edges",
            graph.node_count,
            graph.edge_count()
        );

        graph
    }
}

/// Build a graph from a node set and an accepted-edge set
pub fn build_graph<'a, I, S, E>(ids: I, edges: E) -> Result<SimilarityGraph, ClusterError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
    E: IntoIterator<Item = &'a Edge>,
{
    let mut builder = GraphBuilder::with_nodes(ids);
    builder.add_edges(edges)?;
    Ok(builder.build())
}
