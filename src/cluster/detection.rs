//! Cluster detection algorithms

use std::collections::BTreeMap;

use crate::cluster::metrics::{calculate_density, central_members};
use crate::cluster::Cluster;
use crate::graph::SimilarityGraph;

/// Union-Find data structure for connected component analysis
pub struct DisjointSets {
    /// Parent pointers (parent[i] = parent of node i)
    parent: Vec<u32>,

    /// Size of the set rooted at each node (for union by size)
    size: Vec<u32>,
}

impl DisjointSets {
    /// Create a new DisjointSets data structure
    pub fn new(size: usize) -> Self {
        Self {
            parent: (0..size as u32).collect(),
            size: vec![1; size],
        }
    }

    /// Find the root of the set containing x with path compression
    pub fn find(&mut self, x: u32) -> u32 {
        let mut root = x;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }

        // Point every node on the path straight at the root
        let mut node = x;
        while self.parent[node as usize] != root {
            let next = self.parent[node as usize];
            self.parent[node as usize] = root;
            node = next;
        }

        root
    }

    /// Union the sets containing x and y
    pub fn union(&mut self, x: u32, y: u32) {
        let root_x = self.find(x);
        let root_y = self.find(y);

        if root_x == root_y {
            return; // Already in the same set
        }

        // Union by size: attach smaller tree under root of larger tree
        let (big, small) = if self.size[root_x as usize] >= self.size[root_y as usize] {
            (root_x, root_y)
        } else {
            (root_y, root_x)
        };
        self.parent[small as usize] = big;
        self.size[big as usize] += self.size[small as usize];
    }

    /// Get the size of the set containing x
    pub fn size(&mut self, x: u32) -> u32 {
        let root = self.find(x);
        self.size[root as usize]
    }
}

/// Partition the graph into connected components.
///
/// Every node lands in exactly one cluster; isolated nodes become
/// singletons. Members are sorted, and clusters are ordered by size
/// (largest first) and then by their first member.
pub fn find_clusters(graph: &SimilarityGraph) -> Vec<Cluster> {
    log::info!("Finding connected components");

    let node_count = graph.node_count;
    let mut sets = DisjointSets::new(node_count);

    for (a, b) in graph.edge_indices() {
        sets.union(a as u32, b as u32);
    }

    // Nodes are visited in ascending order, so member lists stay sorted
    let mut components: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
    for node in 0..node_count as u32 {
        let root = sets.find(node);
        components.entry(root).or_default().push(node);
    }

    let mut groups: Vec<Vec<u32>> = components.into_values().collect();
    groups.sort_by(|a, b| b.len().cmp(&a.len()).then(a[0].cmp(&b[0])));

    let clusters: Vec<Cluster> = groups
        .into_iter()
        .enumerate()
        .map(|(id, members)| {
            let density = calculate_density(graph, &members);
            let central = central_members(graph, &members);
            let resolve = |nodes: &[u32]| -> Vec<String> {
                nodes
                    .iter()
                    .map(|&node| graph.node_ids[node as usize].clone())
                    .collect()
            };
            Cluster {
                id: id as u32,
                size: members.len(),
                members: resolve(&members),
                density,
                central_members: resolve(&central),
            }
        })
        .collect();

    log::info!(
        "Found {} clusters ({} singletons)",
        clusters.len(),
        clusters.iter().filter(|c| c.is_singleton()).count()
    );

    clusters
}
