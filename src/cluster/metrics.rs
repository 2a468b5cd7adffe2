//! Cluster statistics and metrics

use std::collections::HashSet;

use crate::graph::SimilarityGraph;

/// How many central members are reported per cluster
pub const CENTRAL_MEMBER_COUNT: usize = 5;

/// Calculate density (actual edges / potential undirected edges)
pub fn calculate_density(graph: &SimilarityGraph, members: &[u32]) -> f32 {
    let n = members.len();
    if n <= 1 {
        return 1.0; // By convention, singleton clusters have density 1
    }

    let potential_edges = n * (n - 1) / 2;
    let member_set: HashSet<u32> = members.iter().copied().collect();

    // Each internal edge is seen from both endpoints
    let endpoint_hits: usize = members
        .iter()
        .map(|&node| {
            graph
                .neighbours(node as usize)
                .iter()
                .filter(|&&dst| member_set.contains(&dst))
                .count()
        })
        .sum();

    (endpoint_hits / 2) as f32 / potential_edges as f32
}

/// Members with the highest degree, ties broken by node order
pub fn central_members(graph: &SimilarityGraph, members: &[u32]) -> Vec<u32> {
    let mut by_degree: Vec<(u32, usize)> = members
        .iter()
        .map(|&node| (node, graph.degree(node as usize)))
        .collect();

    // Sort by degree (descending), then by node
    by_degree.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    by_degree
        .into_iter()
        .take(CENTRAL_MEMBER_COUNT)
        .map(|(node, _)| node)
        .collect()
}
