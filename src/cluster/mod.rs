//! Cluster analysis module

pub mod detection;
pub mod metrics;

pub use detection::{find_clusters, DisjointSets};

use serde::{Deserialize, Serialize};

/// A connected component of the similarity graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Position of this cluster in the reproducible output order
    pub id: u32,

    /// Member identifiers, ascending
    pub members: Vec<String>,

    /// Size of the cluster
    pub size: usize,

    /// Density: edges inside / potential undirected edges
    pub density: f32,

    /// Up to five members with the most links inside the cluster
    pub central_members: Vec<String>,
}

impl Cluster {
    pub fn is_singleton(&self) -> bool {
        self.size == 1
    }
}
