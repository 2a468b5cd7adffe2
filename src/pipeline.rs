//! End-to-end clustering run: evaluate pairs, build the graph, extract clusters

use serde::{Deserialize, Serialize};

use crate::cluster::{find_clusters, Cluster};
use crate::config::Config;
use crate::data::ImageFeed;
use crate::error::ClusterError;
use crate::graph::{build_graph, pair_count, CancelToken, ParallelEvaluator, UnscoredPair};
use crate::similarity::SimilarityScorer;

/// Result of a clustering run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterReport {
    /// Name of the scorer used
    pub scorer: String,

    /// Threshold applied to every pair
    pub threshold: f64,

    /// Number of images in the feed
    pub node_count: usize,

    /// Number of pairs evaluated
    pub pair_count: usize,

    /// Accepted edges
    pub edge_count: usize,

    /// Partition of every image into clusters
    pub clusters: Vec<Cluster>,

    /// Pairs whose score could not be computed
    pub unscored: Vec<UnscoredPair>,
}

impl ClusterReport {
    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    /// Clusters with at least `min_size` members
    pub fn clusters_at_least(&self, min_size: usize) -> impl Iterator<Item = &Cluster> {
        self.clusters.iter().filter(move |c| c.size >= min_size)
    }
}

/// Cluster every image in `feed`
pub fn run(
    feed: &ImageFeed,
    scorer: &dyn SimilarityScorer,
    config: &Config,
) -> Result<ClusterReport, ClusterError> {
    run_with_cancel(feed, scorer, config, &CancelToken::new())
}

/// Cluster every image in `feed`, stopping early if `cancel` is set
pub fn run_with_cancel(
    feed: &ImageFeed,
    scorer: &dyn SimilarityScorer,
    config: &Config,
    cancel: &CancelToken,
) -> Result<ClusterReport, ClusterError> {
    config.validate()?;

    log::info!("Clustering {} images", feed.len());

    let evaluator = ParallelEvaluator::new(scorer, config.threshold, config.worker_count())
        .with_progress(config.progress);
    let evaluation = evaluator.evaluate_with_cancel(feed, cancel)?;

    let graph = build_graph(feed.ids(), &evaluation.edges)?;
    log::debug!("Graph uses about {} bytes", graph.memory_usage());

    let clusters = find_clusters(&graph);

    Ok(ClusterReport {
        scorer: scorer.name().to_string(),
        threshold: config.threshold,
        node_count: graph.node_count,
        pair_count: pair_count(feed.len()),
        edge_count: graph.edge_count(),
        clusters,
        unscored: evaluation.unscored,
    })
}
