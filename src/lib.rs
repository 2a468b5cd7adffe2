//! Core library for clustering near-duplicate images by structural similarity

pub mod cluster;
pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod pipeline;
pub mod similarity;
pub mod storage;

pub use cluster::Cluster;
pub use config::Config;
pub use data::{ImageFeed, ImageRecord};
pub use error::{ClusterError, ConfigError, FeedError, ScoreError};
pub use graph::{CancelToken, Edge, SimilarityGraph, UnscoredPair};
pub use pipeline::{run, run_with_cancel, ClusterReport};
pub use similarity::{SimilarityScorer, Ssim};
