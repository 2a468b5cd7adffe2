//! Error types for the clustering engine

use thiserror::Error;

/// Errors raised while assembling an [`ImageFeed`](crate::data::ImageFeed)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeedError {
    #[error("feed: duplicate identifier {0:?}")]
    DuplicateIdentifier(String),

    #[error("feed: image {0:?} has an empty intensity matrix")]
    EmptyMatrix(String),
}

/// Errors raised by a similarity scorer for a single pair
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoreError {
    #[error("shape mismatch: {left:?} vs {right:?}")]
    ShapeMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("window of side {window} cannot be used on image of shape {shape:?}")]
    InvalidWindow { window: usize, shape: (usize, usize) },

    #[error("score is not a finite number")]
    NonFinite,

    #[error("worker failure: {0}")]
    WorkerFailure(String),
}

/// Invalid configuration values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("config: threshold must be finite, got {0}")]
    InvalidThreshold(f64),

    #[error("config: window size must be odd and at least 3, got {0}")]
    InvalidWindowSize(usize),

    #[error("config: data range must be positive and finite, got {0}")]
    InvalidDataRange(f64),

    #[error("config: image side must be non-zero")]
    InvalidImageSide,

    #[error("config: image side {image_side} is smaller than the {window_size}-pixel window")]
    ImageSmallerThanWindow { image_side: u32, window_size: usize },
}

/// Errors that abort a whole clustering run
#[derive(Error, Debug)]
pub enum ClusterError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error("graph: edge references unknown node {0:?}")]
    UnknownNode(String),

    #[error("failed to start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("run was cancelled before every pair was evaluated")]
    Cancelled,
}
