//! Pairwise similarity scoring

pub mod ssim;

pub use ssim::Ssim;

use crate::data::ImageRecord;
use crate::error::ScoreError;

/// Computes a similarity score for two equally shaped images.
///
/// Higher means more similar. Implementations must be pure: the same pair
/// always yields the same score, and `score(a, b) == score(b, a)`.
pub trait SimilarityScorer: Send + Sync {
    fn score(&self, a: &ImageRecord, b: &ImageRecord) -> Result<f64, ScoreError>;

    /// Short label used in logs and reports
    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> SimilarityScorer for F
where
    F: Fn(&ImageRecord, &ImageRecord) -> Result<f64, ScoreError> + Send + Sync,
{
    fn score(&self, a: &ImageRecord, b: &ImageRecord) -> Result<f64, ScoreError> {
        self(a, b)
    }
}

/// Fail with [`ScoreError::ShapeMismatch`] unless both records share a shape
pub fn ensure_same_shape(a: &ImageRecord, b: &ImageRecord) -> Result<(usize, usize), ScoreError> {
    let (left, right) = (a.shape(), b.shape());
    if left != right {
        return Err(ScoreError::ShapeMismatch { left, right });
    }
    Ok(left)
}
