//! Windowed structural similarity (SSIM)

use ndarray::{Array2, ArrayView2};

use crate::config::Config;
use crate::data::ImageRecord;
use crate::error::ScoreError;
use crate::similarity::{ensure_same_shape, SimilarityScorer};

/// Luminance stabiliser constant
const K1: f64 = 0.01;

/// Contrast stabiliser constant
const K2: f64 = 0.03;

/// Mean structural similarity over every square window that fits inside
/// the image
#[derive(Debug, Clone, PartialEq)]
pub struct Ssim {
    window: usize,
    data_range: f64,
}

impl Default for Ssim {
    fn default() -> Self {
        Self {
            window: 7,
            data_range: 255.0,
        }
    }
}

impl Ssim {
    pub fn new(window: usize, data_range: f64) -> Self {
        Self { window, data_range }
    }

    /// Use the window size and data range from a run configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.window_size, config.data_range)
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn data_range(&self) -> f64 {
        self.data_range
    }

    /// Score two raw matrices
    pub fn compare(&self, a: ArrayView2<f32>, b: ArrayView2<f32>) -> Result<f64, ScoreError> {
        if a.dim() != b.dim() {
            return Err(ScoreError::ShapeMismatch {
                left: a.dim(),
                right: b.dim(),
            });
        }

        let (rows, cols) = a.dim();
        let w = self.window;
        if w < 3 || w % 2 == 0 || rows < w || cols < w {
            return Err(ScoreError::InvalidWindow {
                window: w,
                shape: (rows, cols),
            });
        }

        let c1 = (K1 * self.data_range).powi(2);
        let c2 = (K2 * self.data_range).powi(2);

        let sum_a = integral(rows, cols, |r, c| a[[r, c]] as f64);
        let sum_b = integral(rows, cols, |r, c| b[[r, c]] as f64);
        let sum_aa = integral(rows, cols, |r, c| (a[[r, c]] as f64).powi(2));
        let sum_bb = integral(rows, cols, |r, c| (b[[r, c]] as f64).powi(2));
        let sum_ab = integral(rows, cols, |r, c| a[[r, c]] as f64 * b[[r, c]] as f64);

        let n = (w * w) as f64;
        // Sample (N - 1) normalisation for variance and covariance
        let cov_norm = n / (n - 1.0);

        let mut total = 0.0;
        let mut windows = 0usize;
        for r in 0..=rows - w {
            for c in 0..=cols - w {
                let mu_a = window_sum(&sum_a, r, c, w) / n;
                let mu_b = window_sum(&sum_b, r, c, w) / n;
                let var_a = cov_norm * (window_sum(&sum_aa, r, c, w) / n - mu_a * mu_a);
                let var_b = cov_norm * (window_sum(&sum_bb, r, c, w) / n - mu_b * mu_b);
                let cov_ab = cov_norm * (window_sum(&sum_ab, r, c, w) / n - mu_a * mu_b);

                let numerator = (2.0 * mu_a * mu_b + c1) * (2.0 * cov_ab + c2);
                let denominator = (mu_a * mu_a + mu_b * mu_b + c1) * (var_a + var_b + c2);
                total += numerator / denominator;
                windows += 1;
            }
        }

        let score = total / windows as f64;
        if !score.is_finite() {
            return Err(ScoreError::NonFinite);
        }
        Ok(score)
    }
}

impl SimilarityScorer for Ssim {
    fn score(&self, a: &ImageRecord, b: &ImageRecord) -> Result<f64, ScoreError> {
        ensure_same_shape(a, b)?;
        self.compare(a.matrix.view(), b.matrix.view())
    }

    fn name(&self) -> &str {
        "ssim"
    }
}

/// Summed-area table with a zero first row and column
fn integral(rows: usize, cols: usize, value: impl Fn(usize, usize) -> f64) -> Array2<f64> {
    let mut table = Array2::<f64>::zeros((rows + 1, cols + 1));
    for r in 0..rows {
        let mut row_sum = 0.0;
        for c in 0..cols {
            row_sum += value(r, c);
            table[[r + 1, c + 1]] = table[[r, c + 1]] + row_sum;
        }
    }
    table
}

fn window_sum(table: &Array2<f64>, r: usize, c: usize, w: usize) -> f64 {
    table[[r + w, c + w]] - table[[r, c + w]] - table[[r + w, c]] + table[[r, c]]
}
