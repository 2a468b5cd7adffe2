//! Configuration for a clustering run

use crate::error::ConfigError;

/// Settings passed explicitly into the pipeline entry point
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Minimum similarity score for two images to be linked
    pub threshold: f64,

    /// Number of worker threads (0 = use all available cores)
    pub workers: usize,

    /// Side of the square structural-similarity window
    pub window_size: usize,

    /// Dynamic range of the intensity values
    pub data_range: f64,

    /// Side length images are resized to when loaded from disk
    pub image_side: u32,

    /// Smallest cluster kept when reporting results
    pub min_cluster_size: usize,

    /// Draw a progress bar while pairs are scored
    pub progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold: 0.40,
            workers: 0,
            window_size: 7,
            data_range: 255.0,
            image_side: 128,
            min_cluster_size: 1,
            progress: false,
        }
    }
}

impl Config {
    /// Create a configuration with the given threshold and worker count,
    /// leaving everything else at its default
    pub fn new(threshold: f64, workers: usize) -> Self {
        Self {
            threshold,
            workers,
            ..Self::default()
        }
    }

    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn with_data_range(mut self, data_range: f64) -> Self {
        self.data_range = data_range;
        self
    }

    pub fn with_image_side(mut self, image_side: u32) -> Self {
        self.image_side = image_side;
        self
    }

    pub fn with_min_cluster_size(mut self, min_cluster_size: usize) -> Self {
        self.min_cluster_size = min_cluster_size;
        self
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Resolve the worker count, mapping 0 to the number of logical CPUs
    pub fn worker_count(&self) -> usize {
        if self.workers > 0 {
            self.workers
        } else {
            num_cpus::get()
        }
    }

    /// Check that every value is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.threshold.is_finite() {
            return Err(ConfigError::InvalidThreshold(self.threshold));
        }
        if self.window_size < 3 || self.window_size % 2 == 0 {
            return Err(ConfigError::InvalidWindowSize(self.window_size));
        }
        if !self.data_range.is_finite() || self.data_range <= 0.0 {
            return Err(ConfigError::InvalidDataRange(self.data_range));
        }
        if self.image_side == 0 {
            return Err(ConfigError::InvalidImageSide);
        }
        if (self.image_side as usize) < self.window_size {
            return Err(ConfigError::ImageSmallerThanWindow {
                image_side: self.image_side,
                window_size: self.window_size,
            });
        }
        Ok(())
    }
}
