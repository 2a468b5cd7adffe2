//! Image feed: identifiers mapped to grayscale intensity matrices

pub mod loader;

use std::collections::BTreeMap;

use ndarray::Array2;

use crate::error::FeedError;

/// One decoded image, immutable once produced
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRecord {
    /// Unique identifier (usually the file name)
    pub id: String,

    /// Grayscale intensities, rows x columns
    pub matrix: Array2<f32>,
}

impl ImageRecord {
    pub fn new(id: impl Into<String>, matrix: Array2<f32>) -> Self {
        Self {
            id: id.into(),
            matrix,
        }
    }

    /// Shape as (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        self.matrix.dim()
    }
}

/// Ordered collection of image records keyed by identifier.
///
/// Iteration follows identifier order, which is also the total order used
/// to canonicalise edges.
#[derive(Debug, Clone, Default)]
pub struct ImageFeed {
    records: BTreeMap<String, ImageRecord>,
}

impl ImageFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record; identifiers must be unique and matrices non-empty
    pub fn insert(&mut self, record: ImageRecord) -> Result<(), FeedError> {
        if record.matrix.is_empty() {
            return Err(FeedError::EmptyMatrix(record.id));
        }
        if self.records.contains_key(&record.id) {
            return Err(FeedError::DuplicateIdentifier(record.id));
        }
        self.records.insert(record.id.clone(), record);
        Ok(())
    }

    /// Build a feed from (identifier, matrix) pairs
    pub fn from_matrices<I, S>(items: I) -> Result<Self, FeedError>
    where
        I: IntoIterator<Item = (S, Array2<f32>)>,
        S: Into<String>,
    {
        let mut feed = Self::new();
        for (id, matrix) in items {
            feed.insert(ImageRecord::new(id, matrix))?;
        }
        Ok(feed)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ImageRecord> {
        self.records.get(id)
    }

    /// Identifiers in ascending order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    /// Records in identifier order
    pub fn records(&self) -> Vec<&ImageRecord> {
        self.records.values().collect()
    }
}
