//! Canonical undirected edges

use serde::{Deserialize, Serialize};

/// Undirected edge stored with `a < b`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub a: String,
    pub b: String,
}

impl Edge {
    /// Canonicalise two identifiers into an edge. Returns `None` for a
    /// self-loop.
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Option<Self> {
        let (x, y) = (x.into(), y.into());
        match x.cmp(&y) {
            std::cmp::Ordering::Less => Some(Self { a: x, b: y }),
            std::cmp::Ordering::Greater => Some(Self { a: y, b: x }),
            std::cmp::Ordering::Equal => None,
        }
    }
}
