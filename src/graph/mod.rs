//! Similarity graph: pair enumeration, parallel evaluation and construction

pub mod builder;
pub mod compressed;
pub mod edge;
pub mod evaluator;
pub mod pairs;

pub use builder::{build_graph, GraphBuilder};
pub use compressed::SimilarityGraph;
pub use edge::Edge;
pub use evaluator::{CancelToken, Evaluation, ParallelEvaluator, UnscoredPair};
pub use pairs::{pair_count, PairEnumerator};
