//! Parallel pairwise evaluation

use std::any::Any;
use std::collections::BTreeSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::{ImageFeed, ImageRecord};
use crate::error::{ClusterError, ConfigError, ScoreError};
use crate::graph::pairs::PairEnumerator;
use crate::graph::Edge;
use crate::similarity::SimilarityScorer;

/// Shared flag that stops a running evaluation from dispatching more pairs
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A pair whose score could not be computed
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnscoredPair {
    pub a: String,
    pub b: String,
    pub reason: String,
}

/// Outcome of evaluating one pair
#[derive(Debug)]
enum PairOutcome {
    Accepted(Edge),
    Rejected,
    Unscored(UnscoredPair),
    Skipped,
}

/// Aggregated outcome of a full evaluation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    /// Edges whose score met the threshold
    pub edges: BTreeSet<Edge>,

    /// Pairs that failed to score, sorted
    pub unscored: Vec<UnscoredPair>,

    /// Pairs that produced a score
    pub scored: usize,

    /// Scored pairs below the threshold
    pub rejected: usize,
}

impl Evaluation {
    fn record(mut self, outcome: PairOutcome) -> Self {
        match outcome {
            PairOutcome::Accepted(edge) => {
                self.scored += 1;
                self.edges.insert(edge);
            }
            PairOutcome::Rejected => {
                self.scored += 1;
                self.rejected += 1;
            }
            PairOutcome::Unscored(pair) => self.unscored.push(pair),
            PairOutcome::Skipped => {}
        }
        self
    }

    fn merge(mut self, mut other: Self) -> Self {
        self.edges.append(&mut other.edges);
        self.unscored.append(&mut other.unscored);
        self.scored += other.scored;
        self.rejected += other.rejected;
        self
    }
}

fn progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    let style = ProgressStyle::with_template(
        "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pairs ({eta})",
    )
    .map(|style| style.progress_chars("##-"))
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "scorer panicked".to_string()
    }
}

/// Scores every pair of a feed on a fixed-size worker pool and keeps the
/// pairs at or above the threshold
pub struct ParallelEvaluator<'s> {
    scorer: &'s dyn SimilarityScorer,
    threshold: f64,
    workers: usize,
    progress: bool,
}

impl<'s> ParallelEvaluator<'s> {
    pub fn new(scorer: &'s dyn SimilarityScorer, threshold: f64, workers: usize) -> Self {
        Self {
            scorer,
            threshold,
            workers,
            progress: false,
        }
    }

    /// Draw a progress bar on stderr while pairs are scored
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Score one pair, containing scorer errors and panics
    fn evaluate_pair(&self, a: &ImageRecord, b: &ImageRecord) -> PairOutcome {
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.scorer.score(a, b)))
            .unwrap_or_else(|payload| Err(ScoreError::WorkerFailure(panic_message(&*payload))));

        let result = match result {
            Ok(score) if !score.is_finite() => Err(ScoreError::NonFinite),
            other => other,
        };

        match result {
            Ok(score) if score >= self.threshold => match Edge::new(a.id.as_str(), b.id.as_str()) {
                Some(edge) => PairOutcome::Accepted(edge),
                None => PairOutcome::Rejected,
            },
            Ok(_) => PairOutcome::Rejected,
            Err(err) => {
                log::debug!("Could not score {} / {}: {}", a.id, b.id, err);
                let (a, b) = if a.id <= b.id { (a, b) } else { (b, a) };
                PairOutcome::Unscored(UnscoredPair {
                    a: a.id.clone(),
                    b: b.id.clone(),
                    reason: err.to_string(),
                })
            }
        }
    }

    pub fn evaluate(&self, feed: &ImageFeed) -> Result<Evaluation, ClusterError> {
        self.evaluate_with_cancel(feed, &CancelToken::new())
    }

    /// Evaluate every pair, blocking until all outcomes are known.
    ///
    /// Once `cancel` is set no further pairs are scored and the run fails
    /// with [`ClusterError::Cancelled`].
    pub fn evaluate_with_cancel(
        &self,
        feed: &ImageFeed,
        cancel: &CancelToken,
    ) -> Result<Evaluation, ClusterError> {
        if !self.threshold.is_finite() {
            return Err(ConfigError::InvalidThreshold(self.threshold).into());
        }

        let records = feed.records();
        let pairs = PairEnumerator::new(records.len());
        let total = pairs.len();

        log::info!(
            "Evaluating {} pairs with {} workers using {} (threshold {})",
            total,
            self.workers,
            self.scorer.name(),
            self.threshold
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|idx| format!("pair-worker-{}", idx))
            .build()?;

        let pb = if self.progress {
            progress_bar(total)
        } else {
            ProgressBar::hidden()
        };

        let mut evaluation = pool.install(|| {
            pairs
                .par_bridge()
                .map(|(i, j)| {
                    if cancel.is_cancelled() {
                        return PairOutcome::Skipped;
                    }
                    let outcome = self.evaluate_pair(records[i], records[j]);
                    pb.inc(1);
                    outcome
                })
                .fold(Evaluation::default, Evaluation::record)
                .reduce(Evaluation::default, Evaluation::merge)
        });

        if cancel.is_cancelled() {
            pb.abandon();
            log::warn!("Evaluation cancelled; discarding partial results");
            return Err(ClusterError::Cancelled);
        }
        pb.finish();

        evaluation.unscored.sort();

        log::info!(
            "Scored {} of {} pairs: accepted {} edges, rejected {}, unscored {}",
            evaluation.scored,
            total,
            evaluation.edges.len(),
            evaluation.rejected,
            evaluation.unscored.len()
        );
        if !evaluation.unscored.is_empty() {
            log::warn!("{} pairs could not be scored", evaluation.unscored.len());
        }

        Ok(evaluation)
    }
}
