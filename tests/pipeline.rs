use std::collections::{BTreeSet, HashMap};

use logo_cluster::graph::{build_graph, ParallelEvaluator};
use logo_cluster::similarity::ensure_same_shape;
use logo_cluster::{
    run, run_with_cancel, CancelToken, ClusterError, ClusterReport, Config, ConfigError, ImageFeed, ImageRecord,
    ScoreError, SimilarityScorer, Ssim,
};
use ndarray::Array2;
use proptest::prelude::*;

/// Scorer backed by a fixed table of pair scores; unknown pairs score 0
struct TableScorer {
    scores: HashMap<(String, String), f64>,
}

impl TableScorer {
    fn new(entries: &[(&str, &str, f64)]) -> Self {
        let scores = entries
            .iter()
            .map(|&(a, b, s)| (key(a, b), s))
            .collect();
        Self { scores }
    }
}

fn key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

impl SimilarityScorer for TableScorer {
    fn score(&self, a: &ImageRecord, b: &ImageRecord) -> Result<f64, ScoreError> {
        ensure_same_shape(a, b)?;
        Ok(self.scores.get(&key(&a.id, &b.id)).copied().unwrap_or(0.0))
    }

    fn name(&self) -> &str {
        "table"
    }
}

fn feed_of(ids: &[&str]) -> ImageFeed {
    ImageFeed::from_matrices(ids.iter().map(|id| (*id, Array2::zeros((8, 8))))).unwrap()
}

fn partition(report: &ClusterReport) -> Vec<Vec<String>> {
    report.clusters.iter().map(|c| c.members.clone()).collect()
}

fn scenario_scorer() -> TableScorer {
    TableScorer::new(&[("A", "B", 0.9), ("A", "C", 0.1), ("B", "C", 0.1)])
}

#[test]
fn test_pair_above_threshold_forms_cluster() {
    let report = run(&feed_of(&["A", "B", "C"]), &scenario_scorer(), &Config::new(0.4, 2)).unwrap();

    assert_eq!(partition(&report), vec![vec!["A", "B"], vec!["C"]]);
    assert_eq!(report.edge_count, 1);
    assert_eq!(report.pair_count, 3);
    assert_eq!(report.scorer, "table");
    assert!(report.unscored.is_empty());
}

#[test]
fn test_empty_feed_yields_no_clusters() {
    let report = run(&ImageFeed::new(), &Ssim::default(), &Config::default()).unwrap();

    assert_eq!(report.cluster_count(), 0);
    assert_eq!(report.edge_count, 0);
    assert_eq!(report.node_count, 0);
}

#[test]
fn test_single_image_is_its_own_cluster() {
    let report = run(&feed_of(&["A"]), &Ssim::default(), &Config::default()).unwrap();

    assert_eq!(partition(&report), vec![vec!["A"]]);
    assert_eq!(report.edge_count, 0);
    assert_eq!(report.pair_count, 0);
}

#[test]
fn test_threshold_above_all_scores_gives_singletons() {
    let report = run(&feed_of(&["A", "B", "C"]), &scenario_scorer(), &Config::new(0.95, 2)).unwrap();

    assert_eq!(partition(&report), vec![vec!["A"], vec!["B"], vec!["C"]]);
    assert_eq!(report.edge_count, 0);
}

#[test]
fn test_mismatched_shape_is_reported_unscored() {
    let mut feed = feed_of(&["A", "B", "C"]);
    feed.insert(ImageRecord::new("D", Array2::zeros((8, 9)))).unwrap();

    let report = run(&feed, &scenario_scorer(), &Config::new(0.4, 4)).unwrap();

    assert_eq!(partition(&report), vec![vec!["A", "B"], vec!["C"], vec!["D"]]);
    let unscored: Vec<(&str, &str)> = report
        .unscored
        .iter()
        .map(|p| (p.a.as_str(), p.b.as_str()))
        .collect();
    assert_eq!(unscored, vec![("A", "D"), ("B", "D"), ("C", "D")]);
    assert!(report.unscored.iter().all(|p| p.reason.contains("shape mismatch")));
}

#[test]
fn test_ssim_groups_near_duplicate_images() {
    let base = Array2::from_shape_fn((24, 24), |(r, c)| {
        if (4..20).contains(&r) && (6..18).contains(&c) {
            220.0f32
        } else {
            30.0
        }
    });
    let shifted_tone = base.mapv(|v| v + 3.0);
    let other = Array2::from_shape_fn((24, 24), |(r, c)| ((r * 31 + c * 17) % 256) as f32);

    let feed = ImageFeed::from_matrices(vec![
        ("brand-a.png", base),
        ("brand-b.png", shifted_tone),
        ("unrelated.png", other),
    ])
    .unwrap();

    let report = run(&feed, &Ssim::default(), &Config::default()).unwrap();
    assert_eq!(
        partition(&report),
        vec![vec!["brand-a.png", "brand-b.png"], vec!["unrelated.png"]]
    );
}

#[test]
fn test_invalid_config_is_rejected_before_work() {
    let err = run(&feed_of(&["A", "B"]), &scenario_scorer(), &Config::new(0.4, 1).with_window_size(2))
        .unwrap_err();
    assert!(matches!(err, ClusterError::Config(_)));
}

#[test]
fn test_progress_switch_does_not_change_report() {
    let feed = feed_of(&["A", "B", "C", "D"]);
    let quiet = run(&feed, &scenario_scorer(), &Config::new(0.4, 2)).unwrap();
    let shown = run(&feed, &scenario_scorer(), &Config::new(0.4, 2).with_progress(true)).unwrap();
    assert_eq!(quiet, shown);
}

#[test]
fn test_image_side_below_window_is_rejected() {
    let err = run(&feed_of(&["A", "B"]), &scenario_scorer(), &Config::new(0.4, 1).with_image_side(5))
        .unwrap_err();
    assert!(matches!(
        err,
        ClusterError::Config(ConfigError::ImageSmallerThanWindow { .. })
    ));
}

#[test]
fn test_cancelled_run_has_no_output() {
    let cancel = CancelToken::new();
    cancel.cancel();
    let result = run_with_cancel(&feed_of(&["A", "B", "C"]), &scenario_scorer(), &Config::new(0.4, 2), &cancel);
    assert!(matches!(result, Err(ClusterError::Cancelled)));
}

/// Random symmetric score table over `n` nodes
fn score_table(n: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1.0f64..=1.0, n * n.saturating_sub(1) / 2)
}

fn table_scorer(ids: &[String], scores: &[f64]) -> TableScorer {
    let mut map = HashMap::new();
    let mut k = 0;
    for i in 0..ids.len() {
        for j in (i + 1)..ids.len() {
            map.insert(key(&ids[i], &ids[j]), scores[k]);
            k += 1;
        }
    }
    TableScorer { scores: map }
}

fn node_ids(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("logo{:03}", i)).collect()
}

fn feed_from(ids: &[String]) -> ImageFeed {
    ImageFeed::from_matrices(ids.iter().map(|id| (id.clone(), Array2::zeros((4, 4))))).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_clusters_partition_nodes(
        (n, scores) in (0usize..14).prop_flat_map(|n| (Just(n), score_table(n))),
        threshold in -1.0f64..1.0,
    ) {
        let ids = node_ids(n);
        let report = run(&feed_from(&ids), &table_scorer(&ids, &scores), &Config::new(threshold, 3)).unwrap();

        let mut seen: Vec<String> = report.clusters.iter().flat_map(|c| c.members.clone()).collect();
        let total = seen.len();
        seen.sort();
        seen.dedup();
        prop_assert_eq!(total, n);
        prop_assert_eq!(seen, ids);
    }

    #[test]
    fn prop_raising_threshold_only_removes_edges(
        (n, scores) in (2usize..12).prop_flat_map(|n| (Just(n), score_table(n))),
        low in -1.0f64..1.0,
        delta in 0.0f64..1.0,
    ) {
        let ids = node_ids(n);
        let feed = feed_from(&ids);
        let scorer = table_scorer(&ids, &scores);

        let loose = ParallelEvaluator::new(&scorer, low, 2).evaluate(&feed).unwrap();
        let strict = ParallelEvaluator::new(&scorer, low + delta, 2).evaluate(&feed).unwrap();
        prop_assert!(strict.edges.is_subset(&loose.edges));
        prop_assert!(loose.edges.iter().all(|e| e.a < e.b));

        let loose_report = run(&feed, &scorer, &Config::new(low, 2)).unwrap();
        let strict_report = run(&feed, &scorer, &Config::new(low + delta, 2)).unwrap();
        prop_assert!(strict_report.cluster_count() >= loose_report.cluster_count());
    }

    #[test]
    fn prop_partition_is_independent_of_worker_count(
        (n, scores) in (0usize..12).prop_flat_map(|n| (Just(n), score_table(n))),
        threshold in -1.0f64..1.0,
        workers in 1usize..6,
    ) {
        let ids = node_ids(n);
        let feed = feed_from(&ids);
        let scorer = table_scorer(&ids, &scores);

        let first = run(&feed, &scorer, &Config::new(threshold, 1)).unwrap();
        let second = run(&feed, &scorer, &Config::new(threshold, workers)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_graph_has_no_self_loops(
        (n, scores) in (1usize..12).prop_flat_map(|n| (Just(n), score_table(n))),
        threshold in -1.0f64..1.0,
    ) {
        let ids = node_ids(n);
        let feed = feed_from(&ids);
        let evaluation = ParallelEvaluator::new(&table_scorer(&ids, &scores), threshold, 2)
            .evaluate(&feed)
            .unwrap();
        let graph = build_graph(feed.ids(), &evaluation.edges).unwrap();

        prop_assert!((0..graph.node_count).all(|i| !graph.has_edge(i, i as u32)));
        let edges: BTreeSet<_> = graph.edge_set();
        prop_assert_eq!(edges, evaluation.edges);
    }

    #[test]
    fn prop_ssim_is_symmetric(
        a in prop::collection::vec(0.0f32..=255.0, 100),
        b in prop::collection::vec(0.0f32..=255.0, 100),
    ) {
        let a = ImageRecord::new("a", Array2::from_shape_vec((10, 10), a).unwrap());
        let b = ImageRecord::new("b", Array2::from_shape_vec((10, 10), b).unwrap());
        let ssim = Ssim::default();

        let ab = ssim.score(&a, &b).unwrap();
        let ba = ssim.score(&b, &a).unwrap();
        prop_assert_eq!(ab, ba);
        prop_assert!((-1.0 - 1e-9..=1.0 + 1e-9).contains(&ab));
    }
}
