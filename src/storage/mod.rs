//! Results persistence module

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{json, to_string_pretty};

use crate::pipeline::ClusterReport;

/// Save a clustering report to the specified directory, keeping clusters
/// with at least `min_cluster_size` members
pub fn save_results(report: &ClusterReport, output_dir: &Path, min_cluster_size: usize) -> Result<()> {
    log::info!(
        "Saving {} clusters to {}",
        report.cluster_count(),
        output_dir.display()
    );

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory {}", output_dir.display()))?;

    save_summary(report, output_dir, min_cluster_size)?;
    save_clusters(report, output_dir, min_cluster_size)?;
    save_unscored(report, output_dir)?;

    log::info!("Results saved successfully");

    Ok(())
}

/// Save summary information
fn save_summary(report: &ClusterReport, output_dir: &Path, min_cluster_size: usize) -> Result<()> {
    let path = output_dir.join("summary.json");
    let mut file = File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;

    let clusters = &report.clusters;
    let multi_member = clusters.iter().filter(|c| c.size > 1).count();

    let summary = json!({
        "scorer": report.scorer,
        "threshold": report.threshold,
        "graph_stats": {
            "node_count": report.node_count,
            "pair_count": report.pair_count,
            "edge_count": report.edge_count,
            "unscored_pair_count": report.unscored.len(),
        },
        "cluster_stats": {
            "cluster_count": report.cluster_count(),
            "reported_cluster_count": report.clusters_at_least(min_cluster_size).count(),
            "multi_member_cluster_count": multi_member,
            "singleton_count": clusters.len() - multi_member,
            "largest_cluster_size": clusters.first().map_or(0, |c| c.size),
            "avg_cluster_size": report.node_count as f64 /
                                if clusters.is_empty() { 1.0 } else { clusters.len() as f64 },
        }
    });

    file.write_all(to_string_pretty(&summary)?.as_bytes())?;

    Ok(())
}

/// Save cluster membership as JSON and CSV
fn save_clusters(report: &ClusterReport, output_dir: &Path, min_cluster_size: usize) -> Result<()> {
    let clusters: Vec<_> = report.clusters_at_least(min_cluster_size).collect();

    let path = output_dir.join("clusters.json");
    let mut file = File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(to_string_pretty(&json!({ "clusters": clusters }))?.as_bytes())?;

    let csv_path = output_dir.join("clusters.csv");
    let mut csv = File::create(&csv_path)
        .with_context(|| format!("Failed to create {}", csv_path.display()))?;
    writeln!(csv, "cluster_id,identifier")?;
    for cluster in &clusters {
        for member in &cluster.members {
            writeln!(csv, "{},{}", cluster.id, csv_field(member))?;
        }
    }

    Ok(())
}

/// Save the pairs that could not be scored
fn save_unscored(report: &ClusterReport, output_dir: &Path) -> Result<()> {
    let path = output_dir.join("unscored.json");
    let mut file = File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(to_string_pretty(&json!({ "unscored": report.unscored }))?.as_bytes())?;
    Ok(())
}

/// Quote a CSV field when it contains a separator, quote or line break
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
