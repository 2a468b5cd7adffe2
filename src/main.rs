use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use itertools::Itertools;

use logo_cluster::data::loader;
use logo_cluster::{pipeline, storage, Config, Ssim};

#[derive(Parser, Debug)]
#[clap(
    name = "logo-cluster",
    about = "Group near-duplicate logos by structural similarity"
)]
struct Cli {
    /// Directory of images to cluster
    #[clap(long)]
    input: PathBuf,

    /// Output directory for results
    #[clap(long, default_value = "cluster_results")]
    output_dir: PathBuf,

    /// Minimum SSIM score for two images to be linked
    #[clap(long, default_value = "0.40")]
    threshold: f64,

    /// Side length images are resized to before comparison
    #[clap(long, default_value = "128")]
    image_side: u32,

    /// Side of the SSIM sliding window (odd, at least 3)
    #[clap(long, default_value = "7")]
    window_size: usize,

    /// Minimum cluster size written to the results
    #[clap(long, default_value = "1")]
    min_cluster_size: usize,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Show a progress bar while pairs are scored
    #[clap(long)]
    progress: bool,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    let config = Config::new(args.threshold, args.threads)
        .with_window_size(args.window_size)
        .with_image_side(args.image_side)
        .with_min_cluster_size(args.min_cluster_size)
        .with_progress(args.progress);
    config.validate()?;

    log::info!("Using {} worker threads", config.worker_count());
    log::info!("Input: {}", args.input.display());
    log::info!("Output: {}", args.output_dir.display());

    // 1. Load and normalise images
    let feed = loader::load_images(&args.input, config.image_side)?;

    // 2. Score pairs, build the graph and extract clusters
    let scorer = Ssim::from_config(&config);
    let report = pipeline::run(&feed, &scorer, &config)?;

    // 3. Report
    println!("\nTotal clusters found: {}", report.cluster_count());
    for cluster in report.clusters_at_least(config.min_cluster_size) {
        println!(
            "Cluster {}: [{}]",
            cluster.id + 1,
            cluster.members.iter().join(", ")
        );
    }
    if !report.unscored.is_empty() {
        println!("\nPairs that could not be scored: {}", report.unscored.len());
        for pair in &report.unscored {
            println!("  {} / {}: {}", pair.a, pair.b, pair.reason);
        }
    }

    storage::save_results(&report, &args.output_dir, config.min_cluster_size)?;

    log::info!(
        "Analysis complete. Results saved to {}",
        args.output_dir.display()
    );

    Ok(())
}
