//! ChromaForge: cluster labeled colors from a JSON file and print the groups
//!
//! This is the main entrypoint that orchestrates loading, clustering and
//! reporting.

use anyhow::Result;
use chromaforge::{load_points, report, Args, ClusterSummary};
use clap::Parser;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();
    init_tracing(args.verbose);

    let start_time = Instant::now();

    let points = load_points(&args.input, &args.schema())?;
    tracing::info!("Loaded {} points from {}", points.len(), args.input);

    let mut sampler = args.sampler();
    let result = args.kmeans().fit(&points, &mut sampler)?;
    tracing::info!(
        iterations = result.iterations,
        converged = result.converged,
        "Clustered into {} groups in {:.3}s",
        result.n_clusters,
        start_time.elapsed().as_secs_f64()
    );

    if args.json {
        println!("{}", ClusterSummary::new(&points, &result).to_json()?);
    } else {
        report::print_cluster_listing(&points, &result);
    }

    Ok(())
}

/// Log to stderr so `--json` output on stdout stays parseable
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "chromaforge=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
