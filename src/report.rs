//! Plain-text and JSON presentation of a clustering result

use crate::data::Point;
use crate::model::{ClusterResult, DIMS};
use serde::Serialize;
use std::fmt::Write;

/// One group in the JSON hand-off document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterGroup {
    /// 0-based group index, matching `labels`
    pub cluster: usize,
    pub size: usize,
    pub centroid: [f64; DIMS],
    /// Labels of member points, in input order
    pub members: Vec<String>,
}

/// Serializable summary handed to an external renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterSummary {
    pub k: usize,
    pub iterations: usize,
    pub converged: bool,
    pub labels: Vec<usize>,
    pub centroids: Vec<[f64; DIMS]>,
    pub clusters: Vec<ClusterGroup>,
}

impl ClusterSummary {
    pub fn new(points: &[Point], result: &ClusterResult) -> Self {
        let centroids: Vec<[f64; DIMS]> = (0..result.n_clusters)
            .filter_map(|cluster| result.centroid(cluster))
            .collect();

        let clusters = centroids
            .iter()
            .enumerate()
            .map(|(cluster, &centroid)| {
                let members: Vec<String> = result
                    .members(cluster)
                    .into_iter()
                    .filter_map(|index| points.get(index))
                    .map(|point| point.label.clone())
                    .collect();
                ClusterGroup {
                    cluster,
                    size: members.len(),
                    centroid,
                    members,
                }
            })
            .collect();

        Self {
            k: result.n_clusters,
            iterations: result.iterations,
            converged: result.converged,
            labels: result.labels.to_vec(),
            centroids,
            clusters,
        }
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Render the grouping as text, one block per cluster, numbered from 1
pub fn render_cluster_listing(points: &[Point], result: &ClusterResult) -> String {
    let summary = ClusterSummary::new(points, result);
    let total = points.len().max(1) as f64;
    let mut out = String::new();

    let status = if summary.converged {
        format!("converged after {} iterations", summary.iterations)
    } else {
        format!("stopped after {} iterations without converging", summary.iterations)
    };
    let _ = writeln!(out, "{} points in {} clusters ({})", points.len(), summary.k, status);

    for group in &summary.clusters {
        let percentage = group.size as f64 / total * 100.0;
        let _ = writeln!(
            out,
            "\nCluster {}: {} members ({:.1}%), centroid [{:.1}, {:.1}, {:.1}]",
            group.cluster + 1,
            group.size,
            percentage,
            group.centroid[0],
            group.centroid[1],
            group.centroid[2]
        );
        for member in &group.members {
            let _ = writeln!(out, "  {}", member);
        }
    }

    out
}

/// Print cluster statistics to console
pub fn print_cluster_listing(points: &[Point], result: &ClusterResult) {
    print!("{}", render_cluster_listing(points, result));
    println!("\nWithin-cluster sum of squares: {:.2}", result.inertia(points));
}
