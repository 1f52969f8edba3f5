//! ChromaForge: group color-summarized entities with K-Means clustering
//!
//! Each entity (a flag, a swatch, a product photo) is reduced to a 3-vector,
//! typically its average RGB color. [`cluster`] partitions those vectors into
//! `k` groups with Lloyd's algorithm and returns one label per point plus one
//! centroid per group, ready for whatever listing or plot the caller builds.

pub mod cli;
pub mod data;
pub mod error;
pub mod model;
pub mod report;
pub mod sampling;

// Re-export public items for easier access
pub use cli::Args;
pub use data::{load_points, parse_points, Point, RecordSchema};
pub use error::ClusterError;
pub use model::{cluster, ClusterResult, IterationStats, KMeans, Position};
pub use report::{render_cluster_listing, ClusterSummary};
pub use sampling::{IndexSampler, RandomSampler, ScriptedSampler};

/// Common result type for loading and reporting; the engine itself returns
/// [`ClusterError`]
pub type Result<T> = anyhow::Result<T>;
