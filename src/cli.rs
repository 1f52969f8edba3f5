//! Command-line interface definitions and argument parsing

use crate::data::RecordSchema;
use crate::model::{KMeans, DEFAULT_MAX_ITERATIONS};
use crate::sampling::RandomSampler;
use clap::Parser;
use rand::rngs::StdRng;

/// Group color-summarized entities (e.g. flags by average RGB) with K-Means
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input JSON file (an array of records)
    #[arg(short, long, default_value = "flags_rgb.json")]
    pub input: String,

    /// Number of clusters for K-Means
    #[arg(short = 'k', long, default_value_t = 4)]
    pub clusters: usize,

    /// Maximum iterations for K-Means algorithm
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    pub max_iters: usize,

    /// Seed for centroid sampling; omit for a different grouping each run
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Record field holding the entity label
    #[arg(long, default_value = "state")]
    pub label_field: String,

    /// Record field holding the three-element color vector
    #[arg(long, default_value = "avg_rgb")]
    pub vector_field: String,

    /// Print a JSON summary instead of the plain-text listing
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn schema(&self) -> RecordSchema {
        RecordSchema {
            label_field: self.label_field.clone(),
            vector_field: self.vector_field.clone(),
        }
    }

    pub fn kmeans(&self) -> KMeans {
        KMeans::new(self.clusters).max_iterations(self.max_iters)
    }

    /// Seeded sampler when `--seed` was given, entropy-seeded otherwise
    pub fn sampler(&self) -> RandomSampler<StdRng> {
        match self.seed {
            Some(seed) => RandomSampler::seeded(seed),
            None => RandomSampler::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::IndexSampler;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["chromaforge"]).unwrap();
        assert_eq!(args.input, "flags_rgb.json");
        assert_eq!(args.clusters, 4);
        assert_eq!(args.max_iters, 100);
        assert_eq!(args.seed, None);
        assert_eq!(args.schema(), RecordSchema::default());
        assert!(!args.json);
    }

    #[test]
    fn test_parse_overrides() {
        let args = Args::try_parse_from([
            "chromaforge",
            "--input",
            "colors.json",
            "-k",
            "6",
            "--max-iters",
            "25",
            "--seed",
            "17",
            "--label-field",
            "name",
            "--vector-field",
            "rgb",
            "--json",
        ])
        .unwrap();

        assert_eq!(args.input, "colors.json");
        assert_eq!(args.kmeans(), KMeans::new(6).max_iterations(25));
        assert_eq!(args.schema().label_field, "name");
        assert_eq!(args.schema().vector_field, "rgb");
        assert!(args.json);

        let mut a = args.sampler();
        let mut b = RandomSampler::seeded(17);
        assert_eq!(a.sample_index(1000), b.sample_index(1000));
    }

    #[test]
    fn test_rejects_non_numeric_clusters() {
        assert!(Args::try_parse_from(["chromaforge", "-k", "four"]).is_err());
    }
}
