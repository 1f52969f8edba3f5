//! K-Means clustering engine (Lloyd's algorithm over 3-dimensional points)

use crate::error::ClusterError;
use crate::sampling::IndexSampler;
use ndarray::{Array1, Array2, ArrayView1};

/// Dimensionality of every point and centroid.
pub const DIMS: usize = 3;

/// Iteration cap used by [`KMeans::new`].
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Largest per-component centroid shift still treated as converged.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Anything that can be located in 3-space.
///
/// The engine only reads positions through this trait, so caller records keep
/// whatever extra fields they carry.
pub trait Position {
    fn position(&self) -> [f64; DIMS];
}

impl Position for [f64; DIMS] {
    fn position(&self) -> [f64; DIMS] {
        *self
    }
}

impl<T: Position + ?Sized> Position for &T {
    fn position(&self) -> [f64; DIMS] {
        (**self).position()
    }
}

/// Per-iteration bookkeeping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationStats {
    /// 1-based iteration number
    pub iteration: usize,
    /// Within-cluster sum of squares for this iteration's labels and updated centroids
    pub inertia: f64,
    /// Groups that were empty and got a freshly sampled centroid
    pub reseeded: usize,
    /// Largest absolute change of any centroid component
    pub max_shift: f64,
}

/// Outcome of a clustering run
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterResult {
    /// Group index per input point, in input order
    pub labels: Array1<usize>,
    /// One centroid per group, shape `(n_clusters, 3)`
    pub centroids: Array2<f64>,
    /// Number of groups
    pub n_clusters: usize,
    /// Completed iterations
    pub iterations: usize,
    /// Whether the run stopped because centroids settled
    pub converged: bool,
    /// Stats for every completed iteration
    pub history: Vec<IterationStats>,
}

impl ClusterResult {
    /// Get cluster sizes
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.n_clusters];
        for &label in self.labels.iter() {
            if label < self.n_clusters {
                sizes[label] += 1;
            }
        }
        sizes
    }

    /// Input indices assigned to `cluster`, in input order
    pub fn members(&self, cluster: usize) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|&(_, &label)| label == cluster)
            .map(|(index, _)| index)
            .collect()
    }

    pub fn centroid(&self, cluster: usize) -> Option<[f64; DIMS]> {
        (cluster < self.n_clusters).then(|| to_vector(self.centroids.row(cluster)))
    }

    /// Nearest centroid for a point, lowest index on ties
    pub fn predict<P: Position + ?Sized>(&self, point: &P) -> usize {
        nearest_centroid(&point.position(), &self.centroids)
    }

    /// Run one assignment step against the final centroids.
    ///
    /// For a converged result this reproduces `labels`.
    pub fn assign<P: Position>(&self, points: &[P]) -> Array1<usize> {
        points.iter().map(|point| self.predict(point)).collect()
    }

    /// Within-cluster sum of squares for `points` under this result's labels.
    ///
    /// `points` must be the slice the result was computed from.
    pub fn inertia<P: Position>(&self, points: &[P]) -> f64 {
        let positions: Vec<[f64; DIMS]> = points.iter().map(Position::position).collect();
        compute_inertia(&positions, &self.labels, &self.centroids)
    }
}

/// K-Means parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KMeans {
    n_clusters: usize,
    max_iterations: usize,
    tolerance: f64,
}

impl KMeans {
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    fn validate(&self, n_points: usize) -> Result<(), ClusterError> {
        if n_points == 0 {
            return Err(ClusterError::invalid("point set is empty"));
        }
        if self.n_clusters == 0 {
            return Err(ClusterError::invalid("number of clusters must be at least 1"));
        }
        if self.max_iterations == 0 {
            return Err(ClusterError::invalid("max iterations must be at least 1"));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ClusterError::invalid(format!(
                "tolerance must be finite and non-negative, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }

    /// Partition `points` into `n_clusters` groups.
    ///
    /// Initial centroids are copies of points drawn from `sampler` with
    /// replacement; groups left empty by an assignment step are re-seeded from
    /// the same sampler. With `n_clusters > points.len()` some groups start on
    /// duplicate positions and are re-seeded on every iteration they stay empty.
    ///
    /// # Errors
    /// [`ClusterError::InvalidInput`] for an empty point set, zero clusters,
    /// zero iterations, or a negative/non-finite tolerance.
    pub fn fit<P, S>(&self, points: &[P], sampler: &mut S) -> Result<ClusterResult, ClusterError>
    where
        P: Position,
        S: IndexSampler + ?Sized,
    {
        self.validate(points.len())?;

        let positions: Vec<[f64; DIMS]> = points.iter().map(Position::position).collect();
        let k = self.n_clusters;
        if k > positions.len() {
            tracing::warn!(
                "{} clusters requested for {} points; some groups will stay empty",
                k,
                positions.len()
            );
        }

        let mut centroids = Array2::<f64>::zeros((k, DIMS));
        for mut row in centroids.outer_iter_mut() {
            row.assign(&ArrayView1::from(&sample_position(&positions, sampler)));
        }

        let mut labels = Array1::<usize>::zeros(positions.len());
        let mut history = Vec::new();
        let mut converged = false;

        for iteration in 1..=self.max_iterations {
            for (label, position) in labels.iter_mut().zip(positions.iter()) {
                *label = nearest_centroid(position, &centroids);
            }

            let (updated, reseeded) = update_centroids(&positions, &labels, k, sampler);
            if reseeded > 0 {
                tracing::warn!(
                    "Re-seeded {} empty cluster(s) in iteration {}",
                    reseeded,
                    iteration
                );
            }

            let max_shift = (&updated - &centroids)
                .iter()
                .fold(0.0_f64, |acc, delta| acc.max(delta.abs()));
            converged = max_shift <= self.tolerance;
            centroids = updated;

            let inertia = compute_inertia(&positions, &labels, &centroids);
            tracing::trace!(iteration, inertia, max_shift, reseeded, "k-means iteration");
            history.push(IterationStats {
                iteration,
                inertia,
                reseeded,
                max_shift,
            });

            if converged {
                tracing::debug!("Converged after {} iterations", iteration);
                break;
            }
        }

        if !converged {
            tracing::debug!(
                "Stopped at the iteration cap ({}) without converging",
                self.max_iterations
            );
        }

        Ok(ClusterResult {
            labels,
            centroids,
            n_clusters: k,
            iterations: history.len(),
            converged,
            history,
        })
    }
}

/// Cluster `points` into `k` groups with Lloyd's algorithm.
///
/// # Arguments
/// * `points` - Records to cluster; only their positions are read
/// * `k` - Number of groups
/// * `max_iterations` - Upper bound on assign/update rounds (100 by default)
/// * `sampler` - Randomness used for initial and re-seeded centroids
///
/// # Returns
/// * Labels and centroids from the same, final iteration
pub fn cluster<P, S>(
    points: &[P],
    k: usize,
    max_iterations: usize,
    sampler: &mut S,
) -> Result<ClusterResult, ClusterError>
where
    P: Position,
    S: IndexSampler + ?Sized,
{
    KMeans::new(k).max_iterations(max_iterations).fit(points, sampler)
}

fn sample_position<S: IndexSampler + ?Sized>(
    positions: &[[f64; DIMS]],
    sampler: &mut S,
) -> [f64; DIMS] {
    let len = positions.len();
    let index = sampler.sample_index(len);
    debug_assert!(
        index < len,
        "IndexSampler returned index {} for {} points; indices must lie in 0..len",
        index,
        len
    );
    positions[index]
}

/// Mean of each group's members; empty groups take a freshly sampled point.
fn update_centroids<S: IndexSampler + ?Sized>(
    positions: &[[f64; DIMS]],
    labels: &Array1<usize>,
    k: usize,
    sampler: &mut S,
) -> (Array2<f64>, usize) {
    let mut sums = Array2::<f64>::zeros((k, DIMS));
    let mut counts = vec![0usize; k];

    for (&label, position) in labels.iter().zip(positions.iter()) {
        let mut row = sums.row_mut(label);
        for (sum, value) in row.iter_mut().zip(position.iter()) {
            *sum += value;
        }
        counts[label] += 1;
    }

    let mut reseeded = 0;
    for (cluster, mut row) in sums.outer_iter_mut().enumerate() {
        if counts[cluster] > 0 {
            row /= counts[cluster] as f64;
        } else {
            row.assign(&ArrayView1::from(&sample_position(positions, sampler)));
            reseeded += 1;
        }
    }

    (sums, reseeded)
}

/// Index of the closest centroid by squared Euclidean distance.
///
/// Scans in increasing index order with a strict comparison, so the lowest
/// index wins exact ties.
pub(crate) fn nearest_centroid(position: &[f64; DIMS], centroids: &Array2<f64>) -> usize {
    let mut min_distance = f64::INFINITY;
    let mut closest_cluster = 0;

    for (cluster_idx, centroid) in centroids.outer_iter().enumerate() {
        let distance = squared_distance(position, centroid);
        if distance < min_distance {
            min_distance = distance;
            closest_cluster = cluster_idx;
        }
    }

    closest_cluster
}

fn squared_distance(position: &[f64; DIMS], centroid: ArrayView1<f64>) -> f64 {
    position
        .iter()
        .zip(centroid.iter())
        .map(|(a, b)| (a - b).powi(2))
        .sum()
}

/// Compute within-cluster sum of squares (inertia)
fn compute_inertia(
    positions: &[[f64; DIMS]],
    labels: &Array1<usize>,
    centroids: &Array2<f64>,
) -> f64 {
    labels
        .iter()
        .zip(positions.iter())
        .filter(|&(&cluster, _)| cluster < centroids.nrows())
        .map(|(&cluster, position)| squared_distance(position, centroids.row(cluster)))
        .sum()
}

fn to_vector(row: ArrayView1<f64>) -> [f64; DIMS] {
    let mut vector = [0.0; DIMS];
    for (slot, &value) in vector.iter_mut().zip(row.iter()) {
        *slot = value;
    }
    vector
}
