//! Lloyd's k-means clustering engine
//!
//! Centroids are seeded from the first `k` points in input order, then the
//! engine alternates assignment and mean-update passes until the largest
//! centroid movement drops to `epsilon` (never on the first pass) or the
//! iteration budget runs out. There is no randomness, so a fixed input
//! always produces bit-identical centroids.

use crate::data::PointSet;
use crate::error::{Error, Result};
use ndarray::{s, Array1, Array2, ArrayView1};
use tracing::{debug, info, warn};

/// Smallest accepted number of clusters.
pub const MIN_K: usize = 1;
/// Smallest accepted iteration bound (inclusive).
pub const MIN_ITER: usize = 1;
/// Largest accepted iteration bound (inclusive).
pub const MAX_ITER: usize = 1000;
/// Iteration bound used when none is given.
pub const DEFAULT_ITER: usize = 400;
/// Convergence threshold on per-cluster centroid movement.
pub const EPSILON: f64 = 0.001;

/// Parameters for a k-means run
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansConfig {
    /// Number of clusters
    pub k: usize,
    /// Upper bound on assign/update passes
    pub max_iterations: usize,
    /// Convergence threshold
    pub epsilon: f64,
}

impl KMeansConfig {
    /// Configuration with the default iteration bound and epsilon.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iterations: DEFAULT_ITER,
            epsilon: EPSILON,
        }
    }

    /// Set the iteration bound.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the convergence threshold.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Check parameter bounds that do not depend on the data.
    pub fn validate(&self) -> Result<()> {
        if self.k < MIN_K {
            return Err(Error::InvalidClusterCount {
                value: self.k.to_string(),
            });
        }
        if !(MIN_ITER..=MAX_ITER).contains(&self.max_iterations) {
            return Err(Error::InvalidIterationCount {
                value: self.max_iterations.to_string(),
                min: MIN_ITER,
                max: MAX_ITER,
            });
        }
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(Error::InvalidParameter {
                name: "epsilon",
                message: "must be finite and non-negative",
            });
        }
        Ok(())
    }
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self::new(MIN_K)
    }
}

/// Why the iteration loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Largest centroid movement fell to epsilon after the first pass.
    Converged,
    /// The iteration bound was reached first.
    Exhausted,
}

/// A cluster that received no points during one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyCluster {
    /// Zero-based pass index.
    pub iteration: usize,
    /// Cluster index that stayed empty.
    pub cluster: usize,
}

/// Result of a k-means run
#[derive(Debug, Clone)]
pub struct KMeansModel {
    /// Number of clusters
    pub n_clusters: usize,
    /// Final centroids, shape (k, dimension)
    pub centroids: Array2<f64>,
    /// Cluster index of every point from the last assignment pass
    pub labels: Array1<usize>,
    /// Passes executed
    pub iterations: usize,
    /// How the loop ended
    pub stop_reason: StopReason,
    /// Largest centroid movement during the last pass
    pub max_shift: f64,
    /// Every empty-cluster event, in the order it happened
    pub empty_clusters: Vec<EmptyCluster>,
    /// Within-cluster sum of squares against the final centroids
    pub inertia: f64,
}

impl KMeansModel {
    /// Nearest centroid for a new point; ties go to the lowest index.
    pub fn predict(&self, point: &[f64]) -> Result<usize> {
        if point.len() != self.centroids.ncols() {
            return Err(Error::InvalidParameter {
                name: "point",
                message: "dimension differs from the fitted centroids",
            });
        }
        Ok(nearest_centroid(ArrayView1::from(point), &self.centroids))
    }

    /// Points per cluster after the last assignment pass.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.n_clusters];
        for &label in self.labels.iter() {
            sizes[label] += 1;
        }
        sizes
    }

    /// Whether any pass left a cluster without points.
    pub fn is_degenerate(&self) -> bool {
        !self.empty_clusters.is_empty()
    }
}

/// Per-cluster running sums and counts, reused across passes
#[derive(Debug)]
struct Accumulator {
    sums: Array2<f64>,
    counts: Vec<usize>,
}

impl Accumulator {
    fn new(k: usize, dimension: usize) -> Self {
        Self {
            sums: Array2::zeros((k, dimension)),
            counts: vec![0; k],
        }
    }

    fn reset(&mut self) {
        self.sums.fill(0.0);
        self.counts.iter_mut().for_each(|c| *c = 0);
    }

    fn add(&mut self, cluster: usize, point: ArrayView1<'_, f64>) {
        let mut sum = self.sums.row_mut(cluster);
        sum += &point;
        self.counts[cluster] += 1;
    }
}

/// Outcome of a single assign/update pass
#[derive(Debug, Clone, PartialEq)]
pub struct Pass {
    /// Largest movement among clusters that received points
    pub max_shift: f64,
    /// Clusters left without points; their centroids did not move
    pub empty: Vec<usize>,
}

/// Lloyd iteration state over a borrowed point set
///
/// Owns the centroids, the per-point labels and the scratch accumulator.
#[derive(Debug)]
pub struct Lloyd<'a> {
    points: &'a PointSet,
    centroids: Array2<f64>,
    labels: Array1<usize>,
    accumulator: Accumulator,
}

impl<'a> Lloyd<'a> {
    /// Seed `k` centroids from the first `k` points.
    pub fn new(points: &'a PointSet, k: usize) -> Result<Self> {
        let centroids = initial_centroids(points, k)?;
        Ok(Self::from_parts(points, centroids))
    }

    /// Start from caller-supplied centroids of shape (k, dimension).
    pub fn with_centroids(points: &'a PointSet, centroids: Array2<f64>) -> Result<Self> {
        if centroids.nrows() == 0 {
            return Err(Error::InvalidClusterCount {
                value: "0".to_string(),
            });
        }
        if centroids.ncols() != points.dimension() {
            return Err(Error::InvalidParameter {
                name: "centroids",
                message: "dimension differs from the point set",
            });
        }
        Ok(Self::from_parts(points, centroids))
    }

    fn from_parts(points: &'a PointSet, centroids: Array2<f64>) -> Self {
        let accumulator = Accumulator::new(centroids.nrows(), points.dimension());
        Self {
            points,
            labels: Array1::zeros(points.count()),
            centroids,
            accumulator,
        }
    }

    /// Current centroids.
    pub fn centroids(&self) -> &Array2<f64> {
        &self.centroids
    }

    /// Labels from the most recent pass (all zero before the first).
    pub fn labels(&self) -> &Array1<usize> {
        &self.labels
    }

    /// Run one pass: reset, assign every point, then move each non-empty
    /// centroid to the mean of its members.
    pub fn step(&mut self) -> Pass {
        self.accumulator.reset();

        for (idx, point) in self.points.features().outer_iter().enumerate() {
            let cluster = nearest_centroid(point, &self.centroids);
            self.labels[idx] = cluster;
            self.accumulator.add(cluster, point);
        }

        let mut max_shift: f64 = 0.0;
        let mut empty = Vec::new();
        for cluster in 0..self.centroids.nrows() {
            let members = self.accumulator.counts[cluster];
            if members == 0 {
                empty.push(cluster);
                continue;
            }

            let new_centroid = &self.accumulator.sums.row(cluster) / members as f64;
            let shift = euclidean_distance(self.centroids.row(cluster), new_centroid.view());
            max_shift = max_shift.max(shift);
            self.centroids.row_mut(cluster).assign(&new_centroid);
        }

        Pass { max_shift, empty }
    }

    /// Within-cluster sum of squares for the current labels and centroids.
    pub fn inertia(&self) -> f64 {
        compute_inertia(self.points.features(), &self.labels, &self.centroids)
    }

    fn into_parts(self) -> (Array2<f64>, Array1<usize>) {
        (self.centroids, self.labels)
    }
}

/// Run Lloyd's k-means over `points`.
///
/// # Arguments
/// * `points` - Loaded point set
/// * `config` - Cluster count, iteration bound and epsilon
///
/// # Returns
/// * Fitted `KMeansModel`; empty clusters are recorded, not fatal
pub fn fit_kmeans(points: &PointSet, config: &KMeansConfig) -> Result<KMeansModel> {
    config.validate()?;

    let mut lloyd = Lloyd::new(points, config.k)?;
    let mut empty_clusters = Vec::new();
    let mut stop_reason = StopReason::Exhausted;
    let mut max_shift = 0.0;
    let mut iterations = 0;

    for iter in 0..config.max_iterations {
        iterations = iter + 1;
        let pass = lloyd.step();
        max_shift = pass.max_shift;

        for cluster in pass.empty {
            warn!(iteration = iter, cluster, "cluster received no points");
            empty_clusters.push(EmptyCluster {
                iteration: iter,
                cluster,
            });
        }

        debug!(iteration = iter, max_shift, "completed pass");

        if iter > 0 && max_shift <= config.epsilon {
            stop_reason = StopReason::Converged;
            break;
        }
    }

    let inertia = lloyd.inertia();
    info!(iterations, ?stop_reason, inertia, "k-means finished");

    let (centroids, labels) = lloyd.into_parts();
    Ok(KMeansModel {
        n_clusters: config.k,
        centroids,
        labels,
        iterations,
        stop_reason,
        max_shift,
        empty_clusters,
        inertia,
    })
}

/// Copy the first `k` points, in input order; needs strictly more points than `k`.
pub fn initial_centroids(points: &PointSet, k: usize) -> Result<Array2<f64>> {
    let count = points.count();
    if k < MIN_K {
        return Err(Error::InvalidClusterCount {
            value: k.to_string(),
        });
    }
    if k >= count {
        return Err(Error::TooManyClusters { k, count });
    }
    Ok(points.features().slice(s![..k, ..]).to_owned())
}

/// Index of the closest centroid; a later centroid wins only when strictly closer.
fn nearest_centroid(point: ArrayView1<'_, f64>, centroids: &Array2<f64>) -> usize {
    let mut min_distance = f64::INFINITY;
    let mut closest = 0;

    for (idx, centroid) in centroids.outer_iter().enumerate() {
        let distance = squared_distance(point, centroid);
        if distance < min_distance {
            min_distance = distance;
            closest = idx;
        }
    }

    closest
}

#[inline]
fn squared_distance(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Calculate Euclidean distance between two points
fn euclidean_distance(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    squared_distance(a, b).sqrt()
}

/// Compute within-cluster sum of squares (inertia)
fn compute_inertia(features: &Array2<f64>, labels: &Array1<usize>, centroids: &Array2<f64>) -> f64 {
    features
        .outer_iter()
        .zip(labels.iter())
        .map(|(point, &cluster)| squared_distance(point, centroids.row(cluster)))
        .sum()
}
