//! K-means clustering over player change vectors.
//!
//! Implements the `Clusterer` trait from `arena_core` with Lloyd's
//! iterations, a pluggable distance metric, and seeded centroid
//! initialization so that runs are reproducible. On convergence shortfall
//! the best partition observed so far is returned rather than an error.

mod metrics;

pub use metrics::DistanceMetric;

use arena_core::Clusterer;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;


/// Iteration budget before the best partition so far is returned.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// A k-means clustering strategy.
///
/// The seed is re-applied on every call, so clustering is a pure function
/// of its inputs: the same vectors and group count always produce the same
/// labels, independent of call order.
pub struct KMeansClusterer {
    metric: DistanceMetric,
    normalize: bool,
    seed: u64,
    max_iterations: usize,
    name: String,
}

impl KMeansClusterer {
    /// K-means over raw (weighted but unnormalized) feature vectors.
    pub fn new(metric: DistanceMetric, seed: u64) -> Self {
        Self {
            metric,
            normalize: false,
            seed,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            name: format!("kmeans-{}", metric.label()),
        }
    }

    /// K-means that asks the caller for zero-mean/unit-variance features.
    pub fn normalized(metric: DistanceMetric, seed: u64) -> Self {
        Self {
            normalize: true,
            name: format!("kmeans-{}-normalized", metric.label()),
            ..Self::new(metric, seed)
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Label each vector with its nearest centroid (lowest index wins ties).
    fn assign(&self, vectors: &[Vec<f64>], centroids: &[Vec<f64>]) -> Vec<usize> {
        vectors
            .iter()
            .map(|vector| {
                let mut best = 0;
                let mut best_distance = f64::INFINITY;
                for (label, centroid) in centroids.iter().enumerate() {
                    let distance = self.metric.distance(vector, centroid);
                    if distance < best_distance {
                        best = label;
                        best_distance = distance;
                    }
                }
                best
            })
            .collect()
    }

    /// Reseed every empty cluster from the point farthest from its current
    /// centroid, so each label in `[0, n_groups)` ends up used.
    fn repair_empty_clusters(
        &self,
        vectors: &[Vec<f64>],
        labels: &mut [usize],
        centroids: &[Vec<f64>],
        n_groups: usize,
    ) {
        let mut counts = vec![0usize; n_groups];
        for &label in labels.iter() {
            counts[label] += 1;
        }

        for empty in 0..n_groups {
            if counts[empty] > 0 {
                continue;
            }
            // Donor must keep at least one member; with len >= n_groups a
            // donor with two or more members always exists.
            let farthest = labels
                .iter()
                .enumerate()
                .filter(|&(_, &label)| counts[label] > 1)
                .max_by(|&(i, &la), &(j, &lb)| {
                    let da = self.metric.distance(&vectors[i], &centroids[la]);
                    let db = self.metric.distance(&vectors[j], &centroids[lb]);
                    da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
                })
                .map(|(i, _)| i);
            if let Some(point) = farthest {
                counts[labels[point]] -= 1;
                labels[point] = empty;
                counts[empty] = 1;
            }
        }
    }

    /// Per-cluster mean vectors for the given labeling.
    fn cluster_means(
        vectors: &[Vec<f64>],
        labels: &[usize],
        n_groups: usize,
    ) -> Vec<Vec<f64>> {
        let width = vectors[0].len();
        let mut sums = vec![vec![0.0; width]; n_groups];
        let mut counts = vec![0usize; n_groups];

        for (vector, &label) in vectors.iter().zip(labels) {
            counts[label] += 1;
            for (accumulated, value) in sums[label].iter_mut().zip(vector) {
                *accumulated += value;
            }
        }
        for (sum, &count) in sums.iter_mut().zip(&counts) {
            if count > 0 {
                for value in sum.iter_mut() {
                    *value /= count as f64;
                }
            }
        }
        sums
    }

    /// Within-cluster dispersion of a labeling, measured with this
    /// strategy's metric against the cluster means.
    fn partition_cost(&self, vectors: &[Vec<f64>], labels: &[usize], n_groups: usize) -> f64 {
        let means = Self::cluster_means(vectors, labels, n_groups);
        vectors
            .iter()
            .zip(labels)
            .map(|(vector, &label)| self.metric.distance(vector, &means[label]))
            .sum()
    }
}

impl Clusterer for KMeansClusterer {
    fn compute_groups(&self, vectors: &[Vec<f64>], n_groups: usize) -> Vec<usize> {
        assert!(n_groups >= 1, "n_groups must be at least 1");
        assert!(
            vectors.len() >= n_groups,
            "need at least as many vectors ({}) as groups ({})",
            vectors.len(),
            n_groups
        );
        if n_groups == 1 {
            return vec![0; vectors.len()];
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut centroids: Vec<Vec<f64>> = vectors
            .choose_multiple(&mut rng, n_groups)
            .cloned()
            .collect();

        let mut labels: Vec<usize> = Vec::new();
        let mut best_cost = f64::INFINITY;
        let mut best_labels: Vec<usize> = Vec::new();

        for _ in 0..self.max_iterations {
            let mut next = self.assign(vectors, &centroids);
            self.repair_empty_clusters(vectors, &mut next, &centroids, n_groups);

            let cost = self.partition_cost(vectors, &next, n_groups);
            if cost < best_cost {
                best_cost = cost;
                best_labels = next.clone();
            }

            if next == labels {
                return labels;
            }
            labels = next;
            centroids = Self::cluster_means(vectors, &labels, n_groups);
        }

        log::debug!(
            "{}: no convergence within {} iterations for {} vectors / {} groups; returning best partition (cost {:.3})",
            self.name,
            self.max_iterations,
            vectors.len(),
            n_groups,
            best_cost
        );
        best_labels
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn wants_normalization(&self) -> bool {
        self.normalize
    }
}
