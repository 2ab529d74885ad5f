//! Distance metrics for k-means assignment.

/// Distance between two feature vectors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistanceMetric {
    Euclidean,
    Manhattan,
    /// Number of coordinates that differ. Ignores magnitude entirely.
    Hamming,
    /// `1 - cos(a, b)`. Scale-invariant.
    Cosine,
}

impl DistanceMetric {
    pub fn distance(self, a: &[f64], b: &[f64]) -> f64 {
        debug_assert_eq!(a.len(), b.len());
        match self {
            DistanceMetric::Euclidean => a
                .iter()
                .zip(b)
                .map(|(x, y)| (x - y) * (x - y))
                .sum::<f64>()
                .sqrt(),
            DistanceMetric::Manhattan => a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum(),
            DistanceMetric::Hamming => a
                .iter()
                .zip(b)
                .filter(|(x, y)| (*x - *y).abs() > 1e-12)
                .count() as f64,
            DistanceMetric::Cosine => {
                let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
                let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
                let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
                if norm_a < 1e-12 || norm_b < 1e-12 {
                    // A zero vector has no direction; identical zeros count
                    // as coincident, anything else as maximally apart
                    if norm_a < 1e-12 && norm_b < 1e-12 {
                        0.0
                    } else {
                        1.0
                    }
                } else {
                    1.0 - dot / (norm_a * norm_b)
                }
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DistanceMetric::Euclidean => "euclidean",
            DistanceMetric::Manhattan => "manhattan",
            DistanceMetric::Hamming => "hamming",
            DistanceMetric::Cosine => "cosine",
        }
    }
}
