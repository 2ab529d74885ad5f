//! Change-feature vectors for candidate players.
//!
//! A `PlayerChange` captures how one player's observable counters moved
//! between two consecutive snapshots. It exists only for the duration of one
//! inference call and is never persisted.

use serde::{Deserialize, Serialize};

use crate::leaderboard::LeaderboardEntry;
use crate::types::PlayerIdentity;

/// Number of features in a change vector.
pub const FEATURE_COUNT: usize = 7;

/// Feature names, aligned with the vector produced by
/// [`PlayerChange::to_features`].
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "rating_delta",
    "rank_delta",
    "weekly_wins_delta",
    "weekly_losses_delta",
    "games_played",
    "win_share",
    "rating_per_game",
];

/// Per-player deltas across two consecutive snapshots.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerChange {
    pub identity: PlayerIdentity,
    pub rating_delta: i32,
    /// Negative = the player climbed the table.
    pub rank_delta: i64,
    pub weekly_wins_delta: i64,
    pub weekly_losses_delta: i64,
}

impl PlayerChange {
    /// Deltas from `previous` to `current` for one identity.
    pub fn between(previous: &LeaderboardEntry, current: &LeaderboardEntry) -> Self {
        Self {
            identity: current.identity.clone(),
            rating_delta: current.rating - previous.rating,
            rank_delta: current.rank as i64 - previous.rank as i64,
            weekly_wins_delta: current.weekly_wins as i64 - previous.weekly_wins as i64,
            weekly_losses_delta: current.weekly_losses as i64 - previous.weekly_losses as i64,
        }
    }

    /// True when the player shows no sign of having competed: rating and
    /// both weekly counters unchanged. A rank shift alone can come from
    /// other players moving around them.
    pub fn is_noop(&self) -> bool {
        self.rating_delta == 0 && self.weekly_wins_delta == 0 && self.weekly_losses_delta == 0
    }

    /// Games the player appears to have played this interval.
    pub fn games_played(&self) -> i64 {
        self.weekly_wins_delta + self.weekly_losses_delta
    }

    /// Raw (unweighted) feature vector, ordered per [`FEATURE_NAMES`].
    pub fn to_features(&self) -> [f64; FEATURE_COUNT] {
        let games = self.games_played();
        let win_share = if games > 0 {
            self.weekly_wins_delta as f64 / games as f64
        } else {
            0.0
        };
        let rating_per_game = if games > 0 {
            self.rating_delta as f64 / games as f64
        } else {
            self.rating_delta as f64
        };
        [
            self.rating_delta as f64,
            self.rank_delta as f64,
            self.weekly_wins_delta as f64,
            self.weekly_losses_delta as f64,
            games as f64,
            win_share,
            rating_per_game,
        ]
    }
}

/// Named scalar multiplier per feature.
///
/// There is no ambient global: the weight-search loop owns the only mutable
/// copy and threads it explicitly into every inference call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureWeights {
    weights: [f64; FEATURE_COUNT],
}

impl FeatureWeights {
    /// All features weighted 1.0.
    pub fn uniform() -> Self {
        Self {
            weights: [1.0; FEATURE_COUNT],
        }
    }

    pub fn from_array(weights: [f64; FEATURE_COUNT]) -> Self {
        Self { weights }
    }

    pub fn get(&self, index: usize) -> f64 {
        self.weights[index]
    }

    pub fn set(&mut self, index: usize, value: f64) {
        self.weights[index] = value;
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.weights
    }

    /// (name, weight) pairs for reports.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.weights.iter().copied())
    }

    /// Rescale a raw feature vector by these weights.
    pub fn apply(&self, features: &[f64; FEATURE_COUNT]) -> Vec<f64> {
        features
            .iter()
            .zip(self.weights.iter())
            .map(|(f, w)| f * w)
            .collect()
    }
}

impl Default for FeatureWeights {
    fn default() -> Self {
        Self::uniform()
    }
}

/// Weighted feature matrix for a candidate pool, one row per change.
pub fn feature_matrix(changes: &[PlayerChange], weights: &FeatureWeights) -> Vec<Vec<f64>> {
    changes
        .iter()
        .map(|change| weights.apply(&change.to_features()))
        .collect()
}

/// Rescale every feature column to zero mean and unit variance.
///
/// Computed fresh over the candidate pool it is applied to. Columns with no
/// spread collapse to zero rather than dividing by a vanishing deviation.
pub fn normalize_features(matrix: &mut [Vec<f64>]) {
    if matrix.is_empty() {
        return;
    }
    let n = matrix.len() as f64;
    let width = matrix[0].len();

    for col in 0..width {
        let mean = matrix.iter().map(|row| row[col]).sum::<f64>() / n;
        let variance = matrix
            .iter()
            .map(|row| {
                let d = row[col] - mean;
                d * d
            })
            .sum::<f64>()
            / n;
        let std_dev = variance.sqrt();

        for row in matrix.iter_mut() {
            if std_dev > 1e-12 {
                row[col] = (row[col] - mean) / std_dev;
            } else {
                row[col] = 0.0;
            }
        }
    }
}
