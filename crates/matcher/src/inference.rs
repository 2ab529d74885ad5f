//! The team-inference orchestrator.

use std::collections::HashSet;

use arena_core::{
    feature_matrix, normalize_features, Clusterer, ArenaError, FeatureWeights,
    LeaderboardSnapshot, PlayerIdentity, Team,
};

use crate::extractor::extract_changes;
use crate::stats::RunStatistics;

/// Infers which teams played between two consecutive snapshots.
///
/// Owns a clustering strategy and the feature weights applied before
/// clustering. Weights are read-only during a call; the evaluation loop
/// swaps them between runs via [`TeamMatcher::set_weights`].
pub struct TeamMatcher {
    clusterer: Box<dyn Clusterer>,
    weights: FeatureWeights,
    stats: RunStatistics,
}

impl TeamMatcher {
    pub fn new(clusterer: Box<dyn Clusterer>) -> Self {
        Self::with_weights(clusterer, FeatureWeights::uniform())
    }

    pub fn with_weights(clusterer: Box<dyn Clusterer>, weights: FeatureWeights) -> Self {
        Self {
            clusterer,
            weights,
            stats: RunStatistics::default(),
        }
    }

    pub fn weights(&self) -> &FeatureWeights {
        &self.weights
    }

    pub fn set_weights(&mut self, weights: FeatureWeights) {
        self.weights = weights;
    }

    pub fn strategy_name(&self) -> &str {
        self.clusterer.name()
    }

    pub fn stats(&self) -> &RunStatistics {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = RunStatistics::default();
    }

    /// Infer the set of teams that played between `previous` and `current`.
    ///
    /// Returns only teams of exactly `k` distinct players for the snapshots'
    /// bracket. May under-report; never emits a malformed team. An empty
    /// candidate pool (nobody played) yields an empty set.
    pub fn find_teams(
        &mut self,
        previous: &LeaderboardSnapshot,
        current: &LeaderboardSnapshot,
    ) -> Result<HashSet<Team>, ArenaError> {
        let mut pool = extract_changes(previous, current)?;
        self.stats.rounds += 1;
        self.stats.players_considered += pool.len();

        let k = current.team_size();
        let n_groups = pool.len() / k;
        if n_groups == 0 {
            self.stats.dropped_remainder += pool.len();
            return Ok(HashSet::new());
        }

        // The remainder cannot form a full team; drop the least-affected
        // players as boundary noise rather than forcing an undersized group.
        let excess = pool.len() % k;
        if excess > 0 {
            pool.sort_by(|a, b| {
                a.rating_delta
                    .abs()
                    .cmp(&b.rating_delta.abs())
                    .then_with(|| a.identity.cmp(&b.identity))
            });
            pool.drain(..excess);
            self.stats.dropped_remainder += excess;
        }
        self.stats.groups_requested += n_groups;

        let mut matrix = feature_matrix(&pool, &self.weights);
        if self.clusterer.wants_normalization() {
            normalize_features(&mut matrix);
        }
        let labels = self.clusterer.compute_groups(&matrix, n_groups);

        let mut groups: Vec<Vec<PlayerIdentity>> = vec![Vec::new(); n_groups];
        for (change, &label) in pool.iter().zip(&labels) {
            groups[label].push(change.identity.clone());
        }

        let mut teams = HashSet::with_capacity(n_groups);
        for members in groups {
            if members.len() == k {
                teams.insert(Team::new(members));
            } else if !members.is_empty() {
                self.stats.discarded_unbalanced += 1;
            }
        }
        self.stats.teams_formed += teams.len();

        log::debug!(
            "{}: {} candidates -> {} groups -> {} teams",
            self.clusterer.name(),
            pool.len(),
            n_groups,
            teams.len()
        );
        Ok(teams)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::{Bracket, LeaderboardEntry};
    use chrono::DateTime;
    use kmeans_clusterer::{DistanceMetric, KMeansClusterer};

    fn entry(name: &str, rating: i32, weekly_wins: u32) -> LeaderboardEntry {
        LeaderboardEntry {
            identity: PlayerIdentity::new(name, "r1"),
            class_id: 1,
            spec_id: 10,
            faction_id: 0,
            race_id: 0,
            gender_id: 0,
            rating,
            rank: 0,
            season_wins: weekly_wins,
            season_losses: 0,
            weekly_wins,
            weekly_losses: 0,
        }
    }

    fn snapshot(rows: Vec<LeaderboardEntry>) -> LeaderboardSnapshot {
        LeaderboardSnapshot::new(Bracket::Threes, DateTime::UNIX_EPOCH, rows).unwrap()
    }

    fn euclidean_matcher() -> TeamMatcher {
        TeamMatcher::new(Box::new(KMeansClusterer::new(DistanceMetric::Euclidean, 42)))
    }

    #[test]
    fn test_identical_snapshots_yield_nothing() {
        let rows: Vec<LeaderboardEntry> = (0..6)
            .map(|i| entry(&format!("p{}", i), 2100 + i * 10, 4))
            .collect();
        let previous = snapshot(rows.clone());
        let current = snapshot(rows);

        let mut matcher = euclidean_matcher();
        let teams = matcher.find_teams(&previous, &current).unwrap();
        assert!(teams.is_empty());
        assert_eq!(matcher.stats().players_considered, 0);
    }

    #[test]
    fn test_single_clean_round() {
        // Six players, one team of three actually played
        let previous = snapshot(vec![
            entry("ana", 2200, 4),
            entry("bob", 2190, 4),
            entry("cat", 2180, 4),
            entry("dan", 2170, 4),
            entry("eve", 2160, 4),
            entry("fox", 2150, 4),
        ]);
        let current = snapshot(vec![
            entry("ana", 2216, 5),
            entry("bob", 2206, 5),
            entry("cat", 2196, 5),
            entry("dan", 2170, 4),
            entry("eve", 2160, 4),
            entry("fox", 2150, 4),
        ]);

        let mut matcher = euclidean_matcher();
        let teams = matcher.find_teams(&previous, &current).unwrap();

        let expected = Team::new(vec![
            PlayerIdentity::new("ana", "r1"),
            PlayerIdentity::new("bob", "r1"),
            PlayerIdentity::new("cat", "r1"),
        ]);
        assert_eq!(teams.len(), 1);
        assert!(teams.contains(&expected));
    }

    #[test]
    fn test_remainder_dropped_by_least_rating_change() {
        // Seven changed players: the one with the smallest |delta| is noise
        let previous = snapshot(vec![
            entry("ana", 2200, 4),
            entry("bob", 2190, 4),
            entry("cat", 2180, 4),
            entry("dan", 2170, 4),
            entry("eve", 2160, 4),
            entry("fox", 2150, 4),
            entry("gus", 2140, 4),
        ]);
        let current = snapshot(vec![
            entry("ana", 2216, 5),
            entry("bob", 2206, 5),
            entry("cat", 2196, 5),
            entry("dan", 2154, 4),
            entry("eve", 2144, 4),
            entry("fox", 2134, 4),
            entry("gus", 2141, 5),
        ]);

        let mut matcher = euclidean_matcher();
        let teams = matcher.find_teams(&previous, &current).unwrap();

        assert_eq!(matcher.stats().dropped_remainder, 1);
        for team in &teams {
            assert!(!team.contains(&PlayerIdentity::new("gus", "r1")));
        }
    }

    #[test]
    fn test_every_returned_team_has_bracket_size() {
        let previous = snapshot(
            (0..12)
                .map(|i| entry(&format!("p{:02}", i), 2100 + i * 5, 4))
                .collect(),
        );
        let current = snapshot(
            (0..12)
                .map(|i| {
                    let played = i % 2 == 0;
                    let rating = 2100 + i * 5 + if played { 13 + i } else { 0 };
                    entry(&format!("p{:02}", i), rating, if played { 5 } else { 4 })
                })
                .collect(),
        );

        let mut matcher = euclidean_matcher();
        let teams = matcher.find_teams(&previous, &current).unwrap();
        for team in &teams {
            assert_eq!(team.len(), 3);
        }
    }

    #[test]
    fn test_pool_smaller_than_team_size() {
        let previous = snapshot(vec![
            entry("ana", 2200, 4),
            entry("bob", 2190, 4),
            entry("cat", 2180, 4),
        ]);
        let current = snapshot(vec![
            entry("ana", 2216, 5),
            entry("bob", 2190, 4),
            entry("cat", 2180, 4),
        ]);

        let mut matcher = euclidean_matcher();
        let teams = matcher.find_teams(&previous, &current).unwrap();
        assert!(teams.is_empty());
        assert_eq!(matcher.stats().dropped_remainder, 1);
    }

    /// Strategy stub that dumps every vector into group 0, leaving other
    /// labels unused. Exercises the unbalanced-cluster discard path.
    struct LopsidedClusterer;

    impl Clusterer for LopsidedClusterer {
        fn compute_groups(&self, vectors: &[Vec<f64>], _n_groups: usize) -> Vec<usize> {
            vec![0; vectors.len()]
        }

        fn name(&self) -> &str {
            "lopsided"
        }
    }

    #[test]
    fn test_unbalanced_clusters_discarded() {
        let previous = snapshot(
            (0..6)
                .map(|i| entry(&format!("p{}", i), 2100 + i * 10, 4))
                .collect(),
        );
        let current = snapshot(
            (0..6)
                .map(|i| entry(&format!("p{}", i), 2120 + i * 10, 5))
                .collect(),
        );

        let mut matcher = TeamMatcher::new(Box::new(LopsidedClusterer));
        let teams = matcher.find_teams(&previous, &current).unwrap();

        // All six members landed in one cluster: not a valid team of three
        assert!(teams.is_empty());
        assert_eq!(matcher.stats().discarded_unbalanced, 1);
        assert_eq!(matcher.stats().teams_formed, 0);
    }

    #[test]
    fn test_bracket_mismatch_aborts() {
        let previous = LeaderboardSnapshot::new(
            Bracket::Twos,
            DateTime::UNIX_EPOCH,
            vec![entry("ana", 2200, 4)],
        )
        .unwrap();
        let current = snapshot(vec![entry("ana", 2216, 5)]);

        let mut matcher = euclidean_matcher();
        assert!(matches!(
            matcher.find_teams(&previous, &current),
            Err(ArenaError::BracketMismatch { .. })
        ));
    }
}
