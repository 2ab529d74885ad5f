//! Run statistics for matcher diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Counts accumulated across `find_teams` calls.
///
/// Purely observational: nothing here feeds back into the algorithm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Snapshot pairs processed.
    pub rounds: usize,
    /// Candidate players found across all rounds.
    pub players_considered: usize,
    /// Clusters requested from the strategy.
    pub groups_requested: usize,
    /// Teams emitted.
    pub teams_formed: usize,
    /// Clusters discarded for not having exactly `k` members.
    pub discarded_unbalanced: usize,
    /// Remainder players dropped before clustering.
    pub dropped_remainder: usize,
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rounds: {} players considered, {} groups requested, {} teams formed ({} unbalanced clusters discarded, {} remainder players dropped)",
            self.rounds,
            self.players_considered,
            self.groups_requested,
            self.teams_formed,
            self.discarded_unbalanced,
            self.dropped_remainder
        )
    }
}
