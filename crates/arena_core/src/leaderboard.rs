//! Leaderboard rows and immutable snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::ArenaError;
use crate::types::{Bracket, PlayerIdentity};

/// One player's ranking-table row at a point in time.
///
/// Season counters only ever grow; weekly counters are reset periodically
/// by the ranking service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub identity: PlayerIdentity,
    pub class_id: u8,
    pub spec_id: u16,
    pub faction_id: u8,
    pub race_id: u8,
    pub gender_id: u8,
    pub rating: i32,
    /// 1 = best. Reassigned from the canonical ordering on snapshot build.
    pub rank: u32,
    pub season_wins: u32,
    pub season_losses: u32,
    pub weekly_wins: u32,
    pub weekly_losses: u32,
}

/// A timestamped, immutable capture of all rows for one bracket.
///
/// Rows are held in canonical order: rating descending, identity as the
/// stable tiebreak. A new round of play produces a new snapshot; snapshots
/// are never mutated in place, so rows stay private behind accessors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardSnapshot {
    bracket: Bracket,
    time: DateTime<Utc>,
    rows: Vec<LeaderboardEntry>,
}

impl LeaderboardSnapshot {
    /// Build a snapshot from unordered rows.
    ///
    /// Establishes the canonical ordering and reassigns ranks `1..=n`.
    /// Rejects duplicate identities.
    pub fn new(
        bracket: Bracket,
        time: DateTime<Utc>,
        mut rows: Vec<LeaderboardEntry>,
    ) -> Result<Self, ArenaError> {
        {
            let mut seen: HashSet<&PlayerIdentity> = HashSet::with_capacity(rows.len());
            for row in &rows {
                if !seen.insert(&row.identity) {
                    return Err(ArenaError::DuplicateIdentity(row.identity.clone()));
                }
            }
        }

        rows.sort_by(|a, b| {
            b.rating
                .cmp(&a.rating)
                .then_with(|| a.identity.cmp(&b.identity))
        });
        for (i, row) in rows.iter_mut().enumerate() {
            row.rank = i as u32 + 1;
        }

        Ok(Self {
            bracket,
            time,
            rows,
        })
    }

    pub fn bracket(&self) -> Bracket {
        self.bracket
    }

    /// Team size `k` fixed by this snapshot's bracket.
    pub fn team_size(&self) -> usize {
        self.bracket.team_size()
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    /// Rows in canonical order (rating descending).
    pub fn rows(&self) -> &[LeaderboardEntry] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Look up a row by identity.
    pub fn get(&self, identity: &PlayerIdentity) -> Option<&LeaderboardEntry> {
        self.rows.iter().find(|row| &row.identity == identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, rating: i32) -> LeaderboardEntry {
        LeaderboardEntry {
            identity: PlayerIdentity::new(name, "r1"),
            class_id: 1,
            spec_id: 10,
            faction_id: 0,
            race_id: 0,
            gender_id: 0,
            rating,
            rank: 0,
            season_wins: 0,
            season_losses: 0,
            weekly_wins: 0,
            weekly_losses: 0,
        }
    }

    #[test]
    fn test_canonical_ordering() {
        let rows = vec![entry("low", 1800), entry("high", 2400), entry("mid", 2100)];
        let snapshot =
            LeaderboardSnapshot::new(Bracket::Threes, DateTime::UNIX_EPOCH, rows).unwrap();

        let names: Vec<&str> = snapshot
            .rows()
            .iter()
            .map(|r| r.identity.name.as_str())
            .collect();
        assert_eq!(names, vec!["high", "mid", "low"]);
        assert_eq!(snapshot.rows()[0].rank, 1);
        assert_eq!(snapshot.rows()[2].rank, 3);
    }

    #[test]
    fn test_ordering_is_input_order_independent() {
        let rows = vec![entry("a", 2000), entry("b", 2200), entry("c", 2200)];
        let mut reversed = rows.clone();
        reversed.reverse();

        let first =
            LeaderboardSnapshot::new(Bracket::Threes, DateTime::UNIX_EPOCH, rows).unwrap();
        let second =
            LeaderboardSnapshot::new(Bracket::Threes, DateTime::UNIX_EPOCH, reversed).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rating_ties_break_by_identity() {
        let rows = vec![entry("zed", 2200), entry("ana", 2200)];
        let snapshot =
            LeaderboardSnapshot::new(Bracket::Twos, DateTime::UNIX_EPOCH, rows).unwrap();
        assert_eq!(snapshot.rows()[0].identity.name, "ana");
    }

    #[test]
    fn test_duplicate_identity_rejected() {
        let rows = vec![entry("ana", 2000), entry("ana", 2100)];
        let result = LeaderboardSnapshot::new(Bracket::Twos, DateTime::UNIX_EPOCH, rows);
        assert!(matches!(result, Err(ArenaError::DuplicateIdentity(_))));
    }

    #[test]
    fn test_lookup_by_identity() {
        let rows = vec![entry("ana", 2000), entry("bob", 2100)];
        let snapshot =
            LeaderboardSnapshot::new(Bracket::Twos, DateTime::UNIX_EPOCH, rows).unwrap();

        let found = snapshot.get(&PlayerIdentity::new("ana", "r1")).unwrap();
        assert_eq!(found.rating, 2000);
        assert!(snapshot.get(&PlayerIdentity::new("ana", "r2")).is_none());
    }
}
