//! Change extraction between consecutive snapshots.

use std::collections::HashMap;

use arena_core::{ArenaError, LeaderboardEntry, LeaderboardSnapshot, PlayerChange, PlayerIdentity};

/// Build the candidate pool: one `PlayerChange` per identity present in both
/// snapshots whose observable counters actually moved.
///
/// Players absent from either snapshot, or present but unchanged, did not
/// compete in this interval and are excluded. Comparing snapshots from
/// different brackets is rejected up front.
///
/// Pure function of its inputs; results follow the current snapshot's
/// canonical row order.
pub fn extract_changes(
    previous: &LeaderboardSnapshot,
    current: &LeaderboardSnapshot,
) -> Result<Vec<PlayerChange>, ArenaError> {
    if previous.bracket() != current.bracket() {
        return Err(ArenaError::BracketMismatch {
            left: previous.bracket(),
            right: current.bracket(),
        });
    }

    let by_identity: HashMap<&PlayerIdentity, &LeaderboardEntry> = previous
        .rows()
        .iter()
        .map(|entry| (&entry.identity, entry))
        .collect();

    let mut changes = Vec::new();
    for row in current.rows() {
        if let Some(before) = by_identity.get(&row.identity) {
            let change = PlayerChange::between(before, row);
            if !change.is_noop() {
                changes.push(change);
            }
        }
    }
    Ok(changes)
}
