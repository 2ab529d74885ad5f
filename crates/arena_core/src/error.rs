//! Error taxonomy for the inference core.
//!
//! Input mismatches are rejected before computation. Insufficient data
//! (nobody played) is not an error; it yields empty results at the call
//! sites instead.

use thiserror::Error;

use crate::types::{Bracket, PlayerIdentity};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArenaError {
    /// Snapshots from different brackets were compared.
    #[error("cannot compare snapshots across brackets: {left} vs {right}")]
    BracketMismatch { left: Bracket, right: Bracket },

    /// A snapshot was built with the same identity appearing twice.
    #[error("duplicate identity in snapshot: {0}")]
    DuplicateIdentity(PlayerIdentity),

    /// A team had the wrong member count for its bracket.
    #[error("invalid team size: expected {expected}, found {found}")]
    TeamSize { expected: usize, found: usize },
}
