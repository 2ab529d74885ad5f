//! Team inference from consecutive leaderboard snapshots.
//!
//! This crate provides infrastructure for:
//! - Extracting per-player change vectors from a snapshot pair
//! - Turning clustered change vectors into inferred teams
//! - Tracking run statistics for diagnostics

mod extractor;
mod inference;
mod stats;

pub use extractor::extract_changes;
pub use inference::TeamMatcher;
pub use stats::RunStatistics;
