//! Scoring a matcher against a labeled history.

use arena_core::ArenaError;
use team_matcher::TeamMatcher;

use crate::metrics::{EvalError, EvaluationScore, ScoreAccumulator};
use crate::simulator::History;

/// Walk the history pairwise, feed each snapshot pair to the matcher and
/// compare inferred teams against the recorded ground truth.
///
/// Ground-truth teams of the wrong size for the bracket are rejected before
/// any inference runs.
pub fn score_history(
    history: &History,
    matcher: &mut TeamMatcher,
) -> Result<EvaluationScore, EvalError> {
    let expected = history.baseline.team_size();
    for round in &history.rounds {
        for team in &round.playing {
            if team.len() != expected {
                return Err(ArenaError::TeamSize {
                    expected,
                    found: team.len(),
                }
                .into());
            }
        }
    }

    let mut accumulator = ScoreAccumulator::default();
    let mut previous = &history.baseline;
    for round in &history.rounds {
        let inferred = matcher.find_teams(previous, &round.snapshot)?;
        accumulator.record_round(&inferred, &round.playing);
        previous = &round.snapshot;
    }

    let score = accumulator.finish();
    match &score {
        Ok(s) => log::info!(
            "{}: precision {:.2}, recall {:.2}, F1 {:.2}, F2 {:.2}",
            matcher.strategy_name(),
            s.precision,
            s.recall,
            s.f1,
            s.f2
        ),
        Err(e) => log::warn!("{}: {}", matcher.strategy_name(), e),
    }
    score
}
