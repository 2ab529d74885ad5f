//! Precision, recall and F-beta scoring.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use arena_core::{ArenaError, Team};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error(transparent)]
    Arena(#[from] ArenaError),

    /// A denominator of the metric computation was zero. This changes how a
    /// run should be interpreted, so it is surfaced instead of being coerced
    /// to zero.
    #[error("degenerate metric: {inferred} teams inferred, {ground_truth} in ground truth, {true_positives} matched")]
    DegenerateMetric {
        inferred: usize,
        ground_truth: usize,
        true_positives: usize,
    },
}

/// Aggregate inference quality over one evaluation run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluationScore {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub f2: f64,
    pub true_positives: usize,
    pub inferred: usize,
    pub ground_truth: usize,
}

/// Weighted harmonic mean of precision and recall; beta > 1 favors recall.
///
/// Callers must ensure the denominator is nonzero (see
/// [`ScoreAccumulator::finish`]).
pub fn f_beta(precision: f64, recall: f64, beta: f64) -> f64 {
    let b2 = beta * beta;
    (1.0 + b2) * precision * recall / (b2 * precision + recall)
}

/// Accumulates per-round counts and turns them into a score.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScoreAccumulator {
    true_positives: usize,
    inferred: usize,
    ground_truth: usize,
}

impl ScoreAccumulator {
    /// Record one round's inferred teams against its ground truth.
    /// Teams count as matched only on full set equality.
    pub fn record_round(&mut self, inferred: &HashSet<Team>, truth: &HashSet<Team>) {
        self.inferred += inferred.len();
        self.ground_truth += truth.len();
        self.true_positives += inferred.intersection(truth).count();
    }

    /// Compute the final score.
    ///
    /// Zero inferred teams, zero ground-truth teams, or zero matches all
    /// leave some metric denominator at zero; that is a
    /// [`EvalError::DegenerateMetric`], not a zero score.
    pub fn finish(self) -> Result<EvaluationScore, EvalError> {
        if self.inferred == 0 || self.ground_truth == 0 || self.true_positives == 0 {
            return Err(EvalError::DegenerateMetric {
                inferred: self.inferred,
                ground_truth: self.ground_truth,
                true_positives: self.true_positives,
            });
        }

        let precision = self.true_positives as f64 / self.inferred as f64;
        let recall = self.true_positives as f64 / self.ground_truth as f64;
        Ok(EvaluationScore {
            precision,
            recall,
            f1: f_beta(precision, recall, 1.0),
            f2: f_beta(precision, recall, 2.0),
            true_positives: self.true_positives,
            inferred: self.inferred,
            ground_truth: self.ground_truth,
        })
    }
}
