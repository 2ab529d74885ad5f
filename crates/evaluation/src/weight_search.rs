//! Local search over feature weights.
//!
//! The search maximizes a caller-supplied objective (typically the F2 score
//! of a full evaluation run). It is kept behind a trait so alternative
//! strategies can be substituted without touching the matcher or simulator.

use arena_core::{FeatureWeights, FEATURE_COUNT};

/// Result of one search run.
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    /// Best weights observed across the whole search, not the final step;
    /// intermediate steps can regress.
    pub best_weights: FeatureWeights,
    /// Score of `best_weights`; `None` if every evaluation was degenerate.
    pub best_score: Option<f64>,
    /// Objective evaluations spent.
    pub evaluations: usize,
}

/// A black-box maximizer over feature weights.
///
/// The objective returns `None` when an evaluation is degenerate (no teams
/// inferred, for example); such probes count as non-improving.
pub trait WeightOptimizer {
    fn optimize(
        &mut self,
        objective: &mut dyn FnMut(&FeatureWeights) -> Option<f64>,
    ) -> SearchOutcome;
}

/// Coordinate descent with a shrinking step.
///
/// Probes each coordinate in both directions with the current step size and
/// accepts improving moves. A full sweep without improvement beyond the
/// tolerance halves the step; the search stops when the step falls below
/// the tolerance or the evaluation budget runs out.
#[derive(Clone, Debug)]
pub struct CoordinateDescent {
    pub initial: FeatureWeights,
    pub step: f64,
    pub tolerance: f64,
    pub max_evaluations: usize,
}

impl Default for CoordinateDescent {
    fn default() -> Self {
        Self {
            initial: FeatureWeights::uniform(),
            step: 0.25,
            tolerance: 1e-2,
            max_evaluations: 400,
        }
    }
}

impl WeightOptimizer for CoordinateDescent {
    fn optimize(
        &mut self,
        objective: &mut dyn FnMut(&FeatureWeights) -> Option<f64>,
    ) -> SearchOutcome {
        let mut current = self.initial.clone();
        let mut evaluations = 1;
        let mut current_score = objective(&current);
        let mut best = current_score.map(|score| (current.clone(), score));
        let mut step = self.step;

        'search: while evaluations < self.max_evaluations && step >= self.tolerance {
            let mut improved = false;

            for coordinate in 0..FEATURE_COUNT {
                for direction in [step, -step] {
                    if evaluations >= self.max_evaluations {
                        break 'search;
                    }
                    let mut candidate = current.clone();
                    candidate.set(coordinate, candidate.get(coordinate) + direction);

                    evaluations += 1;
                    let Some(score) = objective(&candidate) else {
                        continue;
                    };

                    let gain = match current_score {
                        Some(reference) => score - reference,
                        None => f64::INFINITY,
                    };
                    if gain > 0.0 {
                        current = candidate;
                        current_score = Some(score);
                        if best.as_ref().map_or(true, |(_, b)| score > *b) {
                            best = Some((current.clone(), score));
                        }
                        if gain > self.tolerance {
                            improved = true;
                        }
                        break; // next coordinate
                    }
                }
            }

            if !improved {
                step /= 2.0;
            }
        }

        log::debug!(
            "weight search finished after {} evaluations (best {:?})",
            evaluations,
            best.as_ref().map(|(_, score)| score)
        );

        match best {
            Some((weights, score)) => SearchOutcome {
                best_weights: weights,
                best_score: Some(score),
                evaluations,
            },
            None => SearchOutcome {
                best_weights: self.initial.clone(),
                best_score: None,
                evaluations,
            },
        }
    }
}
