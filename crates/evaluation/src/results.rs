//! Evaluation results storage and reporting.

use serde::{Deserialize, Serialize};
use std::path::Path;

use arena_core::FeatureWeights;
use team_matcher::RunStatistics;

use crate::metrics::EvaluationScore;
use crate::simulator::SimulationConfig;

/// Complete results of one evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResults {
    /// Name/description of the run
    pub name: String,
    /// Simulation configuration used
    pub config: SimulationConfig,
    /// One entry per clustering strategy evaluated
    pub entries: Vec<ResultEntry>,
    /// Best weights found by a search, if one ran
    pub best_weights: Option<FeatureWeights>,
}

/// One strategy's outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultEntry {
    pub strategy: String,
    /// `None` when the run's metrics were degenerate
    pub score: Option<EvaluationScore>,
    pub stats: RunStatistics,
}

impl EvaluationResults {
    pub fn new(name: &str, config: SimulationConfig) -> Self {
        Self {
            name: name.to_string(),
            config,
            entries: Vec::new(),
            best_weights: None,
        }
    }

    /// Add one strategy's outcome.
    pub fn add_entry(
        &mut self,
        strategy: &str,
        score: Option<EvaluationScore>,
        stats: RunStatistics,
    ) {
        self.entries.push(ResultEntry {
            strategy: strategy.to_string(),
            score,
            stats,
        });
    }

    /// Save results to a JSON file
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize: {}", e))?;
        std::fs::write(path, json).map_err(|e| format!("Failed to write: {}", e))
    }

    /// Load results from a JSON file
    pub fn load(path: &Path) -> Result<Self, String> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| format!("Failed to read: {}", e))?;
        serde_json::from_str(&contents).map_err(|e| format!("Failed to parse: {}", e))
    }

    /// Generate a text report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!("=== Evaluation: {} ===\n\n", self.name));
        report.push_str(&format!(
            "History: {} players, {} rounds, {} teams/round, seed {}\n\n",
            self.config.players, self.config.length, self.config.teams_per_round, self.config.seed
        ));

        report.push_str(&format!(
            "{:<30} {:>10} {:>10} {:>10} {:>10}\n",
            "Strategy", "Precision", "Recall", "F1", "F2"
        ));
        report.push_str(&"-".repeat(74));
        report.push('\n');

        for entry in &self.entries {
            match &entry.score {
                Some(score) => report.push_str(&format!(
                    "{:<30} {:>10.3} {:>10.3} {:>10.3} {:>10.3}\n",
                    entry.strategy, score.precision, score.recall, score.f1, score.f2
                )),
                None => report.push_str(&format!(
                    "{:<30} {:>43}\n",
                    entry.strategy, "degenerate (no teams matched)"
                )),
            }
        }

        if let Some(weights) = &self.best_weights {
            report.push_str("\nBest weights:\n");
            for (name, weight) in weights.named() {
                report.push_str(&format!("  {:<22} {:>8.3}\n", name, weight));
            }
        }

        report
    }

    /// Print report to stdout
    pub fn print_report(&self) {
        println!("{}", self.generate_report());
    }
}
