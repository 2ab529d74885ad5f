//! Evaluation CLI
//!
//! Compare clustering strategies and search feature weights over simulated
//! leaderboard history.

use std::env;
use std::path::Path;

use arena_core::Clusterer;
use evaluation::{
    generate_history, score_history, CoordinateDescent, EvalError, EvaluationResults,
    SimulationConfig, WeightOptimizer,
};
use kmeans_clusterer::{DistanceMetric, KMeansClusterer};
use team_matcher::TeamMatcher;

fn print_usage() {
    println!("Team-inference evaluation harness");
    println!();
    println!("Usage:");
    println!("  evaluation compare [options]        Compare all clustering strategies");
    println!("  evaluation search [options]         Search feature weights for best F2");
    println!();
    println!("Options:");
    println!("  --config PATH     Load simulation config from a TOML file");
    println!("  --players N       Population size (default 999)");
    println!("  --length N        Measured rounds (default 500)");
    println!("  --seed N          Simulation seed (default 367)");
    println!("  --warmup N        Warm-up weeks (default 3)");
    println!("  --max-games N     Max games per team per warm-up week (default 40)");
    println!("  --teams N         Teams playing per round (default 5)");
    println!("  --budget N        Weight-search evaluation budget (default 400)");
    println!("  --out PATH        Save results as JSON");
    println!();
    println!("Examples:");
    println!("  evaluation compare --players 300 --length 100");
    println!("  evaluation search --length 20 --budget 200");
}

fn load_config(path: &str) -> Result<SimulationConfig, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {}", path, e))?;
    toml::from_str(&contents).map_err(|e| format!("Failed to parse config {}: {}", path, e))
}

/// Parse the shared simulation options. `--config` is applied first so
/// explicit flags override the file.
fn parse_config(args: &[String]) -> Result<SimulationConfig, String> {
    let mut config = SimulationConfig::default();
    if let Some(pos) = args.iter().position(|a| a == "--config") {
        match args.get(pos + 1) {
            Some(path) => config = load_config(path)?,
            None => return Err("--config requires a path".to_string()),
        }
    }

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--players" => {
                if i + 1 < args.len() {
                    config.players = args[i + 1].parse().unwrap_or(config.players);
                    i += 1;
                }
            }
            "--length" => {
                if i + 1 < args.len() {
                    config.length = args[i + 1].parse().unwrap_or(config.length);
                    i += 1;
                }
            }
            "--seed" => {
                if i + 1 < args.len() {
                    config.seed = args[i + 1].parse().unwrap_or(config.seed);
                    i += 1;
                }
            }
            "--warmup" => {
                if i + 1 < args.len() {
                    config.warmup_weeks = args[i + 1].parse().unwrap_or(config.warmup_weeks);
                    i += 1;
                }
            }
            "--max-games" => {
                if i + 1 < args.len() {
                    config.max_games_per_week =
                        args[i + 1].parse().unwrap_or(config.max_games_per_week);
                    i += 1;
                }
            }
            "--teams" => {
                if i + 1 < args.len() {
                    config.teams_per_round = args[i + 1].parse().unwrap_or(config.teams_per_round);
                    i += 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    Ok(config)
}

fn parse_flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|pos| args.get(pos + 1))
        .cloned()
}

/// The strategy matrix the comparison runs: every distance metric raw, plus
/// the normalized variants of the two magnitude-sensitive ones.
fn strategy_suite(seed: u64) -> Vec<Box<dyn Clusterer>> {
    vec![
        Box::new(KMeansClusterer::normalized(DistanceMetric::Euclidean, seed)),
        Box::new(KMeansClusterer::new(DistanceMetric::Euclidean, seed)),
        Box::new(KMeansClusterer::normalized(DistanceMetric::Manhattan, seed)),
        Box::new(KMeansClusterer::new(DistanceMetric::Manhattan, seed)),
        Box::new(KMeansClusterer::new(DistanceMetric::Hamming, seed)),
        Box::new(KMeansClusterer::new(DistanceMetric::Cosine, seed)),
    ]
}

fn run_compare(args: &[String]) {
    let config = match parse_config(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return;
        }
    };

    println!("=== Strategy comparison ===");
    println!(
        "Players: {}, rounds: {}, teams/round: {}, seed: {}",
        config.players, config.length, config.teams_per_round, config.seed
    );
    println!();

    let history = match generate_history(&config) {
        Ok(history) => history,
        Err(e) => {
            eprintln!("Error: failed to generate history: {}", e);
            return;
        }
    };

    let mut results = EvaluationResults::new("strategy comparison", config.clone());
    for clusterer in strategy_suite(config.seed) {
        let name = clusterer.name().to_string();
        let mut matcher = TeamMatcher::new(clusterer);

        match score_history(&history, &mut matcher) {
            Ok(score) => {
                println!(
                    "{:<30} precision {:.3}, recall {:.3}, F1 {:.3}, F2 {:.3}",
                    name, score.precision, score.recall, score.f1, score.f2
                );
                println!("  {}", matcher.stats());
                results.add_entry(&name, Some(score), *matcher.stats());
            }
            Err(EvalError::DegenerateMetric { .. }) => {
                println!("{:<30} degenerate (no teams matched)", name);
                results.add_entry(&name, None, *matcher.stats());
            }
            Err(e) => {
                eprintln!("Error: {}: {}", name, e);
                return;
            }
        }
    }

    println!();
    results.print_report();

    if let Some(out) = parse_flag_value(args, "--out") {
        if let Err(e) = results.save(Path::new(&out)) {
            eprintln!("Warning: failed to save results: {}", e);
        }
    }
}

fn run_search(args: &[String]) {
    let config = match parse_config(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return;
        }
    };
    let budget: usize = parse_flag_value(args, "--budget")
        .and_then(|v| v.parse().ok())
        .unwrap_or(400);

    println!("=== Weight search ===");
    println!(
        "Players: {}, rounds: {}, seed: {}, budget: {} evaluations",
        config.players, config.length, config.seed, budget
    );
    println!();

    let history = match generate_history(&config) {
        Ok(history) => history,
        Err(e) => {
            eprintln!("Error: failed to generate history: {}", e);
            return;
        }
    };

    let seed = config.seed;
    let mut degenerate = 0usize;
    let mut objective = |weights: &arena_core::FeatureWeights| -> Option<f64> {
        let clusterer = KMeansClusterer::normalized(DistanceMetric::Euclidean, seed);
        let mut matcher = TeamMatcher::with_weights(Box::new(clusterer), weights.clone());
        match score_history(&history, &mut matcher) {
            Ok(score) => Some(score.f2),
            Err(EvalError::DegenerateMetric { .. }) => {
                degenerate += 1;
                None
            }
            Err(e) => {
                log::warn!("evaluation failed during search: {}", e);
                None
            }
        }
    };

    let mut search = CoordinateDescent {
        max_evaluations: budget,
        ..CoordinateDescent::default()
    };
    let outcome = search.optimize(&mut objective);

    println!();
    match outcome.best_score {
        Some(score) => {
            println!(
                "Best F2 {:.3} after {} evaluations ({} degenerate)",
                score, outcome.evaluations, degenerate
            );
            println!("Weights:");
            for (name, weight) in outcome.best_weights.named() {
                println!("  {:<22} {:>8.3}", name, weight);
            }
        }
        None => {
            println!(
                "No usable evaluation in {} attempts - the matcher never matched a team",
                outcome.evaluations
            );
        }
    }

    if let Some(out) = parse_flag_value(args, "--out") {
        let mut results = EvaluationResults::new("weight search", config);
        results.best_weights = Some(outcome.best_weights);
        if let Err(e) = results.save(Path::new(&out)) {
            eprintln!("Warning: failed to save results: {}", e);
        }
    }
}

fn main() {
    sensible_env_logger::init!();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "compare" => run_compare(&args[2..]),
        "search" => run_search(&args[2..]),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            print_usage();
        }
    }
}
