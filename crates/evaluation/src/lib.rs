//! Evaluation harness for the team-inference engine.
//!
//! This crate provides infrastructure for:
//! - Generating labeled synthetic match history (no ground truth exists in
//!   production, so inference quality is measured against simulation)
//! - Scoring a matcher's inferences with precision/recall/F-beta
//! - Searching feature weights for the configuration that maximizes F2
//! - Persisting comparison results and rendering reports
//!
//! # Usage
//!
//! ```bash
//! # Compare every clustering variant over one simulated history
//! cargo run -p evaluation -- compare --players 300 --length 100 --seed 367
//!
//! # Search feature weights with the normalized Euclidean strategy
//! cargo run -p evaluation -- search --length 20
//! ```

mod harness;
mod metrics;
mod results;
mod simulator;
mod weight_search;

pub use harness::*;
pub use metrics::*;
pub use results::*;
pub use simulator::*;
pub use weight_search::*;
