//! Synthetic match history generation.
//!
//! Produces an ordered sequence of leaderboard snapshots together with the
//! teams that actually played each round: the labeled ground truth the
//! scoring harness measures inference against.

use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use arena_core::{
    estimated_rating_change, is_support_spec, ArenaError, Bracket, LeaderboardEntry,
    LeaderboardSnapshot, PlayerIdentity, Team, SUPPORT_SPECS,
};

/// Configuration for one simulated history run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Population size.
    pub players: usize,
    pub bracket: Bracket,
    /// Players are spread over this many realms; teams never cross realms.
    pub realms: usize,
    /// Measured rounds to record.
    pub length: usize,
    /// Warm-up weeks played before measurement to disperse ratings.
    pub warmup_weeks: u32,
    /// Upper bound on games per team per warm-up week.
    pub max_games_per_week: u32,
    /// How many teams play in each measured round.
    pub teams_per_round: usize,
    /// Starting ratings are drawn uniformly from this band.
    pub rating_band_min: i32,
    pub rating_band_max: i32,
    /// Opponents are rated `opponent_rating ± opponent_spread`.
    pub opponent_rating: i32,
    pub opponent_spread: i32,
    /// Seed for the run's generator; same config means same history.
    pub seed: u64,
    /// Timestamp of the baseline snapshot.
    pub start_time: DateTime<Utc>,
    /// Minutes between consecutive snapshots.
    pub round_minutes: i64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            players: 999,
            bracket: Bracket::Threes,
            realms: 5,
            length: 500,
            warmup_weeks: 3,
            max_games_per_week: 40,
            teams_per_round: 5,
            rating_band_min: 2100,
            rating_band_max: 2300,
            opponent_rating: 2300,
            opponent_spread: 100,
            seed: 367,
            start_time: DateTime::UNIX_EPOCH,
            round_minutes: 10,
        }
    }
}

/// One measured round: the snapshot after play and who actually played.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulatedRound {
    pub snapshot: LeaderboardSnapshot,
    pub playing: HashSet<Team>,
}

/// A labeled history: the baseline snapshot followed by measured rounds.
#[derive(Clone, Debug, PartialEq)]
pub struct History {
    pub baseline: LeaderboardSnapshot,
    pub rounds: Vec<SimulatedRound>,
}

impl History {
    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }
}

/// Synthesize the starting population.
///
/// Identities are realm-qualified and unique; weekly counters start at zero
/// and season counters carry some prior noise.
pub fn generate_players(config: &SimulationConfig, rng: &mut ChaCha8Rng) -> Vec<LeaderboardEntry> {
    (0..config.players)
        .map(|i| {
            let realm = format!("realm{}", rng.gen_range(0..config.realms.max(1)));
            LeaderboardEntry {
                identity: PlayerIdentity::new(&format!("p{:04}", i), &realm),
                class_id: rng.gen_range(0..12),
                spec_id: rng.gen_range(0..400),
                faction_id: rng.gen_range(0..2),
                race_id: rng.gen_range(0..5),
                gender_id: rng.gen_range(0..2),
                rating: rng.gen_range(config.rating_band_min..config.rating_band_max),
                rank: 0,
                season_wins: rng.gen_range(0..20),
                season_losses: rng.gen_range(0..20),
                weekly_wins: 0,
                weekly_losses: 0,
            }
        })
        .collect()
}

/// Partition players into ground-truth teams of the bracket's size.
///
/// Players are grouped by realm and chunked after a shuffle; realm
/// populations that do not divide evenly leave teamless players behind as
/// background noise. Every team must field a support spec; teams formed
/// without one get a member's class and spec forced into one.
pub fn generate_teams(
    bracket: Bracket,
    entries: &mut [LeaderboardEntry],
    rng: &mut ChaCha8Rng,
) -> Vec<Team> {
    let k = bracket.team_size();

    let mut by_realm: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (i, entry) in entries.iter().enumerate() {
        by_realm
            .entry(entry.identity.realm.clone())
            .or_default()
            .push(i);
    }

    let mut teams = Vec::new();
    for indices in by_realm.values_mut() {
        indices.shuffle(rng);
        for chunk in indices.chunks_exact(k) {
            let has_support = chunk.iter().any(|&i| is_support_spec(entries[i].spec_id));
            if !has_support {
                let (spec_id, class_id) = SUPPORT_SPECS[rng.gen_range(0..SUPPORT_SPECS.len())];
                let forced = &mut entries[chunk[0]];
                forced.spec_id = spec_id;
                forced.class_id = class_id;
            }
            teams.push(Team::new(
                chunk.iter().map(|&i| entries[i].identity.clone()),
            ));
        }
    }
    teams
}

/// Apply one game's outcome to every member of a team.
///
/// A member missing from the working set is an internal consistency bug in
/// the simulation, not a recoverable condition.
fn play_team(
    entries: &mut BTreeMap<PlayerIdentity, LeaderboardEntry>,
    team: &Team,
    opponent_rating: i32,
    won: bool,
) {
    for member in team.members() {
        let entry = entries
            .get_mut(member)
            .unwrap_or_else(|| panic!("simulated player {} missing from prior snapshot", member));
        let change = estimated_rating_change(entry.rating, opponent_rating, won);
        entry.rating = (entry.rating + change).max(0);
        if won {
            entry.weekly_wins += 1;
            entry.season_wins += 1;
        } else {
            entry.weekly_losses += 1;
            entry.season_losses += 1;
        }
    }
}

/// Generate a full labeled history from the configuration.
///
/// Deterministic: the same configuration (seed included) always produces an
/// identical history.
pub fn generate_history(config: &SimulationConfig) -> Result<History, ArenaError> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let spread = config.opponent_spread.max(1);

    let mut players = generate_players(config, &mut rng);
    let teams = generate_teams(config.bracket, &mut players, &mut rng);
    log::info!(
        "simulating {} players in {} teams over {} rounds (seed {})",
        players.len(),
        teams.len(),
        config.length,
        config.seed
    );

    let mut working: BTreeMap<PlayerIdentity, LeaderboardEntry> = players
        .into_iter()
        .map(|entry| (entry.identity.clone(), entry))
        .collect();

    // Warm-up: disperse ratings and accumulate weekly counters
    for _week in 0..config.warmup_weeks {
        for team in &teams {
            let games = rng.gen_range(0..config.max_games_per_week.max(1));
            for _ in 0..games {
                let won = rng.gen_bool(0.5);
                let opponent = config.opponent_rating + rng.gen_range(-spread..spread);
                play_team(&mut working, team, opponent, won);
            }
        }
    }

    // Rescale accumulated counters to approximate one steady-state week
    if config.warmup_weeks > 0 {
        let divisor = config.warmup_weeks * 2;
        for entry in working.values_mut() {
            entry.weekly_wins /= divisor;
            entry.weekly_losses /= divisor;
        }
    }

    let baseline = LeaderboardSnapshot::new(
        config.bracket,
        config.start_time,
        working.values().cloned().collect(),
    )?;

    // Measured rounds: a fixed-size random subset of teams plays each round
    let mut rounds = Vec::with_capacity(config.length);
    let mut order: Vec<usize> = (0..teams.len()).collect();
    let per_round = config.teams_per_round.min(teams.len());

    for round in 0..config.length {
        order.shuffle(&mut rng);
        let playing: Vec<&Team> = order[..per_round].iter().map(|&i| &teams[i]).collect();

        let won = rng.gen_bool(0.5);
        let opponent = config.opponent_rating + rng.gen_range(-spread..spread);
        for team in &playing {
            play_team(&mut working, team, opponent, won);
        }

        let time = config.start_time + Duration::minutes(config.round_minutes * (round as i64 + 1));
        let snapshot = LeaderboardSnapshot::new(
            config.bracket,
            time,
            working.values().cloned().collect(),
        )?;
        rounds.push(SimulatedRound {
            snapshot,
            playing: playing.into_iter().cloned().collect(),
        });
    }

    Ok(History { baseline, rounds })
}
