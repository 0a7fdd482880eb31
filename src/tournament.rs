//! Match orchestration for Pursuit.
//!
//! Provides a pure function interface: `(template, bots, seed) -> MatchOutcome`
//!
//! The driver handles:
//! - Instantiating controllers for both players
//! - The two-round format with a role swap after the first round
//! - Per-side time accounting around every controller call
//! - Summing each player's score across both rounds
//! - Running whole series of matches in parallel with aggregated statistics

mod bots;

pub use bots::{BOT_NAMES, Controller, GreedyBot, RandomBot, StayBot, bot_by_name};

use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{error, info};

use crate::error::ConfigError;
use crate::game::invariants::check_invariants;
use crate::game::{Game, MapTemplate, MatchResult, Role};

/// Owner ids used for the two players of a match.
pub const PLAYER_IDS: [&str; 2] = ["player1", "player2"];

/// Error type for tournament operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TournamentError {
    /// The map could not be loaded.
    Config(ConfigError),
    /// No built-in controller has this name.
    UnknownBot(String),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(e) => write!(f, "{e}"),
            Self::UnknownBot(name) => write!(
                f,
                "unknown bot {name:?} (available: {})",
                BOT_NAMES.join(", ")
            ),
        }
    }
}

impl std::error::Error for TournamentError {}

impl From<ConfigError> for TournamentError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// One side of a round: who it is and what drives its agents.
pub struct Contestant<'a> {
    /// Owner id assigned to this side's agents.
    pub id: &'a str,
    /// Decision maker for this side.
    pub controller: &'a mut dyn Controller,
}

impl std::fmt::Debug for Contestant<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Contestant")
            .field("id", &self.id)
            .field("controller", &self.controller.name())
            .finish()
    }
}

/// Play one round to completion on `game`, calling `on_tick` after every tick.
///
/// The game is reset first, so the same instance can be reused for rematches.
pub fn run_round_with(
    game: &mut Game,
    mut attacker: Contestant<'_>,
    mut defender: Contestant<'_>,
    seed: u64,
    mut on_tick: impl FnMut(&Game),
) -> MatchResult {
    game.reset(attacker.id, defender.id, seed);

    while !game.is_over() {
        let started = Instant::now();
        let attacker_actions = attacker.controller.actions(&game.agent_views(attacker.id));
        let attacker_time = started.elapsed().as_secs_f64();

        let started = Instant::now();
        let defender_actions = defender.controller.actions(&game.agent_views(defender.id));
        let defender_time = started.elapsed().as_secs_f64();

        game.apply_actions(&attacker_actions, &defender_actions, attacker_time, defender_time);

        if cfg!(debug_assertions) {
            for violation in check_invariants(game) {
                error!(tick = game.tick(), "{violation}");
            }
        }

        on_tick(game);
    }

    let result = game.result();
    info!(
        seed,
        steps = result.steps,
        attacker = %attacker.id,
        attacker_score = result.side(Role::Attacker).score,
        defender = %defender.id,
        defender_score = result.side(Role::Defender).score,
        "round finished"
    );
    result
}

/// Play one round to completion on `game`.
pub fn run_round(
    game: &mut Game,
    attacker: Contestant<'_>,
    defender: Contestant<'_>,
    seed: u64,
) -> MatchResult {
    run_round_with(game, attacker, defender, seed, |_| {})
}

/// Result of a full two-round match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchOutcome {
    /// The seed used for both rounds.
    pub seed: u64,
    /// Bot names, player 1 then player 2.
    pub bots: [String; 2],
    /// Round 1 (player 1 attacks) and round 2 (player 2 attacks).
    pub rounds: [MatchResult; 2],
    /// Total score per player over both rounds.
    pub totals: [u64; 2],
    /// Index of the winning player, `None` on a tie.
    pub winner: Option<usize>,
}

impl MatchOutcome {
    fn from_rounds(seed: u64, bots: [String; 2], rounds: [MatchResult; 2]) -> Self {
        let mut totals = [0u64; 2];
        for round in &rounds {
            for side in &round.players {
                if let Some(idx) = PLAYER_IDS.iter().position(|&p| p == side.id) {
                    totals[idx] += side.score;
                }
            }
        }
        let winner = match totals[0].cmp(&totals[1]) {
            std::cmp::Ordering::Greater => Some(0),
            std::cmp::Ordering::Less => Some(1),
            std::cmp::Ordering::Equal => None,
        };
        Self {
            seed,
            bots,
            rounds,
            totals,
            winner,
        }
    }
}

/// Seed for player `idx`'s controller, derived from the match seed.
#[must_use]
pub const fn controller_seed(seed: u64, idx: usize) -> u64 {
    seed.wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(idx as u64 + 1)
}

/// Run a complete two-round match between two built-in bots.
///
/// Player 1 attacks in the first round, player 2 in the second; both
/// rounds use `seed`. Each round runs `on_tick` after every tick.
///
/// # Determinism
///
/// Given the same template, bots and seed, the scores and step counts are
/// always identical. Only `time_used` depends on the host.
///
/// # Errors
///
/// Returns an error if a bot name is unknown.
pub fn run_match_with(
    template: &MapTemplate,
    bots: [&str; 2],
    seed: u64,
    mut on_tick: impl FnMut(usize, &Game),
) -> Result<MatchOutcome, TournamentError> {
    let mut first = bot_by_name(bots[0], controller_seed(seed, 0))?;
    let mut second = bot_by_name(bots[1], controller_seed(seed, 1))?;
    let mut game = Game::new(template.clone());

    let round1 = run_round_with(
        &mut game,
        Contestant {
            id: PLAYER_IDS[0],
            controller: first.as_mut(),
        },
        Contestant {
            id: PLAYER_IDS[1],
            controller: second.as_mut(),
        },
        seed,
        |g| on_tick(0, g),
    );
    let round2 = run_round_with(
        &mut game,
        Contestant {
            id: PLAYER_IDS[1],
            controller: second.as_mut(),
        },
        Contestant {
            id: PLAYER_IDS[0],
            controller: first.as_mut(),
        },
        seed,
        |g| on_tick(1, g),
    );

    Ok(MatchOutcome::from_rounds(
        seed,
        [bots[0].to_string(), bots[1].to_string()],
        [round1, round2],
    ))
}

/// Run a complete two-round match between two built-in bots.
///
/// # Errors
///
/// Returns an error if a bot name is unknown.
pub fn run_match(
    template: &MapTemplate,
    bots: [&str; 2],
    seed: u64,
) -> Result<MatchOutcome, TournamentError> {
    run_match_with(template, bots, seed, |_, _| {})
}

/// Aggregated statistics over a series of matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeriesStats {
    /// Matches played.
    pub games_played: u64,
    /// Match wins per player.
    pub wins: [u64; 2],
    /// Tied matches.
    pub draws: u64,
    /// Sum of match totals per player.
    total_scores: [u64; 2],
    /// Sum of squared match totals, for the standard deviation.
    score_sq_sums: [f64; 2],
    /// Ticks across all rounds.
    total_steps: u64,
}

impl SeriesStats {
    /// Fold one match outcome into the stats.
    pub fn add(&mut self, outcome: &MatchOutcome) {
        self.games_played += 1;
        match outcome.winner {
            Some(idx) => self.wins[idx] += 1,
            None => self.draws += 1,
        }
        for (idx, &total) in outcome.totals.iter().enumerate() {
            self.total_scores[idx] += total;
            #[allow(clippy::cast_precision_loss)]
            let t = total as f64;
            self.score_sq_sums[idx] += t * t;
        }
        self.total_steps += outcome
            .rounds
            .iter()
            .map(|r| u64::from(r.steps))
            .sum::<u64>();
    }

    /// Combine stats gathered on another thread.
    pub fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        self.draws += other.draws;
        self.total_steps += other.total_steps;
        for idx in 0..2 {
            self.wins[idx] += other.wins[idx];
            self.total_scores[idx] += other.total_scores[idx];
            self.score_sq_sums[idx] += other.score_sq_sums[idx];
        }
    }

    /// Share of matches won by player `idx` (0.0-1.0).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn win_rate(&self, idx: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.wins.get(idx).copied().unwrap_or(0) as f64 / self.games_played as f64
    }

    /// Mean match total for player `idx`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_score(&self, idx: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_scores.get(idx).copied().unwrap_or(0) as f64 / self.games_played as f64
    }

    /// Standard deviation of match totals for player `idx`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn score_std_dev(&self, idx: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        let n = self.games_played as f64;
        let mean = self.avg_score(idx);
        let sq_sum = self.score_sq_sums.get(idx).copied().unwrap_or(0.0);
        let variance = (sq_sum / n) - (mean * mean);
        variance.max(0.0).sqrt()
    }

    /// Mean ticks per round.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_steps(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_steps as f64 / (self.games_played * 2) as f64
    }
}

/// Play `games` matches in parallel, seeding match `i` with `base_seed + i`.
///
/// Uses a lock-free fold/reduce: each worker accumulates its own
/// [`SeriesStats`], merged at the end. `on_match` runs after every match
/// on the worker that played it.
///
/// # Errors
///
/// Returns an error if a bot name is unknown.
pub fn run_series(
    template: &MapTemplate,
    bots: [&str; 2],
    games: u64,
    base_seed: u64,
    on_match: impl Fn(&MatchOutcome) + Sync,
) -> Result<SeriesStats, TournamentError> {
    for name in bots {
        bot_by_name(name, 0)?;
    }

    fold_series(
        games,
        |i| run_match(template, bots, base_seed.wrapping_add(i)),
        on_match,
    )
}

/// Aggregate `games` outcomes of `play`; the first failing match aborts the series.
fn fold_series(
    games: u64,
    play: impl Fn(u64) -> Result<MatchOutcome, TournamentError> + Sync,
    on_match: impl Fn(&MatchOutcome) + Sync,
) -> Result<SeriesStats, TournamentError> {
    (0..games)
        .into_par_iter()
        .try_fold(SeriesStats::default, |mut local, i| {
            let outcome = play(i)?;
            on_match(&outcome);
            local.add(&outcome);
            Ok::<_, TournamentError>(local)
        })
        .try_reduce(SeriesStats::default, |mut a, b| {
            a.merge(&b);
            Ok(a)
        })
}
