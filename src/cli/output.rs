//! Output formatting utilities for CLI.

use std::fmt::Write;

use pursuit::Role;
use pursuit::tournament::{MatchOutcome, PLAYER_IDS, SeriesStats};
use serde::Serialize;

/// Format a match outcome as human-readable text.
pub(super) fn format_match_text(outcome: &MatchOutcome) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Match Result (seed: {})", outcome.seed);
    for (idx, round) in outcome.rounds.iter().enumerate() {
        let attacker = round.side(Role::Attacker);
        let defender = round.side(Role::Defender);
        let _ = writeln!(
            output,
            "  Round {}: {} attacks {} points, {} defends {} points ({} steps)",
            idx + 1,
            attacker.id,
            attacker.score,
            defender.id,
            defender.score,
            round.steps
        );
    }
    output.push('\n');

    for (idx, name) in outcome.bots.iter().enumerate() {
        let _ = writeln!(
            output,
            "  {} ({name}): {} points",
            PLAYER_IDS[idx], outcome.totals[idx]
        );
    }
    match outcome.winner {
        Some(idx) => {
            let _ = writeln!(output, "  Winner: {} ({})", PLAYER_IDS[idx], outcome.bots[idx]);
        }
        None => output.push_str("  Winner: Draw\n"),
    }

    output
}

/// JSON-serializable tournament result.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentResult {
    /// Total matches played.
    games_played: u64,
    /// Per-player statistics.
    players: Vec<JsonTournamentPlayer>,
    /// Number of draws.
    draws: u64,
    /// Average round length in ticks.
    avg_steps: f64,
}

/// JSON-serializable per-player tournament stats.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentPlayer {
    /// Player index (1-based).
    player: usize,
    /// Bot name.
    bot: String,
    /// Number of wins.
    wins: u64,
    /// Win rate (0.0-1.0).
    win_rate: f64,
    /// Average match total.
    avg_score: f64,
    /// Match total standard deviation.
    score_std_dev: f64,
}

impl JsonTournamentResult {
    /// Create from stats and bot names.
    pub(super) fn from_stats(stats: &SeriesStats, bot_names: &[String]) -> Self {
        let players = bot_names
            .iter()
            .enumerate()
            .map(|(i, bot)| JsonTournamentPlayer {
                player: i + 1,
                bot: bot.clone(),
                wins: stats.wins.get(i).copied().unwrap_or(0),
                win_rate: stats.win_rate(i),
                avg_score: stats.avg_score(i),
                score_std_dev: stats.score_std_dev(i),
            })
            .collect();

        Self {
            games_played: stats.games_played,
            players,
            draws: stats.draws,
            avg_steps: stats.avg_steps(),
        }
    }
}

/// Format tournament stats as human-readable text.
#[allow(clippy::cast_precision_loss)]
pub(super) fn format_tournament_text(stats: &SeriesStats, bot_names: &[String]) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Tournament Results ({} matches)", stats.games_played);
    output.push_str("========================================\n\n");

    output.push_str("Win Rates:\n");
    for (i, name) in bot_names.iter().enumerate() {
        let wins = stats.wins.get(i).copied().unwrap_or(0);
        let rate = stats.win_rate(i) * 100.0;
        let _ = writeln!(output, "  Player {} ({name}): {rate:.1}% ({wins} wins)", i + 1);
    }
    let draw_rate = if stats.games_played == 0 {
        0.0
    } else {
        stats.draws as f64 / stats.games_played as f64 * 100.0
    };
    let _ = writeln!(output, "  Draws: {} ({draw_rate:.1}%)\n", stats.draws);

    output.push_str("Average Scores:\n");
    for (i, name) in bot_names.iter().enumerate() {
        let avg = stats.avg_score(i);
        let std = stats.score_std_dev(i);
        let _ = writeln!(output, "  Player {} ({name}): {avg:.1} (+/- {std:.1})", i + 1);
    }

    let _ = writeln!(output, "\nAverage Round Length: {:.0} ticks", stats.avg_steps());

    output
}

/// Format tournament stats as CSV.
pub(super) fn format_tournament_csv(stats: &SeriesStats, bot_names: &[String]) -> String {
    let mut output = String::new();

    output.push_str("player,bot,wins,win_rate,avg_score,score_std_dev\n");

    for (i, name) in bot_names.iter().enumerate() {
        let _ = writeln!(
            output,
            "{},{},{},{:.4},{:.2},{:.2}",
            i + 1,
            name,
            stats.wins.get(i).copied().unwrap_or(0),
            stats.win_rate(i),
            stats.avg_score(i),
            stats.score_std_dev(i)
        );
    }

    output
}
