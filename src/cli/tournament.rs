//! Tournament command implementation.

use super::output::{JsonTournamentResult, format_tournament_csv, format_tournament_text};
use super::{CliError, TournamentFormat, clock_seed};
use indicatif::{ProgressBar, ProgressStyle};
use pursuit::MapTemplate;
use pursuit::tournament::run_series;
use std::path::Path;
use std::time::Instant;

/// Execute the tournament command.
///
/// # Errors
///
/// Returns an error if the map cannot be loaded or a bot is unknown.
pub(crate) fn execute(
    map: &Path,
    bots: &[String],
    games: u64,
    seed: Option<u64>,
    threads: Option<usize>,
    format: TournamentFormat,
    progress: bool,
) -> Result<(), CliError> {
    let [first, second] = bots else {
        return Err(CliError::new("exactly two bots are required"));
    };
    let template = MapTemplate::load(map)?;

    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let base_seed = seed.unwrap_or_else(clock_seed);

    let pb = if progress {
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} matches ({per_sec})")
            .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
            .progress_chars("=>-");
        Some(ProgressBar::new(games).with_style(style))
    } else {
        None
    };

    let start = Instant::now();
    let stats = run_series(&template, [first.as_str(), second.as_str()], games, base_seed, |_| {
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    })?;

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    #[allow(clippy::cast_precision_loss)]
    let games_per_sec = if duration.as_secs_f64() > 0.0 {
        stats.games_played as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    match format {
        TournamentFormat::Text => {
            println!();
            print!("{}", format_tournament_text(&stats, bots));
            println!();
            println!(
                "Duration: {:.2}s ({games_per_sec:.0} matches/sec, base seed {base_seed})",
                duration.as_secs_f64()
            );
        }
        TournamentFormat::Json => {
            let json_result = JsonTournamentResult::from_stats(&stats, bots);
            println!("{}", serde_json::to_string_pretty(&json_result)?);
        }
        TournamentFormat::Csv => {
            print!("{}", format_tournament_csv(&stats, bots));
        }
    }

    Ok(())
}
