//! Run command implementation.

use super::output::format_match_text;
use super::{CliError, OutputFormat, clock_seed};
use pursuit::MapTemplate;
use pursuit::tournament::run_match_with;
use std::path::Path;

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the map cannot be loaded or a bot is unknown.
pub(crate) fn execute(
    map: &Path,
    bots: [&str; 2],
    seed: Option<u64>,
    format: OutputFormat,
    quiet: bool,
) -> Result<(), CliError> {
    let template = MapTemplate::load(map)?;
    let seed = seed.unwrap_or_else(clock_seed);
    let verbose = !quiet && format == OutputFormat::Text;

    if verbose {
        println!("Running match on {} with seed {seed}...", map.display());
        println!("Players: player1 ({}), player2 ({})", bots[0], bots[1]);
        println!();
    }

    let outcome = run_match_with(&template, bots, seed, |round, game| {
        if !verbose {
            return;
        }
        for line in game.logs() {
            println!("[round {} tick {}] {line}", round + 1, game.tick());
        }
    })?;

    match format {
        OutputFormat::Text => {
            if verbose {
                println!();
            }
            print!("{}", format_match_text(&outcome));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
    }

    Ok(())
}
