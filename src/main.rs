//! Pursuit CLI - play and evaluate pursuit matches from the command line.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Pursuit - a deterministic two-team grid pursuit engine
#[derive(Parser, Debug)]
#[command(name = "pursuit")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a two-round match between two built-in bots
    Run {
        /// Map definition (JSON)
        map: PathBuf,

        /// Bot for player 1 (attacks first): stay, random or greedy
        #[arg(short, long, default_value = "greedy")]
        attacker: String,

        /// Bot for player 2 (defends first): stay, random or greedy
        #[arg(short, long, default_value = "random")]
        defender: String,

        /// Random seed (default: derived from the clock)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Suppress per-tick event logs
        #[arg(short, long)]
        quiet: bool,
    },

    /// Run many matches in parallel and aggregate statistics
    Tournament {
        /// Map definition (JSON)
        map: PathBuf,

        /// Bots for player 1 and player 2
        #[arg(short, long, num_args = 2, default_values = ["greedy", "random"])]
        bots: Vec<String>,

        /// Number of matches to run
        #[arg(short, long, default_value = "100")]
        games: u64,

        /// Starting seed (increments for each match)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::TournamentFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },

    /// Load and validate a map definition
    Validate {
        /// Map definition (JSON)
        map: PathBuf,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    let result = match args.command {
        Commands::Run {
            map,
            attacker,
            defender,
            seed,
            format,
            quiet,
        } => cli::run::execute(&map, [attacker.as_str(), defender.as_str()], seed, format, quiet),

        Commands::Tournament {
            map,
            bots,
            games,
            seed,
            threads,
            format,
            progress,
        } => cli::tournament::execute(&map, &bots, games, seed, threads, format, progress),

        Commands::Validate { map } => cli::validate::execute(&map),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
