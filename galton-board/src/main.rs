// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Drop marbles through a Galton board and print where they landed.
//!
//! For example, run using:
//!   cargo run --bin galton-board -- --marbles 5000 --bins 9
//!
//! Add `--stdout --stdout-level debug` to follow the end of the marble stream
//! closing each row of the board.

use std::path::PathBuf;

use clap::Parser;
use galton_board::board::build_board;
use galton_board::config::{BoardConfig, BoardOverrides};
use galton_board::histogram;
use galton_engine::engine::Engine;
use galton_engine::types::SimError;
use galton_track::Tracker;
use galton_track::builder::{TrackerConfig, setup_trackers};

/// Command-line arguments.
#[derive(Parser)]
#[command(about = "Simulate a Galton board and print the distribution of marbles")]
struct Cli {
    /// Number of marbles to drop [default: 1000].
    #[arg(long)]
    marbles: Option<usize>,

    /// Number of bins, at least 2 [default: 5].
    #[arg(long)]
    bins: Option<usize>,

    /// Seed for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file with `marbles`, `bins` and `seed` values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable logging to the console.
    #[arg(long, default_value = "false")]
    stdout: bool,

    /// Level of log message to display.
    #[arg(long, default_value = "Info")]
    stdout_level: log::Level,

    /// Set a regular expression for which entites should have logging level set
    /// to `--stdout-level`. Others will have level set to `Error`.
    #[arg(long, default_value = "")]
    stdout_filter_regex: String,
}

fn setup_all_trackers(args: &Cli) -> Result<Tracker, SimError> {
    let config = TrackerConfig {
        enable: args.stdout,
        level: args.stdout_level,
        filter_regex: &args.stdout_filter_regex,
    };
    setup_trackers(&config).map_err(|e| SimError(e.to_string()))
}

fn main() -> Result<(), SimError> {
    let args = Cli::parse();
    let tracker = setup_all_trackers(&args)?;

    let overrides = BoardOverrides {
        marbles: args.marbles,
        bins: args.bins,
        seed: args.seed,
    };
    let config = BoardConfig::load(args.config.as_deref(), &overrides)?;

    let mut engine = Engine::new(&tracker);
    let board = build_board(&engine, &config)?;
    let result = board.run(&mut engine);
    tracker.shutdown();

    print!("{}", histogram::render(&result?));
    Ok(())
}
