//! Headless rooted simulation.
//!
//! Run with: `cargo run -p rooted-sim -- --seed 7 --days 2`

use std::path::PathBuf;

use clap::Parser;
use rooted_config::{CliArgs, Config, default_config_dir};
use rooted_sim::{RunSummary, run_simulation};
use tracing::info;

/// CLI arguments for the simulation binary.
#[derive(Parser, Debug)]
#[command(name = "rooted", about = "Grow roots underground, headless")]
struct SimArgs {
    #[command(flatten)]
    cli: CliArgs,

    /// Print the run summary as JSON.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = SimArgs::parse();

    let config_dir: Option<PathBuf> = args.cli.config.clone().or_else(default_config_dir);
    let mut config = match config_dir.as_deref() {
        Some(dir) => Config::load_or_create(dir).unwrap_or_else(|e| {
            eprintln!("Ignoring config in {}: {e}", dir.display());
            Config::default()
        }),
        None => Config::default(),
    };
    config.apply_cli_overrides(&args.cli);
    if let Err(e) = config.validate() {
        eprintln!("{e}");
        std::process::exit(2);
    }

    rooted_log::init_logging(config_dir.as_deref(), cfg!(debug_assertions), Some(&config));

    info!(
        "Seed {} | chunk size {} | radius {} | {} day(s)",
        config.world.seed,
        config.world.chunk_size,
        config.world.generation_radius,
        config.simulation.days
    );

    let summary = match run_simulation(config) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Simulation failed: {e}");
            std::process::exit(1);
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Failed to encode summary: {e}");
                std::process::exit(1);
            }
        }
    } else {
        print_summary(&summary);
    }
}

fn print_summary(summary: &RunSummary) {
    println!("seed {}", summary.seed);
    for day in &summary.days {
        println!(
            "day {:>2}: grew {:>8.1} over {} root(s), depth {:>4}, score {:>5} (depth {}, length {}){}",
            day.day,
            day.distance_grown,
            day.roots_grown,
            day.lowest_depth,
            day.total_score,
            day.depth_score,
            day.length_score,
            if day.truncated { " [tick cap]" } else { "" }
        );
    }
    println!(
        "level {} | banked {} | chunks {} | air regions {} | water tiles {} | rocks {}{}",
        summary.final_level,
        summary.banked_score,
        summary.chunks_generated,
        summary.air_regions,
        summary.water_tiles,
        summary.rocks,
        if summary.game_over { " | game over" } else { "" }
    );
}
