//! Command-line overrides for the rooted simulation.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Rooted command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "rooted", about = "Rooted headless simulation")]
pub struct CliArgs {
    /// World seed.
    #[arg(long)]
    pub seed: Option<u32>,

    /// Number of days to simulate.
    #[arg(long)]
    pub days: Option<u32>,

    /// Maximum fixed ticks per day.
    #[arg(long)]
    pub max_ticks: Option<u64>,

    /// Chunk side length in tiles.
    #[arg(long)]
    pub chunk_size: Option<i32>,

    /// Generation radius in chunks.
    #[arg(long)]
    pub generation_radius: Option<i32>,

    /// Classify chunks on background worker threads.
    #[arg(long)]
    pub parallel: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.world.seed = seed;
        }
        if let Some(days) = args.days {
            self.simulation.days = days;
        }
        if let Some(ticks) = args.max_ticks {
            self.simulation.max_ticks_per_day = ticks;
        }
        if let Some(size) = args.chunk_size {
            self.world.chunk_size = size;
        }
        if let Some(radius) = args.generation_radius {
            self.world.generation_radius = radius;
        }
        if args.parallel {
            self.simulation.parallel_generation = true;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
