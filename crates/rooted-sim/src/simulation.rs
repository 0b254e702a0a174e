//! Headless day loop: world streaming around the tip, growth ticks, and
//! per-day summaries.

use glam::{IVec2, Vec2};
use rooted_config::Config;
use rooted_growth::{
    CardIcons, DayReport, GrowthError, GrowthEvent, GrowthInput, GrowthSession, StatType,
};
use rooted_world::{
    AssetHandle, AsyncChunkGenerator, RockAssets, WorldError, WorldGenerator,
    world_to_chunk_index,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::game_loop::GameLoop;
use crate::steering::{Steering, SteeringLimits};

/// Rock variants available to the headless host.
const ROCK_VARIANTS: u32 = 4;

/// Errors that abort a simulation run.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("world generation failed: {0}")]
    World(#[from] WorldError),

    #[error("growth failed: {0}")]
    Growth(#[from] GrowthError),
}

/// One finished day.
#[derive(Debug, Clone, Serialize)]
pub struct DaySummary {
    /// One-based day number.
    pub day: u32,
    /// Fixed updates run.
    pub ticks: u64,
    /// Simulated seconds covered by those updates.
    pub sim_seconds: f64,
    /// Length grown across every branch.
    pub distance_grown: f32,
    /// Branches grown, including the main root.
    pub roots_grown: usize,
    /// Deepest tile row reached by the tree (zero or negative).
    pub lowest_depth: i32,
    pub depth_score: i32,
    pub length_score: i32,
    /// Score banked for the day.
    pub total_score: i32,
    /// Tree level after banking.
    pub level: u32,
    /// Score banked across all days so far.
    pub banked_score: i32,
    pub roots_remaining: u32,
    /// Points in the simplified recap line.
    pub recap_points: usize,
    /// The day hit the tick cap and was ended early.
    pub truncated: bool,
}

/// A whole run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// World seed of the run.
    pub seed: u32,
    /// Every day played, in order.
    pub days: Vec<DaySummary>,
    /// Chunks in the store at the end.
    pub chunks_generated: usize,
    /// Live air regions after merging.
    pub air_regions: usize,
    pub water_tiles: usize,
    pub rocks: usize,
    pub final_level: u32,
    pub banked_score: i32,
    /// The run ended because no roots remained.
    pub game_over: bool,
}

/// Owns the world, the growth session and the synthetic player.
pub struct Simulation {
    config: Config,
    world: WorldGenerator,
    session: GrowthSession,
    steering: Steering,
    icons: CardIcons,
    background: Option<AsyncChunkGenerator>,
    position: Vec2,
    focus_chunk: Option<IVec2>,
}

impl Simulation {
    pub fn new(config: Config) -> Result<Self, SimError> {
        let world = WorldGenerator::new(
            config.world.clone(),
            RockAssets::sequential(ROCK_VARIANTS)?,
        )?;
        let background = if config.simulation.parallel_generation {
            Some(AsyncChunkGenerator::with_defaults(std::sync::Arc::clone(
                world.classifier(),
            ))?)
        } else {
            None
        };
        let session = GrowthSession::new(
            config.growth.clone(),
            config.scoring.clone(),
            config.progression.clone(),
        );
        let sim = &config.simulation;
        let steering = Steering::new(
            config.world.seed,
            SteeringLimits {
                split_chance: sim.split_chance,
                max_splits_per_day: sim.max_splits_per_day,
                card_chance: sim.card_chance,
                max_cards_per_day: sim.max_cards_per_day,
            },
        );
        let icons = CardIcons::new([
            (StatType::Energy, AssetHandle(0)),
            (StatType::GrowthSpeed, AssetHandle(1)),
            (StatType::GrowthManeuverability, AssetHandle(2)),
            (StatType::ExtraRoot, AssetHandle(3)),
            (StatType::Scoring, AssetHandle(4)),
        ]);

        Ok(Self {
            config,
            world,
            session,
            steering,
            icons,
            background,
            position: Vec2::ZERO,
            focus_chunk: None,
        })
    }

    pub fn world(&self) -> &WorldGenerator {
        &self.world
    }

    pub fn session(&self) -> &GrowthSession {
        &self.session
    }

    /// Runs up to the configured number of days, stopping early at game over.
    pub fn run(&mut self) -> Result<RunSummary, SimError> {
        let mut days = Vec::new();
        for _ in 0..self.config.simulation.days {
            if self.session.progress().is_game_over() {
                break;
            }
            days.push(self.run_day()?);
        }

        let progress = self.session.progress();
        Ok(RunSummary {
            seed: self.config.world.seed,
            days,
            chunks_generated: self.world.store().chunk_count(),
            air_regions: self.world.regions().live_count(),
            water_tiles: self.world.water().len(),
            rocks: self.world.rocks().len(),
            final_level: progress.level(),
            banked_score: progress.score(),
            game_over: progress.is_game_over(),
        })
    }

    /// Grows one full day.
    pub fn run_day(&mut self) -> Result<DaySummary, SimError> {
        self.session.start_day();
        self.steering.start_day();
        self.position = Vec2::ZERO;

        let max_ticks = self.config.simulation.max_ticks_per_day;
        let mut game_loop = GameLoop::new(self.config.simulation.tick_rate);
        let frame = game_loop.fixed_dt();
        let mut finished: Option<DayReport> = None;
        let mut failure: Option<SimError> = None;

        while finished.is_none() && game_loop.update_count() < max_ticks {
            game_loop.advance(frame, |dt, _| {
                if finished.is_some() || failure.is_some() {
                    return;
                }
                match self.step(dt as f32) {
                    Ok(report) => finished = report,
                    Err(e) => failure = Some(e),
                }
            });
            if let Some(e) = failure.take() {
                return Err(e);
            }
        }

        let truncated = finished.is_none();
        let report = match finished {
            Some(report) => report,
            None => {
                warn!(
                    day = self.session.day(),
                    max_ticks, "Day hit the tick cap, ending early"
                );
                self.session.finish_day()?
            }
        };

        let lowest_depth = match self.session.main_root() {
            Some(main) => self.session.tree().lowest_depth(main)?,
            None => 0,
        };

        Ok(DaySummary {
            day: report.day,
            ticks: game_loop.update_count(),
            sim_seconds: game_loop.total_sim_time(),
            distance_grown: report.stats.distance_grown,
            roots_grown: report.stats.roots_grown,
            lowest_depth,
            depth_score: report.score.depth,
            length_score: report.score.length,
            total_score: report.score.total,
            level: report.level,
            banked_score: report.banked_score,
            roots_remaining: report.roots_remaining,
            recap_points: report.recap.len(),
            truncated,
        })
    }

    /// One fixed tick. Returns the day report when the day ends.
    fn step(&mut self, dt: f32) -> Result<Option<DayReport>, SimError> {
        self.stream_world()?;

        let input = GrowthInput {
            rotation: self.steering.rotation(self.session.heading_degrees()),
            grounded: self.world.is_grounded(self.position),
            position: self.position,
            terrain: self.world.terrain_at(self.position),
        };
        let outcome = self.session.tick(dt, input)?;
        self.position += outcome.movement;

        match outcome.event {
            Some(GrowthEvent::DayFinished(report)) => return Ok(Some(report)),
            Some(GrowthEvent::BranchSwitched { seed, .. }) => self.position = seed,
            None => {}
        }

        if self.steering.roll_split() {
            self.session.split()?;
        }
        if let Some(card) = self.steering.roll_card()? {
            debug!(
                icon = ?self.icons.icon_for(&card),
                "Picked up card {}",
                card.label()
            );
            self.session.collect_card(&card);
        }
        Ok(None)
    }

    /// Keeps the world generated around the tip.
    fn stream_world(&mut self) -> Result<(), SimError> {
        let tip_chunk = world_to_chunk_index(self.position, self.world.config().chunk_size);
        let moved = self.focus_chunk != Some(tip_chunk);

        match &self.background {
            None => {
                if moved {
                    self.world.ensure_generated(self.position)?;
                }
            }
            Some(generator) => {
                if moved {
                    self.world.request_missing(self.position, generator);
                }
                let ready = generator.drain_results();
                if !ready.is_empty() {
                    self.world.integrate(ready)?;
                }
                // The tip needs its own chunk now; neighbours can arrive later.
                self.world.generate_chunk(tip_chunk)?;
            }
        }

        if moved {
            self.focus_chunk = Some(tip_chunk);
        }
        Ok(())
    }
}

/// Builds a simulation from `config` and runs it to completion.
pub fn run_simulation(config: Config) -> Result<RunSummary, SimError> {
    let mut simulation = Simulation::new(config)?;
    let summary = simulation.run()?;
    info!(
        days = summary.days.len(),
        chunks = summary.chunks_generated,
        score = summary.banked_score,
        level = summary.final_level,
        "Simulation finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config() -> Config {
        let mut config = Config::default();
        config.world.chunk_size = 8;
        config.world.generation_radius = 2;
        config.growth.energy = 10.0;
        config.simulation.days = 2;
        config.simulation.max_ticks_per_day = 5_000;
        config
    }

    #[test]
    fn test_day_finishes_and_banks_score() {
        let mut sim = Simulation::new(quick_config()).unwrap();
        let day = sim.run_day().unwrap();
        assert_eq!(day.day, 1);
        assert!(!day.truncated);
        assert!(day.distance_grown > 0.0);
        assert!(day.roots_grown >= 1);
        assert!(day.lowest_depth <= 0);
        assert_eq!(day.roots_remaining, 3);
        assert!(sim.world().store().chunk_count() > 0);
        assert!(!sim.session().is_growing());
    }

    #[test]
    fn test_tick_cap_truncates_day() {
        let mut config = quick_config();
        config.simulation.max_ticks_per_day = 10;
        let mut sim = Simulation::new(config).unwrap();
        let day = sim.run_day().unwrap();
        assert!(day.truncated);
        assert_eq!(day.ticks, 10);
        assert!((day.sim_seconds - 10.0 / 50.0).abs() < 1e-9);
        assert_eq!(day.roots_remaining, 3);
    }

    #[test]
    fn test_stops_at_game_over() {
        let mut config = quick_config();
        config.growth.energy = 1.0;
        config.progression.starting_roots = 2;
        config.simulation.days = 5;
        let summary = run_simulation(config).unwrap();
        assert_eq!(summary.days.len(), 2);
        assert!(summary.game_over);
    }
}
