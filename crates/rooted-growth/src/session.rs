//! Per-tick growth rules for one player-controlled root system.
//!
//! The host owns positions and calls [`GrowthSession::tick`] at a fixed
//! rate. The session answers with the movement it wants applied and any
//! branch switch or end of day.

use glam::Vec2;
use rooted_world::TerrainType;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::card::TreeCard;
use crate::error::GrowthError;
use crate::progress::{LevelCurve, TreeProgress};
use crate::recap::{RECAP_TOLERANCE, recap_line};
use crate::root_tree::{RootId, RootPoint, RootTree};
use crate::score::{DayStats, ScoreBreakdown, ScoreModel, ScoringConfig};
use crate::stats::TreeStats;

/// Gravitational acceleration applied to a root growing through open air.
pub const GRAVITY: Vec2 = Vec2::new(0.0, -9.81);

const MIN_POINT_SPACING: f32 = 0.01;

/// Base stats and movement tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GrowthConfig {
    /// Base energy per branch.
    pub energy: f32,
    /// Base growth speed in units per second.
    pub growth_speed: f32,
    /// Base turn rate in degrees per second at full input.
    pub maneuverability: f32,
    /// Base extra-root stat.
    pub extra_root: f32,
    /// Base scoring stat. Scoring only uses its modifiers.
    pub scoring: f32,
    /// Energy burned per second.
    pub energy_burn_rate: f32,
    /// Distance grown between recorded points.
    pub point_spacing: f32,
    /// Gravity scale while not grounded.
    pub floating_gravity: f32,
    /// Speed multiplier on gravel.
    pub gravel_speed_factor: f32,
    /// Speed multiplier on rich soil.
    pub rich_soil_speed_factor: f32,
    /// Width of the main root's seed point.
    pub start_width: f32,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            energy: 100.0,
            growth_speed: 3.0,
            maneuverability: 90.0,
            extra_root: 0.0,
            scoring: 1.0,
            energy_burn_rate: 1.0,
            point_spacing: 1.0,
            floating_gravity: 0.25,
            gravel_speed_factor: 0.5,
            rich_soil_speed_factor: 1.25,
            start_width: 1.0,
        }
    }
}

impl GrowthConfig {
    /// Fresh stats with no modifiers.
    pub fn tree_stats(&self) -> TreeStats {
        TreeStats::new(
            self.energy,
            self.growth_speed,
            self.maneuverability,
            self.extra_root,
            self.scoring,
        )
    }
}

/// What the host observed this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthInput {
    /// Steering axis in `[-1, 1]`. Positive turns counter-clockwise.
    pub rotation: f32,
    /// Whether dirt is under the growing tip.
    pub grounded: bool,
    /// Current tip position.
    pub position: Vec2,
    /// Terrain under the tip.
    pub terrain: TerrainType,
}

/// Summary produced when a day ends.
#[derive(Debug, Clone, PartialEq)]
pub struct DayReport {
    /// One-based day number.
    pub day: u32,
    /// Distance and branch count for the day.
    pub stats: DayStats,
    /// The day's score, already banked.
    pub score: ScoreBreakdown,
    /// Camera path from the last branch's tip back to the origin.
    pub recap: Vec<Vec2>,
    /// Tree level after banking.
    pub level: u32,
    /// Score banked across all days so far.
    pub banked_score: i32,
    /// Roots left after this day's root was consumed.
    pub roots_remaining: u32,
    /// No roots remain.
    pub game_over: bool,
}

/// Something that changed beyond plain movement.
#[derive(Debug, Clone, PartialEq)]
pub enum GrowthEvent {
    /// Energy ran out and growth moved to another branch. The host should
    /// place the tip at `seed`.
    BranchSwitched { branch: RootId, seed: Vec2 },
    /// Energy ran out with nothing left to grow.
    DayFinished(DayReport),
}

/// Result of one tick.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickOutcome {
    /// Displacement the host should apply to the tip.
    pub movement: Vec2,
    /// Whether a point was recorded on the active branch.
    pub point_added: bool,
    pub event: Option<GrowthEvent>,
}

/// Growth state across days.
pub struct GrowthSession {
    config: GrowthConfig,
    scoring: ScoreModel,
    progress: TreeProgress,
    origin: Vec2,
    day: u32,
    tree: RootTree,
    main_root: Option<RootId>,
    active: Option<RootId>,
    heading_degrees: f32,
    position: Vec2,
    point_index: usize,
    distance: f32,
    width: f32,
    total_energy: f32,
    extra_energy: f32,
}

impl GrowthSession {
    /// Creates a session with no day running.
    pub fn new(config: GrowthConfig, scoring: ScoringConfig, curve: LevelCurve) -> Self {
        let progress = TreeProgress::new(curve, config.tree_stats());
        Self {
            config,
            scoring: ScoreModel::new(scoring),
            progress,
            origin: Vec2::ZERO,
            day: 0,
            tree: RootTree::new(),
            main_root: None,
            active: None,
            heading_degrees: 0.0,
            position: Vec2::ZERO,
            point_index: 0,
            distance: 0.0,
            width: 0.0,
            total_energy: 0.0,
            extra_energy: 0.0,
        }
    }

    pub fn config(&self) -> &GrowthConfig {
        &self.config
    }

    pub fn progress(&self) -> &TreeProgress {
        &self.progress
    }

    /// Branches of the current (or just finished) day.
    pub fn tree(&self) -> &RootTree {
        &self.tree
    }

    /// Days started so far.
    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn main_root(&self) -> Option<RootId> {
        self.main_root
    }

    /// Branch currently growing, or `None` between days.
    pub fn active_root(&self) -> Option<RootId> {
        self.active
    }

    pub fn is_growing(&self) -> bool {
        self.active.is_some()
    }

    /// Last known tip position.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn heading_degrees(&self) -> f32 {
        self.heading_degrees
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn total_energy(&self) -> f32 {
        self.total_energy
    }

    pub fn extra_energy(&self) -> f32 {
        self.extra_energy
    }

    /// Begins a new day with a fresh main root at the origin.
    pub fn start_day(&mut self) -> RootId {
        self.day += 1;
        self.tree = RootTree::new();
        let main = self.tree.spawn_root(self.origin, self.config.start_width);
        self.main_root = Some(main);
        self.heading_degrees = 0.0;
        self.activate(main, self.origin, self.config.start_width);
        info!(
            day = self.day,
            roots_remaining = self.progress.roots_remaining(),
            "Day started"
        );
        main
    }

    fn activate(&mut self, id: RootId, seed: Vec2, seed_width: f32) {
        self.active = Some(id);
        self.point_index = 0;
        self.distance = 0.0;
        self.width = seed_width;
        self.total_energy = self.progress.stats().energy.value();
        self.extra_energy = 0.0;
        self.position = seed;
    }

    /// Advances growth by `dt` seconds.
    ///
    /// Does nothing between days.
    pub fn tick(&mut self, dt: f32, input: GrowthInput) -> Result<TickOutcome, GrowthError> {
        let Some(active) = self.active else {
            return Ok(TickOutcome::default());
        };
        if self.is_exhausted() {
            let event = self.advance(active)?;
            return Ok(TickOutcome {
                event: Some(event),
                ..Default::default()
            });
        }

        let stats = self.progress.stats();
        let speed = stats.growth_speed.value();
        let turn_rate = stats.growth_maneuverability.value();
        let energy_stat = stats.energy.value();

        self.heading_degrees += input.rotation.clamp(-1.0, 1.0) * turn_rate * dt;
        let heading = self.heading_degrees.to_radians();
        let down = Vec2::new(heading.sin(), -heading.cos());

        let mut movement = down * speed * dt;
        if !input.grounded {
            movement += GRAVITY * self.config.floating_gravity * dt;
        }
        match input.terrain {
            TerrainType::Gravel => movement *= self.config.gravel_speed_factor,
            TerrainType::RichSoil => movement *= self.config.rich_soil_speed_factor,
            _ => {}
        }

        self.distance += movement.length();
        self.position = input.position + movement;
        self.burn(self.config.energy_burn_rate * dt);
        self.width = if energy_stat > 0.0 {
            self.total_energy / energy_stat
        } else {
            0.0
        };

        let mut point_added = false;
        let spacing = self.config.point_spacing.max(MIN_POINT_SPACING);
        if (self.distance / spacing).floor() as usize > self.point_index {
            let width = (self.width * 100.0).round_ties_even() / 100.0 + 0.1;
            self.tree
                .add_point(active, RootPoint::new(self.position, width))?;
            self.point_index += 1;
            point_added = true;
            let score = self.current_score()?;
            self.progress.set_root_score(score.total);
        }

        let event = if self.is_exhausted() {
            Some(self.advance(active)?)
        } else {
            None
        };

        Ok(TickOutcome {
            movement,
            point_added,
            event,
        })
    }

    fn is_exhausted(&self) -> bool {
        self.extra_energy <= 0.0 && self.total_energy <= 0.0
    }

    /// Burns from the extra pool first; any shortfall comes out of the main pool.
    fn burn(&mut self, amount: f32) {
        if self.extra_energy <= 0.0 {
            self.total_energy = (self.total_energy - amount).max(0.0);
        } else {
            self.extra_energy -= amount;
            if self.extra_energy < 0.0 {
                self.total_energy = (self.total_energy + self.extra_energy).max(0.0);
                self.extra_energy = 0.0;
            }
        }
    }

    /// Moves on from an exhausted branch.
    fn advance(&mut self, exhausted: RootId) -> Result<GrowthEvent, GrowthError> {
        self.tree.retire(exhausted)?;
        match self.tree.ungrown_root(exhausted)? {
            Some(branch) => {
                let seed = *self
                    .tree
                    .points(branch)?
                    .first()
                    .ok_or(GrowthError::EmptyBranch(branch))?;
                self.activate(branch, seed.position, seed.width);
                debug!(
                    branch = branch.0,
                    "Switched to ungrown branch at ({:.2}, {:.2})",
                    seed.position.x,
                    seed.position.y
                );
                Ok(GrowthEvent::BranchSwitched {
                    branch,
                    seed: seed.position,
                })
            }
            None => Ok(GrowthEvent::DayFinished(self.finish_day()?)),
        }
    }

    /// Splits a new branch off the active one at the tip. It grows once the
    /// active branch runs out of energy.
    pub fn split(&mut self) -> Result<RootId, GrowthError> {
        let active = self.active.ok_or(GrowthError::DayNotStarted)?;
        self.tree.add_child(active, self.position, self.width)
    }

    /// Applies a stat card. Flat energy cards also top up the extra pool.
    pub fn collect_card(&mut self, card: &TreeCard) {
        self.progress
            .stats_mut()
            .add_modifier(card.stat_type, card.modifier);
        if let Some(bonus) = card.extra_energy() {
            self.extra_energy += bonus;
        }
        debug!(card = %card.label(), "Collected card");
    }

    /// Length and branch count of the current tree.
    pub fn day_stats(&self) -> Result<DayStats, GrowthError> {
        let main = self.main_root.ok_or(GrowthError::DayNotStarted)?;
        Ok(DayStats::new(
            self.tree.total_length(main)?,
            self.tree.child_count(main)? + 1,
        ))
    }

    /// Score the current tree would bank right now.
    pub fn current_score(&self) -> Result<ScoreBreakdown, GrowthError> {
        let main = self.main_root.ok_or(GrowthError::DayNotStarted)?;
        Ok(self.scoring.score(
            self.tree.lowest_depth(main)?,
            self.tree.total_length(main)?,
            &self.progress.stats().scoring,
        ))
    }

    /// Ends the running day: uses up a root, banks the score and builds the recap.
    pub fn finish_day(&mut self) -> Result<DayReport, GrowthError> {
        let active = self.active.ok_or(GrowthError::DayNotStarted)?;
        let game_over = self.progress.consume_root();

        let tip_path: Vec<Vec2> = self
            .tree
            .points(active)?
            .iter()
            .map(|p| p.position)
            .collect();
        let recap = recap_line(&tip_path, RECAP_TOLERANCE, self.origin);
        let stats = self.day_stats()?;
        let score = self.current_score()?;

        self.progress.set_root_score(score.total);
        self.progress.store_root();
        self.active = None;

        info!(
            day = self.day,
            distance = stats.distance_grown,
            roots = stats.roots_grown,
            score = score.total,
            level = self.progress.level(),
            "Day finished"
        );

        Ok(DayReport {
            day: self.day,
            stats,
            score,
            recap,
            level: self.progress.level(),
            banked_score: self.progress.score(),
            roots_remaining: self.progress.roots_remaining(),
            game_over,
        })
    }
}
