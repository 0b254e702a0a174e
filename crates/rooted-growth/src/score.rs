//! Depth and length scoring.

use serde::{Deserialize, Serialize};

use crate::stats::TreeStat;

/// Scoring intervals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoringConfig {
    /// Rows of depth per scoring interval.
    pub depth_interval: f32,
    /// Units of total length per scoring interval.
    pub length_interval: f32,
    /// Points awarded for each completed interval.
    pub points_per_interval: f32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            depth_interval: 15.0,
            length_interval: 50.0,
            points_per_interval: 100.0,
        }
    }
}

/// Score of one day's tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    /// Points for the deepest point reached.
    pub depth: i32,
    /// Points for the length grown across all branches.
    pub length: i32,
    /// `depth + length`.
    pub total: i32,
}

/// Snapshot of what a day produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DayStats {
    /// Total length of every branch grown.
    pub distance_grown: f32,
    /// Branches grown, including the main root.
    pub roots_grown: usize,
}

impl DayStats {
    /// A snapshot from raw totals.
    pub fn new(distance_grown: f32, roots_grown: usize) -> Self {
        Self {
            distance_grown,
            roots_grown,
        }
    }
}

/// Turns depth and length into points, routed through the scoring stat.
#[derive(Debug, Clone, Default)]
pub struct ScoreModel {
    config: ScoringConfig,
}

impl ScoreModel {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Scores a tree whose lowest row is `lowest_depth` and whose branches
    /// sum to `total_length`.
    ///
    /// Each component is converted to whole intervals, then passed through
    /// the scoring stat's modifiers and rounded half to even.
    pub fn score(&self, lowest_depth: i32, total_length: f32, scoring: &TreeStat) -> ScoreBreakdown {
        let depth_rows = lowest_depth.min(0).unsigned_abs() as f32;
        let depth = self.component(depth_rows, self.config.depth_interval, scoring);
        let length = self.component(total_length.max(0.0), self.config.length_interval, scoring);
        tracing::trace!(depth, length, "Scored tree");
        ScoreBreakdown {
            depth,
            length,
            total: depth + length,
        }
    }

    fn component(&self, amount: f32, interval: f32, scoring: &TreeStat) -> i32 {
        if interval <= 0.0 {
            return 0;
        }
        let raw = ((amount / interval).floor() * self.config.points_per_interval).round_ties_even();
        scoring.one_off_value(raw).round_ties_even() as i32
    }
}
