//! Tree level progression across days.

use serde::{Deserialize, Serialize};

use crate::stats::TreeStats;

/// Experience curve: `round(base^(scalar * level + vertical_offset) + horizontal_offset)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LevelCurve {
    /// Base of the exponential.
    pub base: f32,
    /// Exponent growth per level.
    pub scalar: f32,
    /// Added to the exponent.
    pub vertical_offset: f32,
    /// Added to the power before rounding.
    pub horizontal_offset: f32,
    /// Roots available before the game ends.
    pub starting_roots: u32,
}

impl Default for LevelCurve {
    fn default() -> Self {
        Self {
            base: 200.0,
            scalar: 0.04,
            vertical_offset: 1.7,
            horizontal_offset: 2350.0,
            starting_roots: 4,
        }
    }
}

impl LevelCurve {
    /// Score needed to reach `level`.
    pub fn experience_for_level(&self, level: u32) -> i32 {
        let exponent = self.scalar * level as f32 + self.vertical_offset;
        (self.base.powf(exponent) + self.horizontal_offset).round_ties_even() as i32
    }
}

/// Level, stored score and remaining roots of the tree.
#[derive(Debug, Clone)]
pub struct TreeProgress {
    curve: LevelCurve,
    stats: TreeStats,
    level: u32,
    score: i32,
    root_score: i32,
    level_score: i32,
    evolve_score: i32,
    roots_remaining: u32,
}

impl TreeProgress {
    pub fn new(curve: LevelCurve, stats: TreeStats) -> Self {
        let roots_remaining = curve.starting_roots;
        let mut progress = Self {
            level_score: curve.experience_for_level(0),
            evolve_score: curve.experience_for_level(1),
            curve,
            stats,
            level: 0,
            score: 0,
            root_score: 0,
            roots_remaining,
        };
        progress.evolve_while_ready();
        progress
    }

    pub fn stats(&self) -> &TreeStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut TreeStats {
        &mut self.stats
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Score banked from finished days.
    pub fn score(&self) -> i32 {
        self.score
    }

    /// Score of the day in progress, not yet banked.
    pub fn root_score(&self) -> i32 {
        self.root_score
    }

    pub fn roots_remaining(&self) -> u32 {
        self.roots_remaining
    }

    /// Score at which the current level started.
    pub fn level_score(&self) -> i32 {
        self.level_score
    }

    /// Score needed for the next level.
    pub fn evolve_score(&self) -> i32 {
        self.evolve_score
    }

    pub fn set_root_score(&mut self, root_score: i32) {
        self.root_score = root_score;
    }

    /// Banks the in-flight root score and levels up as far as it reaches.
    pub fn store_root(&mut self) {
        self.score += self.root_score;
        self.root_score = 0;
        self.evolve_while_ready();
    }

    /// Uses up one root. Returns `true` when none are left.
    pub fn consume_root(&mut self) -> bool {
        self.roots_remaining = self.roots_remaining.saturating_sub(1);
        if self.roots_remaining == 0 {
            tracing::info!(score = self.score, level = self.level, "Game over");
        }
        self.is_game_over()
    }

    pub fn is_game_over(&self) -> bool {
        self.roots_remaining == 0
    }

    /// Fraction of the current level band covered by the banked score.
    pub fn progression(&self) -> f32 {
        self.band_fraction(self.score)
    }

    /// Fraction of the current level band covered by banked plus in-flight score.
    pub fn root_progression(&self) -> f32 {
        self.band_fraction(self.score + self.root_score)
    }

    fn band_fraction(&self, score: i32) -> f32 {
        let span = (self.evolve_score - self.level_score) as f32;
        if span <= 0.0 {
            return 0.0;
        }
        (score - self.level_score) as f32 / span
    }

    fn evolve_while_ready(&mut self) {
        while self.score >= self.evolve_score {
            let next = self.curve.experience_for_level(self.level + 2);
            // A flat or shrinking curve would never terminate.
            if next <= self.evolve_score {
                break;
            }
            self.level += 1;
            self.level_score = self.evolve_score;
            self.evolve_score = next;
            tracing::info!(level = self.level, next = self.evolve_score, "Tree evolved");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress() -> TreeProgress {
        TreeProgress::new(LevelCurve::default(), TreeStats::new(100.0, 3.0, 90.0, 0.0, 1.0))
    }

    #[test]
    fn test_experience_curve() {
        let curve = LevelCurve::default();
        // 200^1.7 + 2350
        let expected = (200f32.powf(1.7) + 2350.0).round() as i32;
        assert_eq!(curve.experience_for_level(0), expected);
        assert!(curve.experience_for_level(1) > curve.experience_for_level(0));
        assert!(curve.experience_for_level(10) > curve.experience_for_level(9));
    }

    #[test]
    fn test_starts_at_level_zero() {
        let p = progress();
        assert_eq!(p.level(), 0);
        assert_eq!(p.roots_remaining(), 4);
        assert_eq!(p.score(), 0);
        assert!(p.progression() < 0.0, "Score starts below the level-0 band");
    }

    #[test]
    fn test_store_root_banks_and_evolves() {
        let mut p = progress();
        let target = p.evolve_score();
        p.set_root_score(target);
        assert_eq!(p.score(), 0);
        assert!(p.root_progression() >= 1.0);

        p.store_root();
        assert_eq!(p.score(), target);
        assert_eq!(p.root_score(), 0);
        assert_eq!(p.level(), 1);
        assert_eq!(p.level_score(), target);
        assert_eq!(p.progression(), 0.0);
    }

    #[test]
    fn test_large_score_evolves_several_levels() {
        let mut p = progress();
        let curve = LevelCurve::default();
        p.set_root_score(curve.experience_for_level(4) - 1);
        p.store_root();
        assert_eq!(p.level(), 3);
        assert_eq!(p.evolve_score(), curve.experience_for_level(4));
    }

    #[test]
    fn test_consume_roots_until_game_over() {
        let mut p = progress();
        assert!(!p.consume_root());
        assert!(!p.consume_root());
        assert!(!p.consume_root());
        assert!(p.consume_root());
        assert!(p.is_game_over());
        assert!(p.consume_root());
    }
}
