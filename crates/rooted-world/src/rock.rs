//! Depth-weighted rock spawning.

use glam::{IVec2, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::assets::{AssetHandle, RockAssets};
use crate::chunk::TileBounds;
use crate::noise_field::remap;

/// Linear ramp from `min_chance` at `min_depth` to `max_chance` at `max_depth`.
///
/// Depths are chunk-index rows (negative going down). Values outside the
/// ramp are clamped to the nearer chance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RockSpawnThreshold {
    /// Depth at which `min_chance` applies.
    pub min_depth: i32,
    /// Threshold at `min_depth`.
    pub min_chance: f64,
    /// Depth at which `max_chance` applies.
    pub max_depth: i32,
    /// Threshold at `max_depth`.
    pub max_chance: f64,
}

impl Default for RockSpawnThreshold {
    fn default() -> Self {
        Self {
            min_depth: -2,
            min_chance: 0.1,
            max_depth: -20,
            max_chance: 0.6,
        }
    }
}

impl RockSpawnThreshold {
    /// Spawn threshold at `depth`.
    pub fn threshold(&self, depth: i32) -> f64 {
        let lo = self.min_chance.min(self.max_chance);
        let hi = self.min_chance.max(self.max_chance);
        remap(
            depth as f64,
            self.min_depth as f64,
            self.max_depth as f64,
            self.min_chance,
            self.max_chance,
        )
        .clamp(lo, hi)
    }
}

/// A rock placed in a chunk, for the host to instantiate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RockPlacement {
    /// Chunk the rock belongs to.
    pub chunk: IVec2,
    /// Tile the rock sits on.
    pub tile: IVec2,
    /// Tile centre in world units.
    pub position: Vec2,
    /// Rotation about the view axis, in degrees `[0, 360)`.
    pub rotation_degrees: f32,
    /// Which rock asset to instantiate.
    pub asset: AssetHandle,
}

impl RockPlacement {
    /// Picks an interior position, rotation and asset for a rock in `bounds`.
    ///
    /// Local coordinates are drawn from `[1, size - 2)` on each axis, so the
    /// rock never touches the chunk edge.
    pub fn roll(chunk: IVec2, bounds: TileBounds, assets: &RockAssets, rng: &mut impl Rng) -> Self {
        let upper = (bounds.size - 2).max(2);
        let local = IVec2::new(rng.random_range(1..upper), rng.random_range(1..upper));
        let tile = bounds.min + local;
        let rotation_degrees = rng.random_range(0.0..360.0);
        let asset = assets.pick(rng);
        Self {
            chunk,
            tile,
            position: tile.as_vec2() + Vec2::splat(0.5),
            rotation_degrees,
            asset,
        }
    }
}
