//! World generation settings.

use serde::{Deserialize, Serialize};

use crate::chunk::{MAX_CHUNK_SIZE, MIN_CHUNK_SIZE};
use crate::error::WorldError;
use crate::rock::RockSpawnThreshold;

/// Noise and threshold settings for one terrain layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NoiseLayerConfig {
    /// Fraction of the remapped noise range that counts as present.
    /// A tile is present when `remap(noise) > 1 - threshold`.
    pub threshold: f64,
    /// Number of multifractal octaves.
    pub octaves: u32,
    /// Base sampling frequency in tiles.
    pub frequency: f64,
}

impl Default for NoiseLayerConfig {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            octaves: 3,
            frequency: 0.1,
        }
    }
}

/// Rock spawn noise and depth ramp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RockConfig {
    /// Number of multifractal octaves.
    pub octaves: u32,
    /// Sampling frequency. Rock noise is sampled at chunk indices, not tiles.
    pub frequency: f64,
    /// Depth-weighted spawn threshold.
    pub spawn: RockSpawnThreshold,
}

impl Default for RockConfig {
    fn default() -> Self {
        Self {
            octaves: 6,
            frequency: 1.0,
            spawn: RockSpawnThreshold::default(),
        }
    }
}

/// Bounds for the random water level assigned to each air region.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WaterConfig {
    /// Lowest water level in tiles above the region floor.
    pub min_level: i32,
    /// Highest water level in tiles above the region floor (inclusive).
    pub max_level: i32,
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            min_level: 0,
            max_level: 4,
        }
    }
}

/// Top-level world generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldGenConfig {
    /// Base seed. Each layer derives its own seed from this.
    pub seed: u32,
    /// Chunk side length in tiles.
    pub chunk_size: i32,
    /// Generation radius around the focus, in chunks.
    pub generation_radius: i32,
    /// Dirt occupancy layer. Non-dirt underground tiles are air.
    pub dirt: NoiseLayerConfig,
    /// Gravel layer (slows growth).
    pub gravel: NoiseLayerConfig,
    /// Rich soil layer (speeds growth). Only placed on dirt without gravel.
    pub rich_soil: NoiseLayerConfig,
    /// Rock placement.
    pub rock: RockConfig,
    /// Water filling.
    pub water: WaterConfig,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            seed: 100,
            chunk_size: 16,
            generation_radius: 6,
            dirt: NoiseLayerConfig {
                threshold: 0.7,
                octaves: 3,
                frequency: 0.08,
            },
            gravel: NoiseLayerConfig {
                threshold: 0.15,
                octaves: 3,
                frequency: 0.15,
            },
            rich_soil: NoiseLayerConfig {
                threshold: 0.2,
                octaves: 3,
                frequency: 0.12,
            },
            rock: RockConfig::default(),
            water: WaterConfig::default(),
        }
    }
}

/// Largest generation radius in chunks; bounds the per-focus scan.
pub const MAX_GENERATION_RADIUS: i32 = 64;

impl WorldGenConfig {
    /// Checks the settings that would otherwise produce empty ranges or
    /// degenerate chunks.
    pub fn validate(&self) -> Result<(), WorldError> {
        if !(MIN_CHUNK_SIZE..=MAX_CHUNK_SIZE).contains(&self.chunk_size) {
            return Err(WorldError::InvalidChunkSize(self.chunk_size));
        }
        if !(0..=MAX_GENERATION_RADIUS).contains(&self.generation_radius) {
            return Err(WorldError::InvalidRadius(self.generation_radius));
        }
        if self.water.min_level < 0 || self.water.min_level > self.water.max_level {
            return Err(WorldError::InvalidWaterRange {
                min: self.water.min_level,
                max: self.water.max_level,
            });
        }
        Ok(())
    }
}
