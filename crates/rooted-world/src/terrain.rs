//! Per-tile terrain classification from layered noise fields.

use glam::IVec2;

use crate::chunk::{Chunk, TileFlags};
use crate::config::{NoiseLayerConfig, WorldGenConfig};
use crate::noise_field::NoiseField;
use crate::rock::RockSpawnThreshold;

/// Seed offsets applied to the base seed for each terrain layer.
///
/// Layers share a base seed so worlds stay correlated, while the offsets keep
/// the individual fields distinct.
pub struct LayerSeeds;

impl LayerSeeds {
    /// Dirt uses the base seed directly.
    pub const DIRT: i32 = 0;
    /// Rock spawn noise.
    pub const ROCK: i32 = 10;
    /// Gravel.
    pub const GRAVEL: i32 = 100;
    /// Rich soil.
    pub const RICH_SOIL: i32 = -100;

    /// Applies `offset` to `seed` with wrap-around.
    pub fn derive(seed: u32, offset: i32) -> u32 {
        seed.wrapping_add_signed(offset)
    }
}

struct Layer {
    field: NoiseField,
    threshold: f64,
}

impl Layer {
    fn new(seed: u32, offset: i32, config: &NoiseLayerConfig) -> Self {
        Self {
            field: NoiseField::new(
                LayerSeeds::derive(seed, offset),
                config.octaves,
                config.frequency,
            ),
            threshold: config.threshold,
        }
    }

    fn present(&self, x: i32, y: i32) -> bool {
        self.field.is_present(x as f64, y as f64, self.threshold)
    }
}

/// Decides dirt, gravel and rich soil per tile, and whether a chunk may hold a rock.
///
/// Classification is a pure function of the seed, the layer settings and the
/// coordinates, so a classifier can be shared across worker threads.
pub struct TerrainClassifier {
    chunk_size: i32,
    dirt: Layer,
    gravel: Layer,
    rich_soil: Layer,
    rock: NoiseField,
    rock_spawn: RockSpawnThreshold,
}

impl TerrainClassifier {
    /// Builds all layer fields from the world configuration.
    pub fn new(config: &WorldGenConfig) -> Self {
        Self {
            chunk_size: config.chunk_size,
            dirt: Layer::new(config.seed, LayerSeeds::DIRT, &config.dirt),
            gravel: Layer::new(config.seed, LayerSeeds::GRAVEL, &config.gravel),
            rich_soil: Layer::new(config.seed, LayerSeeds::RICH_SOIL, &config.rich_soil),
            rock: NoiseField::new(
                LayerSeeds::derive(config.seed, LayerSeeds::ROCK),
                config.rock.octaves,
                config.rock.frequency,
            ),
            rock_spawn: config.rock.spawn.clone(),
        }
    }

    /// Chunk side length this classifier produces.
    pub fn chunk_size(&self) -> i32 {
        self.chunk_size
    }

    /// Classifies a single tile. Tiles above ground (`y > 0`) are always empty.
    pub fn classify_tile(&self, tile: IVec2) -> TileFlags {
        if tile.y > 0 {
            return TileFlags::EMPTY;
        }

        let mut flags = TileFlags::EMPTY;
        if self.dirt.present(tile.x, tile.y) {
            flags.insert(TileFlags::DIRT);
        }
        if self.gravel.present(tile.x, tile.y) {
            flags.insert(TileFlags::GRAVEL);
        }
        if flags.has_dirt() && !flags.has_gravel() && self.rich_soil.present(tile.x, tile.y) {
            flags.insert(TileFlags::RICH_SOIL);
        }
        flags
    }

    /// Classifies every tile of the chunk at `index`.
    pub fn classify_chunk(&self, index: IVec2) -> Chunk {
        let mut chunk = Chunk::new(index, self.chunk_size);
        let min = chunk.bounds().min;
        for x in 0..self.chunk_size {
            for y in 0..self.chunk_size {
                let local = IVec2::new(x, y);
                chunk.set_local(local, self.classify_tile(min + local));
            }
        }
        chunk
    }

    /// Returns `true` if the chunk at `index` passes the rock check.
    ///
    /// Only chunks at `index.y <= -2` qualify. Dirt must be present at the
    /// chunk-index sample point, and the rock noise there must exceed the
    /// depth-weighted threshold.
    pub fn rock_allowed(&self, index: IVec2) -> bool {
        if index.y > -2 {
            return false;
        }
        if !self.dirt.present(index.x, index.y) {
            return false;
        }
        let value = self.rock.normalized(index.x as f64, index.y as f64);
        value > 1.0 - self.rock_spawn.threshold(index.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> TerrainClassifier {
        TerrainClassifier::new(&WorldGenConfig::default())
    }

    #[test]
    fn test_layer_seed_offsets() {
        assert_eq!(LayerSeeds::derive(100, LayerSeeds::DIRT), 100);
        assert_eq!(LayerSeeds::derive(100, LayerSeeds::ROCK), 110);
        assert_eq!(LayerSeeds::derive(100, LayerSeeds::GRAVEL), 200);
        assert_eq!(LayerSeeds::derive(100, LayerSeeds::RICH_SOIL), 0);
        assert_eq!(LayerSeeds::derive(50, LayerSeeds::RICH_SOIL), u32::MAX - 49);
    }

    #[test]
    fn test_sky_is_always_empty() {
        let c = classifier();
        for x in -20..20 {
            for y in 1..20 {
                assert_eq!(c.classify_tile(IVec2::new(x, y)), TileFlags::EMPTY);
            }
        }
    }

    #[test]
    fn test_classification_deterministic() {
        let a = classifier();
        let b = classifier();
        for x in -30..30 {
            for y in -30..=0 {
                let tile = IVec2::new(x, y);
                assert_eq!(
                    a.classify_tile(tile),
                    b.classify_tile(tile),
                    "Classification must be deterministic at {tile}"
                );
            }
        }
    }

    #[test]
    fn test_rich_soil_requires_dirt_without_gravel() {
        let config = WorldGenConfig {
            rich_soil: NoiseLayerConfig {
                threshold: 1.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let c = TerrainClassifier::new(&config);
        let mut saw_rich = false;
        for x in -40..40 {
            for y in -40..=0 {
                let flags = c.classify_tile(IVec2::new(x, y));
                if flags.has_rich_soil() {
                    saw_rich = true;
                    assert!(flags.has_dirt(), "rich soil without dirt at ({x}, {y})");
                    assert!(!flags.has_gravel(), "rich soil on gravel at ({x}, {y})");
                }
            }
        }
        assert!(saw_rich, "A full rich-soil threshold should place some rich soil");
    }

    #[test]
    fn test_classify_chunk_matches_tiles() {
        let c = classifier();
        let chunk = c.classify_chunk(IVec2::new(-1, -1));
        for (tile, flags) in chunk.tiles_in_order() {
            assert_eq!(flags, c.classify_tile(tile));
        }
    }

    #[test]
    fn test_no_rocks_near_surface() {
        let config = WorldGenConfig {
            rock: crate::config::RockConfig {
                spawn: RockSpawnThreshold {
                    min_depth: 0,
                    min_chance: 1.0,
                    max_depth: -10,
                    max_chance: 1.0,
                },
                ..Default::default()
            },
            ..Default::default()
        };
        let c = TerrainClassifier::new(&config);
        for x in -10..10 {
            for y in -1..=3 {
                assert!(!c.rock_allowed(IVec2::new(x, y)));
            }
        }
    }
}
