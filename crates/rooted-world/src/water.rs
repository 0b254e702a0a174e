//! Randomised water levels for air regions.

use glam::IVec2;
use rand::Rng;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::air::{AirRegion, RegionId};
use crate::config::WaterConfig;
use crate::error::WorldError;

/// Picks water levels and computes submerged tiles.
#[derive(Clone, Debug)]
pub struct WaterFiller {
    min_level: i32,
    max_level: i32,
}

impl WaterFiller {
    /// Creates a filler drawing levels from `[min_level, max_level]`.
    pub fn new(min_level: i32, max_level: i32) -> Result<Self, WorldError> {
        if min_level < 0 || min_level > max_level {
            return Err(WorldError::InvalidWaterRange {
                min: min_level,
                max: max_level,
            });
        }
        Ok(Self {
            min_level,
            max_level,
        })
    }

    /// Builds a filler from configuration.
    pub fn from_config(config: &WaterConfig) -> Result<Self, WorldError> {
        Self::new(config.min_level, config.max_level)
    }

    /// Draws a water level uniformly from the inclusive range.
    pub fn pick_level(&self, rng: &mut impl Rng) -> i32 {
        rng.random_range(self.min_level..=self.max_level)
    }

    /// Tiles of `region` with `y` in `[lowest.y, lowest.y + level]`.
    pub fn submerged(region: &AirRegion, level: i32) -> Vec<IVec2> {
        let floor = region.lowest().y;
        region
            .tiles()
            .iter()
            .copied()
            .filter(|tile| tile.y >= floor && tile.y <= floor + level)
            .collect()
    }

    /// Draws a level and returns it together with the submerged tiles.
    pub fn fill(&self, region: &AirRegion, rng: &mut impl Rng) -> (i32, Vec<IVec2>) {
        let level = self.pick_level(rng);
        (level, Self::submerged(region, level))
    }
}

/// Water tiles in the world, tracked per region so re-fills replace old water.
#[derive(Default)]
pub struct WaterMap {
    tiles: FxHashSet<IVec2>,
    by_region: FxHashMap<RegionId, Vec<IVec2>>,
}

impl WaterMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `tile` holds water.
    pub fn contains(&self, tile: IVec2) -> bool {
        self.tiles.contains(&tile)
    }

    /// Total water tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Returns `true` if no tile holds water.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Water tiles owned by `region`.
    pub fn region_tiles(&self, region: RegionId) -> &[IVec2] {
        self.by_region.get(&region).map_or(&[], Vec::as_slice)
    }

    /// Removes all water belonging to `region`.
    pub fn clear_region(&mut self, region: RegionId) {
        if let Some(old) = self.by_region.remove(&region) {
            for tile in old {
                self.tiles.remove(&tile);
            }
        }
    }

    /// Replaces the water of `region` with `tiles`.
    pub fn set_region(&mut self, region: RegionId, tiles: Vec<IVec2>) {
        self.clear_region(region);
        self.tiles.extend(tiles.iter().copied());
        self.by_region.insert(region, tiles);
    }

    /// Iterates all water tiles.
    pub fn iter(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.tiles.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::air::AirRegions;
    use crate::seed::world_rng;

    fn basin() -> AirRegions {
        let mut table = AirRegions::new();
        let mut tiles = Vec::new();
        for x in 0..3 {
            for y in -10..=-5 {
                tiles.push(IVec2::new(x, y));
            }
        }
        table.absorb(tiles).expect("non-empty");
        table
    }

    #[test]
    fn test_submerged_rows() {
        let table = basin();
        let region = table.get(RegionId(0)).unwrap();
        assert_eq!(region.lowest().y, -10);

        let level0 = WaterFiller::submerged(region, 0);
        assert_eq!(level0.len(), 3);
        assert!(level0.iter().all(|t| t.y == -10));

        let level2 = WaterFiller::submerged(region, 2);
        assert_eq!(level2.len(), 9);
        assert!(level2.iter().all(|t| (-10..=-8).contains(&t.y)));
    }

    #[test]
    fn test_level_range_inclusive() {
        let filler = WaterFiller::new(1, 3).unwrap();
        let mut rng = world_rng(5);
        let mut seen = [false; 4];
        for _ in 0..500 {
            let level = filler.pick_level(&mut rng);
            assert!((1..=3).contains(&level));
            seen[level as usize] = true;
        }
        assert_eq!(seen, [false, true, true, true]);
    }

    #[test]
    fn test_invalid_range() {
        assert!(WaterFiller::new(3, 1).is_err());
        assert!(WaterFiller::new(-1, 1).is_err());
        assert!(WaterFiller::new(2, 2).is_ok());
    }

    #[test]
    fn test_fill_deterministic_for_seed() {
        let table = basin();
        let region = table.get(RegionId(0)).unwrap();
        let filler = WaterFiller::new(0, 4).unwrap();
        let a = filler.fill(region, &mut world_rng(77));
        let b = filler.fill(region, &mut world_rng(77));
        assert_eq!(a, b);
    }

    #[test]
    fn test_water_map_replaces_region() {
        let mut water = WaterMap::new();
        water.set_region(RegionId(0), vec![IVec2::new(0, -1), IVec2::new(1, -1)]);
        water.set_region(RegionId(1), vec![IVec2::new(9, -9)]);
        assert_eq!(water.len(), 3);

        water.set_region(RegionId(0), vec![IVec2::new(0, -1)]);
        assert_eq!(water.len(), 2);
        assert!(!water.contains(IVec2::new(1, -1)));

        water.clear_region(RegionId(1));
        assert_eq!(water.len(), 1);
        assert!(water.region_tiles(RegionId(1)).is_empty());
    }
}
