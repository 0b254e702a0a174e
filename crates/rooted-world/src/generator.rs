//! World generation driver: lazily generates chunks around a moving focus
//! and runs rock placement, air region discovery and water filling for each
//! new chunk.

use std::sync::Arc;

use glam::{IVec2, Vec2};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace};

use crate::air::{AirRegions, find_chunk_regions};
use crate::assets::RockAssets;
use crate::async_generation::{AsyncChunkGenerator, ClassifyTask, GeneratedChunk};
use crate::chunk::Chunk;
use crate::chunk_store::ChunkStore;
use crate::config::WorldGenConfig;
use crate::error::WorldError;
use crate::rock::RockPlacement;
use crate::seed::world_rng;
use crate::terrain::TerrainClassifier;
use crate::water::{WaterFiller, WaterMap};

/// What occupies a world position, as seen by the growing root.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TerrainType {
    /// Open air, sky, or ungenerated territory.
    Air,
    /// Plain dirt.
    Dirt,
    /// Gravel (slows growth).
    Gravel,
    /// Rich soil (speeds growth).
    RichSoil,
    /// Water inside an air pocket.
    Water,
}

/// Owns the chunk store, region table, water and rocks for one run.
///
/// All mutation happens through `&mut self`, so there is exactly one writer
/// for region merges.
pub struct WorldGenerator {
    config: WorldGenConfig,
    classifier: Arc<TerrainClassifier>,
    store: ChunkStore,
    regions: AirRegions,
    water: WaterMap,
    filler: WaterFiller,
    rock_assets: RockAssets,
    rocks: Vec<RockPlacement>,
    rng: ChaCha8Rng,
}

impl WorldGenerator {
    /// Validates the configuration and seeds the world RNG.
    pub fn new(config: WorldGenConfig, rock_assets: RockAssets) -> Result<Self, WorldError> {
        config.validate()?;
        let filler = WaterFiller::from_config(&config.water)?;
        info!(
            seed = config.seed,
            chunk_size = config.chunk_size,
            radius = config.generation_radius,
            "World generator initialised"
        );
        Ok(Self {
            classifier: Arc::new(TerrainClassifier::new(&config)),
            store: ChunkStore::new(config.chunk_size)?,
            regions: AirRegions::new(),
            water: WaterMap::new(),
            filler,
            rock_assets,
            rocks: Vec::new(),
            rng: world_rng(config.seed),
            config,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &WorldGenConfig {
        &self.config
    }

    /// Shared classifier, for handing to background workers.
    pub fn classifier(&self) -> &Arc<TerrainClassifier> {
        &self.classifier
    }

    /// Generated chunks.
    pub fn store(&self) -> &ChunkStore {
        &self.store
    }

    /// Discovered air regions.
    pub fn regions(&self) -> &AirRegions {
        &self.regions
    }

    /// Water tiles.
    pub fn water(&self) -> &WaterMap {
        &self.water
    }

    /// Rocks placed so far, in generation order.
    pub fn rocks(&self) -> &[RockPlacement] {
        &self.rocks
    }

    /// Generates every missing chunk within the generation radius of `focus`.
    ///
    /// Returns the indices generated by this call, in generation order.
    /// Calling again with the same focus generates nothing.
    pub fn ensure_generated(&mut self, focus: Vec2) -> Result<Vec<IVec2>, WorldError> {
        let missing = self
            .store
            .missing_around(focus, self.config.generation_radius);
        for &index in &missing {
            let chunk = self.classifier.classify_chunk(index);
            self.insert_chunk(chunk)?;
        }
        if !missing.is_empty() {
            debug!(
                generated = missing.len(),
                total = self.store.chunk_count(),
                "Generated chunks around ({:.1}, {:.1})",
                focus.x,
                focus.y
            );
        }
        Ok(missing)
    }

    /// Generates the chunk at `index` if it does not exist yet.
    ///
    /// Returns `false` if the chunk was already present.
    pub fn generate_chunk(&mut self, index: IVec2) -> Result<bool, WorldError> {
        if self.store.contains(index) {
            return Ok(false);
        }
        let chunk = self.classifier.classify_chunk(index);
        self.insert_chunk(chunk)
    }

    /// Queues every missing chunk around `focus` on a background generator,
    /// nearest first.
    ///
    /// Chunks already pending are skipped. Returns the number of tasks queued.
    pub fn request_missing(&self, focus: Vec2, generator: &AsyncChunkGenerator) -> usize {
        let mut tasks = self.classify_tasks(focus);
        tasks.retain(|task| !generator.is_pending(&task.index));
        tasks
            .into_iter()
            .filter(|task| generator.submit(*task).is_ok())
            .count()
    }

    /// Tasks for the missing chunks around `focus`, ordered by priority.
    fn classify_tasks(&self, focus: Vec2) -> Vec<ClassifyTask> {
        let focus_chunk = focus / self.config.chunk_size as f32;
        let mut tasks: Vec<ClassifyTask> = self
            .store
            .missing_around(focus, self.config.generation_radius)
            .into_iter()
            .map(|index| ClassifyTask {
                index,
                priority: index.as_vec2().distance_squared(focus_chunk) as u64,
            })
            .collect();
        tasks.sort_by_key(|task| task.priority);
        tasks
    }

    /// Inserts chunks classified in the background, in ascending index order.
    ///
    /// Chunks that were generated in the meantime are discarded. Returns the
    /// indices actually inserted.
    pub fn integrate(&mut self, mut results: Vec<GeneratedChunk>) -> Result<Vec<IVec2>, WorldError> {
        results.sort_by_key(|r| (r.index.x, r.index.y));
        let mut inserted = Vec::with_capacity(results.len());
        for result in results {
            let index = result.index;
            if self.insert_chunk(result.chunk)? {
                inserted.push(index);
            }
        }
        Ok(inserted)
    }

    /// Stores a classified chunk and runs the per-chunk passes on it.
    fn insert_chunk(&mut self, chunk: Chunk) -> Result<bool, WorldError> {
        let index = chunk.index();
        let bounds = chunk.bounds();
        let has_cave = chunk.has_cave();
        if !self.store.insert(chunk) {
            return Ok(false);
        }
        trace!("Generated chunk ({}, {})", index.x, index.y);

        if self.classifier.rock_allowed(index) {
            let rock = RockPlacement::roll(index, bounds, &self.rock_assets, &mut self.rng);
            debug!(
                chunk_x = index.x,
                chunk_y = index.y,
                asset = rock.asset.0,
                "Placed rock at ({}, {})",
                rock.tile.x,
                rock.tile.y
            );
            self.rocks.push(rock);
        }

        if has_cave {
            self.fill_chunk_regions(index)?;
        }
        Ok(true)
    }

    /// Discovers the chunk's air regions, merges them and refills their water.
    fn fill_chunk_regions(&mut self, index: IVec2) -> Result<(), WorldError> {
        for tiles in find_chunk_regions(&self.store, index) {
            let outcome = self.regions.absorb(tiles)?;
            for absorbed in &outcome.absorbed {
                self.water.clear_region(*absorbed);
            }

            let region = self
                .regions
                .get_mut(outcome.id)
                .ok_or(WorldError::EmptyRegion)?;
            let (level, submerged) = self.filler.fill(region, &mut self.rng);
            region.set_water_level(level);
            trace!(
                region = outcome.id.0,
                level,
                water = submerged.len(),
                "Filled air region"
            );
            self.water.set_region(outcome.id, submerged);
        }
        Ok(())
    }

    /// Terrain at a world position.
    ///
    /// Above ground and ungenerated territory are [`TerrainType::Air`].
    /// Gravel takes precedence over rich soil, which takes precedence over dirt.
    pub fn terrain_at(&self, position: Vec2) -> TerrainType {
        if position.y > 0.0 {
            return TerrainType::Air;
        }
        let tile = position.floor().as_ivec2();
        let Some(flags) = self.store.tile(tile) else {
            return TerrainType::Air;
        };
        if flags.has_gravel() {
            TerrainType::Gravel
        } else if flags.has_rich_soil() {
            TerrainType::RichSoil
        } else if flags.has_dirt() {
            TerrainType::Dirt
        } else if self.water.contains(tile) {
            TerrainType::Water
        } else {
            TerrainType::Air
        }
    }

    /// Returns `true` if dirt occupies the tile under `position`.
    pub fn is_grounded(&self, position: Vec2) -> bool {
        self.store
            .tile(position.floor().as_ivec2())
            .is_some_and(|flags| flags.has_dirt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::hash_store;

    fn world(config: WorldGenConfig) -> WorldGenerator {
        WorldGenerator::new(config, RockAssets::sequential(4).unwrap()).unwrap()
    }

    fn small_config() -> WorldGenConfig {
        WorldGenConfig {
            chunk_size: 8,
            generation_radius: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = WorldGenerator::new(
            WorldGenConfig {
                chunk_size: 2,
                ..Default::default()
            },
            RockAssets::sequential(1).unwrap(),
        );
        assert!(matches!(result, Err(WorldError::InvalidChunkSize(2))));
    }

    #[test]
    fn test_ensure_generated_idempotent() {
        let mut w = world(small_config());
        let first = w.ensure_generated(Vec2::new(3.0, -5.0)).unwrap();
        assert!(!first.is_empty());
        let count = w.store().chunk_count();

        let second = w.ensure_generated(Vec2::new(3.0, -5.0)).unwrap();
        assert!(second.is_empty());
        assert_eq!(w.store().chunk_count(), count);

        let mut indices: Vec<_> = w.store().indices().map(|i| (i.x, i.y)).collect();
        let before = indices.len();
        indices.sort_unstable();
        indices.dedup();
        assert_eq!(indices.len(), before, "Chunk index set must have no repeats");
    }

    #[test]
    fn test_generate_chunk_once() {
        let mut w = world(small_config());
        assert!(w.generate_chunk(IVec2::new(0, -3)).unwrap());
        assert!(!w.generate_chunk(IVec2::new(0, -3)).unwrap());
        assert_eq!(w.store().chunk_count(), 1);
    }

    #[test]
    fn test_same_seed_same_world() {
        let mut a = world(small_config());
        let mut b = world(small_config());
        for focus in [Vec2::ZERO, Vec2::new(10.0, -20.0), Vec2::new(-30.0, -40.0)] {
            a.ensure_generated(focus).unwrap();
            b.ensure_generated(focus).unwrap();
        }
        assert_eq!(hash_store(a.store()), hash_store(b.store()));
        assert_eq!(a.rocks(), b.rocks());
        assert_eq!(a.water().len(), b.water().len());
        assert_eq!(a.regions().live_count(), b.regions().live_count());
    }

    #[test]
    fn test_no_tile_in_two_regions() {
        let mut w = world(small_config());
        for step in 0..6 {
            w.ensure_generated(Vec2::new(step as f32 * 7.0, -(step as f32) * 9.0))
                .unwrap();
        }
        let mut total = 0;
        for (id, region) in w.regions().iter() {
            total += region.len();
            for tile in region.tiles() {
                assert_eq!(w.regions().region_of(*tile), Some(id));
                assert!(tile.y <= 0, "Sky tile {tile} tracked as air pocket");
            }
        }
        assert_eq!(total, w.regions().tile_count());
    }

    #[test]
    fn test_water_only_in_regions() {
        let mut w = world(small_config());
        w.ensure_generated(Vec2::new(0.0, -24.0)).unwrap();
        for tile in w.water().iter() {
            assert!(w.regions().region_of(tile).is_some());
            let flags = w.store().tile(tile).expect("water inside generated chunk");
            assert!(!flags.has_dirt());
            let expected = if flags.has_gravel() {
                TerrainType::Gravel
            } else {
                TerrainType::Water
            };
            assert_eq!(w.terrain_at(tile.as_vec2() + Vec2::splat(0.5)), expected);
        }
    }

    #[test]
    fn test_terrain_above_ground_is_air() {
        let mut w = world(small_config());
        w.ensure_generated(Vec2::ZERO).unwrap();
        assert_eq!(w.terrain_at(Vec2::new(0.5, 3.5)), TerrainType::Air);
        assert_eq!(w.terrain_at(Vec2::new(5000.0, -5000.0)), TerrainType::Air);
    }

    #[test]
    fn test_rocks_only_deep() {
        let mut config = small_config();
        config.rock.spawn.min_chance = 1.0;
        config.rock.spawn.max_chance = 1.0;
        let mut w = world(config);
        w.ensure_generated(Vec2::new(0.0, -40.0)).unwrap();
        assert!(!w.rocks().is_empty(), "Full spawn chance should place rocks on dirt");
        for rock in w.rocks() {
            assert!(rock.chunk.y <= -2);
            assert!(w.store().chunk(rock.chunk).unwrap().bounds().contains(rock.tile));
        }
    }

    #[test]
    fn test_classify_tasks_nearest_first() {
        let w = world(small_config());
        let focus = Vec2::new(20.0, -20.0);
        let tasks = w.classify_tasks(focus);
        assert!(!tasks.is_empty());
        assert!(tasks.windows(2).all(|p| p[0].priority <= p[1].priority));
        assert_eq!(
            tasks[0].index,
            crate::world_to_chunk_index(focus, 8),
            "focus chunk goes first"
        );
    }

    fn carved(index: IVec2, air: &[IVec2]) -> crate::GeneratedChunk {
        let mut chunk = crate::Chunk::new(index, 4);
        let min = index * 4;
        for x in 0..4 {
            for y in 0..4 {
                let local = IVec2::new(x, y);
                if !air.contains(&(min + local)) {
                    chunk.set_local(local, crate::TileFlags::DIRT);
                }
            }
        }
        crate::GeneratedChunk {
            index,
            chunk,
            generation_time_us: 0,
        }
    }

    #[test]
    fn test_bridging_chunk_refills_merged_water() {
        let mut w = world(WorldGenConfig {
            chunk_size: 4,
            generation_radius: 1,
            water: crate::WaterConfig {
                min_level: 0,
                max_level: 0,
            },
            ..Default::default()
        });
        let tunnel = |xs: std::ops::Range<i32>| xs.map(|x| IVec2::new(x, -2)).collect::<Vec<_>>();

        // Left pocket floors at y = -3, right pocket at y = -4.
        let mut left = tunnel(1..4);
        left.push(IVec2::new(1, -3));
        let mut right = tunnel(8..11);
        right.extend([IVec2::new(10, -3), IVec2::new(10, -4)]);
        w.integrate(vec![
            carved(IVec2::new(0, -1), &left),
            carved(IVec2::new(2, -1), &right),
        ])
        .unwrap();

        let left_id = w.regions().region_of(IVec2::new(1, -3)).unwrap();
        let right_id = w.regions().region_of(IVec2::new(10, -4)).unwrap();
        assert_ne!(left_id, right_id);
        assert!(w.water().contains(IVec2::new(1, -3)));
        assert!(w.water().contains(IVec2::new(10, -4)));

        w.integrate(vec![carved(IVec2::new(1, -1), &tunnel(4..8))])
            .unwrap();

        assert_eq!(w.regions().live_count(), 1);
        let survivor = w.regions().region_of(IVec2::new(10, -4)).unwrap();
        assert_eq!(survivor, left_id.min(right_id));
        let absorbed = left_id.max(right_id);
        assert!(w.water().region_tiles(absorbed).is_empty());

        let region = w.regions().get(survivor).unwrap();
        assert_eq!(region.lowest(), IVec2::new(10, -4));
        let expected = WaterFiller::submerged(region, region.water_level());
        assert_eq!(w.water().len(), expected.len());
        assert_eq!(expected, vec![IVec2::new(10, -4)]);
        assert!(!w.water().contains(IVec2::new(1, -3)), "stale water left behind");
    }
}
