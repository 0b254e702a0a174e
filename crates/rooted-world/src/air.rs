//! Connected air pocket discovery and the global region table.
//!
//! A newly generated chunk is scanned for underground non-dirt tiles. Each
//! unflagged one seeds a 4-neighbour flood fill that may cross into any
//! previously generated chunk but never into unknown territory, dirt, or the
//! sky above ground. Discovered sets are merged into the [`AirRegions`] table
//! by true set union: every tracked region sharing a tile with the new set
//! is absorbed into the lowest-numbered one.

use std::collections::VecDeque;

use glam::IVec2;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::chunk_store::ChunkStore;
use crate::error::WorldError;

const NEIGHBOURS: [IVec2; 4] = [
    IVec2::new(-1, 0),
    IVec2::new(0, -1),
    IVec2::new(0, 1),
    IVec2::new(1, 0),
];

/// Returns `true` if `tile` is generated, underground and not dirt.
fn is_open(store: &ChunkStore, tile: IVec2) -> bool {
    tile.y <= 0 && store.tile(tile).is_some_and(|flags| !flags.has_dirt())
}

/// Breadth-first 4-neighbour flood fill from `start` over open tiles.
///
/// Returns the tiles in visit order. Empty if `start` itself is not open.
pub fn flood_fill(store: &ChunkStore, start: IVec2) -> Vec<IVec2> {
    if !is_open(store, start) {
        return Vec::new();
    }

    let mut tiles = Vec::new();
    let mut visited = FxHashSet::default();
    let mut queue = VecDeque::new();
    visited.insert(start);
    queue.push_back(start);

    while let Some(tile) = queue.pop_front() {
        tiles.push(tile);
        for offset in NEIGHBOURS {
            let next = tile + offset;
            if is_open(store, next) && visited.insert(next) {
                queue.push_back(next);
            }
        }
    }
    tiles
}

/// All air regions with at least one tile seeded inside chunk `index`.
///
/// Seeds are visited with local `x` outermost, then `y`. A tile already
/// covered by an earlier fill from the same chunk never seeds another.
pub fn find_chunk_regions(store: &ChunkStore, index: IVec2) -> Vec<Vec<IVec2>> {
    let Some(chunk) = store.chunk(index) else {
        return Vec::new();
    };

    let mut regions = Vec::new();
    let mut flagged = FxHashSet::default();
    for (tile, flags) in chunk.tiles_in_order() {
        if tile.y > 0 || flags.has_dirt() || flagged.contains(&tile) {
            continue;
        }
        let region = flood_fill(store, tile);
        flagged.extend(region.iter().copied());
        if !region.is_empty() {
            regions.push(region);
        }
    }
    regions
}

/// Stable identifier of a region in the [`AirRegions`] table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub usize);

/// A connected set of air tiles.
#[derive(Clone, Debug)]
pub struct AirRegion {
    tiles: Vec<IVec2>,
    lowest: IVec2,
    water_level: i32,
}

impl AirRegion {
    fn new(tiles: Vec<IVec2>) -> Result<Self, WorldError> {
        let lowest = lowest_tile(&tiles).ok_or(WorldError::EmptyRegion)?;
        Ok(Self {
            tiles,
            lowest,
            water_level: 0,
        })
    }

    /// Member tiles in discovery order.
    pub fn tiles(&self) -> &[IVec2] {
        &self.tiles
    }

    /// Number of tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Regions are never empty; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// The lowest tile (minimum `y`, earliest discovered on ties).
    pub fn lowest(&self) -> IVec2 {
        self.lowest
    }

    /// Water level last assigned to this region.
    pub fn water_level(&self) -> i32 {
        self.water_level
    }

    pub(crate) fn set_water_level(&mut self, level: i32) {
        self.water_level = level;
    }
}

/// Lowest tile of a set: minimum `y`, first in order on ties.
fn lowest_tile(tiles: &[IVec2]) -> Option<IVec2> {
    let mut iter = tiles.iter().copied();
    let first = iter.next()?;
    Some(iter.fold(first, |lowest, tile| if tile.y < lowest.y { tile } else { lowest }))
}

#[derive(Clone, Debug)]
enum RegionSlot {
    Live(AirRegion),
    MergedInto(RegionId),
}

/// Result of adding a discovered tile set to the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Region now holding every tile of the discovered set.
    pub id: RegionId,
    /// Previously live regions folded into `id` (excluding `id` itself).
    pub absorbed: Vec<RegionId>,
    /// `true` if `id` did not exist before this call.
    pub created: bool,
}

/// Every air region discovered so far, with a tile-to-region index.
///
/// Invariant: each tile maps to exactly one live region. Retired ids forward
/// to the region that absorbed them.
#[derive(Default)]
pub struct AirRegions {
    slots: Vec<RegionSlot>,
    owner: FxHashMap<IVec2, RegionId>,
}

impl AirRegions {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The live region containing `tile`, or `None` if the tile is untracked.
    pub fn region_of(&self, tile: IVec2) -> Option<RegionId> {
        self.owner.get(&tile).copied()
    }

    /// Follows merge forwarding to the live id.
    pub fn resolve(&self, mut id: RegionId) -> Option<RegionId> {
        loop {
            match self.slots.get(id.0)? {
                RegionSlot::Live(_) => return Some(id),
                RegionSlot::MergedInto(next) => id = *next,
            }
        }
    }

    /// The live region for `id`, following forwarding.
    pub fn get(&self, id: RegionId) -> Option<&AirRegion> {
        match self.slots.get(self.resolve(id)?.0)? {
            RegionSlot::Live(region) => Some(region),
            RegionSlot::MergedInto(_) => None,
        }
    }

    pub(crate) fn get_mut(&mut self, id: RegionId) -> Option<&mut AirRegion> {
        let id = self.resolve(id)?;
        match self.slots.get_mut(id.0)? {
            RegionSlot::Live(region) => Some(region),
            RegionSlot::MergedInto(_) => None,
        }
    }

    /// Number of live regions.
    pub fn live_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, RegionSlot::Live(_)))
            .count()
    }

    /// Number of tracked tiles across all regions.
    pub fn tile_count(&self) -> usize {
        self.owner.len()
    }

    /// Live regions in id order.
    pub fn iter(&self) -> impl Iterator<Item = (RegionId, &AirRegion)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| match slot {
            RegionSlot::Live(region) => Some((RegionId(i), region)),
            RegionSlot::MergedInto(_) => None,
        })
    }

    /// Adds a discovered tile set, merging with every region it overlaps.
    pub fn absorb(&mut self, tiles: Vec<IVec2>) -> Result<MergeOutcome, WorldError> {
        if tiles.is_empty() {
            return Err(WorldError::EmptyRegion);
        }

        let mut touched: Vec<RegionId> = tiles
            .iter()
            .filter_map(|tile| self.owner.get(tile).copied())
            .collect();
        touched.sort_unstable();
        touched.dedup();

        let Some((&survivor, others)) = touched.split_first() else {
            let id = RegionId(self.slots.len());
            for tile in &tiles {
                self.owner.insert(*tile, id);
            }
            self.slots.push(RegionSlot::Live(AirRegion::new(tiles)?));
            return Ok(MergeOutcome {
                id,
                absorbed: Vec::new(),
                created: true,
            });
        };

        let mut merged = match &mut self.slots[survivor.0] {
            RegionSlot::Live(region) => std::mem::take(&mut region.tiles),
            RegionSlot::MergedInto(_) => Vec::new(),
        };

        for &other in others {
            let slot = std::mem::replace(&mut self.slots[other.0], RegionSlot::MergedInto(survivor));
            if let RegionSlot::Live(region) = slot {
                for tile in &region.tiles {
                    self.owner.insert(*tile, survivor);
                }
                merged.extend(region.tiles);
            }
        }

        for tile in tiles {
            if self.owner.get(&tile) != Some(&survivor) {
                self.owner.insert(tile, survivor);
                merged.push(tile);
            }
        }

        let region = AirRegion::new(merged)?;
        tracing::debug!(
            region = survivor.0,
            absorbed = others.len(),
            tiles = region.len(),
            "Merged air region"
        );
        self.slots[survivor.0] = RegionSlot::Live(region);

        Ok(MergeOutcome {
            id: survivor,
            absorbed: others.to_vec(),
            created: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{Chunk, TileFlags};

    /// Builds a chunk filled with dirt except for the listed local air tiles.
    fn chunk_with_air(index: IVec2, size: i32, air: &[(i32, i32)]) -> Chunk {
        let mut chunk = Chunk::new(index, size);
        for x in 0..size {
            for y in 0..size {
                chunk.set_local(IVec2::new(x, y), TileFlags::DIRT);
            }
        }
        for &(x, y) in air {
            chunk.set_local(IVec2::new(x, y), TileFlags::EMPTY);
        }
        chunk
    }

    #[test]
    fn test_flood_fill_is_four_connected() {
        let mut store = ChunkStore::new(4).unwrap();
        // Diagonal neighbours (0,0) and (1,1) must not connect.
        store.insert(chunk_with_air(IVec2::new(0, -1), 4, &[(0, 0), (1, 1)]));
        let region = flood_fill(&store, IVec2::new(0, -4));
        assert_eq!(region, vec![IVec2::new(0, -4)]);
    }

    #[test]
    fn test_flood_fill_stops_at_unknown_territory() {
        let mut store = ChunkStore::new(4).unwrap();
        // A vertical tunnel touching the left edge of the chunk.
        store.insert(chunk_with_air(IVec2::new(0, -1), 4, &[(0, 0), (0, 1), (0, 2)]));
        let region = flood_fill(&store, IVec2::new(0, -4));
        assert_eq!(region.len(), 3);
        assert!(region.iter().all(|t| t.x == 0));
    }

    #[test]
    fn test_flood_fill_excludes_sky() {
        let mut store = ChunkStore::new(4).unwrap();
        // Shaft from y = -1 up through the surface row y = 0 into open sky.
        store.insert(chunk_with_air(IVec2::new(0, -1), 4, &[(1, 3)]));
        let mut surface = Chunk::new(IVec2::new(0, 0), 4);
        for x in 0..4 {
            surface.set_local(IVec2::new(x, 0), TileFlags::DIRT);
        }
        surface.set_local(IVec2::new(1, 0), TileFlags::EMPTY);
        store.insert(surface);

        let region = flood_fill(&store, IVec2::new(1, -1));
        assert_eq!(region, vec![IVec2::new(1, -1), IVec2::new(1, 0)]);
    }

    #[test]
    fn test_find_chunk_regions_separates_pockets() {
        let mut store = ChunkStore::new(6).unwrap();
        store.insert(chunk_with_air(
            IVec2::new(0, -1),
            6,
            &[(1, 1), (1, 2), (4, 4), (4, 3), (3, 3)],
        ));
        let regions = find_chunk_regions(&store, IVec2::new(0, -1));
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].len(), 2);
        assert_eq!(regions[1].len(), 3);
    }

    #[test]
    fn test_find_chunk_regions_missing_chunk() {
        let store = ChunkStore::new(4).unwrap();
        assert!(find_chunk_regions(&store, IVec2::ZERO).is_empty());
    }

    #[test]
    fn test_absorb_new_region() {
        let mut table = AirRegions::new();
        let outcome = table
            .absorb(vec![IVec2::new(0, -1), IVec2::new(0, -2)])
            .expect("non-empty");
        assert!(outcome.created);
        assert_eq!(outcome.id, RegionId(0));
        assert_eq!(table.region_of(IVec2::new(0, -2)), Some(RegionId(0)));
        assert_eq!(table.region_of(IVec2::new(5, -5)), None);
        assert_eq!(table.get(RegionId(0)).expect("live").lowest(), IVec2::new(0, -2));
    }

    #[test]
    fn test_absorb_empty_is_malformed() {
        let mut table = AirRegions::new();
        assert!(matches!(table.absorb(Vec::new()), Err(WorldError::EmptyRegion)));
    }

    #[test]
    fn test_absorb_true_union_keeps_old_tiles() {
        let mut table = AirRegions::new();
        let a = table.absorb(vec![IVec2::new(0, -1), IVec2::new(1, -1)]).unwrap().id;
        let b = table.absorb(vec![IVec2::new(5, -1), IVec2::new(6, -1)]).unwrap().id;
        assert_ne!(a, b);

        // Bridge shares one tile with each region but not all of their tiles.
        let outcome = table
            .absorb(vec![IVec2::new(1, -1), IVec2::new(3, -3), IVec2::new(5, -1)])
            .unwrap();
        assert_eq!(outcome.id, a);
        assert_eq!(outcome.absorbed, vec![b]);
        assert!(!outcome.created);

        for tile in [
            IVec2::new(0, -1),
            IVec2::new(1, -1),
            IVec2::new(3, -3),
            IVec2::new(5, -1),
            IVec2::new(6, -1),
        ] {
            assert_eq!(table.region_of(tile), Some(a), "{tile} lost from the union");
        }
        assert_eq!(table.live_count(), 1);
        assert_eq!(table.tile_count(), 5);
        assert_eq!(table.get(a).unwrap().len(), 5);
        assert_eq!(table.resolve(b), Some(a));
        assert_eq!(table.get(b).unwrap().lowest(), IVec2::new(3, -3));
    }

    #[test]
    fn test_regions_merge_across_adjacent_chunks() {
        // Merge policy: true union. A pocket on the right edge of chunk (0,-1)
        // is extended by a pocket on the left edge of chunk (1,-1).
        let mut store = ChunkStore::new(4).unwrap();
        let mut table = AirRegions::new();

        store.insert(chunk_with_air(IVec2::new(0, -1), 4, &[(2, 1), (3, 1)]));
        for region in find_chunk_regions(&store, IVec2::new(0, -1)) {
            table.absorb(region).unwrap();
        }
        assert_eq!(table.live_count(), 1);

        store.insert(chunk_with_air(IVec2::new(1, -1), 4, &[(0, 1), (1, 1), (1, 0)]));
        for region in find_chunk_regions(&store, IVec2::new(1, -1)) {
            table.absorb(region).unwrap();
        }

        let left = table.region_of(IVec2::new(2, -3)).expect("left tile tracked");
        let right = table.region_of(IVec2::new(5, -4)).expect("right tile tracked");
        assert_eq!(left, right, "Touching pockets must share one region");
        assert_eq!(table.live_count(), 1);
        assert_eq!(table.get(left).unwrap().len(), 5);
        assert_eq!(table.get(left).unwrap().lowest(), IVec2::new(5, -4));
    }
}
