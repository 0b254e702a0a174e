//! Central owner for all generated chunks, keyed by chunk index.
//!
//! Chunks are inserted once and never replaced or removed during a run.

use glam::{IVec2, Vec2};
use rustc_hash::FxHashMap;

use crate::chunk::{
    Chunk, MAX_CHUNK_SIZE, MIN_CHUNK_SIZE, TileFlags, chunk_index_of_tile, world_to_chunk_index,
};
use crate::error::WorldError;

/// Owns every generated chunk and answers tile lookups across chunk borders.
pub struct ChunkStore {
    chunk_size: i32,
    chunks: FxHashMap<IVec2, Chunk>,
    /// Insertion order, for deterministic iteration.
    order: Vec<IVec2>,
}

impl ChunkStore {
    /// Creates an empty store for chunks of the given side length.
    pub fn new(chunk_size: i32) -> Result<Self, WorldError> {
        if !(MIN_CHUNK_SIZE..=MAX_CHUNK_SIZE).contains(&chunk_size) {
            return Err(WorldError::InvalidChunkSize(chunk_size));
        }
        Ok(Self {
            chunk_size,
            chunks: FxHashMap::default(),
            order: Vec::new(),
        })
    }

    /// Chunk side length in tiles.
    pub fn chunk_size(&self) -> i32 {
        self.chunk_size
    }

    /// Returns `true` if the chunk at `index` has been generated.
    pub fn contains(&self, index: IVec2) -> bool {
        self.chunks.contains_key(&index)
    }

    /// Inserts a freshly generated chunk.
    ///
    /// Returns `false` and drops `chunk` if its index is already present.
    pub fn insert(&mut self, chunk: Chunk) -> bool {
        let index = chunk.index();
        if self.chunks.contains_key(&index) {
            tracing::trace!("Chunk ({}, {}) already generated", index.x, index.y);
            return false;
        }
        if chunk.size() != self.chunk_size {
            tracing::warn!(
                "Rejecting chunk ({}, {}) of size {} in store of size {}",
                index.x,
                index.y,
                chunk.size(),
                self.chunk_size
            );
            return false;
        }
        self.chunks.insert(index, chunk);
        self.order.push(index);
        true
    }

    /// Immutable access to a generated chunk.
    pub fn chunk(&self, index: IVec2) -> Option<&Chunk> {
        self.chunks.get(&index)
    }

    /// The chunk covering `tile`, if generated.
    pub fn chunk_containing(&self, tile: IVec2) -> Option<&Chunk> {
        self.chunk(chunk_index_of_tile(tile, self.chunk_size))
    }

    /// Flags of a tile, or `None` if its chunk has not been generated.
    pub fn tile(&self, tile: IVec2) -> Option<TileFlags> {
        self.chunk_containing(tile).and_then(|c| c.tile(tile))
    }

    /// Returns `true` if `tile` lies inside generated territory.
    pub fn contains_tile(&self, tile: IVec2) -> bool {
        self.chunk_containing(tile).is_some()
    }

    /// Number of generated chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Chunk indices in generation order.
    pub fn indices(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.order.iter().copied()
    }

    /// Chunks in generation order.
    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.order.iter().filter_map(|index| self.chunks.get(index))
    }

    /// Missing chunk indices within `radius` chunks of `focus`.
    ///
    /// Candidates are the `(2r + 1)²` indices around the focus chunk; a
    /// candidate qualifies when its min corner lies within `radius *
    /// chunk_size` world units of the focus. Ordered by `x`, then `y`.
    pub fn missing_around(&self, focus: Vec2, radius: i32) -> Vec<IVec2> {
        let radius = radius.max(0);
        let center = world_to_chunk_index(focus, self.chunk_size);
        let size = self.chunk_size as f32;
        let reach = radius as f32 * size;

        let mut missing = Vec::new();
        for x in center.x.saturating_sub(radius)..=center.x.saturating_add(radius) {
            for y in center.y.saturating_sub(radius)..=center.y.saturating_add(radius) {
                let index = IVec2::new(x, y);
                // Float corner: `index * chunk_size` can leave i32 far from the origin.
                let corner = index.as_vec2() * size;
                if focus.distance(corner) <= reach && !self.contains(index) {
                    missing.push(index);
                }
            }
        }
        missing
    }
}
