//! Fixed-size square chunks of classified tiles.
//!
//! A [`Chunk`] covers `size × size` tiles starting at `index * size`. Tile
//! classification is written once at generation time and never changes.

use glam::{IVec2, Vec2};

/// Per-tile classification bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TileFlags(u8);

impl TileFlags {
    /// Nothing present: air (or sky above ground).
    pub const EMPTY: Self = Self(0);
    /// Dirt occupies the tile. Everything else underground is air.
    pub const DIRT: Self = Self(0b0000_0001);
    /// Gravel is present. Independent of dirt.
    pub const GRAVEL: Self = Self(0b0000_0010);
    /// Rich soil is present. Only ever set together with dirt and without gravel.
    pub const RICH_SOIL: Self = Self(0b0000_0100);

    /// Returns `true` if every bit of `other` is set.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Sets the bits of `other`.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Dirt present.
    pub fn has_dirt(self) -> bool {
        self.contains(Self::DIRT)
    }

    /// Gravel present.
    pub fn has_gravel(self) -> bool {
        self.contains(Self::GRAVEL)
    }

    /// Rich soil present.
    pub fn has_rich_soil(self) -> bool {
        self.contains(Self::RICH_SOIL)
    }

    /// Raw bits.
    pub fn bits(self) -> u8 {
        self.0
    }
}

impl std::ops::BitOr for TileFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Axis-aligned tile rectangle `[min, min + size)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileBounds {
    /// Inclusive lower corner.
    pub min: IVec2,
    /// Side length.
    pub size: i32,
}

impl TileBounds {
    /// Exclusive upper corner.
    pub fn max(&self) -> IVec2 {
        self.min + IVec2::splat(self.size)
    }

    /// Returns `true` if `tile` lies inside the rectangle.
    pub fn contains(&self, tile: IVec2) -> bool {
        let max = self.max();
        tile.x >= self.min.x && tile.x < max.x && tile.y >= self.min.y && tile.y < max.y
    }

    /// Geometric centre in world units.
    pub fn center(&self) -> Vec2 {
        self.min.as_vec2() + Vec2::splat(self.size as f32 / 2.0)
    }
}

/// Smallest chunk side that still has an interior rock position.
pub const MIN_CHUNK_SIZE: i32 = 4;

/// Largest chunk side; keeps the per-chunk tile grid bounded.
pub const MAX_CHUNK_SIZE: i32 = 1024;

/// Chunk index containing the world position (`floor(position / size)`).
pub fn world_to_chunk_index(position: Vec2, chunk_size: i32) -> IVec2 {
    (position / chunk_size as f32).floor().as_ivec2()
}

/// Chunk index containing the tile.
pub fn chunk_index_of_tile(tile: IVec2, chunk_size: i32) -> IVec2 {
    IVec2::new(tile.x.div_euclid(chunk_size), tile.y.div_euclid(chunk_size))
}

/// A generated chunk.
#[derive(Clone, Debug)]
pub struct Chunk {
    index: IVec2,
    size: i32,
    /// Row-major by local `x`, then `y`: `tiles[x * size + y]`.
    tiles: Vec<TileFlags>,
}

impl Chunk {
    /// Creates a chunk with every tile empty.
    pub fn new(index: IVec2, size: i32) -> Self {
        let side = size.max(0) as usize;
        Self {
            index,
            size,
            tiles: vec![TileFlags::EMPTY; side * side],
        }
    }

    /// Chunk index.
    pub fn index(&self) -> IVec2 {
        self.index
    }

    /// Side length in tiles.
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Tile rectangle covered by this chunk.
    pub fn bounds(&self) -> TileBounds {
        TileBounds {
            min: self.index * self.size,
            size: self.size,
        }
    }

    fn local_offset(&self, local: IVec2) -> Option<usize> {
        if local.x < 0 || local.y < 0 || local.x >= self.size || local.y >= self.size {
            return None;
        }
        Some((local.x * self.size + local.y) as usize)
    }

    /// Flags at a chunk-local coordinate, or `None` if out of range.
    pub fn get_local(&self, local: IVec2) -> Option<TileFlags> {
        self.local_offset(local).map(|i| self.tiles[i])
    }

    /// Writes flags at a chunk-local coordinate. Out-of-range writes are ignored.
    pub fn set_local(&mut self, local: IVec2, flags: TileFlags) {
        match self.local_offset(local) {
            Some(i) => self.tiles[i] = flags,
            None => tracing::warn!(
                "Chunk::set_local out of bounds: ({}, {}) in chunk ({}, {})",
                local.x,
                local.y,
                self.index.x,
                self.index.y
            ),
        }
    }

    /// Flags at a world tile, or `None` if the tile is outside this chunk.
    pub fn tile(&self, tile: IVec2) -> Option<TileFlags> {
        self.get_local(tile - self.bounds().min)
    }

    /// Returns `true` if dirt occupies the world tile.
    pub fn is_dirt(&self, tile: IVec2) -> bool {
        self.tile(tile).is_some_and(TileFlags::has_dirt)
    }

    /// Returns `true` if any underground tile is not dirt.
    pub fn has_cave(&self) -> bool {
        self.tiles_in_order()
            .any(|(tile, flags)| tile.y <= 0 && !flags.has_dirt())
    }

    /// Iterates `(world tile, flags)` with local `x` outermost, then `y`.
    pub fn tiles_in_order(&self) -> impl Iterator<Item = (IVec2, TileFlags)> + '_ {
        let min = self.bounds().min;
        let size = self.size;
        self.tiles.iter().enumerate().map(move |(i, flags)| {
            let i = i as i32;
            (min + IVec2::new(i / size, i % size), *flags)
        })
    }

    /// Number of dirt tiles.
    pub fn dirt_count(&self) -> usize {
        self.tiles.iter().filter(|f| f.has_dirt()).count()
    }
}
