//! Opaque asset handles injected by the host.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// Handle to a host-side asset (prefab, sprite). The core never dereferences it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetHandle(pub u32);

/// Immutable table of rock assets to choose from.
#[derive(Clone, Debug)]
pub struct RockAssets {
    rocks: Vec<AssetHandle>,
}

impl RockAssets {
    /// Creates a table. At least one rock is required.
    pub fn new(rocks: Vec<AssetHandle>) -> Result<Self, WorldError> {
        if rocks.is_empty() {
            return Err(WorldError::EmptyRockTable);
        }
        Ok(Self { rocks })
    }

    /// A table of `count` sequential handles starting at zero. Useful for headless runs.
    pub fn sequential(count: u32) -> Result<Self, WorldError> {
        Self::new((0..count).map(AssetHandle).collect())
    }

    /// Uniformly picks one rock.
    pub fn pick(&self, rng: &mut impl Rng) -> AssetHandle {
        self.rocks[rng.random_range(0..self.rocks.len())]
    }

    /// Number of rocks in the table.
    pub fn len(&self) -> usize {
        self.rocks.len()
    }

    /// Always `false`; construction rejects empty tables.
    pub fn is_empty(&self) -> bool {
        self.rocks.is_empty()
    }
}
