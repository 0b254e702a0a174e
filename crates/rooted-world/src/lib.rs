//! Procedural underground world: chunked noise terrain, air pocket discovery,
//! water filling and rock placement.

mod air;
mod assets;
mod async_generation;
mod chunk;
mod chunk_store;
mod config;
mod error;
mod generator;
mod noise_field;
mod rock;
mod terrain;
mod water;

pub mod seed;

pub use air::{AirRegion, AirRegions, MergeOutcome, RegionId, find_chunk_regions, flood_fill};
pub use assets::{AssetHandle, RockAssets};
pub use async_generation::{AsyncChunkGenerator, ClassifyTask, GeneratedChunk};
pub use chunk::{
    Chunk, MAX_CHUNK_SIZE, MIN_CHUNK_SIZE, TileBounds, TileFlags, chunk_index_of_tile,
    world_to_chunk_index,
};
pub use chunk_store::ChunkStore;
pub use config::{MAX_GENERATION_RADIUS, NoiseLayerConfig, RockConfig, WaterConfig, WorldGenConfig};
pub use error::WorldError;
pub use generator::{TerrainType, WorldGenerator};
pub use noise_field::{NoiseField, remap};
pub use rock::{RockPlacement, RockSpawnThreshold};
pub use terrain::{LayerSeeds, TerrainClassifier};
pub use water::{WaterFiller, WaterMap};
