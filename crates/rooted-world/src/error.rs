//! World generation error types.

/// Precondition violations detected while configuring or running world generation.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// Chunk side outside `[MIN_CHUNK_SIZE, MAX_CHUNK_SIZE]`.
    #[error("chunk size must be between 4 and 1024 tiles, got {0}")]
    InvalidChunkSize(i32),

    /// Generation radius outside `[0, MAX_GENERATION_RADIUS]`.
    #[error("generation radius must be between 0 and 64 chunks, got {0}")]
    InvalidRadius(i32),

    /// Water level bounds are negative or inverted.
    #[error("invalid water level range [{min}, {max}]")]
    InvalidWaterRange {
        /// Configured minimum level.
        min: i32,
        /// Configured maximum level.
        max: i32,
    },

    /// A region with no tiles was handed to the region table or water filler.
    #[error("malformed air region: no tiles")]
    EmptyRegion,

    /// The rock asset table has no entries to pick from.
    #[error("rock asset table is empty")]
    EmptyRockTable,

    /// A background classification worker could not be started.
    #[error("failed to spawn chunk worker: {0}")]
    WorkerSpawn(#[source] std::io::Error),
}
