//! Load-time errors
//!
//! The simulation itself has no recoverable failures; everything that can go
//! wrong is caught while turning level data into a [`crate::sim::Level`].

use thiserror::Error;

/// Errors that can occur while loading level data.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level has an empty tile grid")]
    EmptyGrid,

    #[error("row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("tile size {tile_size} must be positive and finite")]
    InvalidTileSize { tile_size: f32 },

    #[error("grid is {width}x{height} but holds {found} tiles")]
    TileCountMismatch {
        width: usize,
        height: usize,
        found: usize,
    },

    #[error("level has no spawn point")]
    MissingSpawn,

    #[error("spawn point ({x}, {y}) lies outside the level")]
    SpawnOutOfBounds { x: f32, y: f32 },

    #[error("{kind} {index}: position ({x}, {y}) lies outside the level")]
    EntityOutOfBounds {
        kind: &'static str,
        index: usize,
        x: f32,
        y: f32,
    },

    #[error("{kind} {index}: speed {speed} must be positive and finite")]
    InvalidSpeed {
        kind: &'static str,
        index: usize,
        speed: f32,
    },

    #[error("{kind} {index}: {field} {value} must be positive and finite")]
    InvalidSize {
        kind: &'static str,
        index: usize,
        field: &'static str,
        value: f32,
    },

    #[error("level pack contains no levels")]
    NoLevels,

    #[error("level {index}: {source}")]
    InLevel {
        index: usize,
        #[source]
        source: Box<LevelError>,
    },

    #[error("invalid level json: {0}")]
    Json(#[from] serde_json::Error),
}
