//! Tile grid
//!
//! Immutable per level. Tile id `0` is empty, [`HAZARD_TILE`] and
//! [`LEVEL_END_TILE`] are passable markers, everything else is solid.

use serde::{Deserialize, Serialize};

use crate::error::LevelError;

pub const EMPTY_TILE: i32 = 0;
/// Lava/pit marker: passable, kills on contact with the feet
pub const HAZARD_TILE: i32 = 48;
/// Exit marker: passable, finishes the level
pub const LEVEL_END_TILE: i32 = 49;

/// Classify a tile id for movement
#[inline]
pub fn is_solid_tile(id: i32) -> bool {
    !matches!(id, EMPTY_TILE | HAZARD_TILE | LEVEL_END_TILE)
}

/// 2D grid of tile ids, row-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridData")]
pub struct TileGrid {
    width: usize,
    height: usize,
    tile_size: f32,
    tiles: Vec<i32>,
}

/// Serialized grid, checked before it becomes a [`TileGrid`]
#[derive(Deserialize)]
struct GridData {
    width: usize,
    height: usize,
    tile_size: f32,
    tiles: Vec<i32>,
}

impl TryFrom<GridData> for TileGrid {
    type Error = LevelError;

    fn try_from(data: GridData) -> Result<Self, LevelError> {
        check_tile_size(data.tile_size)?;
        if data.width == 0 || data.height == 0 {
            return Err(LevelError::EmptyGrid);
        }
        let expected = data.width.checked_mul(data.height);
        if expected != Some(data.tiles.len()) {
            return Err(LevelError::TileCountMismatch {
                width: data.width,
                height: data.height,
                found: data.tiles.len(),
            });
        }
        Ok(Self {
            width: data.width,
            height: data.height,
            tile_size: data.tile_size,
            tiles: data.tiles,
        })
    }
}

fn check_tile_size(tile_size: f32) -> Result<(), LevelError> {
    if tile_size.is_finite() && tile_size > 0.0 {
        Ok(())
    } else {
        Err(LevelError::InvalidTileSize { tile_size })
    }
}

impl TileGrid {
    /// Build a grid from rows of tile ids (first row is the top of the level)
    pub fn from_rows(rows: &[Vec<i32>], tile_size: f32) -> Result<Self, LevelError> {
        check_tile_size(tile_size)?;
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(LevelError::EmptyGrid);
        }

        let mut tiles = Vec::with_capacity(width * height);
        for (row, ids) in rows.iter().enumerate() {
            if ids.len() != width {
                return Err(LevelError::RaggedRow {
                    row,
                    expected: width,
                    found: ids.len(),
                });
            }
            tiles.extend_from_slice(ids);
        }

        Ok(Self {
            width,
            height,
            tile_size,
            tiles,
        })
    }

    /// Width in tiles
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in tiles
    pub fn height(&self) -> usize {
        self.height
    }

    /// Side of one square tile in world units
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Width in world units
    pub fn pixel_width(&self) -> f32 {
        self.width as f32 * self.tile_size
    }

    /// Height in world units
    pub fn pixel_height(&self) -> f32 {
        self.height as f32 * self.tile_size
    }

    /// Tile id at a cell, `None` outside the grid
    pub fn tile(&self, col: i64, row: i64) -> Option<i32> {
        if col < 0 || row < 0 || col >= self.width as i64 || row >= self.height as i64 {
            return None;
        }
        Some(self.tiles[row as usize * self.width + col as usize])
    }

    /// Cells outside the grid count as solid
    pub fn is_solid_cell(&self, col: i64, row: i64) -> bool {
        self.tile(col, row).is_none_or(is_solid_tile)
    }

    /// Tile id under a world-space point
    pub fn tile_at_point(&self, x: f32, y: f32) -> Option<i32> {
        let col = (x / self.tile_size).floor() as i64;
        let row = (y / self.tile_size).floor() as i64;
        self.tile(col, row)
    }

    /// True if the point lies inside the grid's world-space rectangle
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= 0.0 && y >= 0.0 && x <= self.pixel_width() && y <= self.pixel_height()
    }
}
