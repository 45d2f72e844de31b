//! Tile collision queries
//!
//! All queries are total: anything outside the grid is solid, so no probe can
//! tunnel past the map edges. Boxes touching a tile boundary do not overlap
//! the tile on the other side of it.

use super::geometry::BoundingBox;
use super::grid::{HAZARD_TILE, LEVEL_END_TILE, TileGrid};

/// Inclusive cell range covered by a span starting at `start` of length `len`
#[inline]
fn cell_span(start: f32, len: f32, tile_size: f32) -> (i64, i64) {
    let first = (start / tile_size).floor() as i64;
    let last = ((start + len) / tile_size).ceil() as i64 - 1;
    (first, last.max(first))
}

/// Can a box of the given size occupy (x, y)?
pub fn can_move_here(grid: &TileGrid, x: f32, y: f32, width: f32, height: f32) -> bool {
    let ts = grid.tile_size();
    let (col0, col1) = cell_span(x, width, ts);
    let (row0, row1) = cell_span(y, height, ts);

    for row in row0..=row1 {
        for col in col0..=col1 {
            if grid.is_solid_cell(col, row) {
                return false;
            }
        }
    }
    true
}

/// Would the box overlap solid ground if it were one unit lower?
pub fn is_on_floor(grid: &TileGrid, hitbox: &BoundingBox) -> bool {
    !can_move_here(grid, hitbox.x, hitbox.y + 1.0, hitbox.width, hitbox.height)
}

/// Probe point just below the middle of the feet
#[inline]
fn feet_probe(hitbox: &BoundingBox) -> (f32, f32) {
    (hitbox.x + hitbox.width / 2.0, hitbox.bottom() + 1.0)
}

/// Feet on a hazard tile, or at/below the bottom of the level
pub fn is_hazard(grid: &TileGrid, hitbox: &BoundingBox) -> bool {
    let (px, py) = feet_probe(hitbox);
    if py >= grid.pixel_height() {
        return true;
    }
    grid.tile_at_point(px, py) == Some(HAZARD_TILE)
}

/// Feet on the level-end marker
pub fn is_on_level_end(grid: &TileGrid, hitbox: &BoundingBox) -> bool {
    let (px, py) = feet_probe(hitbox);
    grid.tile_at_point(px, py) == Some(LEVEL_END_TILE)
}

/// X coordinate that puts the box flush against the wall it would hit
/// moving by `x_speed`
pub fn x_next_to_wall(grid: &TileGrid, hitbox: &BoundingBox, x_speed: f32) -> f32 {
    let ts = grid.tile_size();
    if x_speed > 0.0 {
        ((hitbox.right() + x_speed) / ts).floor() * ts - hitbox.width
    } else if x_speed < 0.0 {
        ((hitbox.x + x_speed) / ts).ceil() * ts
    } else {
        hitbox.x
    }
}

/// Y coordinate that puts the box on the floor (falling) or under the
/// ceiling (rising) it would hit moving by `air_speed`
pub fn y_under_or_above(grid: &TileGrid, hitbox: &BoundingBox, air_speed: f32) -> f32 {
    let ts = grid.tile_size();
    if air_speed > 0.0 {
        ((hitbox.bottom() + air_speed) / ts).floor() * ts - hitbox.height
    } else if air_speed < 0.0 {
        ((hitbox.y + air_speed) / ts).ceil() * ts
    } else {
        hitbox.y
    }
}
