//! Builders shared by the simulation tests

use glam::Vec2;

use super::grid::{HAZARD_TILE, LEVEL_END_TILE, TileGrid};
use super::level::LevelData;
use crate::consts::TILE_SIZE;

/// `#` solid, `.` empty, `L` hazard, `E` level end
pub fn rows_from_ascii(rows: &[&str]) -> Vec<Vec<i32>> {
    rows.iter()
        .map(|row| {
            row.chars()
                .map(|c| match c {
                    '#' => 1,
                    'L' => HAZARD_TILE,
                    'E' => LEVEL_END_TILE,
                    _ => 0,
                })
                .collect()
        })
        .collect()
}

pub fn grid_from_ascii(rows: &[&str]) -> TileGrid {
    TileGrid::from_rows(&rows_from_ascii(rows), TILE_SIZE).unwrap()
}

pub fn level_data_from_ascii(rows: &[&str], spawn: Vec2) -> LevelData {
    LevelData {
        name: None,
        tiles: rows_from_ascii(rows),
        spawn: Some(spawn),
        ..Default::default()
    }
}
