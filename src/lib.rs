//! Rust Runner - simulation core of a tile-based platformer
//!
//! Core modules:
//! - `sim`: Simulation (tile collision, movers, player, levels, orchestration)
//! - `timing`: Fixed-timestep update/render pacing
//! - `settings`: Data-driven tuning
//! - `highscores`: Score records emitted on level completion
//! - `audio`: Sound cues derived from simulation events

pub mod audio;
pub mod error;
pub mod highscores;
pub mod settings;
pub mod sim;
pub mod timing;

pub use error::LevelError;
pub use highscores::{Leaderboard, ScoreRecord};
pub use settings::Settings;

/// Game configuration constants
///
/// These are the defaults [`Settings`] starts from.
pub mod consts {
    /// Edge length of a tile in world units
    pub const TILE_SIZE: f32 = 32.0;

    /// Simulation updates per second
    pub const UPDATES_PER_SECOND: u32 = 200;
    /// Render frames per second
    pub const FRAMES_PER_SECOND: u32 = 120;
    /// Maximum updates drained in one loop check before lag is dropped
    pub const MAX_CATCH_UP: u32 = 8;

    /// Player hitbox
    pub const PLAYER_WIDTH: f32 = 12.0;
    pub const PLAYER_HEIGHT: f32 = 22.0;
    /// Horizontal run speed (units/tick)
    pub const PLAYER_SPEED: f32 = 1.0;
    /// Vertical acceleration added every airborne tick
    pub const GRAVITY: f32 = 0.04;
    /// Air speed set by a jump (negative is up)
    pub const JUMP_SPEED: f32 = -2.5;
    /// Air speed after bumping a ceiling
    pub const FALL_SPEED_AFTER_COLLISION: f32 = 0.5;
    /// Time spent dead before respawning
    pub const RESPAWN_DELAY_MS: u64 = 500;

    /// Pause at each end of a platform's path
    pub const PLATFORM_WAIT_MS: u64 = 1000;
    /// Pause of a returning spike at its target
    pub const SPIKE_WAIT_MS: u64 = 500;

    /// Level transition wipe: scale step per tick and peak value
    pub const TRANSITION_SPEED: f32 = 0.015;
    pub const TRANSITION_CAP: f32 = 2.0;

    /// Longest accepted player name
    pub const MAX_NAME_LEN: usize = 16;
}
