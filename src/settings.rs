//! Game tuning
//!
//! Every physics and timing constant the simulation reads comes from here, so
//! a level pack can ship its own balance. Missing fields fall back to
//! [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Player physics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    pub tile_size: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub run_speed: f32,
    pub gravity: f32,
    pub jump_speed: f32,
    pub fall_speed_after_collision: f32,
    pub respawn_delay_ms: u64,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            run_speed: PLAYER_SPEED,
            gravity: GRAVITY,
            jump_speed: JUMP_SPEED,
            fall_speed_after_collision: FALL_SPEED_AFTER_COLLISION,
            respawn_delay_ms: RESPAWN_DELAY_MS,
        }
    }
}

/// Update/render pacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingTuning {
    pub updates_per_second: u32,
    pub frames_per_second: u32,
    pub max_catch_up: u32,
}

impl Default for TimingTuning {
    fn default() -> Self {
        Self {
            updates_per_second: UPDATES_PER_SECOND,
            frames_per_second: FRAMES_PER_SECOND,
            max_catch_up: MAX_CATCH_UP,
        }
    }
}

/// Default wait durations for movers that don't set their own
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoverTuning {
    pub platform_wait_ms: u64,
    pub spike_wait_ms: u64,
}

impl Default for MoverTuning {
    fn default() -> Self {
        Self {
            platform_wait_ms: PLATFORM_WAIT_MS,
            spike_wait_ms: SPIKE_WAIT_MS,
        }
    }
}

/// Level transition wipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionTuning {
    pub speed: f32,
    pub cap: f32,
}

impl Default for TransitionTuning {
    fn default() -> Self {
        Self {
            speed: TRANSITION_SPEED,
            cap: TRANSITION_CAP,
        }
    }
}

/// Animation frame counts and pacing (cosmetic only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationTuning {
    /// Ticks each frame stays on screen
    pub ticks_per_frame: u32,
    pub idle_frames: u32,
    pub running_frames: u32,
    pub jumping_frames: u32,
}

impl Default for AnimationTuning {
    fn default() -> Self {
        Self {
            ticks_per_frame: 15,
            idle_frames: 5,
            running_frames: 6,
            jumping_frames: 3,
        }
    }
}

/// All tuning in one place
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub physics: PhysicsTuning,
    pub timing: TimingTuning,
    pub movers: MoverTuning,
    pub transition: TransitionTuning,
    pub animation: AnimationTuning,
}

impl Settings {
    /// Parse settings from JSON; absent sections and fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let settings: Self = serde_json::from_str(json)?;
        log::info!(
            "Loaded settings ({} UPS, tile size {})",
            settings.timing.updates_per_second,
            settings.physics.tile_size
        );
        Ok(settings)
    }

    /// Serialize every section, pretty-printed
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Fixed simulation step in seconds
    pub fn sim_dt(&self) -> f64 {
        1.0 / self.timing.updates_per_second.max(1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let settings = Settings::default();
        assert_eq!(settings.physics.gravity, GRAVITY);
        assert_eq!(settings.physics.jump_speed, JUMP_SPEED);
        assert_eq!(settings.timing.updates_per_second, 200);
        assert_eq!(settings.movers.platform_wait_ms, 1000);
        assert_eq!(settings.movers.spike_wait_ms, 500);
        assert_eq!(settings.transition.cap, 2.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings =
            Settings::from_json(r#"{ "physics": { "gravity": 0.08 }, "timing": {} }"#).unwrap();
        assert_eq!(settings.physics.gravity, 0.08);
        assert_eq!(settings.physics.jump_speed, JUMP_SPEED);
        assert_eq!(settings.timing, TimingTuning::default());
        assert_eq!(settings.movers, MoverTuning::default());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Settings::from_json(r#"{ "physics": { "gravity": "heavy" } }"#).is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = Settings::default();
        settings.transition.speed = 0.05;
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_sim_dt() {
        let settings = Settings::default();
        assert!((settings.sim_dt() - 0.005).abs() < 1e-12);
    }
}
