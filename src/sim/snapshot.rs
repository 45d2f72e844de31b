//! Read-only render projection
//!
//! Everything a draw pass needs, copied out of [`GameState`] so rendering
//! never touches simulation state.

use serde::Serialize;

use super::geometry::BoundingBox;
use super::level::DeathMarker;
use super::player::PlayerAction;
use super::state::{GameState, Mode, Screen};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub hitbox: BoundingBox,
    pub facing_right: bool,
    pub action: PlayerAction,
    pub frame: u32,
}

/// A platform or spike to draw
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpriteView {
    pub hitbox: BoundingBox,
    pub sprite_slot: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub screen: Screen,
    pub level_index: usize,
    /// `None` while dead
    pub player: Option<PlayerView>,
    pub platforms: Vec<SpriteView>,
    /// Static and trigger spikes
    pub spikes: Vec<SpriteView>,
    pub death_markers: Vec<DeathMarker>,
    /// Transition wipe scale, 0 when not transitioning
    pub transition_scale: f32,
    pub paused: bool,
}

impl GameState {
    /// Everything a renderer needs for the current frame
    pub fn snapshot(&self) -> RenderSnapshot {
        let level = self.levels.current();
        let player = self.player.alive_hitbox().map(|hitbox| {
            let animation = self.player.animation();
            PlayerView {
                hitbox: *hitbox,
                facing_right: self.player.facing_right(),
                action: animation.action,
                frame: animation.frame,
            }
        });

        let platforms = level
            .platforms
            .iter()
            .map(|p| SpriteView {
                hitbox: p.hitbox,
                sprite_slot: p.sprite_slot,
            })
            .collect();

        let spikes = level
            .spikes
            .iter()
            .map(|s| SpriteView {
                hitbox: s.hitbox,
                sprite_slot: s.sprite_slot,
            })
            .chain(level.trigger_spikes.iter().map(|s| SpriteView {
                hitbox: s.hitbox,
                sprite_slot: s.sprite_slot,
            }))
            .collect();

        let transition_scale = match self.mode {
            Mode::Transitioning(t) => t.scale,
            Mode::Playing => 0.0,
        };

        RenderSnapshot {
            screen: self.screen,
            level_index: self.levels.current_index(),
            player,
            platforms,
            spikes,
            death_markers: level.death_markers().to_vec(),
            transition_scale,
            paused: self.paused,
        }
    }
}
