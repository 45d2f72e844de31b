//! Trigger platforms
//!
//! A platform's hitbox is 1.5x its visible sprite area; the inner area is the
//! surface the player stands on, the outer box is what touch triggers react to.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::BoundingBox;
use super::mover::{Mover, MoverPath};

/// What sets a platform in motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformTrigger {
    /// Player touches the platform
    #[default]
    Touch,
    /// Only an explicit `Level::trigger_platform` call
    Manual,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub hitbox: BoundingBox,
    pub mover: Mover,
    /// Player can stand on it once triggered
    pub solid: bool,
    pub trigger: PlatformTrigger,
    pub sprite_slot: u32,
}

impl Platform {
    pub fn new(
        path: MoverPath,
        width: f32,
        height: f32,
        solid: bool,
        trigger: PlatformTrigger,
        sprite_slot: u32,
    ) -> Self {
        Self {
            hitbox: BoundingBox::new(path.start.x, path.start.y, width, height),
            mover: Mover::new(path),
            solid,
            trigger,
            sprite_slot,
        }
    }

    /// Advance the mover one tick and carry the hitbox; returns the displacement
    pub fn tick(&mut self, now_ms: u64) -> Vec2 {
        self.mover.tick(&mut self.hitbox, now_ms)
    }

    /// Returns true only on the first trigger
    pub fn trigger(&mut self) -> bool {
        self.mover.trigger()
    }

    /// Has the platform started moving?
    pub fn is_triggered(&self) -> bool {
        self.mover.triggered()
    }

    /// Back to the start, untriggered
    pub fn reset(&mut self) {
        self.mover.reset(&mut self.hitbox);
    }

    /// Standable right now
    pub fn is_standable(&self) -> bool {
        self.solid && self.mover.triggered()
    }

    /// Visible sprite area, centred in the hitbox
    pub fn surface(&self) -> BoundingBox {
        let hb = &self.hitbox;
        BoundingBox::new(
            hb.x + hb.width / 6.0,
            hb.y + hb.height / 6.0,
            hb.width * 2.0 / 3.0,
            hb.height * 2.0 / 3.0,
        )
    }

    /// Overlapping or resting against the hitbox
    pub fn touches(&self, other: &BoundingBox) -> bool {
        self.hitbox.inflated(1.0).intersects(other)
    }

    /// Resize the hitbox and move it to (x, y); the path follows so the
    /// travel offset is unchanged
    pub fn resize(&mut self, width: f32, height: f32, x: f32, y: f32) {
        self.hitbox = BoundingBox::new(x, y, width, height);
        self.mover.shift_path(Vec2::new(x, y));
    }
}
