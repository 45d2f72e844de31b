//! Spikes
//!
//! Static spikes are plain hazards. Trigger spikes ride a [`Mover`] and start
//! when the player gets close; spikes sharing a group id start together.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::BoundingBox;
use super::mover::{Mover, MoverPath};

/// A stationary hazard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spike {
    pub hitbox: BoundingBox,
    pub sprite_slot: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerSpike {
    pub hitbox: BoundingBox,
    pub mover: Mover,
    /// Centre-to-centre distance at which the player sets it off
    pub trigger_distance: f32,
    pub group: Option<u32>,
    pub sprite_slot: u32,
}

impl TriggerSpike {
    /// `path` positions are hitbox top-left corners
    pub fn new(
        path: MoverPath,
        width: f32,
        height: f32,
        trigger_distance: f32,
        group: Option<u32>,
        sprite_slot: u32,
    ) -> Self {
        Self {
            hitbox: BoundingBox::new(path.start.x, path.start.y, width, height),
            mover: Mover::new(path),
            trigger_distance,
            group,
            sprite_slot,
        }
    }

    /// Advance the mover one tick; returns the displacement
    pub fn tick(&mut self, now_ms: u64) -> Vec2 {
        self.mover.tick(&mut self.hitbox, now_ms)
    }

    /// Has the spike fired?
    pub fn is_triggered(&self) -> bool {
        self.mover.triggered()
    }

    /// Back to the start, armed again
    pub fn reset(&mut self) {
        self.mover.reset(&mut self.hitbox);
    }

    /// Is the player within the trigger distance of the spike's centre?
    pub fn in_range(&self, player: &BoundingBox) -> bool {
        self.hitbox.center_distance(player) <= self.trigger_distance
    }
}

/// Trigger every spike the player is close to, along with the rest of its
/// group. Returns how many spikes were newly triggered.
pub fn trigger_by_proximity(spikes: &mut [TriggerSpike], player: &BoundingBox) -> usize {
    let mut groups: Vec<u32> = Vec::new();
    let mut triggered = 0;

    for spike in spikes.iter_mut() {
        if !spike.in_range(player) {
            continue;
        }
        match spike.group {
            Some(id) => {
                if !groups.contains(&id) {
                    groups.push(id);
                }
            }
            None => {
                if spike.mover.trigger() {
                    triggered += 1;
                }
            }
        }
    }

    if !groups.is_empty() {
        for spike in spikes.iter_mut() {
            if spike.group.is_some_and(|id| groups.contains(&id)) && spike.mover.trigger() {
                triggered += 1;
            }
        }
    }

    triggered
}
