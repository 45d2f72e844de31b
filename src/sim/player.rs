//! Player physics and lifecycle
//!
//! One tick while alive runs, in order: hazard checks, level-end probe,
//! horizontal move, vertical move (jump, gravity, landing, platform riding),
//! then animation bookkeeping. Death is an explicit lifecycle state; the
//! hitbox stays where the player died until the respawn.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{
    can_move_here, is_hazard, is_on_floor, is_on_level_end, x_next_to_wall, y_under_or_above,
};
use super::geometry::BoundingBox;
use super::level::Level;
use crate::settings::{AnimationTuning, PhysicsTuning};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifecycle {
    Alive,
    Dead { since_ms: u64 },
}

/// Lifecycle edges reported by [`Player::update`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlayerEdge {
    /// Died this tick at the given hitbox position
    Died { at: Vec2 },
    Respawned,
    Jumped,
}

/// Held controls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFlags {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAction {
    #[default]
    Idle,
    Running,
    Jumping,
}

/// Sprite animation cursor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animation {
    pub action: PlayerAction,
    pub frame: u32,
    ticks: u32,
}

impl Animation {
    fn advance(&mut self, action: PlayerAction, tuning: &AnimationTuning) {
        if action != self.action {
            *self = Animation {
                action,
                ..Default::default()
            };
            return;
        }
        self.ticks += 1;
        if self.ticks >= tuning.ticks_per_frame {
            self.ticks = 0;
            let frames = match action {
                PlayerAction::Idle => tuning.idle_frames,
                PlayerAction::Running => tuning.running_frames,
                PlayerAction::Jumping => tuning.jumping_frames,
            };
            self.frame = (self.frame + 1) % frames.max(1);
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub hitbox: BoundingBox,
    pub input: InputFlags,
    spawn: Vec2,
    /// Vertical speed, positive is down
    air_speed: f32,
    in_air: bool,
    lifecycle: Lifecycle,
    /// Sticky until the orchestrator clears it
    reached_level_end: bool,
    /// Deaths in the current level
    death_count: u32,
    facing_right: bool,
    moving: bool,
    animation: Animation,
    physics: PhysicsTuning,
}

impl Player {
    /// Player standing at `spawn`, alive and idle
    pub fn new(spawn: Vec2, physics: &PhysicsTuning) -> Self {
        Self {
            hitbox: BoundingBox::new(
                spawn.x,
                spawn.y,
                physics.player_width,
                physics.player_height,
            ),
            input: InputFlags::default(),
            spawn,
            air_speed: 0.0,
            in_air: true,
            lifecycle: Lifecycle::Alive,
            reached_level_end: false,
            death_count: 0,
            facing_right: true,
            moving: false,
            animation: Animation::default(),
            physics: physics.clone(),
        }
    }

    /// Alive, or dead since a given time
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// True unless waiting to respawn
    pub fn is_alive(&self) -> bool {
        self.lifecycle == Lifecycle::Alive
    }

    /// Hitbox for trigger checks; `None` while dead
    pub fn alive_hitbox(&self) -> Option<&BoundingBox> {
        self.is_alive().then_some(&self.hitbox)
    }

    /// Where the player respawns
    pub fn spawn(&self) -> Vec2 {
        self.spawn
    }

    /// Vertical speed, positive is down
    pub fn air_speed(&self) -> f32 {
        self.air_speed
    }

    /// True while jumping or falling
    pub fn in_air(&self) -> bool {
        self.in_air
    }

    /// Feet touched an exit tile since the flag was last cleared
    pub fn reached_level_end(&self) -> bool {
        self.reached_level_end
    }

    /// Drop the level-end flag once it has been handled
    pub fn clear_level_end(&mut self) {
        self.reached_level_end = false;
    }

    /// Deaths in the current level
    pub fn death_count(&self) -> u32 {
        self.death_count
    }

    /// Start counting deaths from zero
    pub fn reset_death_count(&mut self) {
        self.death_count = 0;
    }

    /// Sprite facing
    pub fn facing_right(&self) -> bool {
        self.facing_right
    }

    /// Current animation cursor
    pub fn animation(&self) -> Animation {
        self.animation
    }

    /// Release left/right (focus loss, menus)
    pub fn reset_dir_flags(&mut self) {
        self.input.left = false;
        self.input.right = false;
    }

    /// Place the player at a level's spawn point, alive
    pub fn spawn_at_level_start(&mut self, level: &Level) {
        self.spawn = level.spawn();
        self.respawn(level);
    }

    /// Advance one tick. Returns the lifecycle or jump edge it produced, if any.
    pub fn update(
        &mut self,
        level: &Level,
        now_ms: u64,
        animation: &AnimationTuning,
    ) -> Option<PlayerEdge> {
        if let Lifecycle::Dead { since_ms } = self.lifecycle {
            if now_ms.saturating_sub(since_ms) >= self.physics.respawn_delay_ms {
                self.respawn(level);
                return Some(PlayerEdge::Respawned);
            }
            return None;
        }

        let grid = level.grid();
        if is_hazard(grid, &self.hitbox)
            || level.hits_spike(&self.hitbox)
            || level.hits_trigger_spike(&self.hitbox)
        {
            let at = self.hitbox.position();
            self.die(now_ms);
            return Some(PlayerEdge::Died { at });
        }

        if is_on_level_end(grid, &self.hitbox) {
            self.reached_level_end = true;
        }

        self.update_horizontal(level);
        let jumped = self.update_vertical(level);

        let action = if self.in_air {
            PlayerAction::Jumping
        } else if self.moving {
            PlayerAction::Running
        } else {
            PlayerAction::Idle
        };
        self.animation.advance(action, animation);

        jumped.then_some(PlayerEdge::Jumped)
    }

    fn update_horizontal(&mut self, level: &Level) {
        let mut dx = 0.0;
        if self.input.left {
            dx -= self.physics.run_speed;
        }
        if self.input.right {
            dx += self.physics.run_speed;
        }

        self.moving = dx != 0.0;
        if dx == 0.0 {
            return;
        }
        self.facing_right = dx > 0.0;

        let hb = self.hitbox;
        if can_move_here(level.grid(), hb.x + dx, hb.y, hb.width, hb.height) {
            self.hitbox.x += dx;
        } else {
            self.hitbox.x = x_next_to_wall(level.grid(), &hb, dx);
        }
    }

    /// Returns true if a jump started this tick
    fn update_vertical(&mut self, level: &Level) -> bool {
        let grid = level.grid();
        let mut jumped = false;

        if self.input.jump && !self.in_air {
            self.air_speed = self.physics.jump_speed;
            self.in_air = true;
            jumped = true;
        }

        if !self.in_air {
            if is_on_floor(grid, &self.hitbox) {
                return jumped;
            }
            if let Some((top, delta)) = level.supporting_platform(&self.hitbox) {
                self.ride_platform(level, top, delta);
                return jumped;
            }
            // Walked off a ledge or the platform left
            self.in_air = true;
        }

        let hb = self.hitbox;
        let next_y = hb.y + self.air_speed;
        if can_move_here(grid, hb.x, next_y, hb.width, hb.height) {
            let descending = self.air_speed >= 0.0;
            self.hitbox.y = next_y;
            self.air_speed += self.physics.gravity;

            if descending {
                if let Some(top) = level.solid_platform_landing(&self.hitbox, hb.bottom()) {
                    self.hitbox.y = top - hb.height;
                    self.land();
                }
            }
        } else {
            self.hitbox.y = y_under_or_above(grid, &hb, self.air_speed);
            if self.air_speed > 0.0 {
                self.land();
            } else {
                self.air_speed = self.physics.fall_speed_after_collision;
            }
        }

        jumped
    }

    fn ride_platform(&mut self, level: &Level, top: f32, delta: Vec2) {
        let grid = level.grid();
        let hb = self.hitbox;
        let y = top - hb.height;
        if can_move_here(grid, hb.x, y, hb.width, hb.height) {
            self.hitbox.y = y;
        }
        if delta.x != 0.0
            && can_move_here(grid, hb.x + delta.x, self.hitbox.y, hb.width, hb.height)
        {
            self.hitbox.x += delta.x;
        }
    }

    fn land(&mut self) {
        self.air_speed = 0.0;
        self.in_air = false;
    }

    fn die(&mut self, now_ms: u64) {
        self.death_count += 1;
        self.lifecycle = Lifecycle::Dead { since_ms: now_ms };
        self.input = InputFlags::default();
        self.air_speed = 0.0;
        self.in_air = false;
        self.moving = false;
        log::debug!(
            "Player died at ({}, {}), {} deaths this level",
            self.hitbox.x,
            self.hitbox.y,
            self.death_count
        );
    }

    fn respawn(&mut self, level: &Level) {
        self.lifecycle = Lifecycle::Alive;
        self.hitbox.set_position(self.spawn);
        self.input = InputFlags::default();
        self.air_speed = 0.0;
        self.in_air = !is_on_floor(level.grid(), &self.hitbox);
        self.moving = false;
        self.animation = Animation::default();
        log::debug!("Player respawned at ({}, {})", self.spawn.x, self.spawn.y);
    }
}
