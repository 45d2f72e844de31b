//! Trigger / seek / wait / return state machine shared by platforms and spikes
//!
//! A mover drives the top-left corner of its owner's hitbox between a start
//! and a target point. Waits are wall-clock deadlines so they don't depend on
//! the update rate.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::BoundingBox;

/// Which end a mover is heading for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Leg {
    ToTarget,
    ToStart,
}

impl Leg {
    /// The opposite leg
    pub fn reversed(self) -> Self {
        match self {
            Leg::ToTarget => Leg::ToStart,
            Leg::ToStart => Leg::ToTarget,
        }
    }
}

/// Current phase of a mover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoverPhase {
    /// Not triggered yet
    Idle,
    /// Heading for one end
    Moving(Leg),
    /// Parked at an end until the wait elapses
    Waiting { since_ms: u64, next: Leg },
    /// Done for good (until reset)
    Finished { at: Leg },
}

/// Path and timing of a mover
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoverPath {
    pub start: Vec2,
    pub target: Vec2,
    /// Units per tick
    pub speed: f32,
    /// Come back to `start` after a pause at `target`
    pub should_return: bool,
    /// Shuttle between both ends forever; starts on its own
    pub looping: bool,
    pub wait_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mover {
    path: MoverPath,
    phase: MoverPhase,
    /// Displacement applied on the most recent tick
    last_delta: Vec2,
    /// Times an end was reached since the last reset
    arrivals: u32,
}

impl Mover {
    /// Idle mover parked at the start of `path`
    pub fn new(path: MoverPath) -> Self {
        Self {
            path,
            phase: MoverPhase::Idle,
            last_delta: Vec2::ZERO,
            arrivals: 0,
        }
    }

    /// Configured path and timing
    pub fn path(&self) -> &MoverPath {
        &self.path
    }

    /// Current phase of the move cycle
    pub fn phase(&self) -> MoverPhase {
        self.phase
    }

    /// Displacement applied on the most recent tick
    pub fn last_delta(&self) -> Vec2 {
        self.last_delta
    }

    /// Ends reached since the last reset
    pub fn arrivals(&self) -> u32 {
        self.arrivals
    }

    /// Has the mover left its idle state?
    pub fn triggered(&self) -> bool {
        self.phase != MoverPhase::Idle
    }

    /// Parked for good at the end of its path
    pub fn reached_target(&self) -> bool {
        matches!(self.phase, MoverPhase::Finished { .. })
    }

    /// Pausing before the next leg
    pub fn waiting_at_target(&self) -> bool {
        matches!(self.phase, MoverPhase::Waiting { .. })
    }

    /// Direction flag: true while the current (or next, when parked) leg
    /// heads for the target
    pub fn moving_to_target(&self) -> bool {
        match self.phase {
            MoverPhase::Idle => true,
            MoverPhase::Moving(leg) => leg == Leg::ToTarget,
            MoverPhase::Waiting { next, .. } => next == Leg::ToTarget,
            MoverPhase::Finished { at } => at == Leg::ToTarget,
        }
    }

    /// Start moving. Only the first call has an effect; returns whether it did.
    pub fn trigger(&mut self) -> bool {
        if self.phase != MoverPhase::Idle {
            return false;
        }
        self.phase = MoverPhase::Moving(Leg::ToTarget);
        true
    }

    /// Back to the start point, untriggered
    pub fn reset(&mut self, hitbox: &mut BoundingBox) {
        hitbox.set_position(self.path.start);
        self.phase = MoverPhase::Idle;
        self.last_delta = Vec2::ZERO;
        self.arrivals = 0;
    }

    /// Re-anchor the path at a new start, keeping the start-to-target offset
    pub fn shift_path(&mut self, new_start: Vec2) {
        let offset = new_start - self.path.start;
        self.path.start = new_start;
        self.path.target += offset;
    }

    fn destination(&self, leg: Leg) -> Vec2 {
        match leg {
            Leg::ToTarget => self.path.target,
            Leg::ToStart => self.path.start,
        }
    }

    /// Advance one tick, moving `hitbox`. Returns the displacement applied.
    pub fn tick(&mut self, hitbox: &mut BoundingBox, now_ms: u64) -> Vec2 {
        self.last_delta = Vec2::ZERO;

        if self.path.looping && self.phase == MoverPhase::Idle {
            self.phase = MoverPhase::Moving(Leg::ToTarget);
        }

        match self.phase {
            MoverPhase::Idle | MoverPhase::Finished { .. } => {}
            MoverPhase::Waiting { since_ms, next } => {
                if now_ms.saturating_sub(since_ms) >= self.path.wait_ms {
                    self.phase = MoverPhase::Moving(next);
                }
            }
            MoverPhase::Moving(leg) => {
                let pos = hitbox.position();
                let dest = self.destination(leg);
                let dir = dest - pos;
                let distance = dir.length();

                if distance <= self.path.speed {
                    // Snap so we never overshoot
                    hitbox.set_position(dest);
                    self.last_delta = dest - pos;
                    self.arrive(leg, now_ms);
                } else {
                    let step = dir / distance * self.path.speed;
                    hitbox.translate(step);
                    self.last_delta = step;
                }
            }
        }

        self.last_delta
    }

    fn arrive(&mut self, leg: Leg, now_ms: u64) {
        self.arrivals += 1;
        self.phase = if self.path.looping {
            MoverPhase::Waiting {
                since_ms: now_ms,
                next: leg.reversed(),
            }
        } else if self.path.should_return && leg == Leg::ToTarget {
            MoverPhase::Waiting {
                since_ms: now_ms,
                next: Leg::ToStart,
            }
        } else {
            MoverPhase::Finished { at: leg }
        };
    }
}
