//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module stays pure:
//! - Fixed timestep only, time is passed in by the caller
//! - Stable iteration order (platforms, then spikes, in level order)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod events;
pub mod geometry;
pub mod grid;
pub mod level;
pub mod mover;
pub mod platform;
pub mod player;
pub mod sequence;
pub mod snapshot;
pub mod spike;
pub mod state;
pub mod tick;

#[cfg(test)]
pub(crate) mod test_support;

pub use collision::{
    can_move_here, is_hazard, is_on_floor, is_on_level_end, x_next_to_wall, y_under_or_above,
};
pub use events::{EventSink, GameEvent};
pub use geometry::BoundingBox;
pub use grid::{EMPTY_TILE, HAZARD_TILE, LEVEL_END_TILE, TileGrid, is_solid_tile};
pub use level::{DeathMarker, Level, LevelData, LevelPack, PlatformDef, SpikeDef, TriggerSpikeDef};
pub use mover::{Leg, Mover, MoverPath, MoverPhase};
pub use platform::{Platform, PlatformTrigger};
pub use player::{InputFlags, Lifecycle, Player, PlayerAction, PlayerEdge};
pub use sequence::LevelSequence;
pub use snapshot::{PlayerView, RenderSnapshot, SpriteView};
pub use spike::{Spike, TriggerSpike, trigger_by_proximity};
pub use state::{Control, GameState, Mode, RunStats, Screen, Transition};
pub use tick::tick;
