//! Level data and the per-level aggregate
//!
//! [`LevelData`] is the serde shape produced by an external loader.
//! [`Level::load`] validates it and builds the runtime [`Level`]: tile grid,
//! spawn point, platforms, spikes and death markers.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use super::geometry::BoundingBox;
use super::grid::TileGrid;
use super::mover::MoverPath;
use super::platform::{Platform, PlatformTrigger};
use super::spike::{Spike, TriggerSpike, trigger_by_proximity};
use crate::error::LevelError;
use crate::settings::Settings;

/// Tolerance for the "was above the surface last tick" landing test
const LANDING_EPSILON: f32 = 0.01;

fn default_true() -> bool {
    true
}

/// A moving platform definition. Positions are hitbox top-left corners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformDef {
    pub start: Vec2,
    pub target: Vec2,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    #[serde(default)]
    pub should_return: bool,
    #[serde(default)]
    pub looping: bool,
    #[serde(default = "default_true")]
    pub solid: bool,
    #[serde(default)]
    pub trigger: PlatformTrigger,
    /// Overrides the default platform wait
    #[serde(default)]
    pub wait_ms: Option<u64>,
    #[serde(default)]
    pub sprite_slot: u32,
}

/// A static spike occupying one tile. The collision box is centred in the
/// tile and defaults to the full tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpikeDef {
    /// Top-left of the tile
    pub position: Vec2,
    #[serde(default)]
    pub collision_width: Option<f32>,
    #[serde(default)]
    pub collision_height: Option<f32>,
    #[serde(default)]
    pub sprite_slot: u32,
}

/// A spike that thrusts from `position` to `target` when the player is near
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerSpikeDef {
    pub position: Vec2,
    pub target: Vec2,
    #[serde(default)]
    pub collision_width: Option<f32>,
    #[serde(default)]
    pub collision_height: Option<f32>,
    pub speed: f32,
    pub trigger_distance: f32,
    #[serde(default)]
    pub should_return: bool,
    #[serde(default)]
    pub group: Option<u32>,
    #[serde(default)]
    pub wait_ms: Option<u64>,
    #[serde(default)]
    pub sprite_slot: u32,
}

/// Raw level description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelData {
    pub name: Option<String>,
    /// Rows of tile ids, top row first
    pub tiles: Vec<Vec<i32>>,
    /// Player hitbox top-left at level start
    pub spawn: Option<Vec2>,
    pub platforms: Vec<PlatformDef>,
    pub spikes: Vec<SpikeDef>,
    pub trigger_spikes: Vec<TriggerSpikeDef>,
}

/// An ordered list of levels
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelPack {
    pub levels: Vec<LevelData>,
}

/// Where the player died, for rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeathMarker {
    pub position: Vec2,
}

/// Runtime level, built only by [`Level::load`]
#[derive(Debug, Clone, Serialize)]
pub struct Level {
    name: Option<String>,
    grid: TileGrid,
    spawn: Vec2,
    pub platforms: Vec<Platform>,
    pub spikes: Vec<Spike>,
    pub trigger_spikes: Vec<TriggerSpike>,
    death_markers: Vec<DeathMarker>,
}

fn check_point(
    grid: &TileGrid,
    kind: &'static str,
    index: usize,
    p: Vec2,
) -> Result<(), LevelError> {
    if p.is_finite() && grid.contains_point(p.x, p.y) {
        Ok(())
    } else {
        Err(LevelError::EntityOutOfBounds {
            kind,
            index,
            x: p.x,
            y: p.y,
        })
    }
}

fn check_speed(kind: &'static str, index: usize, speed: f32) -> Result<(), LevelError> {
    if speed.is_finite() && speed > 0.0 {
        Ok(())
    } else {
        Err(LevelError::InvalidSpeed { kind, index, speed })
    }
}

fn check_size(
    kind: &'static str,
    index: usize,
    field: &'static str,
    value: f32,
) -> Result<(), LevelError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LevelError::InvalidSize {
            kind,
            index,
            field,
            value,
        })
    }
}

/// Collision box of a spike, defaulting to the full tile
fn spike_box_size(
    kind: &'static str,
    index: usize,
    width: Option<f32>,
    height: Option<f32>,
    tile_size: f32,
) -> Result<(f32, f32), LevelError> {
    let w = width.unwrap_or(tile_size);
    let h = height.unwrap_or(tile_size);
    check_size(kind, index, "collision width", w)?;
    check_size(kind, index, "collision height", h)?;
    Ok((w, h))
}

/// Offset that centres a `w` x `h` box inside a tile
fn centred_in_tile(tile_size: f32, w: f32, h: f32) -> Vec2 {
    Vec2::new((tile_size - w) / 2.0, (tile_size - h) / 2.0)
}

impl Level {
    /// Validate level data and build the runtime level
    pub fn load(data: &LevelData, settings: &Settings) -> Result<Self, LevelError> {
        let grid = TileGrid::from_rows(&data.tiles, settings.physics.tile_size)?;
        let ts = grid.tile_size();

        let spawn = data.spawn.ok_or(LevelError::MissingSpawn)?;
        if !spawn.is_finite() || !grid.contains_point(spawn.x, spawn.y) {
            return Err(LevelError::SpawnOutOfBounds {
                x: spawn.x,
                y: spawn.y,
            });
        }

        let mut platforms = Vec::with_capacity(data.platforms.len());
        for (i, def) in data.platforms.iter().enumerate() {
            check_point(&grid, "platform", i, def.start)?;
            check_point(&grid, "platform", i, def.target)?;
            check_speed("platform", i, def.speed)?;
            check_size("platform", i, "width", def.width)?;
            check_size("platform", i, "height", def.height)?;
            let path = MoverPath {
                start: def.start,
                target: def.target,
                speed: def.speed,
                should_return: def.should_return,
                looping: def.looping,
                wait_ms: def.wait_ms.unwrap_or(settings.movers.platform_wait_ms),
            };
            platforms.push(Platform::new(
                path,
                def.width,
                def.height,
                def.solid,
                def.trigger,
                def.sprite_slot,
            ));
        }

        let mut spikes = Vec::with_capacity(data.spikes.len());
        for (i, def) in data.spikes.iter().enumerate() {
            check_point(&grid, "spike", i, def.position)?;
            let (w, h) =
                spike_box_size("spike", i, def.collision_width, def.collision_height, ts)?;
            let pos = def.position + centred_in_tile(ts, w, h);
            spikes.push(Spike {
                hitbox: BoundingBox::new(pos.x, pos.y, w, h),
                sprite_slot: def.sprite_slot,
            });
        }

        let mut trigger_spikes = Vec::with_capacity(data.trigger_spikes.len());
        for (i, def) in data.trigger_spikes.iter().enumerate() {
            check_point(&grid, "trigger spike", i, def.position)?;
            check_point(&grid, "trigger spike", i, def.target)?;
            check_speed("trigger spike", i, def.speed)?;
            check_size("trigger spike", i, "trigger distance", def.trigger_distance)?;
            let (w, h) = spike_box_size(
                "trigger spike",
                i,
                def.collision_width,
                def.collision_height,
                ts,
            )?;
            let offset = centred_in_tile(ts, w, h);
            let path = MoverPath {
                start: def.position + offset,
                target: def.target + offset,
                speed: def.speed,
                should_return: def.should_return,
                looping: false,
                wait_ms: def.wait_ms.unwrap_or(settings.movers.spike_wait_ms),
            };
            trigger_spikes.push(TriggerSpike::new(
                path,
                w,
                h,
                def.trigger_distance,
                def.group,
                def.sprite_slot,
            ));
        }

        log::info!(
            "Loaded level {:?}: {}x{} tiles, {} platforms, {} spikes, {} trigger spikes",
            data.name.as_deref().unwrap_or("unnamed"),
            grid.width(),
            grid.height(),
            platforms.len(),
            spikes.len(),
            trigger_spikes.len()
        );

        Ok(Self {
            name: data.name.clone(),
            grid,
            spawn,
            platforms,
            spikes,
            trigger_spikes,
            death_markers: Vec::new(),
        })
    }

    /// Parse a single level's JSON and load it
    pub fn from_json(json: &str, settings: &Settings) -> Result<Self, LevelError> {
        let data: LevelData = serde_json::from_str(json)?;
        Self::load(&data, settings)
    }

    /// Display name, if the level data gave one
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Tile grid of the level
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Player hitbox top-left at level start
    pub fn spawn(&self) -> Vec2 {
        self.spawn
    }

    /// Advance every mover one tick: platforms first, then spikes.
    ///
    /// `player` is the live player hitbox (`None` while dead); it drives touch
    /// and proximity triggers.
    pub fn tick(&mut self, player: Option<&BoundingBox>, now_ms: u64, events: &mut Vec<GameEvent>) {
        for (index, platform) in self.platforms.iter_mut().enumerate() {
            if let Some(player) = player {
                if platform.trigger == PlatformTrigger::Touch
                    && platform.touches(player)
                    && platform.trigger()
                {
                    log::debug!("Platform {index} triggered by touch");
                    events.push(GameEvent::PlatformTriggered { index });
                }
            }
            platform.tick(now_ms);
        }

        if let Some(player) = player {
            let fired = trigger_by_proximity(&mut self.trigger_spikes, player);
            if fired > 0 {
                log::debug!("{fired} trigger spikes fired");
            }
        }
        for spike in &mut self.trigger_spikes {
            spike.tick(now_ms);
        }
    }

    /// Trigger a platform from outside (switches, scripts). Returns true if
    /// it was newly triggered.
    pub fn trigger_platform(&mut self, index: usize) -> bool {
        self.platforms
            .get_mut(index)
            .is_some_and(|platform| platform.trigger())
    }

    /// Does the hitbox overlap any static spike?
    pub fn hits_spike(&self, hitbox: &BoundingBox) -> bool {
        self.spikes.iter().any(|s| s.hitbox.intersects(hitbox))
    }

    /// Does the hitbox overlap any trigger spike, wherever it is on its path?
    pub fn hits_trigger_spike(&self, hitbox: &BoundingBox) -> bool {
        self.trigger_spikes.iter().any(|s| s.hitbox.intersects(hitbox))
    }

    /// Surface top of a standable platform the falling `hitbox` has just
    /// crossed, given where its feet were before this tick's move. Each
    /// platform's own displacement this tick is taken into account.
    pub fn solid_platform_landing(&self, hitbox: &BoundingBox, prev_bottom: f32) -> Option<f32> {
        self.platforms
            .iter()
            .filter(|p| p.is_standable())
            .filter_map(|p| {
                let surface = p.surface();
                let prev_top = surface.y - p.mover.last_delta().y;
                let crossed = prev_bottom <= prev_top + LANDING_EPSILON
                    && hitbox.bottom() >= surface.y;
                (surface.overlaps_horizontally(hitbox) && crossed).then_some(surface.y)
            })
            .min_by(f32::total_cmp)
    }

    /// Standable platform under a grounded `hitbox`: its surface top and its
    /// displacement this tick
    pub fn supporting_platform(&self, hitbox: &BoundingBox) -> Option<(f32, Vec2)> {
        self.platforms
            .iter()
            .filter(|p| p.is_standable())
            .filter_map(|p| {
                let surface = p.surface();
                let delta = p.mover.last_delta();
                let gap = (hitbox.bottom() - surface.y).abs();
                (surface.overlaps_horizontally(hitbox) && gap <= delta.y.abs() + 1.0)
                    .then_some((gap, surface.y, delta))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, top, delta)| (top, delta))
    }

    /// Leave a marker where the player died
    pub fn record_death(&mut self, position: Vec2) {
        self.death_markers.push(DeathMarker { position });
    }

    /// Markers left since the level was last entered
    pub fn death_markers(&self) -> &[DeathMarker] {
        &self.death_markers
    }

    /// Remove every death marker
    pub fn clear_death_markers(&mut self) {
        self.death_markers.clear();
    }

    /// Every platform and spike back to its start, untriggered
    pub fn reset_movers(&mut self) {
        for platform in &mut self.platforms {
            platform.reset();
        }
        for spike in &mut self.trigger_spikes {
            spike.reset();
        }
    }

    /// Fresh state for (re-)entering the level
    pub fn reset(&mut self) {
        self.clear_death_markers();
        self.reset_movers();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::test_support::level_data_from_ascii;

    fn data() -> LevelData {
        level_data_from_ascii(
            &[
                "##########", //
                "#........#", //
                "#........#", //
                "#........#", //
                "##########", //
            ],
            Vec2::new(40.0, 106.0),
        )
    }

    fn platform_def(start: Vec2, target: Vec2) -> PlatformDef {
        PlatformDef {
            start,
            target,
            width: 48.0,
            height: 24.0,
            speed: 2.0,
            should_return: false,
            looping: false,
            solid: true,
            trigger: PlatformTrigger::Touch,
            wait_ms: None,
            sprite_slot: 0,
        }
    }

    #[test]
    fn test_load_rejects_bad_spawn() {
        let settings = Settings::default();
        let mut d = data();
        d.spawn = None;
        assert!(matches!(
            Level::load(&d, &settings),
            Err(LevelError::MissingSpawn)
        ));
        d.spawn = Some(Vec2::new(-10.0, 40.0));
        assert!(matches!(
            Level::load(&d, &settings),
            Err(LevelError::SpawnOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_load_rejects_bad_movers() {
        let settings = Settings::default();
        let mut d = data();
        d.platforms
            .push(platform_def(Vec2::new(64.0, 64.0), Vec2::new(5000.0, 64.0)));
        assert!(matches!(
            Level::load(&d, &settings),
            Err(LevelError::EntityOutOfBounds {
                kind: "platform",
                index: 0,
                ..
            })
        ));

        let mut d = data();
        let mut def = platform_def(Vec2::new(64.0, 64.0), Vec2::new(96.0, 64.0));
        def.speed = 0.0;
        d.platforms.push(def);
        assert!(matches!(
            Level::load(&d, &settings),
            Err(LevelError::InvalidSpeed { .. })
        ));

        let mut d = data();
        d.trigger_spikes.push(TriggerSpikeDef {
            position: Vec2::new(64.0, 96.0),
            target: Vec2::new(64.0, 64.0),
            collision_width: None,
            collision_height: None,
            speed: f32::NAN,
            trigger_distance: 40.0,
            should_return: true,
            group: None,
            wait_ms: None,
            sprite_slot: 0,
        });
        assert!(matches!(
            Level::load(&d, &settings),
            Err(LevelError::InvalidSpeed {
                kind: "trigger spike",
                ..
            })
        ));
    }

    #[test]
    fn test_load_rejects_bad_sizes() {
        let settings = Settings::default();

        for (width, height) in [(0.0, 24.0), (48.0, f32::NAN), (-48.0, 24.0)] {
            let mut d = data();
            let mut def = platform_def(Vec2::new(64.0, 64.0), Vec2::new(96.0, 64.0));
            def.width = width;
            def.height = height;
            d.platforms.push(def);
            assert!(matches!(
                Level::load(&d, &settings),
                Err(LevelError::InvalidSize {
                    kind: "platform",
                    index: 0,
                    ..
                })
            ));
        }

        let mut d = data();
        d.spikes.push(SpikeDef {
            position: Vec2::new(96.0, 96.0),
            collision_width: Some(-4.0),
            collision_height: None,
            sprite_slot: 0,
        });
        assert!(matches!(
            Level::load(&d, &settings),
            Err(LevelError::InvalidSize {
                kind: "spike",
                field: "collision width",
                ..
            })
        ));

        let mut d = data();
        d.trigger_spikes.push(TriggerSpikeDef {
            position: Vec2::new(64.0, 96.0),
            target: Vec2::new(64.0, 64.0),
            collision_width: None,
            collision_height: None,
            speed: 1.0,
            trigger_distance: f32::NAN,
            should_return: true,
            group: None,
            wait_ms: None,
            sprite_slot: 0,
        });
        assert!(matches!(
            Level::load(&d, &settings),
            Err(LevelError::InvalidSize {
                kind: "trigger spike",
                field: "trigger distance",
                ..
            })
        ));
    }

    #[test]
    fn test_load_rejects_bad_tile_size() {
        let mut settings = Settings::default();
        settings.physics.tile_size = 0.0;
        assert!(matches!(
            Level::load(&data(), &settings),
            Err(LevelError::InvalidTileSize { .. })
        ));
    }

    #[test]
    fn test_spike_box_centred_in_tile() {
        let mut d = data();
        d.spikes.push(SpikeDef {
            position: Vec2::new(96.0, 96.0),
            collision_width: Some(20.0),
            collision_height: Some(16.0),
            sprite_slot: 1,
        });
        let level = Level::load(&d, &Settings::default()).unwrap();
        assert_eq!(
            level.spikes[0].hitbox,
            BoundingBox::new(102.0, 104.0, 20.0, 16.0)
        );
        assert!(level.hits_spike(&BoundingBox::new(100.0, 100.0, 12.0, 22.0)));
        assert!(!level.hits_spike(&BoundingBox::new(40.0, 100.0, 12.0, 22.0)));
    }

    #[test]
    fn test_touch_trigger_emits_once() {
        let mut d = data();
        d.platforms
            .push(platform_def(Vec2::new(100.0, 80.0), Vec2::new(200.0, 80.0)));
        let mut level = Level::load(&d, &Settings::default()).unwrap();
        let player = BoundingBox::new(110.0, 80.0 - 22.0, 12.0, 22.0);
        let mut events = Vec::new();
        level.tick(Some(&player), 0, &mut events);
        level.tick(Some(&player), 5, &mut events);
        assert_eq!(events, vec![GameEvent::PlatformTriggered { index: 0 }]);
        assert_eq!(level.platforms[0].hitbox.x, 104.0);

        // Dead player triggers nothing
        let mut level = Level::load(&d, &Settings::default()).unwrap();
        let mut events = Vec::new();
        level.tick(None, 0, &mut events);
        assert!(events.is_empty());
        assert!(!level.platforms[0].is_triggered());
    }

    #[test]
    fn test_manual_platform_ignores_touch() {
        let mut d = data();
        let mut def = platform_def(Vec2::new(100.0, 80.0), Vec2::new(200.0, 80.0));
        def.trigger = PlatformTrigger::Manual;
        d.platforms.push(def);
        let mut level = Level::load(&d, &Settings::default()).unwrap();
        let player = BoundingBox::new(110.0, 70.0, 12.0, 22.0);
        let mut events = Vec::new();
        level.tick(Some(&player), 0, &mut events);
        assert!(!level.platforms[0].is_triggered());
        assert!(level.trigger_platform(0));
        assert!(!level.trigger_platform(0));
        assert!(!level.trigger_platform(9));
    }

    #[test]
    fn test_trigger_spike_group_fires_from_tick() {
        let mut d = data();
        for (x, group) in [(64.0, Some(1)), (224.0, Some(1)), (160.0, None)] {
            d.trigger_spikes.push(TriggerSpikeDef {
                position: Vec2::new(x, 96.0),
                target: Vec2::new(x, 64.0),
                collision_width: Some(24.0),
                collision_height: Some(24.0),
                speed: 1.0,
                trigger_distance: 30.0,
                should_return: true,
                group,
                wait_ms: None,
                sprite_slot: 0,
            });
        }
        let mut level = Level::load(&d, &Settings::default()).unwrap();
        // Near the first spike only
        let player = BoundingBox::new(70.0, 80.0, 12.0, 22.0);
        let mut events = Vec::new();
        level.tick(Some(&player), 0, &mut events);
        assert!(level.trigger_spikes[0].is_triggered());
        assert!(level.trigger_spikes[1].is_triggered());
        assert!(!level.trigger_spikes[2].is_triggered());
        assert!(level.hits_trigger_spike(&player));
    }

    #[test]
    fn test_landing_and_support_queries() {
        let mut d = data();
        // Surface of a 48x24 platform at (96, 72) is (104, 76, 32, 16)
        d.platforms
            .push(platform_def(Vec2::new(96.0, 72.0), Vec2::new(96.0, 72.0)));
        let mut level = Level::load(&d, &Settings::default()).unwrap();

        let falling = BoundingBox::new(110.0, 76.5 - 22.0, 12.0, 22.0);
        // Untriggered platforms are not standable
        assert_eq!(level.solid_platform_landing(&falling, 75.0), None);

        level.trigger_platform(0);
        assert_eq!(level.solid_platform_landing(&falling, 75.0), Some(76.0));
        // Feet were already below the surface: no landing
        assert_eq!(level.solid_platform_landing(&falling, 80.0), None);
        // No horizontal overlap
        let beside = BoundingBox::new(150.0, 76.5 - 22.0, 12.0, 22.0);
        assert_eq!(level.solid_platform_landing(&beside, 75.0), None);

        let standing = BoundingBox::new(110.0, 76.0 - 22.0, 12.0, 22.0);
        assert_eq!(
            level.supporting_platform(&standing),
            Some((76.0, Vec2::ZERO))
        );
        let high = BoundingBox::new(110.0, 60.0 - 22.0, 12.0, 22.0);
        assert_eq!(level.supporting_platform(&high), None);
    }

    #[test]
    fn test_reset_restores_movers_and_clears_markers() {
        let mut d = data();
        d.platforms
            .push(platform_def(Vec2::new(100.0, 80.0), Vec2::new(200.0, 80.0)));
        let mut level = Level::load(&d, &Settings::default()).unwrap();
        level.trigger_platform(0);
        let mut events = Vec::new();
        for t in 0..10 {
            level.tick(None, t, &mut events);
        }
        level.record_death(Vec2::new(50.0, 50.0));
        assert_eq!(level.death_markers().len(), 1);

        level.reset();
        assert!(level.death_markers().is_empty());
        assert_eq!(level.platforms[0].hitbox.x, 100.0);
        assert!(!level.platforms[0].is_triggered());
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "name": "tiny",
            "tiles": [[1, 1, 1], [0, 0, 0], [1, 1, 1]],
            "spawn": [34.0, 36.0],
            "platforms": [
                { "start": [0.0, 32.0], "target": [64.0, 32.0], "width": 48.0,
                  "height": 24.0, "speed": 1.5, "looping": true }
            ]
        }"#;
        let level = Level::from_json(json, &Settings::default()).unwrap();
        assert_eq!(level.name(), Some("tiny"));
        assert_eq!(level.spawn(), Vec2::new(34.0, 36.0));
        assert!(level.platforms[0].solid);
        assert_eq!(level.platforms[0].trigger, PlatformTrigger::Touch);
        assert_eq!(level.platforms[0].mover.path().wait_ms, 1000);

        assert!(matches!(
            Level::from_json("{ not json", &Settings::default()),
            Err(LevelError::Json(_))
        ));
    }
}
