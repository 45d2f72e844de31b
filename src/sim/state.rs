//! Session state
//!
//! Everything one play session needs: the level sequence, the player, the
//! current screen and mode, run statistics and the pending event queue.

use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use super::player::Player;
use super::sequence::LevelSequence;
use crate::consts::MAX_NAME_LEN;
use crate::settings::Settings;

/// Which screen the game is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    Menu,
    LevelSelect,
    Playing,
    Leaderboard,
}

/// Level transition wipe
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// 0 = invisible, cap = screen fully covered
    pub scale: f32,
    /// Growing towards the cap (first half) or shrinking back (second half)
    pub rising: bool,
    /// Next level already swapped in
    pub level_loaded: bool,
}

impl Transition {
    pub fn start() -> Self {
        Self {
            scale: 0.0,
            rising: true,
            level_loaded: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Mode {
    Playing,
    Transitioning(Transition),
}

/// Player controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Control {
    Left,
    Right,
    Jump,
}

/// Statistics for the current run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub player_name: String,
    /// Timestamp the run timer was started
    pub start_ms: u64,
    pub total_deaths: u32,
}

impl RunStats {
    pub fn elapsed_secs(&self, now_ms: u64) -> f64 {
        now_ms.saturating_sub(self.start_ms) as f64 / 1000.0
    }
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    pub screen: Screen,
    pub mode: Mode,
    pub paused: bool,
    pub player: Player,
    pub levels: LevelSequence,
    pub run: RunStats,
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// New session on the menu screen, with the first level entered
    pub fn new(settings: Settings, levels: LevelSequence, now_ms: u64) -> Self {
        let player = Player::new(levels.current().spawn(), &settings.physics);
        let mut state = Self {
            settings,
            screen: Screen::Menu,
            mode: Mode::Playing,
            paused: false,
            player,
            levels,
            run: RunStats {
                start_ms: now_ms,
                ..Default::default()
            },
            events: Vec::new(),
        };
        state.enter_current_level();
        state
    }

    /// True while the level wipe runs
    pub fn is_transitioning(&self) -> bool {
        matches!(self.mode, Mode::Transitioning(_))
    }

    /// Press or release a control
    pub fn set_control(&mut self, control: Control, pressed: bool) {
        let input = &mut self.player.input;
        match control {
            Control::Left => input.left = pressed,
            Control::Right => input.right = pressed,
            Control::Jump => input.jump = pressed,
        }
    }

    /// Window lost focus: release held directions
    pub fn window_focus_lost(&mut self) {
        self.player.reset_dir_flags();
    }

    /// Toggle pause while playing. Transitions can't be paused. Returns the
    /// new paused flag.
    pub fn toggle_pause(&mut self) -> bool {
        if self.screen == Screen::Playing && !self.is_transitioning() {
            self.paused = !self.paused;
            log::info!("{}", if self.paused { "Paused" } else { "Resumed" });
        }
        self.paused
    }

    /// Set the name recorded with scores. Surrounding whitespace is trimmed,
    /// blank names are ignored and long names are cut to
    /// [`MAX_NAME_LEN`] characters.
    pub fn set_player_name(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.run.player_name = name.chars().take(MAX_NAME_LEN).collect();
        true
    }

    /// Switch screens, applying the run bookkeeping tied to each switch
    pub fn set_screen(&mut self, screen: Screen, now_ms: u64) {
        let from = self.screen;
        if from == screen {
            return;
        }

        match (from, screen) {
            (Screen::Playing, Screen::Menu) => self.reset_run(now_ms),
            (Screen::Menu, Screen::Playing) => self.run.start_ms = now_ms,
            (Screen::LevelSelect, Screen::Playing) => {
                self.run.start_ms = now_ms;
                self.enter_current_level();
            }
            _ => {}
        }

        self.paused = false;
        self.screen = screen;
        log::info!("Screen {from:?} -> {screen:?}");
    }

    /// Back to the first level with fresh statistics
    fn reset_run(&mut self, now_ms: u64) {
        self.run.total_deaths = 0;
        self.run.start_ms = now_ms;
        self.mode = Mode::Playing;
        self.levels.reset_to_first();
        self.player.reset_death_count();
        self.enter_current_level();
    }

    /// Pick an unlocked level and enter it
    pub fn select_level(&mut self, index: usize) -> bool {
        if !self.levels.select_level(index) {
            return false;
        }
        self.player.reset_death_count();
        self.enter_current_level();
        true
    }

    /// (Re-)enter the current level: fresh movers, no death markers, player
    /// at the spawn point
    pub fn enter_current_level(&mut self) {
        let level = self.levels.current_mut();
        level.reset();
        self.player.spawn_at_level_start(level);
        self.player.clear_level_end();
        log::info!(
            "Entered level {} ({})",
            self.levels.current_index(),
            self.levels.current().name().unwrap_or("unnamed")
        );
    }

    /// Trigger a platform of the current level from outside
    pub fn trigger_platform(&mut self, index: usize) -> bool {
        let fired = self.levels.current_mut().trigger_platform(index);
        if fired {
            self.events.push(GameEvent::PlatformTriggered { index });
        }
        fired
    }

    /// Begin the wipe to the next level
    pub fn start_transition(&mut self) {
        self.paused = false;
        self.mode = Mode::Transitioning(Transition::start());
    }

    /// Events pushed since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take every event queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
