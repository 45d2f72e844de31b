//! Domain events
//!
//! The tick pushes events into a queue on [`super::GameState`]; the caller
//! drains it once per frame and hands each event to whatever collaborators
//! care (audio cues, score storage, UI).

use serde::{Deserialize, Serialize};

use crate::highscores::ScoreRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PlayerDied,
    PlayerRespawned,
    Jumped,
    /// A platform was set in motion for the first time since the last reset
    PlatformTriggered { index: usize },
    LevelCompleted {
        level_index: usize,
        total_deaths: u32,
        elapsed_secs: f64,
    },
    ScoreRecorded(ScoreRecord),
    /// Transition wipe fully covers the screen; the next level is now loaded
    TransitionMidpoint { level_index: usize },
    TransitionComplete,
}

/// Receiver of domain events. Every hook defaults to a no-op so a sink only
/// implements what it listens to.
pub trait EventSink {
    fn on_player_died(&mut self) {}

    fn on_player_respawn(&mut self) {}

    fn on_jump(&mut self) {}

    fn on_platform_triggered(&mut self, _index: usize) {}

    fn on_level_completed(&mut self, _level_index: usize, _total_deaths: u32, _elapsed_secs: f64) {
    }

    fn on_score_recorded(&mut self, _record: &ScoreRecord) {}

    fn on_transition_midpoint(&mut self, _level_index: usize) {}

    fn on_transition_complete(&mut self) {}

    /// Route one event to the matching hook
    fn dispatch(&mut self, event: &GameEvent) {
        match event {
            GameEvent::PlayerDied => self.on_player_died(),
            GameEvent::PlayerRespawned => self.on_player_respawn(),
            GameEvent::Jumped => self.on_jump(),
            GameEvent::PlatformTriggered { index } => self.on_platform_triggered(*index),
            GameEvent::LevelCompleted {
                level_index,
                total_deaths,
                elapsed_secs,
            } => self.on_level_completed(*level_index, *total_deaths, *elapsed_secs),
            GameEvent::ScoreRecorded(record) => self.on_score_recorded(record),
            GameEvent::TransitionMidpoint { level_index } => {
                self.on_transition_midpoint(*level_index)
            }
            GameEvent::TransitionComplete => self.on_transition_complete(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        deaths: u32,
        completions: Vec<(usize, u32)>,
        midpoints: Vec<usize>,
    }

    impl EventSink for Counter {
        fn on_player_died(&mut self) {
            self.deaths += 1;
        }

        fn on_level_completed(&mut self, level_index: usize, total_deaths: u32, _elapsed: f64) {
            self.completions.push((level_index, total_deaths));
        }

        fn on_transition_midpoint(&mut self, level_index: usize) {
            self.midpoints.push(level_index);
        }
    }

    #[test]
    fn test_dispatch_routes_and_ignores_unhandled() {
        let mut sink = Counter::default();
        let events = [
            GameEvent::PlayerDied,
            GameEvent::Jumped,
            GameEvent::PlayerDied,
            GameEvent::LevelCompleted {
                level_index: 2,
                total_deaths: 5,
                elapsed_secs: 12.5,
            },
            GameEvent::TransitionMidpoint { level_index: 3 },
            GameEvent::TransitionComplete,
        ];
        for event in &events {
            sink.dispatch(event);
        }
        assert_eq!(sink.deaths, 2);
        assert_eq!(sink.completions, vec![(2, 5)]);
        assert_eq!(sink.midpoints, vec![3]);
    }
}
