//! Fixed timestep simulation tick
//!
//! Advances the session by one update. Callers pass the current wall-clock
//! time; all waits and delays compare against it.

use super::events::GameEvent;
use super::player::PlayerEdge;
use super::state::{GameState, Mode, Screen, Transition};
use crate::highscores::ScoreRecord;

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, now_ms: u64) {
    match state.mode {
        // The wipe always runs to completion
        Mode::Transitioning(transition) => tick_transition(state, transition),
        Mode::Playing => {
            if state.screen == Screen::Playing && !state.paused {
                tick_playing(state, now_ms);
            }
        }
    }
}

fn tick_playing(state: &mut GameState, now_ms: u64) {
    let GameState {
        settings,
        player,
        levels,
        run,
        events,
        ..
    } = state;
    let level = levels.current_mut();

    // Movers first so the player collides with their post-tick positions
    level.tick(player.alive_hitbox(), now_ms, events);

    match player.update(level, now_ms, &settings.animation) {
        Some(PlayerEdge::Died { at }) => {
            run.total_deaths += 1;
            level.record_death(at);
            events.push(GameEvent::PlayerDied);
        }
        Some(PlayerEdge::Respawned) => {
            level.reset_movers();
            events.push(GameEvent::PlayerRespawned);
        }
        Some(PlayerEdge::Jumped) => events.push(GameEvent::Jumped),
        None => {}
    }

    if state.player.reached_level_end() {
        complete_level(state, now_ms);
    }
}

fn complete_level(state: &mut GameState, now_ms: u64) {
    let level_index = state.levels.current_index();
    let elapsed_secs = state.run.elapsed_secs(now_ms);
    let total_deaths = state.run.total_deaths;

    log::info!(
        "Level {level_index} completed in {elapsed_secs:.2}s with {total_deaths} deaths"
    );

    state.events.push(GameEvent::LevelCompleted {
        level_index,
        total_deaths,
        elapsed_secs,
    });
    state.events.push(GameEvent::ScoreRecorded(ScoreRecord {
        player_name: state.run.player_name.clone(),
        level_index,
        elapsed_secs,
        death_count: total_deaths,
    }));

    state.levels.mark_completed();
    state.player.clear_level_end();
    state.start_transition();
}

fn tick_transition(state: &mut GameState, mut transition: Transition) {
    let speed = state.settings.transition.speed;
    let cap = state.settings.transition.cap;

    if transition.rising {
        transition.scale = (transition.scale + speed).min(cap);
        if transition.scale >= cap {
            transition.rising = false;
            if !transition.level_loaded {
                transition.level_loaded = true;
                swap_level(state);
            }
        }
        state.mode = Mode::Transitioning(transition);
    } else {
        transition.scale = (transition.scale - speed).max(0.0);
        if transition.scale <= 0.0 {
            state.mode = Mode::Playing;
            state.events.push(GameEvent::TransitionComplete);
            log::info!("Transition complete");
        } else {
            state.mode = Mode::Transitioning(transition);
        }
    }
}

/// Screen fully covered: bank the finished level's deaths and swap in the next
fn swap_level(state: &mut GameState) {
    state.levels.record_level_deaths(state.player.death_count());
    state.player.reset_death_count();
    state.levels.load_next_level();
    state.enter_current_level();
    let level_index = state.levels.current_index();
    state
        .events
        .push(GameEvent::TransitionMidpoint { level_index });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::level::LevelData;
    use crate::sim::sequence::LevelSequence;
    use crate::sim::test_support::level_data_from_ascii;
    use glam::Vec2;

    const FLOOR_Y: f32 = 96.0 - 22.0;

    fn pack() -> Vec<LevelData> {
        vec![
            // Exit in the floor a few tiles right of the spawn
            level_data_from_ascii(
                &["#######", "#.....#", "#.....#", "####E##"],
                Vec2::new(40.0, FLOOR_Y),
            ),
            // Lava under the spawn
            level_data_from_ascii(
                &["#######", "#.....#", "#.....#", "#L#####"],
                Vec2::new(40.0, FLOOR_Y),
            ),
        ]
    }

    fn playing_state() -> GameState {
        let settings = Settings::default();
        let levels = LevelSequence::from_data(&pack(), &settings).unwrap();
        let mut state = GameState::new(settings, levels, 0);
        state.set_player_name("Ada");
        state.set_screen(Screen::Playing, 0);
        state
    }

    fn count(events: &[GameEvent], wanted: &GameEvent) -> usize {
        events.iter().filter(|e| *e == wanted).count()
    }

    #[test]
    fn test_menu_does_not_tick() {
        let settings = Settings::default();
        let levels = LevelSequence::from_data(&pack(), &settings).unwrap();
        let mut state = GameState::new(settings, levels, 0);
        state.set_control(crate::sim::state::Control::Right, true);
        for t in 0..50 {
            tick(&mut state, t);
        }
        assert_eq!(state.player.hitbox.x, 40.0);
    }

    #[test]
    fn test_pause_freezes_playing() {
        let mut state = playing_state();
        state.set_control(crate::sim::state::Control::Right, true);
        state.toggle_pause();
        for t in 0..50 {
            tick(&mut state, t);
        }
        assert_eq!(state.player.hitbox.x, 40.0);
        state.toggle_pause();
        tick(&mut state, 51);
        assert_eq!(state.player.hitbox.x, 41.0);
    }

    #[test]
    fn test_death_event_fires_once() {
        let mut state = playing_state();
        // Onto the lava of level 1
        state.levels.mark_completed();
        assert!(state.select_level(1));

        let mut events = Vec::new();
        for t in 0..400 {
            tick(&mut state, t);
            events.extend(state.drain_events());
        }
        // Died at t=0; the respawn is due at t=500
        assert_eq!(count(&events, &GameEvent::PlayerDied), 1);
        assert_eq!(count(&events, &GameEvent::PlayerRespawned), 0);
        assert_eq!(state.run.total_deaths, 1);
        assert_eq!(state.levels.current().death_markers().len(), 1);

        tick(&mut state, 500);
        assert_eq!(state.drain_events(), vec![GameEvent::PlayerRespawned]);
        assert!(state.player.is_alive());
        // Dies again straight away on the next tick
        tick(&mut state, 501);
        assert_eq!(state.drain_events(), vec![GameEvent::PlayerDied]);
        assert_eq!(state.player.death_count(), 2);
    }

    #[test]
    fn test_level_completion_and_single_swap() {
        let mut state = playing_state();
        state.set_control(crate::sim::state::Control::Right, true);

        let mut events = Vec::new();
        let mut t = 0;
        while !state.is_transitioning() && t < 1000 {
            tick(&mut state, t);
            t += 5;
        }
        assert!(state.is_transitioning());
        events.extend(state.drain_events());
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::LevelCompleted {
                level_index: 0,
                total_deaths: 0,
                ..
            }
        )));
        let record = events.iter().find_map(|e| match e {
            GameEvent::ScoreRecorded(r) => Some(r.clone()),
            _ => None,
        });
        let record = record.unwrap();
        assert_eq!(record.player_name, "Ada");
        assert_eq!(record.level_index, 0);
        assert!(record.elapsed_secs > 0.0);
        assert!(state.levels.is_completed(0));

        // Run the wipe to the end
        events.clear();
        let mut ticks = 0;
        while state.is_transitioning() && ticks < 1000 {
            tick(&mut state, t);
            events.extend(state.drain_events());
            t += 5;
            ticks += 1;
        }
        assert!(!state.is_transitioning());
        assert_eq!(
            count(&events, &GameEvent::TransitionMidpoint { level_index: 1 }),
            1
        );
        assert_eq!(count(&events, &GameEvent::TransitionComplete), 1);
        assert_eq!(events.len(), 2);
        assert_eq!(state.levels.current_index(), 1);
        assert_eq!(state.levels.best_deaths(0), Some(0));
        assert_eq!(state.player.hitbox.position(), Vec2::new(40.0, FLOOR_Y));

        // No further events once the wipe is over
        state.toggle_pause();
        tick(&mut state, t);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_transition_ignores_pause_and_screen() {
        let mut state = playing_state();
        state.start_transition();
        state.screen = Screen::Menu;
        state.paused = true;
        tick(&mut state, 0);
        match state.mode {
            Mode::Transitioning(tr) => assert!(tr.scale > 0.0),
            Mode::Playing => panic!("transition should still run"),
        }
    }

    #[test]
    fn test_final_level_clamps() {
        let mut state = playing_state();
        state.levels.mark_completed();
        assert!(state.select_level(1));
        state.start_transition();
        for t in 0..1000 {
            tick(&mut state, t);
        }
        assert!(!state.is_transitioning());
        assert_eq!(state.levels.current_index(), 1);
    }
}
