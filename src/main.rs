//! Headless demo runner
//!
//! Plays the bundled level pack with a scripted player (run right, keep
//! jumping) for a fixed stretch of simulated time and logs what happens.
//! `RUST_LOG=debug` shows deaths, triggers and sound cues.

use std::time::Duration;

use rust_runner::audio::SoundCues;
use rust_runner::highscores::{Leaderboard, format_time};
use rust_runner::sim::{Control, EventSink, GameEvent, GameState, LevelSequence, Screen, tick};
use rust_runner::timing::{Clock, LoopTimer, ManualClock, SystemClock};
use rust_runner::{LevelError, Settings};

const LEVEL_PACK: &str = include_str!("../demos/levels.json");

/// Simulated wall time between loop checks
const FRAME_MS: u64 = 16;
/// Length of the demo in simulated seconds
const RUN_SECS: u64 = 30;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Rust Runner demo starting...");

    if let Err(e) = run() {
        log::error!("Demo failed: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), LevelError> {
    let wall = SystemClock::new();
    let settings = Settings::default();
    let sim_dt = settings.sim_dt();
    let levels = LevelSequence::from_json(LEVEL_PACK, &settings)?;
    log::info!("Loaded {} levels", levels.len());

    let mut clock = ManualClock::new(0);
    let mut timer = LoopTimer::new(&settings.timing);
    log::info!("Update step {:.2} ms", timer.update_step_ms());
    let expected_updates = (RUN_SECS as f64 * 1000.0 / timer.update_step_ms()).round() as u64;
    let mut state = GameState::new(settings, levels, clock.now_ms());
    let mut leaderboard = Leaderboard::new();
    let mut sounds = SoundCues::new();

    state.set_player_name("demo");
    state.set_screen(Screen::Playing, clock.now_ms());

    let mut updates = 0u64;
    let mut renders = 0u64;
    let mut deaths = 0u32;

    while clock.now_ms() < RUN_SECS * 1000 {
        clock.advance(FRAME_MS);
        let steps = timer.advance(Duration::from_millis(FRAME_MS));

        // Death and respawn release every control, so keep pressing
        state.set_control(Control::Right, true);
        state.set_control(Control::Jump, true);

        for _ in 0..steps.updates {
            tick(&mut state, clock.now_ms());
            updates += 1;
        }

        for event in state.drain_events() {
            match &event {
                GameEvent::PlayerDied => deaths += 1,
                GameEvent::LevelCompleted {
                    level_index,
                    total_deaths,
                    elapsed_secs,
                } => log::info!(
                    "Level {level_index} done at {} ({total_deaths} deaths)",
                    format_time(*elapsed_secs)
                ),
                GameEvent::TransitionMidpoint { level_index } => {
                    log::info!("Now on level {level_index}")
                }
                _ => log::debug!("{event:?}"),
            }
            leaderboard.dispatch(&event);
            sounds.dispatch(&event);
        }

        for cue in sounds.drain() {
            log::debug!("Sound {:?} at {:.2}", cue.effect, cue.volume);
        }

        if steps.render {
            let snapshot = state.snapshot();
            log::trace!("{snapshot:?}");
            renders += 1;
        }
    }

    println!(
        "\nRan {updates} updates ({:.2}s simulated) and {renders} frames in {RUN_SECS}s of game time",
        updates as f64 * sim_dt
    );
    println!(
        "Dropped {} updates, took {} ms of wall time",
        expected_updates.saturating_sub(updates),
        wall.now_ms()
    );
    println!("Deaths: {deaths}");
    for index in 0..state.levels.len() {
        let best = state
            .levels
            .best_deaths(index)
            .map_or("-".to_string(), |d| d.to_string());
        println!("Level {index}: fewest deaths {best}");
        for (rank, record) in leaderboard.top_for_level(index).enumerate() {
            println!(
                "  {}. {} {} ({} deaths)",
                rank + 1,
                record.player_name,
                format_time(record.elapsed_secs),
                record.death_count
            );
        }
    }

    Ok(())
}
