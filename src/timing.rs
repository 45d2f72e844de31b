//! Fixed-timestep pacing
//!
//! Updates and renders run on separate accumulators. Each check drains every
//! pending update up to a catch-up limit and drops lag beyond it; renders
//! never queue up, at most one is reported per check.

use std::time::{Duration, Instant};

use crate::settings::TimingTuning;

/// Work due after one [`LoopTimer::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoopSteps {
    pub updates: u32,
    pub render: bool,
}

#[derive(Debug, Clone)]
pub struct LoopTimer {
    update_step_ns: u64,
    frame_step_ns: u64,
    max_catch_up: u32,
    update_acc_ns: u64,
    frame_acc_ns: u64,
}

impl LoopTimer {
    pub fn new(tuning: &TimingTuning) -> Self {
        Self {
            update_step_ns: 1_000_000_000 / u64::from(tuning.updates_per_second.max(1)),
            frame_step_ns: 1_000_000_000 / u64::from(tuning.frames_per_second.max(1)),
            max_catch_up: tuning.max_catch_up.max(1),
            update_acc_ns: 0,
            frame_acc_ns: 0,
        }
    }

    /// Length of one update in milliseconds
    pub fn update_step_ms(&self) -> f64 {
        self.update_step_ns as f64 / 1_000_000.0
    }

    /// Account for `elapsed` wall time and report what is due
    pub fn advance(&mut self, elapsed: Duration) -> LoopSteps {
        let elapsed_ns = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        self.update_acc_ns = self.update_acc_ns.saturating_add(elapsed_ns);
        self.frame_acc_ns = self.frame_acc_ns.saturating_add(elapsed_ns);

        let pending = self.update_acc_ns / self.update_step_ns;
        let updates = pending.min(u64::from(self.max_catch_up)) as u32;
        if pending > u64::from(updates) {
            log::debug!("Dropping {} updates of lag", pending - u64::from(updates));
        }
        self.update_acc_ns %= self.update_step_ns;

        let render = self.frame_acc_ns >= self.frame_step_ns;
        if render {
            self.frame_acc_ns %= self.frame_step_ns;
        }

        LoopSteps { updates, render }
    }
}

/// Millisecond time source passed to the simulation
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Wall clock, measured from construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Hand-driven clock for tests and headless runs
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now_ms: u64,
}

impl ManualClock {
    pub fn new(now_ms: u64) -> Self {
        Self { now_ms }
    }

    /// Move time forward by `ms`
    pub fn advance(&mut self, ms: u64) {
        self.now_ms += ms;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }
}
