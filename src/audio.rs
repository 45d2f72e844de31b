//! Sound cues
//!
//! Maps simulation events to sound effects and queues them with a volume.
//! Mixing and playback belong to the host; it drains the queue every frame.

use crate::sim::EventSink;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    Jump,
    Death,
    Respawn,
    /// Level finished, transition starting
    NextLevel,
    /// A platform started moving
    PlatformTrigger,
}

/// A queued effect and the volume to play it at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundCue {
    pub effect: SoundEffect,
    pub volume: f32,
}

/// Collects sound cues from game events
#[derive(Debug, Clone)]
pub struct SoundCues {
    queue: Vec<SoundCue>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for SoundCues {
    fn default() -> Self {
        Self::new()
    }
}

impl SoundCues {
    pub fn new() -> Self {
        Self {
            queue: Vec::new(),
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Silence every cue without touching the volumes
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Queue an effect; silent cues are dropped
    pub fn play(&mut self, effect: SoundEffect) {
        let volume = self.effective_volume();
        if volume <= 0.0 {
            return;
        }
        self.queue.push(SoundCue { effect, volume });
    }

    /// Cues queued since the last drain
    pub fn pending(&self) -> &[SoundCue] {
        &self.queue
    }

    /// Take the queued cues
    pub fn drain(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.queue)
    }
}

impl EventSink for SoundCues {
    fn on_player_died(&mut self) {
        self.play(SoundEffect::Death);
    }

    fn on_player_respawn(&mut self) {
        self.play(SoundEffect::Respawn);
    }

    fn on_jump(&mut self) {
        self.play(SoundEffect::Jump);
    }

    fn on_platform_triggered(&mut self, _index: usize) {
        self.play(SoundEffect::PlatformTrigger);
    }

    fn on_level_completed(&mut self, _level_index: usize, _total_deaths: u32, _elapsed: f64) {
        self.play(SoundEffect::NextLevel);
    }
}
