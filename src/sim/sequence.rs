//! Ordered level list and progress through it

use super::level::{Level, LevelData, LevelPack};
use crate::error::LevelError;
use crate::settings::Settings;

#[derive(Debug, Clone)]
pub struct LevelSequence {
    levels: Vec<Level>,
    current: usize,
    /// Completed at least once this session
    completed: Vec<bool>,
    /// Lowest death count a level was finished with
    best_deaths: Vec<Option<u32>>,
}

impl LevelSequence {
    /// Wrap already loaded levels, starting at the first one
    pub fn from_levels(levels: Vec<Level>) -> Result<Self, LevelError> {
        if levels.is_empty() {
            return Err(LevelError::NoLevels);
        }
        let n = levels.len();
        Ok(Self {
            levels,
            current: 0,
            completed: vec![false; n],
            best_deaths: vec![None; n],
        })
    }

    /// Load and validate every level; failures carry the level index
    pub fn from_data(data: &[LevelData], settings: &Settings) -> Result<Self, LevelError> {
        let levels = data
            .iter()
            .enumerate()
            .map(|(index, d)| {
                Level::load(d, settings).map_err(|e| LevelError::InLevel {
                    index,
                    source: Box::new(e),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_levels(levels)
    }

    /// Parse a level pack and load every level in it
    pub fn from_json(json: &str, settings: &Settings) -> Result<Self, LevelError> {
        let pack: LevelPack = serde_json::from_str(json)?;
        Self::from_data(&pack.levels, settings)
    }

    /// Number of levels
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always false for a sequence built by the constructors
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Index of the level being played
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Level being played
    pub fn current(&self) -> &Level {
        &self.levels[self.current]
    }

    /// Level being played, mutably
    pub fn current_mut(&mut self) -> &mut Level {
        &mut self.levels[self.current]
    }

    /// Level at `index`, if any
    pub fn level(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }

    /// Level 0 is always open; any other level opens once its predecessor
    /// has been completed
    pub fn is_unlocked(&self, index: usize) -> bool {
        match index {
            0 => true,
            i if i < self.levels.len() => self.completed[i - 1],
            _ => false,
        }
    }

    /// Finished at least once this session
    pub fn is_completed(&self, index: usize) -> bool {
        self.completed.get(index).copied().unwrap_or(false)
    }

    /// Mark the current level finished, unlocking the next
    pub fn mark_completed(&mut self) {
        self.completed[self.current] = true;
    }

    /// Jump to an unlocked level. Returns false (and stays put) otherwise.
    pub fn select_level(&mut self, index: usize) -> bool {
        if !self.is_unlocked(index) {
            log::debug!("Level {index} is locked");
            return false;
        }
        self.current = index;
        true
    }

    /// Advance to the next level. At the last level the index stays put.
    pub fn load_next_level(&mut self) -> bool {
        if self.current + 1 < self.levels.len() {
            self.current += 1;
            log::info!("Advanced to level {}", self.current);
            true
        } else {
            log::warn!(
                "Level {} is the last level, staying on it",
                self.current
            );
            false
        }
    }

    /// Back to level 0, keeping unlocks
    pub fn reset_to_first(&mut self) {
        self.current = 0;
    }

    /// Keep the lowest death count the current level was finished with
    pub fn record_level_deaths(&mut self, deaths: u32) {
        let best = &mut self.best_deaths[self.current];
        *best = Some(best.map_or(deaths, |b| b.min(deaths)));
    }

    /// Fewest deaths the level was finished with
    pub fn best_deaths(&self, index: usize) -> Option<u32> {
        self.best_deaths.get(index).copied().flatten()
    }
}
