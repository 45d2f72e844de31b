//! Score records and per-level leaderboard
//!
//! In-memory only; storing records is left to the host. Keeps the best
//! `MAX_HIGH_SCORES` runs per level, fastest first.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::sim::EventSink;

/// Maximum number of scores kept per level
pub const MAX_HIGH_SCORES: usize = 10;

/// One completed level, as emitted on level completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub player_name: String,
    pub level_index: usize,
    /// Seconds since the run timer started
    pub elapsed_secs: f64,
    /// Deaths in the run so far
    pub death_count: u32,
}

impl ScoreRecord {
    /// Faster first, then fewer deaths
    fn rank_cmp(&self, other: &ScoreRecord) -> Ordering {
        self.elapsed_secs
            .total_cmp(&other.elapsed_secs)
            .then(self.death_count.cmp(&other.death_count))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Leaderboard {
    entries: Vec<ScoreRecord>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Rank a record would get on its level (1-indexed), `None` if it
    /// wouldn't make the table
    pub fn potential_rank(&self, record: &ScoreRecord) -> Option<usize> {
        let better = self
            .entries
            .iter()
            .filter(|e| e.level_index == record.level_index)
            .filter(|e| e.rank_cmp(record) != Ordering::Greater)
            .count();
        (better < MAX_HIGH_SCORES).then_some(better + 1)
    }

    /// Add a record. Returns the rank achieved on its level, or `None` if it
    /// didn't qualify.
    pub fn record(&mut self, record: ScoreRecord) -> Option<usize> {
        let rank = self.potential_rank(&record)?;
        let level = record.level_index;
        log::info!(
            "Score for level {level}: {} in {:.2}s, rank {rank}",
            record.player_name,
            record.elapsed_secs
        );

        // Entries stay sorted by level, then rank
        let pos = self
            .entries
            .iter()
            .position(|e| {
                e.level_index > level
                    || (e.level_index == level && e.rank_cmp(&record) == Ordering::Greater)
            })
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, record);

        // Drop whatever fell off this level's table
        let mut kept = 0;
        self.entries.retain(|e| {
            if e.level_index != level {
                return true;
            }
            kept += 1;
            kept <= MAX_HIGH_SCORES
        });

        Some(rank)
    }

    /// Best records for a level, best first
    pub fn top_for_level(&self, level_index: usize) -> impl Iterator<Item = &ScoreRecord> {
        self.entries
            .iter()
            .filter(move |e| e.level_index == level_index)
    }

    /// Fastest record for a level
    pub fn best_for_level(&self, level_index: usize) -> Option<&ScoreRecord> {
        self.top_for_level(level_index).next()
    }

    /// Serialize the whole table
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Load a saved table, re-sorting and trimming it
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let saved: Leaderboard = serde_json::from_str(json)?;
        let mut board = Leaderboard::new();
        for record in saved.entries {
            board.record(record);
        }
        Ok(board)
    }
}

impl EventSink for Leaderboard {
    fn on_score_recorded(&mut self, record: &ScoreRecord) {
        self.record(record.clone());
    }
}

/// Format seconds as `m:ss.cc` for display
pub fn format_time(secs: f64) -> String {
    let centis = (secs.max(0.0) * 100.0).round() as u64;
    let mins = centis / 6000;
    let rest = centis % 6000;
    format!("{}:{:02}.{:02}", mins, rest / 100, rest % 100)
}
