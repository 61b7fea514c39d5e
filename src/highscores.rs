//! Run ranking
//!
//! The engine hands each finished run to a `ScoreSink`. `HighScores` is the
//! stock sink: a descending-score table persisted to LocalStorage in the
//! browser and kept in memory natively.

use serde::{Deserialize, Serialize};

use crate::platform::storage;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// What a finished run reports to storage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub score: u64,
    /// Run length in seconds
    pub duration: f32,
}

/// Storage collaborator for finished runs
pub trait ScoreSink {
    fn submit(&mut self, identity: &str, record: ScoreRecord);
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub identity: String,
    pub score: u64,
    pub duration: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    const STORAGE_KEY: &'static str = "void_drift_highscores";

    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score qualifies for the table
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Insert a score if it qualifies; returns the 1-indexed rank achieved
    ///
    /// Ties keep the earlier entry ahead.
    pub fn add(&mut self, identity: &str, record: ScoreRecord) -> Option<usize> {
        if !self.qualifies(record.score) {
            return None;
        }
        let entry = HighScoreEntry {
            identity: identity.to_string(),
            score: record.score,
            duration: record.duration,
        };
        let pos = self
            .entries
            .iter()
            .position(|e| record.score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(pos + 1)
    }

    /// Entries in descending-score order with their 1-indexed rank
    pub fn ranked(&self) -> impl Iterator<Item = (usize, &HighScoreEntry)> {
        self.entries.iter().enumerate().map(|(i, e)| (i + 1, e))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Stored table, or an empty one
    pub fn load() -> Self {
        match storage::load_json::<HighScores>(Self::STORAGE_KEY) {
            Some(scores) => {
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            None => Self::new(),
        }
    }

    pub fn save(&self) {
        storage::save_json(Self::STORAGE_KEY, self);
        log::debug!("High scores saved ({} entries)", self.entries.len());
    }
}

impl ScoreSink for HighScores {
    fn submit(&mut self, identity: &str, record: ScoreRecord) {
        match self.add(identity, record) {
            Some(rank) => {
                log::info!("{} placed #{} with {}", identity, rank, record.score);
                self.save();
            }
            None => log::debug!("Score {} did not place", record.score),
        }
    }
}
