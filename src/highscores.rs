//! Personal bests and session history
//!
//! Persisted as one JSON file. Personal bests are keyed by each mode's
//! high score key; the history keeps the most recent sessions.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{GameMode, Result};

/// Maximum number of past sessions to keep
pub const MAX_SESSIONS: usize = 50;

/// One finished session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub mode: GameMode,
    pub score: u64,
    pub words_completed: u32,
    /// Time spent playing (seconds, pauses excluded)
    pub duration_secs: f32,
    /// Fall duration of the last row, as a difficulty marker
    pub difficulty: f32,
    /// Unix timestamp (ms) when the session ended
    pub timestamp: f64,
}

/// Aggregates over the recorded sessions of one mode
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SessionStats {
    pub total_games: usize,
    pub best_score: u64,
    pub average_score: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HighScores {
    /// Best score per mode, keyed by `GameMode::high_score_key`
    pub personal_bests: BTreeMap<String, u64>,
    /// Most recent first
    pub sessions: Vec<SessionRecord>,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn personal_best(&self, mode: GameMode) -> u64 {
        self.personal_bests
            .get(mode.high_score_key())
            .copied()
            .unwrap_or(0)
    }

    /// Raise the stored best for `mode`; returns true if `score` beat it
    pub fn record_best(&mut self, mode: GameMode, score: u64) -> bool {
        let best = self
            .personal_bests
            .entry(mode.high_score_key().to_string())
            .or_insert(0);
        if score > *best {
            *best = score;
            true
        } else {
            false
        }
    }

    /// Add a finished session to the history (and the bests)
    pub fn record_session(&mut self, record: SessionRecord) {
        self.record_best(record.mode, record.score);
        self.sessions.insert(0, record);
        self.sessions.truncate(MAX_SESSIONS);
    }

    pub fn stats(&self, mode: GameMode) -> SessionStats {
        let scores: Vec<u64> = self
            .sessions
            .iter()
            .filter(|s| s.mode == mode)
            .map(|s| s.score)
            .collect();
        if scores.is_empty() {
            return SessionStats::default();
        }
        let total: u64 = scores.iter().sum();
        SessionStats {
            total_games: scores.len(),
            best_score: scores.iter().copied().max().unwrap_or(0),
            average_score: total as f64 / scores.len() as f64,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.personal_bests.is_empty() && self.sessions.is_empty()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let scores: HighScores = serde_json::from_str(&json)?;
        log::info!(
            "Loaded {} sessions from {}",
            scores.sessions.len(),
            path.as_ref().display()
        );
        Ok(scores)
    }

    /// Load from `path`, starting fresh if the file is missing or unreadable
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(scores) => scores,
            Err(err) => {
                log::info!("No high scores found ({err}), starting fresh");
                Self::new()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("High scores saved ({} sessions)", self.sessions.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(mode: GameMode, score: u64) -> SessionRecord {
        SessionRecord {
            mode,
            score,
            words_completed: (score / 25) as u32,
            duration_secs: 30.0,
            difficulty: 8.0,
            timestamp: 0.0,
        }
    }

    #[test]
    fn test_bests_are_per_mode() {
        let mut scores = HighScores::new();
        assert!(scores.record_best(GameMode::FillInTheBlank, 75));
        assert!(!scores.record_best(GameMode::FillInTheBlank, 50));
        assert_eq!(scores.personal_best(GameMode::FillInTheBlank), 75);
        assert_eq!(scores.personal_best(GameMode::SortTheLetters), 0);
        assert_eq!(scores.personal_bests.get("personalHighScore_FITB"), Some(&75));
    }

    #[test]
    fn test_stats() {
        let mut scores = HighScores::new();
        scores.record_session(record(GameMode::SortTheLetters, 50));
        scores.record_session(record(GameMode::SortTheLetters, 100));
        scores.record_session(record(GameMode::FillInTheBlank, 500));

        let stats = scores.stats(GameMode::SortTheLetters);
        assert_eq!(stats.total_games, 2);
        assert_eq!(stats.best_score, 100);
        assert_eq!(stats.average_score, 75.0);
        assert_eq!(scores.personal_best(GameMode::FillInTheBlank), 500);
        assert_eq!(scores.sessions[0].mode, GameMode::FillInTheBlank);
    }

    #[test]
    fn test_empty_stats() {
        let stats = HighScores::new().stats(GameMode::FillInTheBlank);
        assert_eq!(stats, SessionStats::default());
    }

    #[test]
    fn test_history_is_capped() {
        let mut scores = HighScores::new();
        for i in 0..(MAX_SESSIONS as u64 + 5) {
            scores.record_session(record(GameMode::FillInTheBlank, i));
        }
        assert_eq!(scores.sessions.len(), MAX_SESSIONS);
        assert_eq!(scores.sessions[0].score, MAX_SESSIONS as u64 + 4);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!(
            "word_invaders_scores_{}.json",
            std::process::id()
        ));
        let mut scores = HighScores::new();
        scores.record_session(record(GameMode::SortTheLetters, 125));
        scores.save(&path).unwrap();

        let loaded = HighScores::load(&path).unwrap();
        assert_eq!(loaded.personal_best(GameMode::SortTheLetters), 125);
        assert_eq!(loaded.sessions, scores.sessions);
        std::fs::remove_file(&path).ok();

        assert!(HighScores::load_or_default(&path).is_empty());
    }
}
