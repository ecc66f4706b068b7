//! Data-driven game balance
//!
//! Every penalty, reward, delay and difficulty constant lives here so a
//! balance pass only touches a JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;

/// How fast a row falls as the score grows
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallTuning {
    /// Seconds for a row to cross the field at score 0
    pub base_duration: f32,
    /// Seconds shaved off per full 100 points
    pub step_per_hundred: f32,
    /// Fastest allowed fall (seconds)
    pub min_duration: f32,
}

impl Default for FallTuning {
    fn default() -> Self {
        Self {
            base_duration: 8.0,
            step_per_hundred: 0.5,
            min_duration: 4.5,
        }
    }
}

impl FallTuning {
    /// Fall duration for a row spawned at `score`
    pub fn duration_for(&self, score: u64) -> f32 {
        let steps = (score / 100) as f32;
        (self.base_duration - steps * self.step_per_hundred).max(self.min_duration)
    }
}

/// Fill in the Blank balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitbTuning {
    pub word_score: u64,
    pub wrong_hit_penalty: u64,
    pub miss_penalty: u64,
    /// Completed words in a row that earn one health back
    pub streak_for_heal: u32,
    /// Obstacles per row, decoys included
    pub row_width: usize,
    /// Outstanding letters placed in one row at most
    pub max_targets: usize,
    pub min_blanks: usize,
    pub max_blanks: usize,
    /// Delay after a completed word before the next row (lets clear effects finish)
    pub next_task_delay: f32,
    /// Delay after a missed word before the next row
    pub miss_respawn_delay: f32,
    pub fall: FallTuning,
}

impl Default for FitbTuning {
    fn default() -> Self {
        Self {
            word_score: 25,
            wrong_hit_penalty: 10,
            miss_penalty: 25,
            streak_for_heal: 3,
            row_width: 5,
            max_targets: 4,
            min_blanks: 1,
            max_blanks: 2,
            next_task_delay: 1.0,
            miss_respawn_delay: 0.5,
            fall: FallTuning::default(),
        }
    }
}

/// Sort the Letters balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StlTuning {
    pub word_score: u64,
    pub wrong_shot_penalty: u64,
    /// Delay after a completed word before the next one drops
    pub advance_delay: f32,
    pub fall: FallTuning,
}

impl Default for StlTuning {
    fn default() -> Self {
        Self {
            word_score: 25,
            wrong_shot_penalty: 10,
            advance_delay: 2.0,
            fall: FallTuning {
                min_duration: 3.0,
                ..FallTuning::default()
            },
        }
    }
}

/// One beat of the resume countdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beat {
    pub label: String,
    pub duration: f32,
}

impl Beat {
    fn new(label: &str, duration: f32) -> Self {
        Self {
            label: label.to_string(),
            duration,
        }
    }
}

/// Play field geometry in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldTuning {
    pub width: f32,
    pub height: f32,
    /// Distance above the top edge where rows appear, and below the floor where they vanish
    pub margin: f32,
}

impl Default for FieldTuning {
    fn default() -> Self {
        Self {
            width: 390.0,
            height: 844.0,
            margin: 40.0,
        }
    }
}

/// Complete balance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub max_health: u8,
    pub fitb: FitbTuning,
    pub stl: StlTuning,
    pub countdown: Vec<Beat>,
    pub field: FieldTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_health: 5,
            fitb: FitbTuning::default(),
            stl: StlTuning::default(),
            countdown: vec![
                Beat::new("3", 1.0),
                Beat::new("2", 1.0),
                Beat::new("1", 1.0),
                Beat::new("GO!", 0.5),
            ],
            field: FieldTuning::default(),
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning table; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// A round needs at least one heart to be playable
    pub fn sanitized(mut self) -> Self {
        self.max_health = self.max_health.max(1);
        self
    }

    /// Load a tuning table from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Total length of the resume countdown in seconds
    pub fn countdown_length(&self) -> f32 {
        self.countdown.iter().map(|b| b.duration).sum()
    }
}
