//! Word Invaders - gameplay core for the word shooter arcade game
//!
//! Core modules:
//! - `sim`: Game state machines (Fill in the Blank, Sort the Letters) and contact resolution
//! - `word`: Word tasks and the word repository
//! - `bridge`: Interfaces to the renderer, scoreboard and feedback collaborators
//! - `session`: One active game plus the bookkeeping around it
//! - `tuning`: Data-driven game balance

pub mod bridge;
pub mod error;
pub mod flavor;
pub mod highscores;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod word;

pub use error::{Error, Result};
pub use highscores::HighScores;
pub use session::Session;
pub use settings::Settings;
pub use tuning::Tuning;

use serde::{Deserialize, Serialize};

/// Fixed identifiers shared with the platform services
pub mod consts {
    /// Driver timestep used by the headless runner (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Placeholder glyph for an unfilled blank
    pub const BLANK_GLYPH: char = '_';

    /// Letters used for decoy obstacles
    pub const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

    /// Score thresholds that unlock achievements
    pub const SCORE_ACHIEVEMENT_LOW: u64 = 100;
    pub const SCORE_ACHIEVEMENT_HIGH: u64 = 1000;
}

/// The two playable modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// Shoot the missing letters of a word in any order
    FillInTheBlank,
    /// Shoot every letter of a word left to right
    SortTheLetters,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::FillInTheBlank => "fill_in_the_blank",
            GameMode::SortTheLetters => "sort_the_letters",
        }
    }

    /// Leaderboard the final score of a round is submitted to
    pub fn leaderboard_id(&self) -> &'static str {
        match self {
            GameMode::FillInTheBlank => "fill_in_the_blank_leaderboard",
            GameMode::SortTheLetters => "sort_the_letters_leaderboard",
        }
    }

    /// Key of the persisted personal best for this mode
    pub fn high_score_key(&self) -> &'static str {
        match self {
            GameMode::FillInTheBlank => "personalHighScore_FITB",
            GameMode::SortTheLetters => "personalHighScore_STL",
        }
    }
}
