//! One active game and the bookkeeping around it
//!
//! The session owns the state machine for its lifetime. Each driver tick it
//! advances the game, drains the event queue into the bridges, persists new
//! personal bests and records the finished session. `end` detaches the game
//! so nothing scheduled can fire afterwards.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::GameMode;
use crate::bridge::Bridges;
use crate::flavor;
use crate::highscores::{HighScores, SessionRecord};
use crate::settings::Settings;
use crate::sim::{Contact, EntityId, FillInTheBlank, GameEvent, SortTheLetters, WordGame};
use crate::tuning::Tuning;
use crate::word::WordRepository;

pub struct Session {
    game: Box<dyn WordGame>,
    bridges: Bridges,
    settings: Settings,
    high_scores: HighScores,
    /// Where high scores are written back, if anywhere
    scores_path: Option<PathBuf>,
    /// Seconds of play in the current round
    play_time: f32,
    rng: Pcg32,
    motivation: Option<&'static str>,
}

impl Session {
    pub fn new(
        game: Box<dyn WordGame>,
        bridges: Bridges,
        settings: Settings,
        high_scores: HighScores,
        seed: u64,
    ) -> Self {
        Self {
            game,
            bridges,
            settings,
            high_scores,
            scores_path: None,
            play_time: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            motivation: None,
        }
    }

    /// Fill in the Blank over `repo`, seeded with the stored personal best
    pub fn fill_in_the_blank<R: WordRepository + 'static>(
        repo: R,
        tuning: &Tuning,
        bridges: Bridges,
        settings: Settings,
        high_scores: HighScores,
        seed: u64,
    ) -> Self {
        let best = high_scores.personal_best(GameMode::FillInTheBlank);
        let game = FillInTheBlank::new(repo, tuning, best, seed);
        Self::new(Box::new(game), bridges, settings, high_scores, seed)
    }

    /// Sort the Letters over `words`, seeded with the stored personal best
    pub fn sort_the_letters<I, S>(
        words: I,
        tuning: &Tuning,
        bridges: Bridges,
        settings: Settings,
        high_scores: HighScores,
        seed: u64,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let best = high_scores.personal_best(GameMode::SortTheLetters);
        let game = SortTheLetters::new(words, tuning, best, seed);
        Self::new(Box::new(game), bridges, settings, high_scores, seed)
    }

    /// Write high scores to `path` whenever they change
    pub fn with_scores_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.scores_path = Some(path.into());
        self
    }

    pub fn game(&self) -> &dyn WordGame {
        self.game.as_ref()
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    /// Encouragement picked when the last round ended
    pub fn motivation(&self) -> Option<&'static str> {
        self.motivation
    }

    pub fn play_time(&self) -> f32 {
        self.play_time
    }

    pub fn start(&mut self) {
        self.play_time = 0.0;
        self.motivation = None;
        self.game.start_new_game();
        self.pump();
    }

    pub fn reset(&mut self) {
        self.play_time = 0.0;
        self.motivation = None;
        self.game.reset_game();
        self.pump();
    }

    pub fn pause(&mut self) {
        self.game.pause();
        self.pump();
    }

    pub fn resume(&mut self) {
        self.game.resume();
        self.pump();
    }

    pub fn fire(&mut self) -> Option<EntityId> {
        self.game.fire_projectile()
    }

    /// Forward a physics contact; its effects go out with the next pump
    pub fn notify_contact(&mut self, contact: Contact) {
        self.game.notify_contact(contact);
    }

    /// Advance the game and flush its events
    pub fn tick(&mut self, dt: f32) {
        if self.game.is_playing() {
            self.play_time += dt;
        }
        self.game.tick(dt);
        self.pump();
    }

    /// Drain the game's events into the bridges and handle the ones that
    /// belong to the session
    pub fn pump(&mut self) {
        let events = self.game.drain_events();
        if events.is_empty() {
            return;
        }
        for event in self.bridges.dispatch(events, &self.settings) {
            match event {
                GameEvent::NewPersonalBest { mode, score } => {
                    if self.high_scores.record_best(mode, score) {
                        self.persist();
                    }
                }
                GameEvent::GameOver {
                    mode,
                    outcome,
                    score,
                    words_completed,
                } => {
                    self.high_scores.record_session(SessionRecord {
                        mode,
                        score,
                        words_completed,
                        duration_secs: self.play_time,
                        difficulty: self.game.fall_duration(),
                        timestamp: now_ms(),
                    });
                    self.persist();
                    let motivation = flavor::random_motivation(&mut self.rng);
                    self.motivation = Some(motivation);
                    self.bridges
                        .scene
                        .show_game_over(outcome, score, motivation);
                }
                other => log::warn!("Unrouted event {other:?}"),
            }
        }
    }

    /// Detach the game from the scene and hand back the high scores
    pub fn end(mut self) -> HighScores {
        self.pump();
        self.game.end_session();
        self.persist();
        self.high_scores
    }

    fn persist(&self) {
        let Some(path) = &self.scores_path else {
            return;
        };
        if let Err(err) = self.high_scores.save(path) {
            log::warn!("Failed to save high scores to {}: {err}", path.display());
        }
    }
}

fn now_ms() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
