//! Sort the Letters
//!
//! Every letter of a word drops in scrambled order. The player must shoot
//! them left to right; hitting a letter out of turn only costs points. The
//! list is played once, in an order fixed when the game is built; getting
//! through it is a victory.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::{Contact, Interaction};
use super::state::{EntityId, Feedback, GameEvent, GamePhase, ObstacleField, Outcome};
use super::tick::Round;
use super::WordGame;
use crate::tuning::{StlTuning, Tuning};
use crate::GameMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StlAction {
    AdvanceWord,
}

/// Sort the Letters state machine
#[derive(Debug)]
pub struct SortTheLetters {
    round: Round<StlAction>,
    tuning: StlTuning,
    max_health: u8,
    rng: Pcg32,
    words: Vec<String>,
    /// Position in `words`; `None` before the first word is drawn
    word_index: Option<usize>,
    current_word: Vec<char>,
    /// Letters of the current word shot so far, left to right
    letter_index: usize,
    /// A word is expected on the field (false between completion and the next word)
    word_on_screen: bool,
    /// Row serial carrying the current word
    word_row: Option<u32>,
    /// Fall duration of the most recent row (seconds)
    fall_duration: f32,
    score: u64,
    health: u8,
    words_completed: u32,
}

impl SortTheLetters {
    /// Build a game over `words`, shuffled once with `seed`
    pub fn new<I, S>(words: I, tuning: &Tuning, personal_best: u64, seed: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut game = Self::in_order(words, tuning, personal_best, seed);
        game.words.shuffle(&mut game.rng);
        game
    }

    /// Build a game that plays `words` in the given order
    pub fn in_order<I, S>(words: I, tuning: &Tuning, personal_best: u64, seed: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_ascii_uppercase())
            .filter(|w| !w.is_empty() && w.chars().all(|c| c.is_ascii_alphabetic()))
            .collect();
        Self {
            round: Round::new(GameMode::SortTheLetters, tuning, personal_best),
            tuning: tuning.stl.clone(),
            max_health: tuning.max_health.max(1),
            rng: Pcg32::seed_from_u64(seed),
            words,
            word_index: None,
            current_word: Vec::new(),
            letter_index: 0,
            word_on_screen: false,
            word_row: None,
            fall_duration: tuning.stl.fall.base_duration,
            score: 0,
            health: tuning.max_health.max(1),
            words_completed: 0,
        }
    }

    pub fn current_word(&self) -> String {
        self.current_word.iter().collect()
    }

    pub fn letter_index(&self) -> usize {
        self.letter_index
    }

    pub fn word_index(&self) -> Option<usize> {
        self.word_index
    }

    pub fn is_word_on_screen(&self) -> bool {
        self.word_on_screen
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// The letter that must be shot next
    pub fn next_letter(&self) -> Option<char> {
        self.current_word.get(self.letter_index).copied()
    }

    /// The next letter in order was shot
    pub fn on_correct_letter_shot(&mut self) {
        if !self.round.is_playing() || self.letter_index >= self.current_word.len() {
            return;
        }
        self.letter_index += 1;
        self.round.emit(GameEvent::Feedback(Feedback::Correct));

        if self.letter_index == self.current_word.len() {
            self.score += self.tuning.word_score;
            self.words_completed += 1;
            self.word_on_screen = false;
            self.word_row = None;
            log::info!("Completed {} (score {})", self.current_word(), self.score);

            self.round.check_achievements(self.score);
            self.round.emit(GameEvent::Feedback(Feedback::Explosion));
            self.round.clear_field();
            self.round
                .schedule(self.tuning.advance_delay, StlAction::AdvanceWord);
        }
    }

    /// A letter was shot out of turn
    pub fn on_wrong_letter_shot(&mut self) {
        if !self.round.is_playing() {
            return;
        }
        self.score = self.score.saturating_sub(self.tuning.wrong_shot_penalty);
        self.round.emit(GameEvent::Feedback(Feedback::Wrong));
    }

    /// An obstacle rammed the ship; the word is lost with it
    pub fn on_player_hit(&mut self) {
        if !self.round.is_playing() {
            return;
        }
        self.round.emit(GameEvent::Feedback(Feedback::PlayerHit));
        self.on_word_missed();
    }

    /// The current word can no longer be completed. Costs a heart and skips
    /// straight to the next word.
    pub fn on_word_missed(&mut self) {
        if !self.round.is_playing() || !self.word_on_screen {
            return;
        }
        log::debug!("Missed {}", self.current_word());
        self.health = self.health.saturating_sub(1);
        self.word_on_screen = false;
        self.word_row = None;
        self.round.clear_field();

        if self.health == 0 {
            self.round
                .enter_game_over(Outcome::Defeat, self.score, self.words_completed);
            return;
        }
        self.next_word();
    }

    fn next_word(&mut self) {
        if !self.round.is_playing() {
            return;
        }
        let index = self.word_index.map_or(0, |i| i + 1);
        self.word_index = Some(index);

        let Some(word) = self.words.get(index) else {
            log::info!("All {} words played", self.words.len());
            self.word_on_screen = false;
            self.round
                .enter_game_over(Outcome::Victory, self.score, self.words_completed);
            return;
        };

        self.current_word = word.chars().collect();
        self.letter_index = 0;
        self.word_on_screen = true;

        let mut letters = self.current_word.clone();
        letters.shuffle(&mut self.rng);
        self.fall_duration = self.tuning.fall.duration_for(self.score);
        let row = self.round.field.spawn_row(&letters, self.fall_duration);
        self.word_row = Some(row.row);
        self.round.emit(GameEvent::SpawnRow(row));
        self.round.emit(GameEvent::TaskText(self.current_word()));
    }

    fn resolve_shot(&mut self, projectile: EntityId, obstacle: EntityId) {
        let Some(letter) = self.round.field.letter_of(obstacle) else {
            log::debug!("Shot at consumed obstacle {obstacle}, ignored");
            return;
        };
        if !self.round.retire_projectile(projectile) {
            log::debug!("Spent projectile {projectile}, ignored");
            return;
        }

        if self.next_letter() == Some(letter) {
            self.round.remove_obstacle(obstacle);
            self.on_correct_letter_shot();
        } else {
            self.on_wrong_letter_shot();
        }
    }

    fn resolve_ram(&mut self, obstacle: EntityId) {
        if self.round.remove_obstacle(obstacle).is_none() {
            return;
        }
        self.round.emit(GameEvent::Feedback(Feedback::Explosion));
        self.on_player_hit();
    }

    fn resolve_miss(&mut self, obstacle: EntityId) {
        let Some(removed) = self.round.remove_obstacle(obstacle) else {
            return;
        };
        if Some(removed.row) == self.word_row {
            self.on_word_missed();
        }
    }
}

impl WordGame for SortTheLetters {
    fn mode(&self) -> GameMode {
        GameMode::SortTheLetters
    }

    fn phase(&self) -> GamePhase {
        self.round.phase()
    }

    fn score(&self) -> u64 {
        self.score
    }

    fn health(&self) -> u8 {
        self.health
    }

    fn words_completed(&self) -> u32 {
        self.words_completed
    }

    fn start_new_game(&mut self) {
        if !self.round.begin() {
            return;
        }
        self.score = 0;
        self.health = self.max_health;
        self.words_completed = 0;
        self.word_index = None;
        self.current_word.clear();
        self.letter_index = 0;
        self.word_on_screen = false;
        self.word_row = None;
        self.fall_duration = self.tuning.fall.base_duration;
        self.next_word();
    }

    fn pause(&mut self) {
        self.round.pause();
    }

    fn resume(&mut self) {
        self.round.resume();
    }

    fn tick(&mut self, dt: f32) {
        for due in self.round.advance(dt) {
            if !self.round.is_current(due.generation) {
                continue;
            }
            match due.action {
                StlAction::AdvanceWord => self.next_word(),
            }
        }

        if !self.round.is_playing() || !self.word_on_screen {
            return;
        }
        // The word's obstacles all left the field without it being completed
        if let Some(row) = self.word_row {
            if !self.round.field.has_row(row) {
                self.on_word_missed();
            }
        }
    }

    fn notify_contact(&mut self, contact: Contact) {
        if !self.round.is_playing() {
            return;
        }
        match contact.classify() {
            Some(Interaction::Shot {
                projectile,
                obstacle,
            }) => self.resolve_shot(projectile, obstacle),
            Some(Interaction::Rammed { obstacle }) => self.resolve_ram(obstacle),
            Some(Interaction::Missed { obstacle }) => self.resolve_miss(obstacle),
            Some(Interaction::ProjectileLeft { projectile }) => {
                self.round.retire_projectile(projectile);
            }
            None => log::trace!("Ignored contact {contact:?}"),
        }
    }

    fn fire_projectile(&mut self) -> Option<EntityId> {
        self.round.fire_projectile()
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        self.round.drain_events()
    }

    fn end_session(&mut self) {
        self.word_on_screen = false;
        self.word_row = None;
        self.round.end_session();
    }

    fn field(&self) -> &ObstacleField {
        &self.round.field
    }

    fn task_text(&self) -> Option<String> {
        self.word_on_screen.then(|| self.current_word())
    }

    fn target_letters(&self) -> Vec<char> {
        if self.word_on_screen {
            self.next_letter().into_iter().collect()
        } else {
            Vec::new()
        }
    }

    fn fall_duration(&self) -> f32 {
        self.fall_duration
    }
}
