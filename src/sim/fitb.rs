//! Fill in the Blank
//!
//! A word drops with one or two letters blanked out. The player shoots the
//! missing letters in any order; decoys fill the rest of the row. Three
//! completed words in a row earn a heart back.

use rand::seq::{IndexedRandom, SliceRandom};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::{Contact, Interaction};
use super::state::{EntityId, Feedback, GameEvent, GamePhase, ObstacleField, Outcome};
use super::tick::Round;
use super::WordGame;
use crate::consts::ALPHABET;
use crate::tuning::{FitbTuning, Tuning};
use crate::word::{WordRepository, WordTask};
use crate::GameMode;

/// Delayed work in this mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FitbAction {
    SpawnNextTask,
}

/// Fill in the Blank state machine
#[derive(Debug)]
pub struct FillInTheBlank<R> {
    round: Round<FitbAction>,
    tuning: FitbTuning,
    max_health: u8,
    repo: R,
    rng: Pcg32,
    score: u64,
    health: u8,
    streak: u32,
    words_completed: u32,
    task: Option<WordTask>,
    /// Row serial carrying the current task's letters
    task_row: Option<u32>,
    /// Fall duration of the most recent row (seconds)
    obstacle_speed: f32,
    /// A spawn found no word; retry on the next tick
    awaiting_word: bool,
}

impl<R: WordRepository> FillInTheBlank<R> {
    pub fn new(repo: R, tuning: &Tuning, personal_best: u64, seed: u64) -> Self {
        Self {
            round: Round::new(GameMode::FillInTheBlank, tuning, personal_best),
            tuning: tuning.fitb.clone(),
            max_health: tuning.max_health.max(1),
            repo,
            rng: Pcg32::seed_from_u64(seed),
            score: 0,
            health: tuning.max_health.max(1),
            streak: 0,
            words_completed: 0,
            task: None,
            task_row: None,
            obstacle_speed: tuning.fitb.fall.base_duration,
            awaiting_word: false,
        }
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn task(&self) -> Option<&WordTask> {
        self.task.as_ref()
    }

    /// Fall duration of the last spawned row (lower is faster)
    pub fn obstacle_speed(&self) -> f32 {
        self.obstacle_speed
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// A letter from the current task was shot.
    ///
    /// Returns false (and changes nothing) if there is no active task or the
    /// letter is not outstanding.
    pub fn on_correct_letter_hit(&mut self, letter: char) -> bool {
        if !self.round.is_playing() {
            return false;
        }
        let Some(task) = self.task.as_mut() else {
            return false;
        };
        if task.is_complete() || !task.needs(letter) {
            return false;
        }

        task.fill(letter);
        let display = task.display();
        let complete = task.is_complete();
        self.round.emit(GameEvent::Feedback(Feedback::Correct));
        self.round.emit(GameEvent::TaskText(display));

        if complete {
            self.complete_task();
        }
        true
    }

    /// A letter that is not outstanding was shot
    pub fn on_wrong_letter_hit(&mut self) {
        if !self.round.is_playing() {
            return;
        }
        self.score = self.score.saturating_sub(self.tuning.wrong_hit_penalty);
        self.streak = 0;
        self.round.emit(GameEvent::Feedback(Feedback::Wrong));
    }

    /// An obstacle rammed the ship
    pub fn on_player_hit(&mut self) {
        if !self.round.is_playing() {
            return;
        }
        self.health = self.health.saturating_sub(1);
        self.streak = 0;
        self.round.emit(GameEvent::Feedback(Feedback::PlayerHit));
        log::debug!("Ship hit, health {}", self.health);
        if self.health == 0 {
            self.game_over();
        }
    }

    /// The current row reached the floor with its task unfinished
    pub fn on_boundary_hit(&mut self) {
        if !self.round.is_playing() {
            return;
        }
        let Some(task) = self.task.take() else {
            return;
        };
        if task.is_complete() {
            return;
        }

        log::debug!("Missed {}", task.word());
        self.score = self.score.saturating_sub(self.tuning.miss_penalty);
        self.streak = 0;
        self.task_row = None;
        self.round.clear_field();

        if self.health == 0 {
            self.game_over();
            return;
        }
        self.round
            .schedule(self.tuning.miss_respawn_delay, FitbAction::SpawnNextTask);
    }

    fn complete_task(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        self.task_row = None;
        self.score += self.tuning.word_score;
        self.streak += 1;
        self.words_completed += 1;
        if self.tuning.streak_for_heal > 0 && self.streak % self.tuning.streak_for_heal == 0 {
            self.health = self.health.saturating_add(1).min(self.max_health);
            log::debug!("Streak {}! Health {}", self.streak, self.health);
        }
        self.repo.mark_used(task.word());
        log::info!("Completed {} (score {})", task.word(), self.score);

        self.round.emit(GameEvent::Feedback(Feedback::Explosion));
        self.round.clear_field();
        self.round
            .schedule(self.tuning.next_task_delay, FitbAction::SpawnNextTask);
    }

    fn game_over(&mut self) {
        self.task = None;
        self.task_row = None;
        self.awaiting_word = false;
        self.round
            .enter_game_over(Outcome::Defeat, self.score, self.words_completed);
    }

    /// Draw a word, retrying once after a usage reset
    fn draw_word(&mut self) -> Option<String> {
        if let Some(word) = self.repo.next_word() {
            return Some(word);
        }
        self.repo.reset_usage();
        self.repo.next_word()
    }

    fn spawn_next_task(&mut self) {
        if !self.round.is_playing() {
            return;
        }

        if self.task.is_none() {
            let Some(word) = self.draw_word() else {
                if !self.awaiting_word {
                    log::warn!("No words available, skipping spawn");
                }
                self.awaiting_word = true;
                return;
            };
            match WordTask::random(
                &word,
                &mut self.rng,
                self.tuning.min_blanks,
                self.tuning.max_blanks,
            ) {
                Ok(task) => {
                    log::debug!("New word {} blanks at {:?}", task.word(), task.blank_positions());
                    self.task = Some(task);
                }
                Err(err) => {
                    log::warn!("Skipping word {word:?}: {err}");
                    self.awaiting_word = true;
                    return;
                }
            }
        }
        self.awaiting_word = false;

        let Some(task) = self.task.as_ref() else {
            return;
        };
        let remaining = task.remaining_letters();
        let display = task.display();
        let letters = self.build_row(remaining);

        self.obstacle_speed = self.tuning.fall.duration_for(self.score);
        let row = self.round.field.spawn_row(&letters, self.obstacle_speed);
        self.task_row = Some(row.row);
        self.round.emit(GameEvent::SpawnRow(row));
        self.round.emit(GameEvent::TaskText(display));
    }

    /// Outstanding letters (capped) plus distinct decoys up to the row width, shuffled
    fn build_row(&mut self, remaining: Vec<char>) -> Vec<char> {
        let mut letters: Vec<char> = remaining.into_iter().take(self.tuning.max_targets).collect();
        let alphabet: Vec<char> = ALPHABET.chars().collect();
        while letters.len() < self.tuning.row_width {
            let decoys: Vec<char> = alphabet
                .iter()
                .copied()
                .filter(|c| !letters.contains(c))
                .collect();
            match decoys.choose(&mut self.rng) {
                Some(&decoy) => letters.push(decoy),
                None => break,
            }
        }
        letters.shuffle(&mut self.rng);
        letters
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

        let outstanding = self.task.as_ref().is_some_and(|t| t.needs(letter));
        if outstanding {
            self.round.remove_obstacle(obstacle);
            self.on_correct_letter_hit(letter);
        } else {
            self.on_wrong_letter_hit();
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
        if Some(removed.row) == self.task_row {
            self.on_boundary_hit();
        }
    }
}

impl<R: WordRepository> WordGame for FillInTheBlank<R> {
    fn mode(&self) -> GameMode {
        GameMode::FillInTheBlank
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
        self.streak = 0;
        self.words_completed = 0;
        self.task = None;
        self.task_row = None;
        self.awaiting_word = false;
        self.obstacle_speed = self.tuning.fall.base_duration;
        self.spawn_next_task();
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
                FitbAction::SpawnNextTask => self.spawn_next_task(),
            }
        }

        if !self.round.is_playing() {
            return;
        }
        if self.awaiting_word && self.task.is_none() {
            self.spawn_next_task();
        }
        // A row emptied without reaching the floor (e.g. every letter rammed the ship)
        if let Some(row) = self.task_row {
            if !self.round.field.has_row(row) {
                self.on_boundary_hit();
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
        self.task = None;
        self.task_row = None;
        self.round.end_session();
    }

    fn field(&self) -> &ObstacleField {
        &self.round.field
    }

    fn task_text(&self) -> Option<String> {
        self.task.as_ref().map(WordTask::display)
    }

    fn target_letters(&self) -> Vec<char> {
        self.task
            .as_ref()
            .map(WordTask::remaining_letters)
            .unwrap_or_default()
    }

    fn fall_duration(&self) -> f32 {
        self.obstacle_speed
    }
}
