//! Round clock shared by both modes
//!
//! Time only moves through `Round::advance`. Delayed actions capture the
//! round generation when scheduled; the generation is bumped on every new
//! round, game over and session end, and an action whose generation no
//! longer matches is dropped when it comes due.

use std::collections::BTreeSet;

use super::achievements::AchievementTracker;
use super::state::{EntityId, GameEvent, GamePhase, Obstacle, ObstacleField, Outcome};
use crate::GameMode;
use crate::tuning::{Beat, Tuning};

/// An action waiting for its delay to elapse
#[derive(Debug, Clone)]
struct Delayed<A> {
    remaining: f32,
    generation: u32,
    action: A,
}

/// A delayed action that came due, tagged with the generation it was scheduled in
#[derive(Debug, Clone, PartialEq)]
pub struct Due<A> {
    pub generation: u32,
    pub action: A,
}

/// Pending delayed actions
#[derive(Debug, Clone)]
pub struct Timers<A> {
    pending: Vec<Delayed<A>>,
}

impl<A> Default for Timers<A> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<A> Timers<A> {
    pub fn schedule(&mut self, delay: f32, generation: u32, action: A) {
        self.pending.push(Delayed {
            remaining: delay.max(0.0),
            generation,
            action,
        });
    }

    /// Count every timer down by `dt` and return those that came due, in
    /// scheduling order
    pub fn advance(&mut self, dt: f32) -> Vec<Due<A>> {
        let mut due = Vec::new();
        let mut still_pending = Vec::with_capacity(self.pending.len());
        for mut delayed in self.pending.drain(..) {
            delayed.remaining -= dt;
            if delayed.remaining <= 0.0 {
                due.push(Due {
                    generation: delayed.generation,
                    action: delayed.action,
                });
            } else {
                still_pending.push(delayed);
            }
        }
        self.pending = still_pending;
        due
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

/// The 3-2-1-GO sequence played on resume
#[derive(Debug, Clone)]
pub struct Countdown {
    beats: Vec<Beat>,
    index: usize,
    elapsed: f32,
}

impl Countdown {
    pub fn new(beats: Vec<Beat>) -> Self {
        let index = beats.len();
        Self {
            beats,
            index,
            elapsed: 0.0,
        }
    }

    /// Restart from the first beat, returning its label
    pub fn start(&mut self) -> Option<&str> {
        self.index = 0;
        self.elapsed = 0.0;
        self.beats.first().map(|b| b.label.as_str())
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.beats.len()
    }

    /// Advance the countdown; returns labels of beats that started during `dt`
    pub fn advance(&mut self, dt: f32) -> Vec<String> {
        let mut started = Vec::new();
        self.elapsed += dt;
        while let Some(beat) = self.beats.get(self.index) {
            if self.elapsed < beat.duration {
                break;
            }
            self.elapsed -= beat.duration;
            self.index += 1;
            if let Some(next) = self.beats.get(self.index) {
                started.push(next.label.clone());
            }
        }
        started
    }
}

/// Phase, clock, field and outbound queue of one game session
#[derive(Debug, Clone)]
pub struct Round<A> {
    mode: GameMode,
    phase: GamePhase,
    generation: u32,
    timers: Timers<A>,
    countdown: Countdown,
    /// Obstacles currently on screen
    pub field: ObstacleField,
    projectiles: BTreeSet<EntityId>,
    events: Vec<GameEvent>,
    pub achievements: AchievementTracker,
    detached: bool,
}

impl<A> Round<A> {
    pub fn new(mode: GameMode, tuning: &Tuning, personal_best: u64) -> Self {
        Self {
            mode,
            phase: GamePhase::Idle,
            generation: 0,
            timers: Timers::default(),
            countdown: Countdown::new(tuning.countdown.clone()),
            field: ObstacleField::new(&tuning.field),
            projectiles: BTreeSet::new(),
            events: Vec::new(),
            achievements: AchievementTracker::new(mode, personal_best),
            detached: false,
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Gameplay input and contacts are only accepted while playing
    pub fn is_playing(&self) -> bool {
        !self.detached && self.phase == GamePhase::Playing
    }

    /// Whether an action scheduled in `generation` may still fire
    pub fn is_current(&self, generation: u32) -> bool {
        self.is_playing() && generation == self.generation
    }

    pub fn emit(&mut self, event: GameEvent) {
        if !self.detached {
            self.events.push(event);
        }
    }

    /// Take every event queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Start a fresh round: drops pending actions, clears the field and the
    /// per-round achievement guard
    pub fn begin(&mut self) -> bool {
        if self.detached {
            return false;
        }
        self.generation = self.generation.wrapping_add(1);
        self.timers.clear();
        self.field.clear();
        self.projectiles.clear();
        self.achievements.reset_round();
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::ClearRow);
        log::info!("{} round {} started", self.mode.as_str(), self.generation);
        true
    }

    pub fn pause(&mut self) -> bool {
        if !self.is_playing() {
            return false;
        }
        self.phase = GamePhase::Paused;
        log::debug!("{} paused", self.mode.as_str());
        true
    }

    /// Leave the pause through the countdown
    pub fn resume(&mut self) -> bool {
        if self.detached || self.phase != GamePhase::Paused {
            return false;
        }
        match self.countdown.start().map(str::to_string) {
            Some(label) => {
                self.phase = GamePhase::Countdown;
                self.events.push(GameEvent::Countdown(label));
            }
            None => self.phase = GamePhase::Playing,
        }
        true
    }

    /// Advance the clock by `dt`. Obstacles and timers only move while
    /// playing; the countdown runs on its own.
    pub fn advance(&mut self, dt: f32) -> Vec<Due<A>> {
        if self.detached {
            return Vec::new();
        }
        match self.phase {
            GamePhase::Countdown => {
                for label in self.countdown.advance(dt) {
                    self.events.push(GameEvent::Countdown(label));
                }
                if self.countdown.is_finished() {
                    self.phase = GamePhase::Playing;
                    log::debug!("{} resumed", self.mode.as_str());
                }
                Vec::new()
            }
            GamePhase::Playing => {
                self.field.advance(dt);
                self.timers.advance(dt)
            }
            _ => Vec::new(),
        }
    }

    /// Report achievements reached by `score` mid-round
    pub fn check_achievements(&mut self, score: u64) {
        if !self.detached {
            self.achievements.check(score, &mut self.events);
        }
    }

    /// Run `action` after `delay` seconds of play, unless the round moves on first
    pub fn schedule(&mut self, delay: f32, action: A) {
        self.timers.schedule(delay, self.generation, action);
    }

    /// Register a new projectile and return its id
    pub fn fire_projectile(&mut self) -> Option<EntityId> {
        if !self.is_playing() {
            return None;
        }
        let id = self.field.next_entity_id();
        self.projectiles.insert(id);
        Some(id)
    }

    /// Whether `id` is a projectile still in flight
    pub fn is_live_projectile(&self, id: EntityId) -> bool {
        self.projectiles.contains(&id)
    }

    /// Take a projectile out of play; false if it was unknown or already spent
    pub fn retire_projectile(&mut self, id: EntityId) -> bool {
        if self.projectiles.remove(&id) {
            self.events.push(GameEvent::RemoveProjectile(id));
            true
        } else {
            false
        }
    }

    /// Remove an obstacle from the field and tell the renderer
    pub fn remove_obstacle(&mut self, id: EntityId) -> Option<Obstacle> {
        let obstacle = self.field.remove(id)?;
        self.events.push(GameEvent::RemoveObstacle(id));
        Some(obstacle)
    }

    /// Clear every obstacle still on the field
    pub fn clear_field(&mut self) {
        self.field.clear();
        self.events.push(GameEvent::ClearRow);
    }

    /// Enter game over. Only the first call per round has any effect: the
    /// final score is submitted once and achievements are settled once.
    pub fn enter_game_over(&mut self, outcome: Outcome, score: u64, words_completed: u32) -> bool {
        if self.detached || self.phase.is_game_over() {
            return false;
        }
        self.generation = self.generation.wrapping_add(1);
        self.timers.clear();
        self.projectiles.clear();
        self.clear_field();
        self.phase = GamePhase::GameOver(outcome);
        self.achievements.settle(score, &mut self.events);
        self.events.push(GameEvent::GameOver {
            mode: self.mode,
            outcome,
            score,
            words_completed,
        });
        log::info!(
            "{} game over ({:?}), final score {}",
            self.mode.as_str(),
            outcome,
            score
        );
        true
    }

    /// Tear the session down: nothing scheduled fires and no call has any
    /// effect afterwards
    pub fn end_session(&mut self) {
        if self.detached {
            return;
        }
        self.generation = self.generation.wrapping_add(1);
        self.timers.clear();
        self.field.clear();
        self.projectiles.clear();
        self.events.clear();
        self.phase = GamePhase::Idle;
        self.detached = true;
        log::info!("{} session ended", self.mode.as_str());
    }
}
