//! Gameplay simulation
//!
//! All gameplay logic lives here and owns no rendering or platform state:
//! - Time only moves through `tick(dt)`
//! - Seeded RNG only
//! - Outbound requests are queued as `GameEvent`s and drained by the driver

pub mod achievements;
pub mod collision;
pub mod fitb;
pub mod state;
pub mod stl;
pub mod tick;

pub use achievements::{Achievement, AchievementTracker};
pub use collision::{Body, Contact, EntityKind, Interaction};
pub use fitb::FillInTheBlank;
pub use state::{
    EntityId, Feedback, GameEvent, GamePhase, Obstacle, ObstacleField, ObstacleSpawn, Outcome,
    SpawnRow,
};
pub use stl::SortTheLetters;
pub use tick::{Countdown, Due, Round, Timers};

use crate::GameMode;

/// Operations shared by both game modes, driven by the host loop
pub trait WordGame {
    fn mode(&self) -> GameMode;
    fn phase(&self) -> GamePhase;
    fn score(&self) -> u64;
    fn health(&self) -> u8;
    fn words_completed(&self) -> u32;

    /// Reset score and health, drop anything pending and put up the first task
    fn start_new_game(&mut self);

    /// Start over from any phase
    fn reset_game(&mut self) {
        self.start_new_game();
    }

    fn pause(&mut self);

    /// Leave a pause through the countdown
    fn resume(&mut self);

    /// Advance the game clock by `dt` seconds
    fn tick(&mut self, dt: f32);

    /// Resolve a contact reported by the physics engine
    fn notify_contact(&mut self, contact: Contact);

    /// Register a projectile leaving the ship; `None` unless playing
    fn fire_projectile(&mut self) -> Option<EntityId>;

    /// Take every event queued since the last drain
    fn drain_events(&mut self) -> Vec<GameEvent>;

    /// Detach from the scene; nothing fires afterwards
    fn end_session(&mut self);

    fn field(&self) -> &ObstacleField;

    /// Text of the task banner, if a task is up
    fn task_text(&self) -> Option<String>;

    /// Letters that would currently count as a correct hit
    fn target_letters(&self) -> Vec<char>;

    /// Fall duration of the most recent row in seconds (lower is harder)
    fn fall_duration(&self) -> f32;

    fn is_game_over(&self) -> bool {
        self.phase().is_game_over()
    }

    fn is_playing(&self) -> bool {
        self.phase() == GamePhase::Playing
    }
}
