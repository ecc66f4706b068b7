//! Game phase, obstacle entities and outbound events
//!
//! The obstacle field is the core's record of what the renderer has on
//! screen. Obstacles are typed records keyed by a stable id; the renderer
//! mirrors them and reports contacts back by id.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::GameMode;
use crate::tuning::FieldTuning;

/// Stable id of a tracked entity
pub type EntityId = u32;

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Health ran out
    Defeat,
    /// Every word was played
    Victory,
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Constructed, no round started yet
    Idle,
    /// Active gameplay
    Playing,
    /// Frozen until resumed
    Paused,
    /// 3-2-1-GO between pause and play; cannot itself be paused
    Countdown,
    /// Round ended; terminal until a new game starts
    GameOver(Outcome),
}

impl GamePhase {
    pub fn is_game_over(&self) -> bool {
        matches!(self, GamePhase::GameOver(_))
    }
}

/// Effect hint for sound/haptics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feedback {
    Correct,
    Wrong,
    Explosion,
    PlayerHit,
}

/// One obstacle in a spawn request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpawn {
    pub id: EntityId,
    pub letter: char,
    /// Starting position (above the top edge)
    pub position: Vec2,
}

/// A row of obstacles the renderer should materialize
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnRow {
    /// Row serial, increasing per spawn
    pub row: u32,
    pub obstacles: Vec<ObstacleSpawn>,
    /// Seconds to fall from the top margin to below the floor
    pub fall_duration: f32,
}

/// Everything the core asks of its collaborators, drained once per tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    SpawnRow(SpawnRow),
    RemoveObstacle(EntityId),
    RemoveProjectile(EntityId),
    /// Remove every obstacle still on the field
    ClearRow,
    Feedback(Feedback),
    /// Text for the task banner (masked word, current word, or a status line)
    TaskText(String),
    /// A countdown beat label ("3", "2", "1", "GO!")
    Countdown(String),
    SubmitScore {
        leaderboard: &'static str,
        score: u64,
    },
    ReportAchievement(&'static str),
    NewPersonalBest {
        mode: GameMode,
        score: u64,
    },
    GameOver {
        mode: GameMode,
        outcome: Outcome,
        score: u64,
        words_completed: u32,
    },
}

/// A falling letter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: EntityId,
    pub letter: char,
    /// Row serial this obstacle was spawned with
    pub row: u32,
    pub pos: Vec2,
    /// Downward speed (points/second)
    pub speed: f32,
}

/// All obstacles currently on the field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleField {
    /// Field size (width, height); floor at y = 0, rows enter from the top
    pub size: Vec2,
    pub margin: f32,
    /// Obstacles sorted by id
    pub obstacles: Vec<Obstacle>,
    next_row: u32,
    next_id: EntityId,
}

impl ObstacleField {
    pub fn new(tuning: &FieldTuning) -> Self {
        Self {
            size: Vec2::new(tuning.width, tuning.height),
            margin: tuning.margin,
            obstacles: Vec::new(),
            next_row: 1,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID (shared by obstacles and projectiles)
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Lay out one obstacle per letter evenly across the width, above the top edge
    pub fn spawn_row(&mut self, letters: &[char], fall_duration: f32) -> SpawnRow {
        let row = self.next_row;
        self.next_row += 1;

        let spacing = self.size.x / (letters.len() + 1) as f32;
        let start_y = self.size.y + self.margin;
        let speed = (self.size.y + 2.0 * self.margin) / fall_duration.max(f32::EPSILON);

        let mut spawned = Vec::with_capacity(letters.len());
        for (i, &letter) in letters.iter().enumerate() {
            let id = self.next_entity_id();
            let pos = Vec2::new(spacing * (i + 1) as f32, start_y);
            self.obstacles.push(Obstacle {
                id,
                letter,
                row,
                pos,
                speed,
            });
            spawned.push(ObstacleSpawn {
                id,
                letter,
                position: pos,
            });
        }

        SpawnRow {
            row,
            obstacles: spawned,
            fall_duration,
        }
    }

    pub fn get(&self, id: EntityId) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    pub fn letter_of(&self, id: EntityId) -> Option<char> {
        self.get(id).map(|o| o.letter)
    }

    /// Remove an obstacle, returning it if it was still on the field
    pub fn remove(&mut self, id: EntityId) -> Option<Obstacle> {
        let idx = self.obstacles.iter().position(|o| o.id == id)?;
        Some(self.obstacles.remove(idx))
    }

    pub fn clear(&mut self) {
        self.obstacles.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    /// Whether any obstacle of `row` is still on the field
    pub fn has_row(&self, row: u32) -> bool {
        self.obstacles.iter().any(|o| o.row == row)
    }

    /// Move every obstacle down by its speed
    pub fn advance(&mut self, dt: f32) {
        for obstacle in &mut self.obstacles {
            obstacle.pos.y -= obstacle.speed * dt;
        }
    }

    /// Obstacles that have dropped past the floor
    pub fn below_floor(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter().filter(|o| o.pos.y <= 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> ObstacleField {
        ObstacleField::new(&FieldTuning {
            width: 600.0,
            height: 800.0,
            margin: 40.0,
        })
    }

    #[test]
    fn test_spawn_row_layout() {
        let mut field = field();
        let row = field.spawn_row(&['A', 'B', 'C', 'D', 'E'], 8.0);
        assert_eq!(row.row, 1);
        assert_eq!(row.obstacles.len(), 5);
        assert_eq!(row.obstacles[0].position, Vec2::new(100.0, 840.0));
        assert_eq!(row.obstacles[4].position.x, 500.0);
        let ids: Vec<_> = row.obstacles.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(field.spawn_row(&['F'], 8.0).row, 2);
    }

    #[test]
    fn test_row_crosses_field_in_fall_duration() {
        let mut field = field();
        field.spawn_row(&['A'], 4.0);
        // 880 points in 4 s; the floor is 840 below the spawn line
        field.advance(3.7);
        assert_eq!(field.below_floor().count(), 0);
        field.advance(0.2);
        assert_eq!(field.below_floor().count(), 1);
    }

    #[test]
    fn test_remove_is_once() {
        let mut field = field();
        let row = field.spawn_row(&['X', 'Y'], 8.0);
        let id = row.obstacles[0].id;
        assert_eq!(field.letter_of(id), Some('X'));
        assert!(field.remove(id).is_some());
        assert!(field.remove(id).is_none());
        assert_eq!(field.letter_of(id), None);
        assert!(field.has_row(row.row));
    }

    #[test]
    fn test_ids_keep_increasing_across_rows() {
        let mut field = field();
        field.spawn_row(&['A', 'B'], 8.0);
        field.clear();
        let projectile = field.next_entity_id();
        let row = field.spawn_row(&['C'], 8.0);
        assert_eq!(projectile, 3);
        assert_eq!(row.obstacles[0].id, 4);
        assert_eq!(row.row, 2);
    }
}
