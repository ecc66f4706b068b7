//! Collaborator interfaces
//!
//! The core never talks to the renderer, the platform scoreboard or the
//! audio/haptics layer directly. It queues `GameEvent`s; `Bridges::dispatch`
//! routes them here once per tick.

use std::cell::RefCell;
use std::rc::Rc;

use crate::GameMode;
use crate::settings::Settings;
use crate::sim::{EntityId, Feedback, GameEvent, Outcome, SpawnRow};

/// The renderer / physics scene
pub trait SceneBridge {
    fn spawn_row(&mut self, row: &SpawnRow);
    fn remove_obstacle(&mut self, id: EntityId);
    fn remove_projectile(&mut self, id: EntityId);
    /// Remove every obstacle on screen
    fn clear_row(&mut self);
    fn show_task(&mut self, text: &str);
    fn show_countdown(&mut self, beat: &str);
    fn show_game_over(&mut self, _outcome: Outcome, _score: u64, _motivation: &str) {}
}

/// Platform leaderboards and achievements
pub trait ScoreboardBridge {
    fn submit_score(&mut self, leaderboard: &str, score: u64);
    fn report_achievement(&mut self, id: &str);
}

/// Fire-and-forget sound and haptic effects
pub trait FeedbackSink {
    fn play(&mut self, cue: Cue);
}

/// A feedback hint with the channels the player's settings leave open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cue {
    pub feedback: Feedback,
    pub sound: bool,
    pub haptic: bool,
    pub flash: bool,
}

impl Cue {
    /// `None` when the settings silence every channel
    pub fn for_settings(feedback: Feedback, settings: &Settings) -> Option<Self> {
        let cue = Self {
            feedback,
            sound: settings.plays_sound(feedback),
            haptic: settings.plays_haptic(feedback),
            flash: settings.flashes(feedback),
        };
        (cue.sound || cue.haptic || cue.flash).then_some(cue)
    }
}

/// The three collaborators of one session
pub struct Bridges {
    pub scene: Box<dyn SceneBridge>,
    pub scoreboard: Box<dyn ScoreboardBridge>,
    pub feedback: Box<dyn FeedbackSink>,
}

impl Bridges {
    pub fn new(
        scene: Box<dyn SceneBridge>,
        scoreboard: Box<dyn ScoreboardBridge>,
        feedback: Box<dyn FeedbackSink>,
    ) -> Self {
        Self {
            scene,
            scoreboard,
            feedback,
        }
    }

    /// Bridges that only log what they are asked to do
    pub fn logging() -> Self {
        Self::new(
            Box::new(LogScene),
            Box::new(LogScoreboard),
            Box::new(LogFeedback),
        )
    }

    /// Route events to the collaborators. `NewPersonalBest` and `GameOver`
    /// belong to the session and are handed back, in order.
    pub fn dispatch(
        &mut self,
        events: impl IntoIterator<Item = GameEvent>,
        settings: &Settings,
    ) -> Vec<GameEvent> {
        let mut unrouted = Vec::new();
        for event in events {
            match event {
                GameEvent::SpawnRow(row) => self.scene.spawn_row(&row),
                GameEvent::RemoveObstacle(id) => self.scene.remove_obstacle(id),
                GameEvent::RemoveProjectile(id) => self.scene.remove_projectile(id),
                GameEvent::ClearRow => self.scene.clear_row(),
                GameEvent::TaskText(text) => self.scene.show_task(&text),
                GameEvent::Countdown(beat) => self.scene.show_countdown(&beat),
                GameEvent::Feedback(feedback) => {
                    if let Some(cue) = Cue::for_settings(feedback, settings) {
                        self.feedback.play(cue);
                    }
                }
                GameEvent::SubmitScore { leaderboard, score } => {
                    self.scoreboard.submit_score(leaderboard, score)
                }
                GameEvent::ReportAchievement(id) => self.scoreboard.report_achievement(id),
                other @ (GameEvent::NewPersonalBest { .. } | GameEvent::GameOver { .. }) => {
                    unrouted.push(other)
                }
            }
        }
        unrouted
    }
}

pub struct LogScene;

impl SceneBridge for LogScene {
    fn spawn_row(&mut self, row: &SpawnRow) {
        let letters: String = row.obstacles.iter().map(|o| o.letter).collect();
        log::info!(
            "[scene] row {}: {} falling over {:.1}s",
            row.row,
            letters,
            row.fall_duration
        );
    }

    fn remove_obstacle(&mut self, id: EntityId) {
        log::debug!("[scene] remove obstacle {id}");
    }

    fn remove_projectile(&mut self, id: EntityId) {
        log::trace!("[scene] remove projectile {id}");
    }

    fn clear_row(&mut self) {
        log::debug!("[scene] clear row");
    }

    fn show_task(&mut self, text: &str) {
        log::info!("[scene] task {text}");
    }

    fn show_countdown(&mut self, beat: &str) {
        log::info!("[scene] {beat}");
    }

    fn show_game_over(&mut self, outcome: Outcome, score: u64, motivation: &str) {
        log::info!("[scene] game over ({outcome:?}) score {score}. {motivation}");
    }
}

pub struct LogScoreboard;

impl ScoreboardBridge for LogScoreboard {
    fn submit_score(&mut self, leaderboard: &str, score: u64) {
        log::info!("[scoreboard] submit {score} to {leaderboard}");
    }

    fn report_achievement(&mut self, id: &str) {
        log::info!("[scoreboard] achievement {id}");
    }
}

pub struct LogFeedback;

impl FeedbackSink for LogFeedback {
    fn play(&mut self, cue: Cue) {
        log::debug!("[feedback] {cue:?}");
    }
}

/// Everything a bridge was asked to do, in order
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeCall {
    SpawnRow(SpawnRow),
    RemoveObstacle(EntityId),
    RemoveProjectile(EntityId),
    ClearRow,
    ShowTask(String),
    Countdown(String),
    GameOver { outcome: Outcome, score: u64 },
    SubmitScore { leaderboard: String, score: u64 },
    Achievement(String),
    Cue(Cue),
}

/// Records every bridge call into a shared log, for tests and replays
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    calls: Rc<RefCell<Vec<BridgeCall>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// All three bridges writing to this recorder
    pub fn bridges(&self) -> Bridges {
        Bridges::new(
            Box::new(self.clone()),
            Box::new(self.clone()),
            Box::new(self.clone()),
        )
    }

    pub fn calls(&self) -> Vec<BridgeCall> {
        self.calls.borrow().clone()
    }

    pub fn take(&self) -> Vec<BridgeCall> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }

    pub fn submitted(&self, mode: GameMode) -> Vec<u64> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                BridgeCall::SubmitScore { leaderboard, score }
                    if leaderboard == mode.leaderboard_id() =>
                {
                    Some(*score)
                }
                _ => None,
            })
            .collect()
    }

    pub fn achievements(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                BridgeCall::Achievement(id) => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    fn push(&self, call: BridgeCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl SceneBridge for Recorder {
    fn spawn_row(&mut self, row: &SpawnRow) {
        self.push(BridgeCall::SpawnRow(row.clone()));
    }

    fn remove_obstacle(&mut self, id: EntityId) {
        self.push(BridgeCall::RemoveObstacle(id));
    }

    fn remove_projectile(&mut self, id: EntityId) {
        self.push(BridgeCall::RemoveProjectile(id));
    }

    fn clear_row(&mut self) {
        self.push(BridgeCall::ClearRow);
    }

    fn show_task(&mut self, text: &str) {
        self.push(BridgeCall::ShowTask(text.to_string()));
    }

    fn show_countdown(&mut self, beat: &str) {
        self.push(BridgeCall::Countdown(beat.to_string()));
    }

    fn show_game_over(&mut self, outcome: Outcome, score: u64, _motivation: &str) {
        self.push(BridgeCall::GameOver { outcome, score });
    }
}

impl ScoreboardBridge for Recorder {
    fn submit_score(&mut self, leaderboard: &str, score: u64) {
        self.push(BridgeCall::SubmitScore {
            leaderboard: leaderboard.to_string(),
            score,
        });
    }

    fn report_achievement(&mut self, id: &str) {
        self.push(BridgeCall::Achievement(id.to_string()));
    }
}

impl FeedbackSink for Recorder {
    fn play(&mut self, cue: Cue) {
        self.push(BridgeCall::Cue(cue));
    }
}
