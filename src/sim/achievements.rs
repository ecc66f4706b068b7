//! Per-round achievement guard
//!
//! Each achievement is reported at most once per round, no matter how often
//! the score is checked. The persisted personal best is tracked separately
//! and survives round resets.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::state::GameEvent;
use crate::GameMode;
use crate::consts::{SCORE_ACHIEVEMENT_HIGH, SCORE_ACHIEVEMENT_LOW};

/// Achievements available in every mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Achievement {
    Score100,
    Score1000,
    PersonalRecord,
}

impl Achievement {
    /// Platform identifier for this achievement in `mode`
    pub fn id(self, mode: GameMode) -> &'static str {
        match (self, mode) {
            (Achievement::Score100, GameMode::FillInTheBlank) => "100_score_fill_in_the_blank",
            (Achievement::Score1000, GameMode::FillInTheBlank) => "1000_score_fill_in_the_blank",
            (Achievement::PersonalRecord, GameMode::FillInTheBlank) => {
                "new_personal_record_fill_in_the_blank"
            }
            (Achievement::Score100, GameMode::SortTheLetters) => "100_score_sort_the_letters",
            (Achievement::Score1000, GameMode::SortTheLetters) => "1000_score_sort_the_letters",
            (Achievement::PersonalRecord, GameMode::SortTheLetters) => {
                "new_personal_record_sort_the_letters"
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct AchievementTracker {
    mode: GameMode,
    personal_best: u64,
    reported: BTreeSet<Achievement>,
    score_submitted: bool,
}

impl AchievementTracker {
    pub fn new(mode: GameMode, personal_best: u64) -> Self {
        Self {
            mode,
            personal_best,
            reported: BTreeSet::new(),
            score_submitted: false,
        }
    }

    pub fn personal_best(&self) -> u64 {
        self.personal_best
    }

    pub fn reported(&self) -> &BTreeSet<Achievement> {
        &self.reported
    }

    /// Forget what was reported this round
    pub fn reset_round(&mut self) {
        self.reported.clear();
        self.score_submitted = false;
    }

    /// Report any threshold newly reached by `score`, and a new personal best
    pub fn check(&mut self, score: u64, events: &mut Vec<GameEvent>) {
        if score >= SCORE_ACHIEVEMENT_LOW {
            self.report(Achievement::Score100, events);
        }
        if score >= SCORE_ACHIEVEMENT_HIGH {
            self.report(Achievement::Score1000, events);
        }
        if score > self.personal_best {
            self.personal_best = score;
            log::info!("New {} personal best: {}", self.mode.as_str(), score);
            events.push(GameEvent::NewPersonalBest {
                mode: self.mode,
                score,
            });
            self.report(Achievement::PersonalRecord, events);
        }
    }

    /// Submit the final score of the round (once) and settle achievements
    pub fn settle(&mut self, final_score: u64, events: &mut Vec<GameEvent>) {
        if self.score_submitted {
            return;
        }
        self.score_submitted = true;
        events.push(GameEvent::SubmitScore {
            leaderboard: self.mode.leaderboard_id(),
            score: final_score,
        });
        self.check(final_score, events);
    }

    fn report(&mut self, achievement: Achievement, events: &mut Vec<GameEvent>) {
        if self.reported.insert(achievement) {
            events.push(GameEvent::ReportAchievement(achievement.id(self.mode)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reports(events: &[GameEvent]) -> Vec<&'static str> {
        events
            .iter()
            .filter_map(|e| match e {
                GameEvent::ReportAchievement(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_thresholds_reported_once() {
        let mut tracker = AchievementTracker::new(GameMode::SortTheLetters, 5000);
        let mut events = Vec::new();
        tracker.check(100, &mut events);
        tracker.check(125, &mut events);
        tracker.check(1000, &mut events);
        assert_eq!(
            reports(&events),
            vec!["100_score_sort_the_letters", "1000_score_sort_the_letters"]
        );
    }

    #[test]
    fn test_personal_best_updates_and_reports_once() {
        let mut tracker = AchievementTracker::new(GameMode::FillInTheBlank, 50);
        let mut events = Vec::new();
        tracker.check(75, &mut events);
        tracker.check(90, &mut events);
        assert_eq!(tracker.personal_best(), 90);
        assert_eq!(
            reports(&events),
            vec!["new_personal_record_fill_in_the_blank"]
        );
        let bests = events
            .iter()
            .filter(|e| matches!(e, GameEvent::NewPersonalBest { .. }))
            .count();
        assert_eq!(bests, 2);
    }

    #[test]
    fn test_settle_submits_once_per_round() {
        let mut tracker = AchievementTracker::new(GameMode::FillInTheBlank, 0);
        let mut events = Vec::new();
        tracker.settle(150, &mut events);
        tracker.settle(150, &mut events);
        let submits = events
            .iter()
            .filter(|e| matches!(e, GameEvent::SubmitScore { .. }))
            .count();
        assert_eq!(submits, 1);
        assert_eq!(reports(&events).len(), 2);

        tracker.reset_round();
        events.clear();
        tracker.settle(150, &mut events);
        assert_eq!(
            events[0],
            GameEvent::SubmitScore {
                leaderboard: "fill_in_the_blank_leaderboard",
                score: 150
            }
        );
        // 150 is no longer above the best set last round
        assert_eq!(reports(&events), vec!["100_score_fill_in_the_blank"]);
    }

    #[test]
    fn test_zero_score_is_not_a_record() {
        let mut tracker = AchievementTracker::new(GameMode::SortTheLetters, 0);
        let mut events = Vec::new();
        tracker.settle(0, &mut events);
        assert!(reports(&events).is_empty());
    }
}
