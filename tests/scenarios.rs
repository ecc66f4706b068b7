//! Whole-game scenarios driven through the public API

use proptest::prelude::*;

use word_invaders::bridge::{BridgeCall, Recorder};
use word_invaders::sim::{
    Body, Contact, FillInTheBlank, GameEvent, GamePhase, Outcome, SortTheLetters, WordGame,
};
use word_invaders::word::{InMemoryWordRepository, WordTask};
use word_invaders::{GameMode, HighScores, Session, Settings, Tuning};

fn fitb(words: &[&str]) -> FillInTheBlank<InMemoryWordRepository> {
    FillInTheBlank::new(
        InMemoryWordRepository::new(words.iter(), 11),
        &Tuning::default(),
        0,
        11,
    )
}

fn stl(words: &[&str], tuning: &Tuning) -> SortTheLetters {
    SortTheLetters::in_order(words.iter(), tuning, 0, 11)
}

/// Fire at the first obstacle carrying `letter`
fn shoot(game: &mut dyn WordGame, letter: char) {
    let obstacle = game
        .field()
        .obstacles
        .iter()
        .find(|o| o.letter == letter)
        .map(|o| o.id)
        .expect("letter on field");
    let projectile = game.fire_projectile().expect("playing");
    game.notify_contact(Contact::new(
        Body::projectile(projectile),
        Body::obstacle(obstacle),
    ));
}

fn count(events: &[GameEvent], pred: impl Fn(&GameEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}

#[test]
fn scenario_a_single_blank_completes_word() {
    let mut task = WordTask::new("CAT", [1]).unwrap();
    assert_eq!(task.display(), "C_T");
    task.fill('A');
    assert!(task.is_complete());
    assert_eq!(task.display(), "CAT");

    let mut game = fitb(&["cat"]);
    game.start_new_game();
    for letter in game.target_letters() {
        shoot(&mut game, letter);
    }
    assert_eq!(game.score(), 25);
    assert_eq!(game.words_completed(), 1);
}

#[test]
fn scenario_b_ordered_shooting() {
    let tuning = Tuning::default();
    let mut game = stl(&["dog", "cat"], &tuning);
    game.start_new_game();
    for letter in ['D', 'O', 'G'] {
        shoot(&mut game, letter);
    }
    assert_eq!(game.score(), 25);
    game.tick(tuning.stl.advance_delay);
    assert_eq!(game.current_word(), "CAT");

    let mut fresh = stl(&["dog", "cat"], &tuning);
    fresh.start_new_game();
    shoot(&mut fresh, 'G');
    assert_eq!(fresh.score(), 0);
    assert_eq!(fresh.letter_index(), 0);
    assert_eq!(fresh.field().len(), 3);
}

#[test]
fn scenario_c_five_hits_end_the_game_once() {
    let mut game = fitb(&["cat", "dog"]);
    game.start_new_game();
    game.drain_events();
    for _ in 0..5 {
        game.on_player_hit();
    }
    assert_eq!(game.health(), 0);
    assert_eq!(game.phase(), GamePhase::GameOver(Outcome::Defeat));

    game.on_player_hit();
    game.on_boundary_hit();
    game.tick(5.0);
    let events = game.drain_events();
    assert_eq!(count(&events, |e| matches!(e, GameEvent::GameOver { .. })), 1);
    assert_eq!(count(&events, |e| matches!(e, GameEvent::SubmitScore { .. })), 1);
}

#[test]
fn scenario_d_last_heart_lost_at_the_floor() {
    let tuning = Tuning {
        max_health: 1,
        ..Tuning::default()
    };
    let recorder = Recorder::new();
    let game = stl(&["dog", "cat"], &tuning);
    let mut session = Session::new(
        Box::new(game),
        recorder.bridges(),
        Settings::default(),
        HighScores::new(),
        1,
    );
    session.start();

    let ids: Vec<_> = session
        .game()
        .field()
        .obstacles
        .iter()
        .map(|o| o.id)
        .collect();
    for id in ids {
        session.notify_contact(Contact::new(Body::obstacle(id), Body::boundary()));
    }
    session.tick(0.1);

    assert_eq!(session.game().health(), 0);
    assert_eq!(
        session.game().phase(),
        GamePhase::GameOver(Outcome::Defeat)
    );
    assert_eq!(recorder.submitted(GameMode::SortTheLetters), vec![0]);
    let overs = recorder
        .calls()
        .iter()
        .filter(|c| matches!(c, BridgeCall::GameOver { .. }))
        .count();
    assert_eq!(overs, 1);
    assert_eq!(session.high_scores().sessions.len(), 1);
}

#[test]
fn pause_freezes_the_game() {
    let tuning = Tuning::default();
    let mut game = fitb(&["cat", "dog"]);
    game.start_new_game();
    game.tick(1.0);
    let projectile = game.fire_projectile().unwrap();

    game.pause();
    let snapshot: Vec<_> = game.field().obstacles.iter().map(|o| o.pos).collect();
    let (score, health) = (game.score(), game.health());

    game.tick(10.0);
    let first = game.field().obstacles[0].id;
    game.notify_contact(Contact::new(Body::player(), Body::obstacle(first)));
    game.notify_contact(Contact::new(
        Body::projectile(projectile),
        Body::obstacle(first),
    ));
    game.on_wrong_letter_hit();

    game.resume();
    assert_eq!(game.phase(), GamePhase::Countdown);
    game.pause();
    game.tick(tuning.countdown_length() - 0.1);
    assert_eq!(game.phase(), GamePhase::Countdown);

    let now: Vec<_> = game.field().obstacles.iter().map(|o| o.pos).collect();
    assert_eq!(now, snapshot);
    assert_eq!((game.score(), game.health()), (score, health));

    game.tick(0.2);
    assert_eq!(game.phase(), GamePhase::Playing);
}

#[test]
fn countdown_beats_reach_the_scene() {
    let recorder = Recorder::new();
    let game = fitb(&["cat"]);
    let mut session = Session::new(
        Box::new(game),
        recorder.bridges(),
        Settings::default(),
        HighScores::new(),
        1,
    );
    session.start();
    session.pause();
    session.resume();
    for _ in 0..4 {
        session.tick(1.0);
    }
    let beats: Vec<_> = recorder
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            BridgeCall::Countdown(beat) => Some(beat),
            _ => None,
        })
        .collect();
    assert_eq!(beats, vec!["3", "2", "1", "GO!"]);
    assert!(session.game().is_playing());
}

#[test]
fn reset_drops_pending_spawn() {
    let mut game = fitb(&["cat", "dog"]);
    game.start_new_game();
    for letter in game.target_letters() {
        shoot(&mut game, letter);
    }
    game.reset_game();
    game.drain_events();
    assert_eq!(game.score(), 0);
    assert_eq!(game.field().len(), 5);

    // The completion's delayed spawn belonged to the previous round
    game.tick(1.5);
    let spawns = count(&game.drain_events(), |e| matches!(e, GameEvent::SpawnRow(_)));
    assert_eq!(spawns, 0);
}

#[test]
fn ended_session_ignores_everything() {
    let mut game = fitb(&["cat"]);
    game.start_new_game();
    for letter in game.target_letters() {
        shoot(&mut game, letter);
    }
    game.end_session();
    game.tick(5.0);
    game.start_new_game();
    game.on_player_hit();
    assert!(game.drain_events().is_empty());
    assert!(game.field().is_empty());
    assert_eq!(game.health(), 5);
    assert_eq!(game.fire_projectile(), None);
}

#[derive(Debug, Clone)]
enum Op {
    WrongHit,
    PlayerHit,
    BoundaryHit,
    Complete,
    Tick(f32),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::WrongHit),
        Just(Op::PlayerHit),
        Just(Op::BoundaryHit),
        Just(Op::Complete),
        (0.0f32..2.0).prop_map(Op::Tick),
    ]
}

proptest! {
    #[test]
    fn fitb_score_and_health_stay_in_range(ops in prop::collection::vec(op(), 0..60)) {
        let mut game = fitb(&["cat", "dog", "owl"]);
        game.start_new_game();
        let mut submits = 0;
        for op in ops {
            match op {
                Op::WrongHit => game.on_wrong_letter_hit(),
                Op::PlayerHit => game.on_player_hit(),
                Op::BoundaryHit => game.on_boundary_hit(),
                Op::Complete => {
                    for letter in game.target_letters() {
                        game.on_correct_letter_hit(letter);
                    }
                }
                Op::Tick(dt) => game.tick(dt),
            }
            submits += count(&game.drain_events(), |e| matches!(e, GameEvent::SubmitScore { .. }));
            prop_assert!(game.health() <= 5);
            prop_assert!(game.score() <= 25 * u64::from(game.words_completed()));
            prop_assert_eq!(game.health() == 0, game.is_game_over());
        }
        prop_assert!(submits <= 1);
    }

    #[test]
    fn stl_score_never_underflows(wrong in 0usize..20, hits in 0usize..8) {
        let words = ["dog", "cat", "owl", "bee", "ant", "elk", "fox", "yak"];
        let mut game = stl(&words, &Tuning::default());
        game.start_new_game();
        for _ in 0..wrong {
            game.on_wrong_letter_shot();
        }
        for _ in 0..hits {
            game.on_player_hit();
        }
        prop_assert_eq!(game.score(), 0);
        prop_assert!(game.health() <= 5);
        prop_assert_eq!(game.health() == 0, game.phase() == GamePhase::GameOver(Outcome::Defeat));
    }
}
