//! Word Invaders headless runner
//!
//! Plays one round of either mode with an autopilot pilot and a minimal
//! physics step standing in for the renderer, logging all bridge traffic.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use word_invaders::bridge::Bridges;
use word_invaders::consts::FRAME_DT;
use word_invaders::sim::{Body, Contact, EntityId, GamePhase};
use word_invaders::word::{DEFAULT_WORDS, InMemoryWordRepository};
use word_invaders::{GameMode, HighScores, Result, Session, Settings, Tuning};

/// Projectile speed (points/second)
const SHOT_SPEED: f32 = 900.0;
/// Contact radius between a projectile and an obstacle
const HIT_RADIUS: f32 = 24.0;
/// Ship's height above the floor and its contact radius
const SHIP_Y: f32 = 60.0;
const SHIP_RADIUS: f32 = 28.0;
/// Seconds between shots
const FIRE_INTERVAL: f32 = 0.3;

#[derive(Parser, Debug)]
#[command(name = "word-invaders")]
#[command(about = "Play one headless round of Word Invaders with an autopilot")]
struct Cli {
    #[arg(long, value_enum, default_value_t = CliMode::Fitb)]
    mode: CliMode,
    #[arg(long, default_value_t = 7)]
    seed: u64,
    /// Chance (0..1) that the autopilot aims at a wanted letter
    #[arg(long, default_value_t = 0.85)]
    accuracy: f64,
    /// Word list, one word per line
    #[arg(long)]
    words: Option<PathBuf>,
    #[arg(long)]
    tuning: Option<PathBuf>,
    #[arg(long)]
    highscores: Option<PathBuf>,
    #[arg(long)]
    settings: Option<PathBuf>,
    #[arg(long, default_value_t = 300.0)]
    max_seconds: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
enum CliMode {
    /// Fill in the Blank
    Fitb,
    /// Sort the Letters
    Stl,
}

impl From<CliMode> for GameMode {
    fn from(value: CliMode) -> Self {
        match value {
            CliMode::Fitb => GameMode::FillInTheBlank,
            CliMode::Stl => GameMode::SortTheLetters,
        }
    }
}

/// A shot in flight
struct Shot {
    id: EntityId,
    pos: Vec2,
}

/// Stands in for the renderer's physics: moves shots, detects overlaps and
/// reports them as contacts
struct Autopilot {
    rng: Pcg32,
    accuracy: f64,
    shots: Vec<Shot>,
    cooldown: f32,
    ceiling: f32,
}

impl Autopilot {
    fn new(seed: u64, accuracy: f64, ceiling: f32) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed ^ 0x5eed),
            accuracy,
            shots: Vec::new(),
            cooldown: 0.0,
            ceiling,
        }
    }

    /// Aim at a wanted letter (or, on a fumble, any other obstacle) and fire
    fn aim_and_fire(&mut self, session: &mut Session) {
        self.cooldown -= FRAME_DT;
        if self.cooldown > 0.0 || session.game().phase() != GamePhase::Playing {
            return;
        }
        let targets = session.game().target_letters();
        let field = session.game().field();
        let wanted: Vec<Vec2> = field
            .obstacles
            .iter()
            .filter(|o| targets.contains(&o.letter))
            .map(|o| o.pos)
            .collect();
        let others: Vec<Vec2> = field
            .obstacles
            .iter()
            .filter(|o| !targets.contains(&o.letter))
            .map(|o| o.pos)
            .collect();

        let fumble = !self.rng.random_bool(self.accuracy);
        let pool = if fumble && !others.is_empty() {
            &others
        } else {
            &wanted
        };
        let Some(&aim) = pool.first() else {
            return;
        };
        if let Some(id) = session.fire() {
            self.shots.push(Shot {
                id,
                pos: Vec2::new(aim.x, SHIP_Y),
            });
            self.cooldown = FIRE_INTERVAL;
        }
    }

    fn step(&mut self, session: &mut Session) {
        let mut contacts = Vec::new();
        let obstacles = &session.game().field().obstacles;

        self.shots.retain_mut(|shot| {
            shot.pos.y += SHOT_SPEED * FRAME_DT;
            if let Some(hit) = obstacles
                .iter()
                .find(|o| o.pos.distance(shot.pos) <= HIT_RADIUS)
            {
                contacts.push(Contact::new(Body::projectile(shot.id), Body::obstacle(hit.id)));
                return false;
            }
            if shot.pos.y > self.ceiling {
                contacts.push(Contact::new(Body::projectile(shot.id), Body::boundary()));
                return false;
            }
            true
        });

        let field = session.game().field();
        let ship = Vec2::new(field.size.x / 2.0, SHIP_Y);
        let mut rammed = BTreeSet::new();
        for obstacle in obstacles {
            if obstacle.pos.distance(ship) <= SHIP_RADIUS {
                rammed.insert(obstacle.id);
                contacts.push(Contact::new(Body::player(), Body::obstacle(obstacle.id)));
            }
        }
        for obstacle in field.below_floor() {
            if !rammed.contains(&obstacle.id) {
                contacts.push(Contact::new(Body::obstacle(obstacle.id), Body::boundary()));
            }
        }

        for contact in contacts {
            session.notify_contact(contact);
        }
    }
}

fn build_session(cli: &Cli) -> Result<Session> {
    let tuning = match &cli.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    let settings = cli
        .settings
        .as_ref()
        .map(Settings::load_or_default)
        .unwrap_or_default();
    let scores = cli
        .highscores
        .as_ref()
        .map(HighScores::load_or_default)
        .unwrap_or_default();

    let session = match GameMode::from(cli.mode) {
        GameMode::FillInTheBlank => {
            let repo = match &cli.words {
                Some(path) => InMemoryWordRepository::load(path, cli.seed)?,
                None => InMemoryWordRepository::with_defaults(cli.seed),
            };
            Session::fill_in_the_blank(
                repo,
                &tuning,
                Bridges::logging(),
                settings,
                scores,
                cli.seed,
            )
        }
        GameMode::SortTheLetters => {
            let words: Vec<String> = match &cli.words {
                Some(path) => std::fs::read_to_string(path)?
                    .lines()
                    .map(str::to_string)
                    .collect(),
                None => DEFAULT_WORDS.iter().map(|w| w.to_string()).collect(),
            };
            Session::sort_the_letters(
                words,
                &tuning,
                Bridges::logging(),
                settings,
                scores,
                cli.seed,
            )
        }
    };

    Ok(match &cli.highscores {
        Some(path) => session.with_scores_path(path),
        None => session,
    })
}

fn run(cli: &Cli) -> Result<()> {
    let mode = GameMode::from(cli.mode);
    let mut session = build_session(cli)?;
    let mut pilot = Autopilot::new(cli.seed, cli.accuracy.clamp(0.0, 1.0), {
        let size = session.game().field().size;
        size.y + session.game().field().margin
    });

    session.start();
    let mut elapsed = 0.0;
    while elapsed < cli.max_seconds && !session.game().is_game_over() {
        pilot.aim_and_fire(&mut session);
        pilot.step(&mut session);
        session.tick(FRAME_DT);
        elapsed += FRAME_DT;
    }

    let game = session.game();
    println!(
        "{}: {:?} after {:.1}s, score {}, words {}, health {}",
        mode.as_str(),
        game.phase(),
        elapsed,
        game.score(),
        game.words_completed(),
        game.health()
    );
    if let Some(line) = session.motivation() {
        println!("{line}");
    }

    let scores = session.end();
    let stats = scores.stats(mode);
    println!(
        "best {} over {} games (average {:.1})",
        scores.personal_best(mode),
        stats.total_games,
        stats.average_score
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::info!(
        "Word Invaders headless run: {} (seed {})",
        GameMode::from(cli.mode).as_str(),
        cli.seed
    );
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
