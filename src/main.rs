//! Horde Survivor headless runner
//!
//! Drives the game loop with a scripted strafing pattern and an automatic
//! upgrade picker, then prints the session summary as JSON.
//!
//! Usage: `horde-survivor [tuning.json] [seed] [--max-frames N]`

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use horde_survivor::{SelectError, Tuning};
use horde_survivor::platform::InputState;
use horde_survivor::renderer::DrawList;
use horde_survivor::sim::{GameEvent, GameLoop, GameState, TickInput, UpgradeKind, UpgradeUi};

/// 60 Hz display refresh
const FRAME_MS: f32 = 1000.0 / 60.0;
/// Give up after ten simulated minutes
const DEFAULT_MAX_FRAMES: u64 = 60 * 60 * 10;
/// Frames spent walking in each direction of the square
const LEG_FRAMES: u64 = 240;
const DEFAULT_SEED: u64 = 0x5EED;

#[derive(Parser)]
#[command(name = "horde-survivor")]
#[command(about = "Run a headless Horde Survivor session and print its summary")]
struct Args {
    /// Tuning JSON file (defaults are used when omitted)
    tuning: Option<PathBuf>,
    /// Session seed
    #[arg(default_value_t = DEFAULT_SEED)]
    seed: u64,
    /// Frame limit for the session
    #[arg(long, default_value_t = DEFAULT_MAX_FRAMES)]
    max_frames: u64,
}

/// Picks upgrades by a fixed preference order
#[derive(Default)]
struct AutoPicker {
    choices: Vec<UpgradeKind>,
}

impl AutoPicker {
    const PREFERENCE: [UpgradeKind; 5] = [
        UpgradeKind::AttackSpeed,
        UpgradeKind::Attack,
        UpgradeKind::Heal,
        UpgradeKind::Defense,
        UpgradeKind::MoveSpeed,
    ];

    fn pick(&self) -> usize {
        Self::PREFERENCE
            .iter()
            .find_map(|wanted| self.choices.iter().position(|c| c == wanted))
            .unwrap_or(0)
    }
}

impl UpgradeUi for AutoPicker {
    fn open(&mut self, choices: &[UpgradeKind]) {
        let labels: Vec<_> = choices.iter().map(|c| c.label()).collect();
        log::info!("Upgrade choices: {}", labels.join(" | "));
        self.choices = choices.to_vec();
    }

    fn close(&mut self) {
        self.choices.clear();
    }
}

/// Walk a square so the hero keeps kiting
fn scripted_input(frame: u64) -> TickInput {
    match (frame / LEG_FRAMES) % 4 {
        0 => TickInput {
            right: true,
            ..Default::default()
        },
        1 => TickInput {
            down: true,
            ..Default::default()
        },
        2 => TickInput {
            left: true,
            ..Default::default()
        },
        _ => TickInput {
            up: true,
            ..Default::default()
        },
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::PlayerHit { damage, health } => {
            log::debug!("Player hit for {damage:.1}, health {health:.1}")
        }
        GameEvent::MonsterKilled { id } => log::debug!("Monster {id} killed"),
        GameEvent::UpgradeApplied { upgrade } => log::info!("Applied {}", upgrade.label()),
        _ => {}
    }
}

/// Drive frames until game over or `max_frames`, answering every upgrade choice
fn run_session(
    game: &mut GameLoop<DrawList, AutoPicker>,
    input: &mut InputState,
    max_frames: u64,
) -> Result<(), SelectError> {
    for frame in 0..max_frames {
        input.set_directions(scripted_input(frame));
        game.frame(&*input, FRAME_MS);

        for event in game.drain_events() {
            log_event(&event);
        }

        if game.is_game_over() {
            break;
        }
        if !game.is_armed() {
            let index = game.ui().pick();
            game.select_upgrade(index)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Horde Survivor (headless) starting...");

    let args = Args::parse();
    let tuning = match &args.tuning {
        Some(path) => match Tuning::load(path) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::error!("{err}");
                return ExitCode::FAILURE;
            }
        },
        None => Tuning::default(),
    };
    let seed = args.seed;

    log::info!("Game initialized with seed: {}", seed);
    let mut game = GameLoop::new(GameState::new(seed, tuning), DrawList::default(), AutoPicker::default());
    let mut input = InputState::default();

    if let Err(err) = run_session(&mut game, &mut input, args.max_frames) {
        log::error!("Upgrade selection failed: {err}");
        return ExitCode::FAILURE;
    }

    let summary = game.state().summary();
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            log::error!("Failed to serialize summary: {err}");
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
