#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Terminal adapter that plays Hunt the Wumpus with the keyboard standing in
//! for the joystick and stdout standing in for the LED matrix.

mod config;
mod keyboard;
mod terminal;

use std::{
    io::{self, Write},
    path::PathBuf,
    thread,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, LevelFilter};
use wumpus_core::{InputPort, Phase, TEXT_INTRO};
use wumpus_system_round::RoundController;
use wumpus_world::CaveRng;

use crate::{config::AppConfig, keyboard::KeyboardInput, terminal::TerminalPresentation};

#[derive(Parser, Debug)]
#[command(name = "wumpus", version, about = "Hunt the Wumpus on an 8x8 cave")]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for cave generation, overriding the configuration file.
    #[arg(long)]
    seed: Option<u64>,

    /// Rounds to play; 0 keeps playing until the input ends.
    #[arg(long, default_value_t = 0)]
    rounds: u64,

    /// Sleep through ticks and cues like the hardware would.
    #[arg(long)]
    realtime: bool,

    /// Verbose logging (-v, -vv for more).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if cli.seed.is_some() {
        config.rng.seed = cli.seed;
    }
    if let Err(failure) = config.validate() {
        error!("setup failed: {failure}");
        return Err(failure).context("hardware setup failed");
    }

    run(&cli, &config)
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let mut builder = env_logger::Builder::new();
    let _ = builder
        .filter_level(level)
        .parse_default_env()
        .format(|fmt, record| writeln!(fmt, "[{}] {}", record.level(), record.args()));
    builder.init();
}

fn run(cli: &Cli, config: &AppConfig) -> Result<()> {
    let rng = match config.rng.seed {
        Some(seed) => {
            info!("generating caves from seed {seed}");
            CaveRng::seeded(seed)
        }
        None => CaveRng::from_entropy(),
    };
    let tick = config.tick_interval();
    let mut controller = RoundController::new(rng, config.input);
    let mut input = KeyboardInput::new(io::stdin().lock(), tick, config.input.debounce());
    let mut screen = TerminalPresentation::new(io::stdout(), cli.realtime);
    let mut events = Vec::new();

    println!("{TEXT_INTRO}");
    println!("w/a/s/d walk, f shoots, q quits.");

    let mut played = 0;
    'rounds: while cli.rounds == 0 || played < cli.rounds {
        controller.start_round(&mut screen, &mut events);
        loop {
            let Some(sample) = input.sample() else {
                break 'rounds;
            };
            let phase = controller.tick(sample, &mut screen, &mut events);
            events.clear();
            if cli.realtime {
                thread::sleep(tick);
            }
            if phase == Phase::Over {
                break;
            }
        }
        played += 1;
    }

    let scoreboard = controller.scoreboard();
    info!("played {played} rounds");
    let mut stdout = io::stdout();
    writeln!(stdout, "Scoreboard: {scoreboard}").context("failed to print the scoreboard")?;
    Ok(())
}
