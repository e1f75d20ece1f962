//! Othello-MCTS: play Othello against a Monte Carlo Tree Search engine.
//!
//! ## Usage
//!
//! - `othello-mcts` - Human (X) against the engine (O)
//! - `othello-mcts play --black mcts --white human --think-secs 5` - Pick the seats
//! - `othello-mcts demo --rollouts 2000` - Engine against engine

use std::time::Duration;

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;

use othello_mcts::board::Piece;
use othello_mcts::constants::{DEMO_ROLLOUTS, MIN_THINK_SECS};
use othello_mcts::game::{ComputerPlayer, Game, GameError, HumanPlayer, Player};
use othello_mcts::mcts::MctsConfig;

/// Othello-MCTS: an Othello engine using Monte Carlo Tree Search
#[derive(Parser)]
#[command(name = "othello-mcts")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game, each side either human or engine
    Play(PlayArgs),
    /// Let the engine play itself with a fixed rollout budget
    Demo {
        /// Rollouts per move
        #[arg(long, default_value_t = DEMO_ROLLOUTS)]
        rollouts: usize,
        /// Seed for reproducible games
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Seat {
    Human,
    Mcts,
}

#[derive(Args)]
struct PlayArgs {
    /// Who plays X (moves first)
    #[arg(long, value_enum, default_value_t = Seat::Human)]
    black: Seat,
    /// Who plays O
    #[arg(long, value_enum, default_value_t = Seat::Mcts)]
    white: Seat,
    /// Seconds the engine thinks per move (must be greater than 2)
    #[arg(long, default_value_t = 3)]
    think_secs: u64,
    /// Print the engine's rollout statistics after each move
    #[arg(long)]
    debug: bool,
    /// Seed for the engine's random playouts
    #[arg(long)]
    seed: Option<u64>,
}

impl Default for PlayArgs {
    fn default() -> Self {
        Self {
            black: Seat::Human,
            white: Seat::Mcts,
            think_secs: 3,
            debug: false,
            seed: None,
        }
    }
}

impl PlayArgs {
    fn validate(&self) -> Result<()> {
        if self.think_secs <= MIN_THINK_SECS {
            bail!(
                "--think-secs must be greater than {MIN_THINK_SECS} (got {})",
                self.think_secs
            );
        }
        Ok(())
    }

    fn player(&self, piece: Piece) -> Box<dyn Player> {
        let seat = match piece {
            Piece::Black => self.black,
            Piece::White => self.white,
        };
        match seat {
            Seat::Human => Box::new(HumanPlayer::stdio(piece)),
            Seat::Mcts => {
                let mut config = MctsConfig::with_think_time(Duration::from_secs(self.think_secs));
                // Distinct streams for the two engines when both are seeded.
                config.seed = self.seed.map(|s| s.wrapping_add(piece as u64));
                Box::new(ComputerPlayer::new(piece, config, self.debug))
            }
        }
    }
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Some(Commands::Play(args)) => run_play(&args),
        None => run_play(&PlayArgs::default()),
        Some(Commands::Demo { rollouts, seed }) => run_demo(rollouts, seed),
    }
}

fn run_play(args: &PlayArgs) -> Result<()> {
    args.validate()?;

    println!("Welcome to Othello! Human players enter the row first, then the column.");
    println!("Typing q or quit will exit the game.");

    let mut black = args.player(Piece::Black);
    let mut white = args.player(Piece::White);
    match Game::new(std::io::stdout()).run(black.as_mut(), white.as_mut()) {
        Ok(_) | Err(GameError::Quit) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn run_demo(rollouts: usize, seed: Option<u64>) -> Result<()> {
    println!("Othello-MCTS demo: engine vs engine, {rollouts} rollouts per move\n");

    let config = |piece: Piece| {
        let mut config = MctsConfig::with_rollouts(rollouts);
        config.seed = seed.map(|s| s.wrapping_add(piece as u64));
        config
    };
    let mut black = ComputerPlayer::new(Piece::Black, config(Piece::Black), false);
    let mut white = ComputerPlayer::new(Piece::White, config(Piece::White), false);

    let result = Game::new(std::io::stdout()).run(&mut black, &mut white)?;
    info!(moves = result.moves, "demo finished");
    Ok(())
}
