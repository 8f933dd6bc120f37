//! gomoku-engine: a Gomoku player with minimax and MCTS engines.
//!
//! ## Usage
//!
//! - `gomoku-engine` - Show a demo
//! - `gomoku-engine gtp --kind mcts --level hard` - Start the protocol server
//! - `gomoku-engine selfplay --black minimax:2 --white mcts:easy --games 4`
//! - `gomoku-engine demo` - Run both engines on a sample position

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use gomoku_engine::agent::{Agent, Decision};
use gomoku_engine::board::{Board, Player, vertex};
use gomoku_engine::config::{EngineConfig, EngineKind, MctsConfig, MinimaxConfig};
use gomoku_engine::constants::DEFAULT_SIZE;
use gomoku_engine::gtp::GtpEngine;
use gomoku_engine::selfplay::run_match;

/// gomoku-engine: minimax and MCTS Gomoku engines
#[derive(Parser)]
#[command(name = "gomoku-engine")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the text protocol server for use with GUI applications
    Gtp {
        /// Engine to play with (minimax or mcts)
        #[arg(long, default_value = "minimax")]
        kind: String,
        /// Difficulty level (1-3, easy, medium, hard)
        #[arg(long, default_value = "2")]
        level: String,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Play engines against each other and report the tally
    Selfplay {
        /// Black engine as <kind>:<level>
        #[arg(long, default_value = "minimax:2")]
        black: String,
        /// White engine as <kind>:<level>
        #[arg(long, default_value = "mcts:medium")]
        white: String,
        #[arg(long, default_value_t = 1)]
        games: u32,
        #[arg(long, default_value_t = DEFAULT_SIZE)]
        size: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Run a simple demo of both engines
    Demo,
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries protocol responses
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Some(Commands::Gtp { kind, level, seed }) => {
            let kind: EngineKind = kind.parse()?;
            let config = EngineConfig::resolve(kind, &level)?;
            info!(%config, "starting protocol server");
            let mut engine = GtpEngine::new(config, seed)?;
            engine.run()
        }
        Some(Commands::Selfplay {
            black,
            white,
            games,
            size,
            seed,
        }) => {
            let black: EngineConfig = black
                .parse()
                .with_context(|| format!("invalid black engine '{black}'"))?;
            let white: EngineConfig = white
                .parse()
                .with_context(|| format!("invalid white engine '{white}'"))?;
            let tally = run_match(&black, &white, games, size, seed)?;
            println!("black ({black}): {} wins", tally.black_wins);
            println!("white ({white}): {} wins", tally.white_wins);
            println!("draws: {}", tally.draws);
            Ok(())
        }
        Some(Commands::Demo) | None => run_demo(),
    }
}

fn run_demo() -> Result<()> {
    println!("gomoku-engine: minimax and MCTS demo\n");

    let board = Board::from_rows(&[
        "...............",
        "...............",
        "...............",
        "...............",
        "...............",
        "...............",
        ".....O.........",
        "......XXX......",
        "......O........",
        "...............",
        "...............",
        "...............",
        "...............",
        "...............",
        "...............",
    ])?;
    println!("{board}");

    let engines = [
        EngineConfig::Minimax(MinimaxConfig::default()),
        EngineConfig::Mcts(MctsConfig::default()),
    ];
    for config in engines {
        let label = config.to_string();
        let mut agent = Agent::new(config, 7)?;
        match agent.select_move(&board, Some(Player::White)) {
            Decision::Play(mv) => println!("{label}: white plays {}", vertex(mv, board.size())),
            Decision::GameOver(outcome) => println!("{label}: {outcome}"),
        }
    }
    Ok(())
}
