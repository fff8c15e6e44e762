//! Connect Four engine command line.
//!
//! ## Usage
//!
//! - `connect-four-engine` - Play a demo game, engine against itself
//! - `connect-four-engine console` - Start the text console on stdin/stdout
//! - `connect-four-engine demo --strategy astar` - Demo with best-first search
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use connect_four_engine::config::{BoardConfig, EngineConfig, UnvisitedPolicy};
use connect_four_engine::console::Console;
use connect_four_engine::constants::{
    COLUMNS, EXPLORATION_FACTOR, MAX_EXPANSIONS, ROWS, SIMULATION_COUNT, WIN_LENGTH,
};
use connect_four_engine::engine::{Engine, Strategy};
use connect_four_engine::position::Position;

/// Connect Four move engine with MCTS and best-first search
#[derive(Parser)]
#[command(name = "connect-four-engine")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    engine: EngineArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Read commands from stdin and answer on stdout
    Console,
    /// Let the engine play a full game against itself
    Demo,
}

#[derive(Args)]
struct EngineArgs {
    /// Search strategy
    #[arg(long, value_enum, default_value_t = Strategy::Mcts, global = true)]
    strategy: Strategy,

    #[arg(long, default_value_t = ROWS, global = true)]
    rows: usize,

    #[arg(long, default_value_t = COLUMNS, global = true)]
    columns: usize,

    /// Pieces in a row needed to win
    #[arg(long, default_value_t = WIN_LENGTH, global = true)]
    win_length: usize,

    /// MCTS iterations per move
    #[arg(long, default_value_t = SIMULATION_COUNT, global = true)]
    simulations: usize,

    /// UCT exploration factor
    #[arg(long, default_value_t = EXPLORATION_FACTOR, global = true)]
    exploration: f64,

    /// Try unvisited MCTS children first instead of never descending into them
    #[arg(long, global = true)]
    explore_unvisited: bool,

    /// Expansion bound for best-first search
    #[arg(long, default_value_t = MAX_EXPANSIONS, global = true)]
    max_expansions: usize,

    /// Seed for reproducible games
    #[arg(long, global = true)]
    seed: Option<u64>,
}

impl EngineArgs {
    fn config(&self) -> EngineConfig {
        EngineConfig {
            board: BoardConfig::new(self.rows, self.columns, self.win_length),
            simulations: self.simulations,
            exploration: self.exploration,
            unvisited: if self.explore_unvisited {
                UnvisitedPolicy::Best
            } else {
                UnvisitedPolicy::Worst
            },
            max_expansions: self.max_expansions,
            seed: self.seed,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let engine = Engine::new(cli.engine.config()).context("invalid engine configuration")?;

    match cli.command {
        Some(Commands::Console) => {
            let mut console = Console::new(engine, cli.engine.strategy);
            let stdin = std::io::stdin();
            console
                .run(stdin.lock(), std::io::stdout())
                .context("console I/O failed")?;
        }
        Some(Commands::Demo) | None => run_demo(engine, cli.engine.strategy)?,
    }
    Ok(())
}

fn run_demo(mut engine: Engine, strategy: Strategy) -> Result<()> {
    println!("Connect Four engine demo ({strategy:?} vs {strategy:?})\n");

    let mut pos = Position::new(engine.config().board);
    while !pos.is_terminal() {
        let mover = pos.to_move;
        let Some((column, next)) = engine
            .play(&pos, strategy)
            .with_context(|| format!("search failed for {mover}"))?
        else {
            println!("{mover} has no move");
            break;
        };
        println!("{mover} plays column {column}");
        pos = next;
    }

    println!("\n{}", pos.board);
    match pos.winner() {
        Some(winner) => println!("{winner} wins"),
        None if pos.is_full() => println!("Draw"),
        None => println!("Game stopped"),
    }
    Ok(())
}
