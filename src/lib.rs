//! A move engine for Connect Four style games.
//!
//! Given a board and the player to move, the engine picks a column with one
//! of two strategies: Monte Carlo Tree Search with random rollouts, or a
//! best-first search ordered by a pattern-count heuristic.
//!
//! ## Modules
//!
//! - [`constants`] - Default board dimensions and search parameters
//! - [`config`] - Engine configuration passed into constructors
//! - [`board`] - The playing grid and line detection
//! - [`position`] - Game state: legal moves, move application, win/draw checks
//! - [`policy`] - Injectable random move selection
//! - [`heuristic`] - Scoring for the best-first search
//! - [`astar`] - Best-first search
//! - [`mcts`] - Monte Carlo Tree Search
//! - [`engine`] - Entry points for front ends
//! - [`console`] - Text command loop
//!
//! ## Example
//!
//! ```
//! use connect_four_engine::board::{Board, Player};
//! use connect_four_engine::config::EngineConfig;
//! use connect_four_engine::engine::{Engine, MctsOutcome};
//!
//! let mut config = EngineConfig::with_simulations(200);
//! config.seed = Some(7);
//! let mut engine = Engine::new(config.clone()).unwrap();
//!
//! let board = Board::new(config.board);
//! match engine.choose_move_mcts(&board, Player::X).unwrap() {
//!     MctsOutcome::Moved { column, next_player, .. } => {
//!         assert!(column < 7);
//!         assert_eq!(next_player, Player::O);
//!     }
//!     MctsOutcome::NoMove | MctsOutcome::NotSearched => unreachable!(),
//! }
//! ```

pub mod astar;
pub mod board;
pub mod config;
pub mod console;
pub mod constants;
pub mod engine;
pub mod error;
pub mod heuristic;
pub mod mcts;
pub mod policy;
pub mod position;

pub use error::{EngineError, Result};
