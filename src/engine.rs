//! Entry points for front ends.
//!
//! A front end owns the game loop and hands the engine a board plus the
//! player to move. The engine owns no game state between calls: every
//! decision builds a fresh tree or frontier and drops it afterwards.

use clap::ValueEnum;
use tracing::{debug, info};

use crate::astar::BestFirst;
use crate::board::{Board, Player};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::mcts::{tree_search, Tree};
use crate::policy::{MovePolicy, UniformRandom};
use crate::position::Position;

/// Search strategy used to pick a move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    #[default]
    Mcts,
    /// Best-first search over heuristic scores.
    #[value(alias = "astar")]
    BestFirst,
}

/// Result of an MCTS decision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MctsOutcome {
    Moved {
        column: usize,
        board: Board,
        next_player: Player,
    },
    /// The board is already won or full.
    NoMove,
    /// The board has legal moves but no simulation was run on them.
    NotSearched,
}

pub struct Engine {
    config: EngineConfig,
    policy: Box<dyn MovePolicy>,
}

impl Engine {
    /// Engine with a uniform random policy, seeded from `config.seed`.
    pub fn new(config: EngineConfig) -> Result<Self> {
        let policy: Box<dyn MovePolicy> = match config.seed {
            Some(seed) => Box::new(UniformRandom::with_seed(seed)),
            None => Box::new(UniformRandom::new()),
        };
        Self::with_policy(config, policy)
    }

    pub fn with_policy(config: EngineConfig, policy: Box<dyn MovePolicy>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, policy })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn check_board(&self, board: &Board) -> Result<()> {
        if board.config() != self.config.board {
            return Err(EngineError::InvalidBoard(format!(
                "board is {}x{} (win length {}), engine expects {}x{} (win length {})",
                board.rows(),
                board.columns(),
                board.config().win_length,
                self.config.board.rows,
                self.config.board.columns,
                self.config.board.win_length
            )));
        }
        Ok(())
    }

    /// Run MCTS for `player` and return the board after the chosen move.
    pub fn choose_move_mcts(&mut self, board: &Board, player: Player) -> Result<MctsOutcome> {
        self.check_board(board)?;
        let mut tree = Tree::new(Position::from_board(board.clone(), player));
        let best = tree_search(
            &mut tree,
            self.config.simulations,
            self.config.exploration,
            self.config.unvisited,
            self.policy.as_mut(),
        );

        let Some(node) = best.map(|id| tree.node(id)) else {
            if tree.root().pos.is_terminal() {
                debug!(%player, "mcts asked to move on a finished game");
                return Ok(MctsOutcome::NoMove);
            }
            debug!(%player, sims = self.config.simulations, "mcts visited no root child");
            return Ok(MctsOutcome::NotSearched);
        };
        let Some(column) = node.mv else {
            return Ok(MctsOutcome::NoMove);
        };
        info!(%player, column, visits = node.visits, wins = node.wins, "mcts chose move");
        Ok(MctsOutcome::Moved {
            column,
            board: node.pos.board.clone(),
            next_player: node.pos.to_move,
        })
    }

    /// Run best-first search for `player` and return the chosen column.
    ///
    /// The caller applies the move to its own board.
    pub fn choose_move_astar(&mut self, board: &Board, player: Player) -> Result<Option<usize>> {
        self.check_board(board)?;
        let pos = Position::from_board(board.clone(), player);
        let column = BestFirst::new(self.config.max_expansions).best_move(&pos, self.policy.as_mut());
        info!(%player, ?column, "best-first chose move");
        Ok(column)
    }

    /// Pick a move with `strategy` and apply it to `pos`.
    ///
    /// Returns `None` when the game is already over, and
    /// [`EngineError::NoSimulations`] when MCTS ran no simulations.
    pub fn play(&mut self, pos: &Position, strategy: Strategy) -> Result<Option<(usize, Position)>> {
        match strategy {
            Strategy::Mcts => match self.choose_move_mcts(&pos.board, pos.to_move)? {
                MctsOutcome::Moved {
                    column,
                    board,
                    next_player,
                } => Ok(Some((column, Position::from_board(board, next_player)))),
                MctsOutcome::NoMove => Ok(None),
                MctsOutcome::NotSearched => Err(EngineError::NoSimulations),
            },
            Strategy::BestFirst => match self.choose_move_astar(&pos.board, pos.to_move)? {
                Some(column) => Ok(Some((column, pos.apply_move(column)?))),
                None => Ok(None),
            },
        }
    }
}
