//! Game state: the grid plus the player to move.
//!
//! A [`Position`] is a value. [`Position::apply_move`] returns a new position
//! and leaves the receiver untouched, so search branches can share nothing.

use crate::board::{Board, Player};
use crate::config::BoardConfig;
use crate::error::{EngineError, Result};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub board: Board,
    /// The player whose move is next.
    pub to_move: Player,
}

impl Position {
    /// An empty board with `X` to move.
    pub fn new(config: BoardConfig) -> Self {
        Self {
            board: Board::new(config),
            to_move: Player::X,
        }
    }

    pub fn from_board(board: Board, to_move: Player) -> Self {
        Self { board, to_move }
    }

    /// Columns whose top cell is empty, in ascending order.
    pub fn legal_moves(&self) -> Vec<usize> {
        (0..self.board.columns())
            .filter(|&c| self.board.is_column_open(c))
            .collect()
    }

    /// Drop the mover's piece into `column` and pass the turn.
    pub fn apply_move(&self, column: usize) -> Result<Position> {
        let row = self
            .board
            .drop_row(column)
            .ok_or(EngineError::InvalidMove { column })?;
        let mut next = self.clone();
        next.board.set_cell(row, column, Some(self.to_move))?;
        next.to_move = self.to_move.opponent();
        Ok(next)
    }

    /// Whether the player recorded as `to_move` has a winning line.
    ///
    /// After a move the turn has already passed, so this asks about the
    /// player who did *not* just move. Use [`Position::winner`] or
    /// [`Position::has_line`] when the mover's perspective matters.
    pub fn has_winner(&self) -> bool {
        self.board.has_line(self.to_move)
    }

    pub fn has_line(&self, player: Player) -> bool {
        self.board.has_line(player)
    }

    /// The player owning a winning line, checking the last mover first.
    pub fn winner(&self) -> Option<Player> {
        [self.last_mover(), self.to_move]
            .into_iter()
            .find(|&p| self.board.has_line(p))
    }

    pub fn last_mover(&self) -> Player {
        self.to_move.opponent()
    }

    pub fn is_full(&self) -> bool {
        self.board.is_full()
    }

    /// Won by either player or drawn.
    pub fn is_terminal(&self) -> bool {
        self.winner().is_some() || self.is_full()
    }

    /// Canonical grid serialization, independent of the player to move.
    pub fn key(&self) -> String {
        self.board.key()
    }
}
