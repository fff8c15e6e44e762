//! The playing grid.
//!
//! Row 0 is the top of the board; pieces fall towards the highest row index.

use std::fmt;

use crate::config::BoardConfig;
use crate::error::{EngineError, Result};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    /// Moves first.
    X,
    O,
}

impl Player {
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Player::X => 'X',
            Player::O => 'O',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Scan directions as (row delta, column delta): horizontal, vertical,
/// diagonal down-right, diagonal down-left.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    config: BoardConfig,
    cells: Vec<Option<Player>>,
}

impl Board {
    pub fn new(config: BoardConfig) -> Self {
        Self {
            config,
            cells: vec![None; config.cells()],
        }
    }

    /// Parse a board from rows listed top to bottom.
    ///
    /// `X` and `O` are pieces, `.` or a space is an empty cell.
    pub fn from_rows(config: BoardConfig, rows: &[&str]) -> Result<Self> {
        if rows.len() != config.rows {
            return Err(EngineError::InvalidBoard(format!(
                "expected {} rows, got {}",
                config.rows,
                rows.len()
            )));
        }
        let mut board = Board::new(config);
        for (r, line) in rows.iter().enumerate() {
            let chars: Vec<char> = line.chars().collect();
            if chars.len() != config.columns {
                return Err(EngineError::InvalidBoard(format!(
                    "row {r} has {} cells, expected {}",
                    chars.len(),
                    config.columns
                )));
            }
            for (c, ch) in chars.into_iter().enumerate() {
                let cell = match ch {
                    'X' | 'x' => Some(Player::X),
                    'O' | 'o' => Some(Player::O),
                    '.' | ' ' => None,
                    other => {
                        return Err(EngineError::InvalidBoard(format!(
                            "unknown cell '{other}' at row {r} column {c}"
                        )));
                    }
                };
                board.set_cell(r, c, cell)?;
            }
        }
        board.check_gravity()?;
        Ok(board)
    }

    fn check_gravity(&self) -> Result<()> {
        for c in 0..self.config.columns {
            let mut seen_piece = false;
            for r in 0..self.config.rows {
                match self.get(r, c) {
                    Some(_) => seen_piece = true,
                    None if seen_piece => {
                        return Err(EngineError::InvalidBoard(format!(
                            "floating piece above empty cell at row {r} column {c}"
                        )));
                    }
                    None => {}
                }
            }
        }
        Ok(())
    }

    pub fn config(&self) -> BoardConfig {
        self.config
    }

    pub fn rows(&self) -> usize {
        self.config.rows
    }

    pub fn columns(&self) -> usize {
        self.config.columns
    }

    fn idx(&self, row: usize, column: usize) -> usize {
        row * self.config.columns + column
    }

    /// Cell contents, or `None` for empty and out-of-range cells.
    pub fn get(&self, row: usize, column: usize) -> Option<Player> {
        if row >= self.config.rows || column >= self.config.columns {
            return None;
        }
        self.cells[self.idx(row, column)]
    }

    /// Overwrite one cell directly, without the gravity rule. Meant for
    /// setting up positions; moves go through [`Position::apply_move`].
    ///
    /// [`Position::apply_move`]: crate::position::Position::apply_move
    pub fn set_cell(&mut self, row: usize, column: usize, cell: Option<Player>) -> Result<()> {
        if row >= self.config.rows || column >= self.config.columns {
            return Err(EngineError::InvalidBoard(format!(
                "cell ({row}, {column}) is outside a {}x{} board",
                self.config.rows, self.config.columns
            )));
        }
        let i = self.idx(row, column);
        self.cells[i] = cell;
        Ok(())
    }

    /// Whether a piece can still be dropped into `column`.
    pub fn is_column_open(&self, column: usize) -> bool {
        column < self.config.columns && self.get(0, column).is_none()
    }

    /// Lowest empty row of `column`, or `None` if the column is full or out of range.
    pub fn drop_row(&self, column: usize) -> Option<usize> {
        if column >= self.config.columns {
            return None;
        }
        (0..self.config.rows)
            .rev()
            .find(|&r| self.get(r, column).is_none())
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Count windows of `win_length` cells all owned by `player`, across all
    /// four scan directions. A run longer than the win length counts once per
    /// window it contains.
    pub fn count_lines(&self, player: Player) -> usize {
        let mut count = 0;
        self.scan_lines(player, || {
            count += 1;
            true
        });
        count
    }

    /// Whether `player` has at least one aligned run of `win_length` pieces.
    pub fn has_line(&self, player: Player) -> bool {
        let mut found = false;
        self.scan_lines(player, || {
            found = true;
            false
        });
        found
    }

    /// Call `visit` once per complete window owned by `player`; the scan stops
    /// early when it returns `false`.
    fn scan_lines(&self, player: Player, mut visit: impl FnMut() -> bool) {
        let len = self.config.win_length as isize;
        let rows = self.config.rows as isize;
        let columns = self.config.columns as isize;

        for (dr, dc) in DIRECTIONS {
            for r in 0..rows {
                for c in 0..columns {
                    let end_r = r + dr * (len - 1);
                    let end_c = c + dc * (len - 1);
                    if end_r < 0 || end_r >= rows || end_c < 0 || end_c >= columns {
                        continue;
                    }
                    let owned = (0..len).all(|i| {
                        self.get((r + dr * i) as usize, (c + dc * i) as usize) == Some(player)
                    });
                    if owned && !visit() {
                        return;
                    }
                }
            }
        }
    }

    /// Canonical serialization of the grid, one character per cell, rows
    /// separated by `/`.
    pub fn key(&self) -> String {
        let mut key = String::with_capacity(self.cells.len() + self.config.rows);
        for r in 0..self.config.rows {
            if r > 0 {
                key.push('/');
            }
            for c in 0..self.config.columns {
                key.push(cell_char(self.get(r, c)));
            }
        }
        key
    }
}

fn cell_char(cell: Option<Player>) -> char {
    cell.map(Player::symbol).unwrap_or('.')
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.config.rows {
            for c in 0..self.config.columns {
                write!(f, "{} ", cell_char(self.get(r, c)))?;
            }
            writeln!(f)?;
        }
        for c in 0..self.config.columns {
            write!(f, "{} ", c % 10)?;
        }
        writeln!(f)
    }
}
