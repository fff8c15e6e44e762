//! Static evaluation for the best-first search.
//!
//! The score is a raw pattern count: every complete window of `win_length`
//! pieces owned by the player to move is worth [`RUN_BONUS`]. Open lines,
//! blocked lines and partial threats are not distinguished, so the value says
//! nothing about a position until someone already has a line.

use crate::board::Player;
use crate::constants::{LOSS_SCORE, RUN_BONUS, WIN_SCORE};
use crate::position::Position;

/// Pattern count for `pos.to_move`.
pub fn heuristic(pos: &Position) -> i64 {
    pos.board.count_lines(pos.to_move) as i64 * RUN_BONUS
}

/// Terminal score from `perspective`'s point of view: a win, a loss, or zero
/// for draws and unfinished games.
pub fn terminal_score(pos: &Position, perspective: Player) -> i64 {
    match pos.winner() {
        Some(p) if p == perspective => WIN_SCORE,
        Some(_) => LOSS_SCORE,
        None => 0,
    }
}

/// Frontier priority: terminal score plus pattern count.
pub fn evaluate(pos: &Position, perspective: Player) -> i64 {
    terminal_score(pos, perspective) + heuristic(pos)
}
