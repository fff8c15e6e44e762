//! Best-first search ordered by terminal score plus pattern count.
//!
//! Sometimes called A* by its users, but the heuristic is not admissible and
//! no path is reconstructed. Each frontier entry remembers the root column its
//! line of play started with. As soon as an expansion generates a state won by
//! the searching player, that root column is the answer. A position handed in
//! already won answers with its first open column. When the frontier runs dry
//! (or the expansion bound is hit) the search falls back to a random legal
//! move of the last state it expanded.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};

use tracing::{debug, warn};

use crate::board::Player;
use crate::constants::MAX_EXPANSIONS;
use crate::error::EngineError;
use crate::heuristic::evaluate;
use crate::policy::MovePolicy;
use crate::position::Position;

/// A scored state waiting in the frontier.
struct FrontierEntry {
    priority: i64,
    /// Insertion sequence number, breaks priority ties in insertion order.
    seq: u64,
    pos: Position,
    /// First column played from the initial position, `None` for the initial
    /// position itself.
    root: Option<usize>,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.priority, self.seq).cmp(&(other.priority, other.seq))
    }
}

/// Min-priority frontier over positions.
struct Frontier {
    heap: BinaryHeap<Reverse<FrontierEntry>>,
    next_seq: u64,
    perspective: Player,
}

impl Frontier {
    fn new(perspective: Player) -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
            perspective,
        }
    }

    fn push(&mut self, pos: Position, root: Option<usize>) {
        let priority = evaluate(&pos, self.perspective);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(FrontierEntry {
            priority,
            seq,
            pos,
            root,
        }));
    }

    fn pop(&mut self) -> Option<(Position, Option<usize>)> {
        self.heap.pop().map(|Reverse(entry)| (entry.pos, entry.root))
    }
}

/// Best-first move search.
#[derive(Clone, Copy, Debug)]
pub struct BestFirst {
    max_expansions: usize,
}

impl Default for BestFirst {
    fn default() -> Self {
        Self::new(MAX_EXPANSIONS)
    }
}

impl BestFirst {
    pub fn new(max_expansions: usize) -> Self {
        Self { max_expansions }
    }

    /// Choose a column for `initial.to_move`.
    ///
    /// Returns `None` only when `initial` has no legal moves.
    pub fn best_move(&self, initial: &Position, policy: &mut dyn MovePolicy) -> Option<usize> {
        let perspective = initial.to_move;
        let mut frontier = Frontier::new(perspective);
        let mut visited: HashSet<String> = HashSet::new();
        let mut last_expanded: Option<Position> = None;
        let mut expansions = 0;

        frontier.push(initial.clone(), None);

        while let Some((current, root)) = frontier.pop() {
            if !visited.insert(current.key()) {
                continue;
            }

            let moves = current.legal_moves();
            if current.winner().is_some() {
                // Wins for the searching player return on generation, so any
                // other won state popped here is a loss and a dead end.
                if root.is_none() {
                    if let Some(&first) = moves.first() {
                        debug!(expansions, column = first, "best-first started from a won state");
                        return Some(first);
                    }
                }
                continue;
            }
            if moves.is_empty() {
                continue;
            }

            if expansions >= self.max_expansions {
                let err = EngineError::SearchExhausted { expansions };
                warn!(%err, frontier = frontier.heap.len(), "stopping best-first search");
                break;
            }
            expansions += 1;

            for &column in &moves {
                let Ok(next) = current.apply_move(column) else {
                    continue;
                };
                let next_root = root.unwrap_or(column);
                if next.winner() == Some(perspective) {
                    debug!(expansions, column = next_root, "best-first reached a won state");
                    return Some(next_root);
                }
                if !visited.contains(&next.key()) {
                    frontier.push(next, Some(next_root));
                }
            }
            last_expanded = Some(current);
        }

        let source = last_expanded.as_ref().unwrap_or(initial);
        let fallback = policy.pick(&source.legal_moves());
        debug!(expansions, ?fallback, "best-first fell back to a random move");
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::config::BoardConfig;
    use crate::policy::Scripted;

    #[test]
    fn test_frontier_pops_lowest_priority_in_insertion_order() {
        let config = BoardConfig::new(4, 4, 3);
        let mut frontier = Frontier::new(Player::X);
        let quiet_a = Position::new(config).apply_move(0).unwrap();
        let quiet_b = Position::new(config).apply_move(1).unwrap();
        // O to move with an O line: a loss for X, scored below zero
        let lost = Position::from_board(
            Board::from_rows(config, &["....", "....", "....", "OOO."]).unwrap(),
            Player::X,
        );

        frontier.push(quiet_a.clone(), Some(0));
        frontier.push(quiet_b.clone(), Some(1));
        frontier.push(lost.clone(), Some(2));

        assert_eq!(frontier.pop(), Some((lost, Some(2))));
        assert_eq!(frontier.pop(), Some((quiet_a, Some(0))));
        assert_eq!(frontier.pop(), Some((quiet_b, Some(1))));
        assert_eq!(frontier.pop(), None);
    }

    #[test]
    fn test_exhausted_frontier_falls_back_to_last_expanded() {
        // Nobody can ever complete three in a single row of three
        let config = BoardConfig::new(1, 3, 3);
        let pos = Position::new(config);
        let mut policy = Scripted::first();

        // The last state expanded is ".OX", whose only open column is 0
        assert_eq!(BestFirst::default().best_move(&pos, &mut policy), Some(0));
    }

    #[test]
    fn test_expansion_bound_uses_policy_on_last_expanded() {
        let pos = Position::new(BoardConfig::default());
        let mut policy = Scripted::new(vec![4]);
        assert_eq!(BestFirst::new(1).best_move(&pos, &mut policy), Some(4));
    }

    #[test]
    fn test_full_board_has_no_move() {
        let config = BoardConfig::new(2, 2, 2);
        let board = Board::from_rows(config, &["XO", "OX"]).unwrap();
        let pos = Position::from_board(board, Player::O);
        let mut policy = Scripted::first();
        assert_eq!(BestFirst::default().best_move(&pos, &mut policy), None);
    }

    #[test]
    fn test_immediate_win_beats_lower_columns() {
        // X completes the bottom row at column 3; columns 0-2 stay legal
        let config = BoardConfig::new(4, 5, 4);
        let board = Board::from_rows(config, &[".....", ".....", "OOO..", "XXX.."]).unwrap();
        let pos = Position::from_board(board, Player::X);
        let mut policy = Scripted::first();
        assert_eq!(BestFirst::default().best_move(&pos, &mut policy), Some(3));
    }

    #[test]
    fn test_deeper_win_reports_root_column() {
        // No immediate win for X on a 1x6 strip with win length 3; the first
        // win is found below the root move at column 2
        let config = BoardConfig::new(1, 6, 3);
        let board = Board::from_rows(config, &["....X."]).unwrap();
        let pos = Position::from_board(board, Player::X);
        for column in pos.legal_moves() {
            assert!(!pos.apply_move(column).unwrap().has_line(Player::X));
        }
        let mut policy = Scripted::new(vec![4]);
        assert_eq!(BestFirst::default().best_move(&pos, &mut policy), Some(2));
    }
}
