//! Default board dimensions and search parameters.
//!
//! These are only defaults: every value here can be overridden through
//! [`EngineConfig`](crate::config::EngineConfig), so tests are free to use
//! small boards.

// =============================================================================
// Board Geometry
// =============================================================================

/// Number of rows on the standard board.
pub const ROWS: usize = 6;

/// Number of columns on the standard board.
pub const COLUMNS: usize = 7;

/// Number of aligned pieces needed to win.
pub const WIN_LENGTH: usize = 4;

// =============================================================================
// MCTS Parameters
// =============================================================================

/// Default number of simulations per move.
pub const SIMULATION_COUNT: usize = 1000;

/// UCT exploration factor used during tree descent (roughly sqrt 2).
pub const EXPLORATION_FACTOR: f64 = 1.414;

// =============================================================================
// Best-First Search Parameters
// =============================================================================

/// Score of a terminal state won by the searching player.
pub const WIN_SCORE: i64 = 100;

/// Score of a terminal state lost by the searching player.
pub const LOSS_SCORE: i64 = -100;

/// Heuristic bonus for every aligned run found for the player to move.
pub const RUN_BONUS: i64 = 10;

/// Upper bound on states expanded by one best-first search.
pub const MAX_EXPANSIONS: usize = 200_000;
