//! Engine configuration.
//!
//! Board geometry and search parameters are passed into the engine
//! explicitly. Defaults come from [`crate::constants`].

use crate::constants::{
    COLUMNS, EXPLORATION_FACTOR, MAX_EXPANSIONS, ROWS, SIMULATION_COUNT, WIN_LENGTH,
};
use crate::error::{EngineError, Result};

/// Board geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoardConfig {
    pub rows: usize,
    pub columns: usize,
    /// Number of aligned pieces needed to win.
    pub win_length: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            rows: ROWS,
            columns: COLUMNS,
            win_length: WIN_LENGTH,
        }
    }
}

impl BoardConfig {
    pub fn new(rows: usize, columns: usize, win_length: usize) -> Self {
        Self {
            rows,
            columns,
            win_length,
        }
    }

    /// Total number of cells.
    pub fn cells(&self) -> usize {
        self.rows * self.columns
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.columns == 0 {
            return Err(EngineError::InvalidConfig(format!(
                "board must have at least one row and column (got {}x{})",
                self.rows, self.columns
            )));
        }
        if self.win_length == 0 {
            return Err(EngineError::InvalidConfig(
                "win length must be positive".to_string(),
            ));
        }
        if self.win_length > self.rows && self.win_length > self.columns {
            return Err(EngineError::InvalidConfig(format!(
                "win length {} does not fit on a {}x{} board",
                self.win_length, self.rows, self.columns
            )));
        }
        Ok(())
    }
}

/// How UCT scores a child that has never been visited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnvisitedPolicy {
    /// Unvisited children score negative infinity and are never descended into.
    #[default]
    Worst,
    /// Unvisited children score positive infinity and are tried first.
    Best,
}

/// Full engine configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub board: BoardConfig,
    /// MCTS iterations per decision.
    pub simulations: usize,
    /// UCT exploration factor used while descending the tree.
    pub exploration: f64,
    pub unvisited: UnvisitedPolicy,
    /// Best-first search gives up after this many expansions.
    pub max_expansions: usize,
    /// Seed for the default random policy. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            board: BoardConfig::default(),
            simulations: SIMULATION_COUNT,
            exploration: EXPLORATION_FACTOR,
            unvisited: UnvisitedPolicy::default(),
            max_expansions: MAX_EXPANSIONS,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Create a default config with the specified number of simulations.
    pub fn with_simulations(simulations: usize) -> Self {
        Self {
            simulations,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.board.validate()?;
        if !self.exploration.is_finite() || self.exploration < 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "exploration factor must be finite and non-negative (got {})",
                self.exploration
            )));
        }
        Ok(())
    }
}
