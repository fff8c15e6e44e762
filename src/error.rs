use thiserror::Error;

/// Errors raised by the engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Illegal move: column {column} is full or out of range")]
    InvalidMove { column: usize },

    #[error("No legal moves available")]
    NoLegalMoves,

    #[error("No simulations were run, so the search has no move to suggest")]
    NoSimulations,

    #[error("Search exhausted after {expansions} expansions without reaching a win")]
    SearchExhausted { expansions: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid board: {0}")]
    InvalidBoard(String),
}

/// Convenience Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
