//! Error types for the tictactoe-mdp crate

use thiserror::Error;

/// Main error type for the tictactoe-mdp crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid move: position {position} is already occupied or off the board")]
    InvalidMove { position: usize },

    #[error("game already over")]
    GameOver,

    #[error("board string too short: expected {expected} cells, got {got} in '{context}'")]
    InvalidBoardLength {
        expected: usize,
        got: usize,
        context: String,
    },

    #[error("invalid character '{character}' at position {position} in '{context}'")]
    InvalidCellCharacter {
        character: char,
        position: usize,
        context: String,
    },

    #[error("invalid piece counts: X={x_count}, O={o_count} (must differ by at most 1)")]
    InvalidPieceCounts { x_count: usize, o_count: usize },

    #[error("invalid player '{player}' in '{label}' (expected 'X' or 'O')")]
    InvalidPlayerString { player: String, label: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("non-terminal state '{state}' has no available actions")]
    NoActionsAvailable { state: String },

    #[error("transition probabilities for action {action} in state '{state}' sum to {total}, expected 1.0")]
    ProbabilityMismatch {
        state: String,
        action: String,
        total: f64,
    },

    #[error("no action in state '{state}' has a defined transition list")]
    NoDefinedActions { state: String },

    #[error("action {action} in state '{state}' has no transitions")]
    UndefinedAction { state: String, action: String },

    #[error("state '{state}' is not part of the enumerated state space")]
    UnknownState { state: String },

    #[error("state '{state}' was enumerated more than once")]
    DuplicateState { state: String },

    #[error("non-terminal state '{state}' has no policy action")]
    MissingPolicyAction { state: String },

    #[error("illegal action {action} in state '{state}'")]
    IllegalAction { action: String, state: String },
}

impl Error {
    /// True for errors caused by an upstream model breaking its contract
    /// (missing actions, bad probability mass, incomplete state space).
    pub fn is_model_inconsistency(&self) -> bool {
        matches!(
            self,
            Error::NoActionsAvailable { .. }
                | Error::ProbabilityMismatch { .. }
                | Error::NoDefinedActions { .. }
                | Error::UndefinedAction { .. }
                | Error::UnknownState { .. }
                | Error::DuplicateState { .. }
                | Error::MissingPolicyAction { .. }
        )
    }

    pub(crate) fn unknown_state(state: &impl std::fmt::Debug) -> Self {
        Error::UnknownState {
            state: format!("{state:?}"),
        }
    }

    pub(crate) fn no_actions(state: &impl std::fmt::Debug) -> Self {
        Error::NoActionsAvailable {
            state: format!("{state:?}"),
        }
    }
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;
