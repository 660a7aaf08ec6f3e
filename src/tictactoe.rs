//! Tic-Tac-Toe game implementation
//!
//! The board and game record, plus the two collaborators the solvers need:
//! [`TicTacToeMdp`] for the model-based engines and [`TicTacToeEnvironment`]
//! for Q-learning. In both, X is the designated player and O is the opponent.

pub mod board;
pub mod environment;
pub mod game;
pub mod lines;
pub mod mdp;
pub mod opponent;

pub use board::{BoardState, Cell, Player};
pub use environment::{FirstMover, TicTacToeEnvironment};
pub use game::{Game, GameOutcome, Move};
pub use lines::WINNING_LINES;
pub use mdp::{Rewards, TicTacToeMdp};
pub use opponent::{Opponent, RandomOpponent};
