//! Tabular Q-learning
//!
//! Temporal difference control learned from experience rather than from a
//! transition model. The agent plays episodes in an
//! [`Environment`](crate::mdp::Environment), bootstraps each Q-value from the
//! best value of its successor, and explores with an ε-greedy rule.
//!
//! ## Usage Example
//!
//! ```no_run
//! use tictactoe_mdp::{
//!     Solver,
//!     config::QLearningConfig,
//!     q_learning::QLearning,
//!     tictactoe::{TicTacToeEnvironment, TicTacToeMdp},
//! };
//!
//! let mdp = TicTacToeMdp::default();
//! let env = TicTacToeEnvironment::random(mdp.rewards().clone(), Some(7));
//! let mut agent = QLearning::new(&mdp, env, QLearningConfig::new().with_seed(7))?;
//! let policy = agent.train()?;
//! println!("{} states learned", policy.len());
//! # Ok::<(), tictactoe_mdp::Error>(())
//! ```

pub mod agent;
pub mod q_table;

pub use agent::{QLearning, TrainingStats};
pub use q_table::QTable;
