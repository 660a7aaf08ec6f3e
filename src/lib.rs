//! Dynamic programming and reinforcement learning for Tic-Tac-Toe
//!
//! This crate provides:
//! - A small finite-MDP vocabulary (states, transition models, environments,
//!   value tables and policies) in [`mdp`]
//! - Value iteration, policy iteration and tabular Q-learning engines behind
//!   the common [`Solver`] trait
//! - Tic-Tac-Toe for X against a random opponent, both as a transition model
//!   and as a live environment, in [`tictactoe`]

pub mod config;
pub mod error;
pub mod mdp;
pub mod policy_iteration;
pub mod ports;
pub mod q_learning;
pub mod tictactoe;
pub mod utils;
pub mod value_iteration;

pub use config::{PolicyIterationConfig, QLearningConfig, ValueIterationConfig};
pub use error::{Error, Result};
pub use mdp::{
    ActionOf, Environment, MdpState, Outcome, Policy, StateSpace, Transition, TransitionModel,
    ValueTable,
};
pub use policy_iteration::{EvaluationReport, Phase, PolicyIteration};
pub use ports::Solver;
pub use q_learning::{QLearning, QTable, TrainingStats};
pub use value_iteration::ValueIteration;
