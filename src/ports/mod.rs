//! Ports (trait boundaries) shared across the solvers.

pub mod solver;

pub use solver::Solver;
