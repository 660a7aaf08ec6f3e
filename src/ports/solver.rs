//! Solver port - the one contract shared by all three methods
//!
//! Value iteration and policy iteration plan against a transition model,
//! Q-learning learns from an environment; callers only see this trait and
//! the [`Policy`] it produces.

use crate::{
    Result,
    mdp::{MdpState, Policy},
};

/// Common interface of the value iteration, policy iteration and Q-learning
/// engines.
///
/// # Examples
///
/// ```
/// use tictactoe_mdp::{
///     Solver, ValueIteration, config::ValueIterationConfig, tictactoe::TicTacToeMdp,
/// };
///
/// let mdp = TicTacToeMdp::default();
/// let mut solver = ValueIteration::new(&mdp, ValueIterationConfig::new().with_iterations(2))?;
/// let policy = solver.train()?;
/// assert!(!policy.is_empty());
/// # Ok::<(), tictactoe_mdp::Error>(())
/// ```
pub trait Solver {
    type State: MdpState;

    /// Run the method to completion and return its greedy policy.
    fn train(&mut self) -> Result<Policy<Self::State>>;

    /// Short human-readable name, used in logs and comparisons.
    fn name(&self) -> &str;
}
