//! Configuration types for the solvers.
//!
//! Every config follows the same builder-style shape: `new()` gives the
//! classic defaults, `with_*` overrides a field, and `validate()` rejects
//! hyperparameters the algorithms cannot work with. All of them deserialize
//! with missing fields filled from the defaults.
//!
//! ```
//! use tictactoe_mdp::config::QLearningConfig;
//!
//! let config = QLearningConfig::new()
//!     .with_learning_rate(0.5)
//!     .with_episodes(1_000)
//!     .with_seed(7);
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

fn invalid(message: impl Into<String>) -> Error {
    Error::InvalidConfiguration {
        message: message.into(),
    }
}

fn check_discount(discount: f64) -> Result<()> {
    if discount.is_finite() && (0.0..1.0).contains(&discount) {
        Ok(())
    } else {
        Err(invalid(format!("discount {discount} must lie in [0, 1)")))
    }
}

/// Configuration for [`crate::ValueIteration`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueIterationConfig {
    /// Discount factor γ
    pub discount: f64,
    /// Number of synchronous sweeps performed by `train`
    pub iterations: usize,
}

impl ValueIterationConfig {
    /// Defaults: γ = 0.9, 10 sweeps.
    pub fn new() -> Self {
        Self {
            discount: 0.9,
            iterations: 10,
        }
    }

    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_discount(self.discount)
    }
}

impl Default for ValueIterationConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for [`crate::PolicyIteration`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyIterationConfig {
    /// Discount factor γ
    pub discount: f64,
    /// Per-state evaluation threshold δ
    pub delta: f64,
    /// Refinement cap per state and evaluation pass
    pub max_refinements: usize,
    /// Seed for the initial random policy
    pub seed: Option<u64>,
}

impl PolicyIterationConfig {
    /// Defaults: γ = 0.9, δ = 0.1, at most 10 000 refinements, unseeded.
    pub fn new() -> Self {
        Self {
            discount: 0.9,
            delta: 0.1,
            max_refinements: 10_000,
            seed: None,
        }
    }

    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_delta(mut self, delta: f64) -> Self {
        self.delta = delta;
        self
    }

    pub fn with_max_refinements(mut self, max_refinements: usize) -> Self {
        self.max_refinements = max_refinements;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_discount(self.discount)?;
        if !(self.delta.is_finite() && self.delta > 0.0) {
            return Err(invalid(format!("delta {} must be positive", self.delta)));
        }
        if self.max_refinements == 0 {
            return Err(invalid("max_refinements must be at least 1"));
        }
        Ok(())
    }
}

impl Default for PolicyIterationConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for [`crate::QLearning`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QLearningConfig {
    /// Learning rate α
    pub learning_rate: f64,
    /// Discount factor γ
    pub discount: f64,
    /// Exploration rate ε at the start of training
    pub epsilon: f64,
    /// Multiplicative ε decay applied after each episode (1.0 keeps ε fixed)
    pub epsilon_decay: f64,
    /// Floor for the decayed ε
    pub min_epsilon: f64,
    /// Number of training episodes N
    pub episodes: usize,
    /// Seed for exploration
    pub seed: Option<u64>,
}

impl QLearningConfig {
    /// Defaults: α = 0.1, γ = 0.9, fixed ε = 0.1, 40 000 episodes, unseeded.
    pub fn new() -> Self {
        Self {
            learning_rate: 0.1,
            discount: 0.9,
            epsilon: 0.1,
            epsilon_decay: 1.0,
            min_epsilon: 0.0,
            episodes: 40_000,
            seed: None,
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Decay ε by `decay` after every episode, never going below `min_epsilon`.
    pub fn with_epsilon_decay(mut self, decay: f64, min_epsilon: f64) -> Self {
        self.epsilon_decay = decay;
        self.min_epsilon = min_epsilon;
        self
    }

    pub fn with_episodes(mut self, episodes: usize) -> Self {
        self.episodes = episodes;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_discount(self.discount)?;
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(invalid(format!(
                "learning rate {} must lie in (0, 1]",
                self.learning_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(invalid(format!(
                "epsilon {} must lie in [0, 1]",
                self.epsilon
            )));
        }
        if !(self.epsilon_decay > 0.0 && self.epsilon_decay <= 1.0) {
            return Err(invalid(format!(
                "epsilon decay {} must lie in (0, 1]",
                self.epsilon_decay
            )));
        }
        if !(0.0..=self.epsilon).contains(&self.min_epsilon) {
            return Err(invalid(format!(
                "min epsilon {} must lie in [0, {}]",
                self.min_epsilon, self.epsilon
            )));
        }
        Ok(())
    }
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self::new()
    }
}
