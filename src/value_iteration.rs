//! Value iteration
//!
//! Repeated synchronous Bellman optimality backups over the whole state
//! space, followed by greedy policy extraction:
//!
//! ```text
//! V_{k+1}(s) = max_a Σ_{s'} P(s'|s,a) [r + γ V_k(s')]
//! ```
//!
//! Each sweep reads only the previous sweep's values (Jacobi style), so the
//! result does not depend on the enumeration order of the states.

use crate::{
    Error, Result,
    config::ValueIterationConfig,
    mdp::{ActionOf, MdpState, Policy, TransitionModel, ValueTable, q_value, values::best_action},
    ports::Solver,
};

/// Value iteration engine over a borrowed transition model.
#[derive(Debug, Clone)]
pub struct ValueIteration<'m, M: TransitionModel> {
    model: &'m M,
    config: ValueIterationConfig,
    values: ValueTable<M::State>,
    sweeps: usize,
}

impl<'m, M: TransitionModel> ValueIteration<'m, M> {
    /// Create an engine with every state valued at 0.0.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid configuration or a state space that
    /// lists a state twice.
    pub fn new(model: &'m M, config: ValueIterationConfig) -> Result<Self> {
        config.validate()?;
        let values = ValueTable::zeroed(model.states())?;
        Ok(Self {
            model,
            config,
            values,
            sweeps: 0,
        })
    }

    /// Set every state value back to 0.0.
    pub fn initialize(&mut self) {
        self.values.reset();
        self.sweeps = 0;
    }

    /// Perform exactly `k` synchronous sweeps.
    ///
    /// Returns the largest absolute value change of the last sweep (0.0 when
    /// `k` is zero).
    pub fn iterate(&mut self, k: usize) -> Result<f64> {
        let mut residual = 0.0;
        for _ in 0..k {
            residual = self.sweep()?;
        }
        Ok(residual)
    }

    /// Sweep until the largest change drops to `theta` or `max_sweeps` have
    /// run. Returns the number of sweeps performed.
    pub fn iterate_until(&mut self, theta: f64, max_sweeps: usize) -> Result<usize> {
        for performed in 1..=max_sweeps {
            if self.sweep()? <= theta {
                tracing::info!(sweeps = performed, theta, "value iteration converged");
                return Ok(performed);
            }
        }
        tracing::warn!(max_sweeps, theta, "value iteration hit the sweep cap");
        Ok(max_sweeps)
    }

    fn sweep(&mut self) -> Result<f64> {
        let discount = self.config.discount;
        let mut updated = Vec::with_capacity(self.values.len());

        for state in self.values.states() {
            if state.is_terminal() {
                updated.push(0.0);
                continue;
            }
            let actions = state.legal_actions();
            if actions.is_empty() {
                return Err(Error::no_actions(state));
            }
            let (_, best) = best_action(self.model, &self.values, state, &actions, discount)?
                .ok_or_else(|| Error::NoDefinedActions {
                    state: format!("{state:?}"),
                })?;
            updated.push(best);
        }

        let residual = self.values.replace_all(&updated);
        self.sweeps += 1;
        tracing::debug!(sweep = self.sweeps, residual, "value iteration sweep");
        Ok(residual)
    }

    /// Greedy policy with respect to the current value table.
    ///
    /// Ties go to the first action in the model's enumeration order.
    pub fn extract_policy(&self) -> Result<Policy<M::State>> {
        let mut policy = Policy::new();
        for state in self.values.states() {
            if state.is_terminal() {
                continue;
            }
            let actions = state.legal_actions();
            if actions.is_empty() {
                return Err(Error::no_actions(state));
            }
            let (action, _) =
                best_action(self.model, &self.values, state, &actions, self.config.discount)?
                    .ok_or_else(|| Error::NoDefinedActions {
                        state: format!("{state:?}"),
                    })?;
            policy.insert(state.clone(), action);
        }
        Ok(policy)
    }

    /// `Q(s,a)` against the current value table; `None` if undefined.
    pub fn q_value(&self, state: &M::State, action: &ActionOf<M::State>) -> Result<Option<f64>> {
        q_value(self.model, &self.values, state, action, self.config.discount)
    }

    pub fn value(&self, state: &M::State) -> Option<f64> {
        self.values.value(state)
    }

    pub fn values(&self) -> &ValueTable<M::State> {
        &self.values
    }

    /// Sweeps performed since construction or the last `initialize`.
    pub fn sweeps(&self) -> usize {
        self.sweeps
    }

    pub fn config(&self) -> &ValueIterationConfig {
        &self.config
    }
}

impl<M: TransitionModel> Solver for ValueIteration<'_, M> {
    type State = M::State;

    fn train(&mut self) -> Result<Policy<M::State>> {
        self.initialize();
        let residual = self.iterate(self.config.iterations)?;
        let policy = self.extract_policy()?;
        tracing::info!(
            sweeps = self.sweeps,
            residual,
            states = self.values.len(),
            policy_size = policy.len(),
            "value iteration finished"
        );
        Ok(policy)
    }

    fn name(&self) -> &str {
        "Value Iteration"
    }
}
