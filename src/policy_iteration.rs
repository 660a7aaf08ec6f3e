//! Policy iteration
//!
//! Alternates policy evaluation and greedy policy improvement until the
//! one-step lookahead agrees with the current policy everywhere.
//!
//! Evaluation is asynchronous and in place: states are visited in
//! enumeration order and each one is refined on its own, `V(s) ← Q(s, π(s))`,
//! until two successive values differ by at most δ. Values of other states
//! may be stale during that refinement; the outer loop re-runs evaluation
//! after every improvement, which is what drives global convergence.
//!
//! Improvement compares candidates against the evaluated `V(s)` rather than
//! against a fresh minimum, so δ also bounds how small an improvement can be
//! detected. Pick δ conservatively.

use rand::{rngs::StdRng, seq::IndexedRandom};

use crate::{
    Error, Result,
    config::PolicyIterationConfig,
    mdp::{ActionOf, MdpState, Policy, TransitionModel, ValueTable, q_value},
    ports::Solver,
    utils::build_rng,
};

/// Where the engine is in its evaluate/improve cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initializing,
    Evaluating,
    Improving,
    Converged,
}

/// Summary of one evaluation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvaluationReport {
    /// Total `V(s) ← Q(s, π(s))` updates performed
    pub refinements: usize,
    /// States that hit the refinement cap before reaching δ
    pub unconverged: usize,
}

/// Policy iteration engine over a borrowed transition model.
#[derive(Debug, Clone)]
pub struct PolicyIteration<'m, M: TransitionModel> {
    model: &'m M,
    config: PolicyIterationConfig,
    values: ValueTable<M::State>,
    policy: Policy<M::State>,
    rng: StdRng,
    phase: Phase,
    rounds: usize,
}

impl<'m, M: TransitionModel> PolicyIteration<'m, M> {
    /// Create an engine with all values at 0.0 and no policy yet.
    ///
    /// The RNG used for the initial random policy is seeded from
    /// `config.seed` when present.
    pub fn new(model: &'m M, config: PolicyIterationConfig) -> Result<Self> {
        config.validate()?;
        let values = ValueTable::zeroed(model.states())?;
        let rng = build_rng(config.seed);
        Ok(Self {
            model,
            config,
            values,
            policy: Policy::new(),
            rng,
            phase: Phase::Initializing,
            rounds: 0,
        })
    }

    /// Replace the random source used for the initial policy.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Pick one uniformly random legal action for every non-terminal state.
    pub fn initialize_policy(&mut self) -> Result<()> {
        let mut policy = Policy::new();
        for state in self.values.states() {
            if state.is_terminal() {
                continue;
            }
            let action = state
                .legal_actions()
                .choose(&mut self.rng)
                .cloned()
                .ok_or_else(|| Error::no_actions(state))?;
            policy.insert(state.clone(), action);
        }
        self.policy = policy;
        self.phase = Phase::Initializing;
        self.rounds = 0;
        Ok(())
    }

    /// Force the policy action of one state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalAction`] when `action` is not legal in `state`
    /// (terminal states have no legal actions).
    pub fn set_action(&mut self, state: &M::State, action: ActionOf<M::State>) -> Result<()> {
        if !state.legal_actions().contains(&action) {
            return Err(Error::IllegalAction {
                action: format!("{action:?}"),
                state: format!("{state:?}"),
            });
        }
        self.values.get(state)?;
        self.policy.insert(state.clone(), action);
        Ok(())
    }

    /// Evaluate the current policy in place, state by state, until each
    /// state's successive values differ by at most `delta`.
    ///
    /// States that reach `max_refinements` are left where they are, counted
    /// in the report and logged; evaluation carries on with the next state.
    pub fn evaluate_policy(&mut self, delta: f64) -> Result<EvaluationReport> {
        self.phase = Phase::Evaluating;
        let discount = self.config.discount;
        let max_refinements = self.config.max_refinements;
        let mut report = EvaluationReport::default();

        for idx in 0..self.values.len() {
            let state = self.values.states()[idx].clone();
            if state.is_terminal() {
                self.values.set(&state, 0.0)?;
                continue;
            }

            let action = self.policy.action_for(&state).cloned().ok_or_else(|| {
                Error::MissingPolicyAction {
                    state: format!("{state:?}"),
                }
            })?;

            let mut previous = self.values.get(&state)?;
            let mut refinements = 0;
            loop {
                let q = q_value(self.model, &self.values, &state, &action, discount)?.ok_or_else(
                    || Error::UndefinedAction {
                        state: format!("{state:?}"),
                        action: format!("{action:?}"),
                    },
                )?;
                self.values.set(&state, q)?;
                refinements += 1;

                if (q - previous).abs() <= delta {
                    break;
                }
                if refinements >= max_refinements {
                    tracing::warn!(
                        ?state,
                        refinements,
                        change = (q - previous).abs(),
                        delta,
                        "policy evaluation did not converge for state"
                    );
                    report.unconverged += 1;
                    break;
                }
                previous = q;
            }
            report.refinements += refinements;
        }

        tracing::debug!(
            refinements = report.refinements,
            unconverged = report.unconverged,
            "policy evaluation pass"
        );
        Ok(report)
    }

    /// One greedy improvement step against the evaluated values.
    ///
    /// For each state the baseline is the stored `V(s)`; every action whose
    /// `Q(s,a)` strictly beats the running best is adopted. Returns whether
    /// any state adopted an action.
    pub fn improve_policy(&mut self) -> Result<bool> {
        self.phase = Phase::Improving;
        let discount = self.config.discount;
        let mut changed = false;

        for state in self.values.states() {
            if state.is_terminal() {
                continue;
            }
            let actions = state.legal_actions();
            if actions.is_empty() {
                return Err(Error::no_actions(state));
            }

            let mut best_value = self.values.get(state)?;
            let mut best_action = None;
            for action in actions {
                let Some(q) = q_value(self.model, &self.values, state, &action, discount)? else {
                    tracing::warn!(?state, ?action, "empty transition list; action value undefined");
                    continue;
                };
                if q > best_value {
                    best_value = q;
                    best_action = Some(action);
                }
            }

            if let Some(action) = best_action {
                self.policy.insert(state.clone(), action);
                changed = true;
            }
        }

        if !changed {
            self.phase = Phase::Converged;
        }
        Ok(changed)
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

    /// The policy as it currently stands.
    pub fn policy(&self) -> &Policy<M::State> {
        &self.policy
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Improvement steps run by the last `train`.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn config(&self) -> &PolicyIterationConfig {
        &self.config
    }
}

impl<M: TransitionModel> Solver for PolicyIteration<'_, M> {
    type State = M::State;

    fn train(&mut self) -> Result<Policy<M::State>> {
        self.initialize_policy()?;
        let delta = self.config.delta;

        loop {
            let report = self.evaluate_policy(delta)?;
            self.rounds += 1;
            let changed = self.improve_policy()?;
            tracing::debug!(
                round = self.rounds,
                changed,
                refinements = report.refinements,
                unconverged = report.unconverged,
                "policy iteration round"
            );
            if !changed {
                break;
            }
        }

        tracing::info!(
            rounds = self.rounds,
            states = self.values.len(),
            policy_size = self.policy.len(),
            "policy iteration converged"
        );
        Ok(self.policy.clone())
    }

    fn name(&self) -> &str {
        "Policy Iteration"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mdp::toy::{Chain, ChainAction, ChainState};

    fn engine(chain: &Chain, config: PolicyIterationConfig) -> PolicyIteration<'_, Chain> {
        PolicyIteration::new(chain, config.with_seed(7)).unwrap()
    }

    #[test]
    fn test_initial_policy_covers_non_terminal_states() {
        let chain = Chain::default();
        let mut pi = engine(&chain, PolicyIterationConfig::new());
        assert_eq!(pi.phase(), Phase::Initializing);
        pi.initialize_policy().unwrap();

        assert_eq!(pi.policy().len(), 1);
        assert!(pi.policy().contains(&ChainState::Start));
        assert!(!pi.policy().contains(&ChainState::Done));
    }

    #[test]
    fn test_same_seed_same_initial_policy() {
        let chain = Chain::default();
        let mut a = engine(&chain, PolicyIterationConfig::new());
        let mut b = engine(&chain, PolicyIterationConfig::new());
        a.initialize_policy().unwrap();
        b.initialize_policy().unwrap();
        assert_eq!(a.policy().agreement(b.policy()), Some(1.0));
    }

    #[test]
    fn test_evaluation_refines_self_loop_to_delta() {
        let chain = Chain::default();
        let mut pi = engine(&chain, PolicyIterationConfig::new().with_delta(1e-9));
        pi.set_action(&ChainState::Start, ChainAction::Stay).unwrap();

        let report = pi.evaluate_policy(1e-9).unwrap();
        assert_eq!(report.unconverged, 0);
        assert!(report.refinements > 100);
        // Stay forever: 1 / (1 - 0.9)
        assert!((pi.value(&ChainState::Start).unwrap() - 10.0).abs() < 1e-7);
        assert_eq!(pi.value(&ChainState::Done), Some(0.0));
    }

    #[test]
    fn test_refinement_cap_is_soft() {
        let chain = Chain::default();
        let mut pi = engine(
            &chain,
            PolicyIterationConfig::new().with_max_refinements(3),
        );
        pi.set_action(&ChainState::Start, ChainAction::Stay).unwrap();

        let report = pi.evaluate_policy(1e-12).unwrap();
        assert_eq!(report.unconverged, 1);
        assert_eq!(report.refinements, 3);
        // 1, 1.9, 2.71
        assert!((pi.value(&ChainState::Start).unwrap() - 2.71).abs() < 1e-12);
    }

    #[test]
    fn test_improvement_switches_to_better_action() {
        let chain = Chain::default();
        let mut pi = engine(&chain, PolicyIterationConfig::new().with_delta(1e-9));
        pi.set_action(&ChainState::Start, ChainAction::Exit).unwrap();

        pi.evaluate_policy(1e-9).unwrap();
        assert_eq!(pi.value(&ChainState::Start), Some(5.0));

        // Stay: 1 + 0.9 * 5 = 5.5 > 5
        assert!(pi.improve_policy().unwrap());
        assert_eq!(
            pi.policy().action_for(&ChainState::Start),
            Some(&ChainAction::Stay)
        );
    }

    #[test]
    fn test_train_converges_and_is_stable() {
        let chain = Chain::default();
        let mut pi = engine(&chain, PolicyIterationConfig::new().with_delta(1e-9));
        let policy = pi.train().unwrap();

        assert_eq!(policy.action_for(&ChainState::Start), Some(&ChainAction::Stay));
        assert_eq!(pi.phase(), Phase::Converged);
        assert!(!pi.improve_policy().unwrap());
        assert_eq!(pi.phase(), Phase::Converged);
    }

    #[test]
    fn test_missing_policy_action_is_reported() {
        let chain = Chain::default();
        let mut pi = engine(&chain, PolicyIterationConfig::new());
        let err = pi.evaluate_policy(0.1).unwrap_err();
        assert!(matches!(err, Error::MissingPolicyAction { .. }));
    }

    #[test]
    fn test_set_action_rejects_illegal_choice() {
        let chain = Chain::default();
        let mut pi = engine(&chain, PolicyIterationConfig::new());
        let err = pi.set_action(&ChainState::Done, ChainAction::Stay).unwrap_err();
        assert!(matches!(err, Error::IllegalAction { .. }));
    }

    #[test]
    fn test_undefined_policy_action_is_fatal() {
        let chain = Chain {
            broken_exit: true,
            ..Chain::default()
        };
        let mut pi = engine(&chain, PolicyIterationConfig::new());
        pi.set_action(&ChainState::Start, ChainAction::Exit).unwrap();
        assert!(matches!(
            pi.evaluate_policy(0.1),
            Err(Error::UndefinedAction { .. })
        ));
    }
}
