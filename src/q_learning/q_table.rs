//! Q-table implementation for temporal difference learning

use std::collections::{HashMap, hash_map::Entry};

use crate::{
    Error, Result,
    mdp::{ActionOf, MdpState, Outcome},
    utils::first_max_index,
};

/// Q-table mapping (state, action) pairs to Q-values
///
/// Holds one entry per legal action of every non-terminal state, in the
/// enumeration order of the state space and of each state's actions. Terminal
/// states have no entries; their continuing value is 0.0 by definition.
#[derive(Debug, Clone)]
pub struct QTable<S: MdpState> {
    /// Non-terminal states in enumeration order
    order: Vec<S>,
    /// Q-values: state -> [(action, Q-value)] in legal-action order
    q_values: HashMap<S, Vec<(ActionOf<S>, f64)>>,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
}

impl<S: MdpState> QTable<S> {
    /// Create a Q-table with `Q(s,a) = 0.0` for every legal pair of every
    /// non-terminal state in `states`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoActionsAvailable`] for a non-terminal state without
    /// legal actions and [`Error::DuplicateState`] for a repeated state.
    pub fn new<I>(states: I, learning_rate: f64, discount_factor: f64) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
    {
        let mut order = Vec::new();
        let mut q_values = HashMap::new();
        for state in states {
            if state.is_terminal() {
                continue;
            }
            let actions = state.legal_actions();
            if actions.is_empty() {
                return Err(Error::no_actions(&state));
            }
            match q_values.entry(state.clone()) {
                Entry::Occupied(_) => {
                    return Err(Error::DuplicateState {
                        state: format!("{state:?}"),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(actions.into_iter().map(|a| (a, 0.0)).collect());
                }
            }
            order.push(state);
        }

        Ok(Self {
            order,
            q_values,
            learning_rate,
            discount_factor,
        })
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, state: &S, action: &ActionOf<S>) -> Option<f64> {
        self.q_values
            .get(state)?
            .iter()
            .find(|(a, _)| a == action)
            .map(|&(_, q)| q)
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: &S, action: &ActionOf<S>, value: f64) -> Result<()> {
        let entry = self
            .q_values
            .get_mut(state)
            .ok_or_else(|| Error::unknown_state(state))?
            .iter_mut()
            .find(|(a, _)| a == action)
            .ok_or_else(|| Error::IllegalAction {
                action: format!("{action:?}"),
                state: format!("{state:?}"),
            })?;
        entry.1 = value;
        Ok(())
    }

    /// `(action, Q-value)` pairs of a state in legal-action order
    pub fn actions(&self, state: &S) -> Option<&[(ActionOf<S>, f64)]> {
        self.q_values.get(state).map(Vec::as_slice)
    }

    /// Maximum Q-value over the legal actions of a state
    ///
    /// Terminal states are worth 0.0.
    pub fn max_q(&self, state: &S) -> Result<f64> {
        if state.is_terminal() {
            return Ok(0.0);
        }
        let entries = self
            .q_values
            .get(state)
            .ok_or_else(|| Error::unknown_state(state))?;
        Ok(entries
            .iter()
            .map(|&(_, q)| q)
            .fold(f64::NEG_INFINITY, f64::max))
    }

    /// Select greedy action (highest Q-value), first in legal-action order
    /// on ties
    pub fn greedy_action(&self, state: &S) -> Result<&ActionOf<S>> {
        let entries = self
            .q_values
            .get(state)
            .ok_or_else(|| Error::unknown_state(state))?;
        first_max_index(entries.iter().map(|&(_, q)| q))
            .map(|idx| &entries[idx].0)
            .ok_or_else(|| Error::no_actions(state))
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← (1 − α)·Q(s,a) + α·(r + γ·max_a' Q(s',a'))
    ///
    /// Returns the updated Q-value.
    pub fn q_learning_update(&mut self, outcome: &Outcome<S>) -> Result<f64> {
        let current_q = self.get(&outcome.source, &outcome.action).ok_or_else(|| {
            if self.q_values.contains_key(&outcome.source) {
                Error::IllegalAction {
                    action: format!("{:?}", outcome.action),
                    state: format!("{:?}", outcome.source),
                }
            } else {
                Error::unknown_state(&outcome.source)
            }
        })?;
        let max_next_q = self.max_q(&outcome.next)?;
        let td_target = outcome.reward + self.discount_factor * max_next_q;
        let new_q = (1.0 - self.learning_rate) * current_q + self.learning_rate * td_target;
        self.set(&outcome.source, &outcome.action, new_q)?;
        Ok(new_q)
    }

    /// Reset all Q-values to 0.0, keeping the entries
    pub fn reset(&mut self) {
        for entries in self.q_values.values_mut() {
            entries.iter_mut().for_each(|(_, q)| *q = 0.0);
        }
    }

    /// Non-terminal states in enumeration order
    pub fn states(&self) -> &[S] {
        &self.order
    }

    /// Number of non-terminal states in the table
    pub fn state_count(&self) -> usize {
        self.order.len()
    }

    /// Get total number of Q-values stored
    pub fn size(&self) -> usize {
        self.q_values.values().map(Vec::len).sum()
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }
}
