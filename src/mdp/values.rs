//! Value table and the shared one-step lookahead

use std::collections::{HashMap, hash_map::Entry};

use super::model::{ActionOf, MdpState, TransitionModel};
use crate::{Error, Result};

/// Probability mass slack tolerated when validating a transition list.
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;

/// State-value estimates over an enumerated state space.
///
/// Keeps the enumeration order of the space so sweeps are deterministic.
/// Terminal states always read 0.0: writes to them are ignored.
#[derive(Debug, Clone)]
pub struct ValueTable<S: MdpState> {
    order: Vec<S>,
    values: HashMap<S, f64>,
}

impl<S: MdpState> ValueTable<S> {
    /// Build a table with every state at 0.0.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateState`] if a state appears twice.
    pub fn zeroed(states: Vec<S>) -> Result<Self> {
        let mut values = HashMap::with_capacity(states.len());
        for state in &states {
            match values.entry(state.clone()) {
                Entry::Occupied(_) => {
                    return Err(Error::DuplicateState {
                        state: format!("{state:?}"),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(0.0);
                }
            }
        }
        Ok(Self {
            order: states,
            values,
        })
    }

    /// Reset every entry to 0.0.
    pub fn reset(&mut self) {
        self.values.values_mut().for_each(|v| *v = 0.0);
    }

    /// Value of `state`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownState`] for states outside the space.
    pub fn get(&self, state: &S) -> Result<f64> {
        self.values
            .get(state)
            .copied()
            .ok_or_else(|| Error::unknown_state(state))
    }

    /// Value of `state`, if it is part of the space.
    pub fn value(&self, state: &S) -> Option<f64> {
        self.values.get(state).copied()
    }

    /// Overwrite the value of a known state. Terminal states stay at 0.0.
    pub fn set(&mut self, state: &S, value: f64) -> Result<()> {
        let slot = self
            .values
            .get_mut(state)
            .ok_or_else(|| Error::unknown_state(state))?;
        *slot = if state.is_terminal() { 0.0 } else { value };
        Ok(())
    }

    /// Replace every value at once, in enumeration order, and return the
    /// largest absolute change. Terminal entries stay at 0.0.
    pub(crate) fn replace_all(&mut self, updated: &[f64]) -> f64 {
        debug_assert_eq!(updated.len(), self.order.len());
        let mut residual: f64 = 0.0;
        for (state, &value) in self.order.iter().zip(updated) {
            let value = if state.is_terminal() { 0.0 } else { value };
            if let Some(slot) = self.values.get_mut(state) {
                residual = residual.max((value - *slot).abs());
                *slot = value;
            }
        }
        residual
    }

    /// States in enumeration order.
    pub fn states(&self) -> &[S] {
        &self.order
    }

    /// `(state, value)` pairs in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (&S, f64)> {
        self.order.iter().map(|s| (s, self.values[s]))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Smallest and largest stored value, or `None` for an empty table.
    pub fn range(&self) -> Option<(f64, f64)> {
        self.values.values().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

/// One-step lookahead `Q(s,a) = Σ p·(r + γ·V(s'))` against `values`.
///
/// Returns `Ok(None)` when the model has no transitions for the pair: the
/// action value is undefined and callers must leave it out of any max.
///
/// # Errors
///
/// Returns [`Error::ProbabilityMismatch`] when the probabilities do not sum
/// to 1.0 and [`Error::UnknownState`] when a successor is outside the table.
pub fn q_value<M: TransitionModel>(
    model: &M,
    values: &ValueTable<M::State>,
    state: &M::State,
    action: &ActionOf<M::State>,
    discount: f64,
) -> Result<Option<f64>> {
    let transitions = model.transitions(state, action);
    if transitions.is_empty() {
        return Ok(None);
    }

    let mut total = 0.0;
    let mut q = 0.0;
    for transition in &transitions {
        let future = values.get(&transition.outcome.next)?;
        total += transition.probability;
        q += transition.probability * (transition.outcome.reward + discount * future);
    }

    if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(Error::ProbabilityMismatch {
            state: format!("{state:?}"),
            action: format!("{action:?}"),
            total,
        });
    }

    Ok(Some(q))
}

/// First action with the strictly greatest defined Q-value.
///
/// Ties go to the earlier action in `actions`; undefined actions are skipped
/// with a warning. `Ok(None)` means no action had a defined value.
pub(crate) fn best_action<M: TransitionModel>(
    model: &M,
    values: &ValueTable<M::State>,
    state: &M::State,
    actions: &[ActionOf<M::State>],
    discount: f64,
) -> Result<Option<(ActionOf<M::State>, f64)>> {
    let mut best: Option<(ActionOf<M::State>, f64)> = None;
    for action in actions {
        let Some(q) = q_value(model, values, state, action, discount)? else {
            tracing::warn!(?state, ?action, "empty transition list; action value undefined");
            continue;
        };
        if best.as_ref().is_none_or(|&(_, best_q)| q > best_q) {
            best = Some((action.clone(), q));
        }
    }
    Ok(best)
}
