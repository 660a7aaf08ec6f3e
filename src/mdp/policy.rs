//! Deterministic policy produced by every solver

use std::collections::HashMap;

use super::model::{ActionOf, MdpState};

/// Mapping from non-terminal states to the chosen action.
///
/// States a solver never covered are simply absent: `action_for` returns
/// `None` for them rather than guessing.
#[derive(Debug, Clone)]
pub struct Policy<S: MdpState> {
    actions: HashMap<S, ActionOf<S>>,
}

impl<S: MdpState> Policy<S> {
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }

    /// Action chosen for `state`, if the policy covers it.
    pub fn action_for(&self, state: &S) -> Option<&ActionOf<S>> {
        self.actions.get(state)
    }

    /// Assign `action` to `state`, returning the previous choice.
    ///
    /// Terminal states have nothing to choose and are never stored.
    pub fn insert(&mut self, state: S, action: ActionOf<S>) -> Option<ActionOf<S>> {
        if state.is_terminal() {
            return None;
        }
        self.actions.insert(state, action)
    }

    pub fn contains(&self, state: &S) -> bool {
        self.actions.contains_key(state)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&S, &ActionOf<S>)> {
        self.actions.iter()
    }

    /// Fraction of the states covered by both policies on which they agree.
    ///
    /// Returns `None` when the policies share no states.
    pub fn agreement(&self, other: &Policy<S>) -> Option<f64> {
        let mut shared = 0usize;
        let mut same = 0usize;
        for (state, action) in &self.actions {
            if let Some(theirs) = other.actions.get(state) {
                shared += 1;
                if theirs == action {
                    same += 1;
                }
            }
        }
        (shared > 0).then(|| same as f64 / shared as f64)
    }
}

impl<S: MdpState> Default for Policy<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: MdpState> FromIterator<(S, ActionOf<S>)> for Policy<S> {
    fn from_iter<I: IntoIterator<Item = (S, ActionOf<S>)>>(iter: I) -> Self {
        let mut policy = Policy::new();
        for (state, action) in iter {
            policy.insert(state, action);
        }
        policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mdp::toy::{ChainAction, ChainState};

    #[test]
    fn test_terminal_states_are_not_stored() {
        let mut policy = Policy::new();
        assert!(policy.insert(ChainState::Done, ChainAction::Exit).is_none());
        assert!(policy.is_empty());
        assert!(policy.action_for(&ChainState::Done).is_none());
    }

    #[test]
    fn test_insert_replaces_previous_choice() {
        let mut policy = Policy::new();
        policy.insert(ChainState::Start, ChainAction::Stay);
        let previous = policy.insert(ChainState::Start, ChainAction::Exit);
        assert_eq!(previous, Some(ChainAction::Stay));
        assert_eq!(policy.action_for(&ChainState::Start), Some(&ChainAction::Exit));
        assert_eq!(policy.len(), 1);
    }

    #[test]
    fn test_agreement() {
        let a: Policy<ChainState> = [(ChainState::Start, ChainAction::Stay)].into_iter().collect();
        let b: Policy<ChainState> = [(ChainState::Start, ChainAction::Exit)].into_iter().collect();
        let empty = Policy::new();

        assert_eq!(a.agreement(&a), Some(1.0));
        assert_eq!(a.agreement(&b), Some(0.0));
        assert_eq!(a.agreement(&empty), None);
    }
}
