//! Collaborator traits consumed by the solvers
//!
//! These traits are the boundary between the solvers and whatever game they
//! are solving. The crate ships a Tic-Tac-Toe implementation in
//! [`crate::tictactoe`]; tests plug in small hand-built MDPs.

use std::{fmt::Debug, hash::Hash};

use super::outcome::{Outcome, Transition};
use crate::Result;

/// Action type of a state.
pub type ActionOf<S> = <S as MdpState>::Action;

/// A state of the game as seen by the designated player.
///
/// Equality and hashing must be by content so that one position reached
/// through different move orders collapses to a single table entry.
pub trait MdpState: Clone + Eq + Hash + Debug {
    type Action: Clone + Eq + Hash + Debug;

    /// True when the game is over and no further actions exist.
    fn is_terminal(&self) -> bool;

    /// Legal actions in a stable enumeration order.
    ///
    /// Empty exactly when the state is terminal. Solvers break ties by this
    /// order, so it must be deterministic.
    fn legal_actions(&self) -> Vec<Self::Action>;
}

/// Enumerates the complete, reachable state space for the designated player.
pub trait StateSpace {
    type State: MdpState;

    /// Every reachable state exactly once, terminal states included.
    ///
    /// The returned order is the order in which solvers sweep the space.
    fn states(&self) -> Vec<Self::State>;
}

/// Generative transition model: the distribution over outcomes of an action.
pub trait TransitionModel: StateSpace {
    /// Outcomes of taking `action` in `state`, with probabilities summing to
    /// 1.0. An empty list marks the pair as undefined.
    fn transitions(
        &self,
        state: &Self::State,
        action: &ActionOf<Self::State>,
    ) -> Vec<Transition<Self::State>>;
}

/// A live, single-episode simulator playing against a fixed opponent.
///
/// Single writer by contract: one learner owns an environment at a time.
pub trait Environment {
    type State: MdpState;

    /// Start a fresh episode and return the first state where the designated
    /// player is to move (the opponent may already have replied).
    fn reset(&mut self) -> Result<Self::State>;

    /// Execute `action` in the current state, let the opponent reply, and
    /// report what happened.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::IllegalAction`] when `action` is not legal in
    /// the current state or the episode has already ended.
    fn step(&mut self, action: &ActionOf<Self::State>) -> Result<Outcome<Self::State>>;

    fn current_state(&self) -> &Self::State;
}

impl<M: StateSpace> StateSpace for &M {
    type State = M::State;

    fn states(&self) -> Vec<Self::State> {
        (**self).states()
    }
}

impl<M: TransitionModel> TransitionModel for &M {
    fn transitions(
        &self,
        state: &Self::State,
        action: &ActionOf<Self::State>,
    ) -> Vec<Transition<Self::State>> {
        (**self).transitions(state, action)
    }
}

impl<E: Environment + ?Sized> Environment for Box<E> {
    type State = E::State;

    fn reset(&mut self) -> Result<Self::State> {
        (**self).reset()
    }

    fn step(&mut self, action: &ActionOf<Self::State>) -> Result<Outcome<Self::State>> {
        (**self).step(action)
    }

    fn current_state(&self) -> &Self::State {
        (**self).current_state()
    }
}
