//! Outcomes and weighted transitions

use super::model::{ActionOf, MdpState};

/// Result of applying an action: `[s, a, r, s']`.
///
/// `next` is the state in which the designated player moves again (or the
/// terminal state), so the opponent's reply is already folded in.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<S: MdpState> {
    pub source: S,
    pub action: ActionOf<S>,
    pub reward: f64,
    pub next: S,
}

impl<S: MdpState> Outcome<S> {
    pub fn new(source: S, action: ActionOf<S>, reward: f64, next: S) -> Self {
        Self {
            source,
            action,
            reward,
            next,
        }
    }
}

/// One branch of a transition distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<S: MdpState> {
    pub probability: f64,
    pub outcome: Outcome<S>,
}

impl<S: MdpState> Transition<S> {
    pub fn new(probability: f64, outcome: Outcome<S>) -> Self {
        Self {
            probability,
            outcome,
        }
    }

    /// Shorthand for a deterministic transition.
    pub fn certain(outcome: Outcome<S>) -> Self {
        Self::new(1.0, outcome)
    }
}
