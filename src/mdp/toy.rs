//! Small hand-built MDP for unit tests.
//!
//! `Start` can `Stay` (self-loop, `stay_reward`) or `Exit` to the terminal
//! `Done` (`exit_reward`). With the defaults and γ = 0.9, staying forever is
//! worth 10 and exiting is worth 5.

use super::{
    model::{MdpState, StateSpace, TransitionModel},
    outcome::{Outcome, Transition},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainState {
    Start,
    Done,
    /// Non-terminal but without actions: a broken model.
    Stuck,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainAction {
    Stay,
    Exit,
}

impl MdpState for ChainState {
    type Action = ChainAction;

    fn is_terminal(&self) -> bool {
        matches!(self, ChainState::Done)
    }

    fn legal_actions(&self) -> Vec<ChainAction> {
        match self {
            ChainState::Start => vec![ChainAction::Stay, ChainAction::Exit],
            ChainState::Done | ChainState::Stuck => Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Chain {
    pub stay_reward: f64,
    pub exit_reward: f64,
    /// Probability mass removed from `Exit`.
    pub leak: f64,
    /// `Exit` has no transitions at all.
    pub broken_exit: bool,
    pub include_stuck: bool,
}

impl Default for Chain {
    fn default() -> Self {
        Self {
            stay_reward: 1.0,
            exit_reward: 5.0,
            leak: 0.0,
            broken_exit: false,
            include_stuck: false,
        }
    }
}

impl Chain {
    pub fn all_states(&self) -> Vec<ChainState> {
        let mut states = vec![ChainState::Start, ChainState::Done];
        if self.include_stuck {
            states.push(ChainState::Stuck);
        }
        states
    }
}

impl StateSpace for Chain {
    type State = ChainState;

    fn states(&self) -> Vec<ChainState> {
        self.all_states()
    }
}

impl TransitionModel for Chain {
    fn transitions(&self, state: &ChainState, action: &ChainAction) -> Vec<Transition<ChainState>> {
        match action {
            ChainAction::Stay => vec![Transition::certain(Outcome::new(
                *state,
                *action,
                self.stay_reward,
                ChainState::Start,
            ))],
            ChainAction::Exit if self.broken_exit => Vec::new(),
            ChainAction::Exit => vec![Transition::new(
                1.0 - self.leak,
                Outcome::new(*state, *action, self.exit_reward, ChainState::Done),
            )],
        }
    }
}
