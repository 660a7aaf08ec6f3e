//! Shared fixtures for the integration tests.
//!
//! `Fork` is the single-decision MDP: from `A`, `L` reaches the terminal `B`
//! and `R` reaches the terminal `C`, each deterministically.

#![allow(dead_code)]

use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};
use tictactoe_mdp::{
    Environment, Error, MdpState, Outcome, Policy, Result, StateSpace, Transition,
    TransitionModel,
    tictactoe::{BoardState, Rewards, TicTacToeEnvironment},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Node {
    A,
    B,
    C,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    L,
    R,
}

impl MdpState for Node {
    type Action = Side;

    fn is_terminal(&self) -> bool {
        !matches!(self, Node::A)
    }

    fn legal_actions(&self) -> Vec<Side> {
        match self {
            Node::A => vec![Side::L, Side::R],
            Node::B | Node::C => Vec::new(),
        }
    }
}

/// Single-decision MDP with configurable terminal rewards.
#[derive(Debug, Clone)]
pub struct Fork {
    pub left: f64,
    pub right: f64,
}

impl Fork {
    pub fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    /// `L` pays 10, `R` pays -5.
    pub fn scenario() -> Self {
        Self::new(10.0, -5.0)
    }

    fn outcome(&self, action: Side) -> Outcome<Node> {
        match action {
            Side::L => Outcome::new(Node::A, action, self.left, Node::B),
            Side::R => Outcome::new(Node::A, action, self.right, Node::C),
        }
    }
}

impl StateSpace for Fork {
    type State = Node;

    fn states(&self) -> Vec<Node> {
        vec![Node::A, Node::B, Node::C]
    }
}

impl TransitionModel for Fork {
    fn transitions(&self, state: &Node, action: &Side) -> Vec<Transition<Node>> {
        if state.is_terminal() {
            return Vec::new();
        }
        vec![Transition::certain(self.outcome(*action))]
    }
}

/// Environment over `Fork` that always starts in `A` and records every
/// action it is asked to take.
#[derive(Debug, Clone)]
pub struct ForkEnv {
    fork: Fork,
    state: Node,
    pub taken: Vec<Side>,
}

impl ForkEnv {
    pub fn new(fork: Fork) -> Self {
        Self {
            fork,
            state: Node::A,
            taken: Vec::new(),
        }
    }
}

impl Environment for ForkEnv {
    type State = Node;

    fn reset(&mut self) -> Result<Node> {
        self.state = Node::A;
        Ok(self.state)
    }

    fn step(&mut self, action: &Side) -> Result<Outcome<Node>> {
        if self.state.is_terminal() {
            return Err(Error::IllegalAction {
                action: format!("{action:?}"),
                state: format!("{:?}", self.state),
            });
        }
        self.taken.push(*action);
        let outcome = self.fork.outcome(*action);
        self.state = outcome.next;
        Ok(outcome)
    }

    fn current_state(&self) -> &Node {
        &self.state
    }
}

pub fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() < tolerance
}

/// Average reward per game of `policy` as X against a seeded random O.
///
/// States the policy does not cover fall back to the first legal move.
pub fn average_reward(policy: &Policy<BoardState>, games: usize, seed: u64) -> f64 {
    let mut env = TicTacToeEnvironment::random(Rewards::default(), Some(seed));
    let mut total = 0.0;
    for _ in 0..games {
        let mut state = env.reset().expect("reset");
        while !state.is_terminal() {
            let action = match policy.action_for(&state) {
                Some(action) => *action,
                None => state.legal_actions()[0],
            };
            let outcome = env.step(&action).expect("legal step");
            total += outcome.reward;
            state = outcome.next;
        }
    }
    total / games as f64
}

/// A policy that fixes one uniformly random legal move per state.
pub fn random_policy(states: &[BoardState], seed: u64) -> Policy<BoardState> {
    let mut rng = StdRng::seed_from_u64(seed);
    states
        .iter()
        .filter(|state| !state.is_terminal())
        .filter_map(|state| {
            let action = *state.legal_actions().choose(&mut rng)?;
            Some((*state, action))
        })
        .collect()
}
