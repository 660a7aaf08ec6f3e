//! Tic-Tac-Toe as a finite MDP for player X
//!
//! X is the designated player. O plays uniformly at random, and its reply is
//! folded into each transition, so every non-terminal state in the space has
//! X to move.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use super::{
    board::{BoardState, Player},
    game::Move,
};
use crate::mdp::{Outcome, StateSpace, Transition, TransitionModel};

/// Rewards for X, paid on the transition that produces the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rewards {
    pub win: f64,
    pub lose: f64,
    pub draw: f64,
    /// Paid when the game goes on
    pub living: f64,
}

impl Rewards {
    pub fn new() -> Self {
        Self {
            win: 10.0,
            lose: -10.0,
            draw: 0.0,
            living: 0.0,
        }
    }

    /// Reward for arriving at `board`.
    pub fn for_board(&self, board: &BoardState) -> f64 {
        match board.winner() {
            Some(Player::X) => self.win,
            Some(Player::O) => self.lose,
            None if board.is_draw() => self.draw,
            None => self.living,
        }
    }

    /// Largest reward magnitude, used to bound state values.
    pub fn max_magnitude(&self) -> f64 {
        [self.win, self.lose, self.draw, self.living]
            .iter()
            .fold(0.0_f64, |acc, r| acc.max(r.abs()))
    }
}

impl Default for Rewards {
    fn default() -> Self {
        Self::new()
    }
}

/// Tic-Tac-Toe for X against a uniformly random O.
///
/// The state list is computed once on construction.
#[derive(Debug, Clone)]
pub struct TicTacToeMdp {
    rewards: Rewards,
    states: Vec<BoardState>,
}

impl TicTacToeMdp {
    pub fn new(rewards: Rewards) -> Self {
        let states = enumerate_states();
        tracing::debug!(states = states.len(), "enumerated tic-tac-toe states");
        Self { rewards, states }
    }

    pub fn rewards(&self) -> &Rewards {
        &self.rewards
    }
}

impl Default for TicTacToeMdp {
    fn default() -> Self {
        Self::new(Rewards::default())
    }
}

/// Breadth-first walk from the empty board with either player opening.
///
/// Keeps boards with X to move and every terminal board.
fn enumerate_states() -> Vec<BoardState> {
    let starts = [
        BoardState::new_with_player(Player::X),
        BoardState::new_with_player(Player::O),
    ];
    let mut seen: HashSet<BoardState> = starts.iter().copied().collect();
    let mut queue: VecDeque<BoardState> = starts.into_iter().collect();
    let mut states = Vec::new();

    while let Some(board) = queue.pop_front() {
        if board.to_move == Player::X || board.is_terminal() {
            states.push(board);
        }
        for next in board
            .legal_moves()
            .into_iter()
            .filter_map(|position| board.make_move(position).ok())
        {
            if seen.insert(next) {
                queue.push_back(next);
            }
        }
    }

    states
}

impl StateSpace for TicTacToeMdp {
    type State = BoardState;

    fn states(&self) -> Vec<BoardState> {
        self.states.clone()
    }
}

impl TransitionModel for TicTacToeMdp {
    /// Empty for terminal states, O-to-move states and illegal moves.
    fn transitions(&self, state: &BoardState, action: &Move) -> Vec<Transition<BoardState>> {
        if state.to_move != Player::X || action.player != Player::X {
            return Vec::new();
        }
        let Ok(after) = state.make_move(action.position) else {
            return Vec::new();
        };

        if after.is_terminal() {
            let reward = self.rewards.for_board(&after);
            return vec![Transition::certain(Outcome::new(
                *state, *action, reward, after,
            ))];
        }

        let replies = after.legal_moves();
        let probability = 1.0 / replies.len() as f64;
        replies
            .into_iter()
            .filter_map(|reply| after.make_move(reply).ok())
            .map(|next| {
                let reward = self.rewards.for_board(&next);
                Transition::new(probability, Outcome::new(*state, *action, reward, next))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mdp::MdpState;

    fn x_move(position: usize) -> Move {
        Move {
            position,
            player: Player::X,
        }
    }

    #[test]
    fn test_states_are_unique_and_x_to_move() {
        let mdp = TicTacToeMdp::default();
        let states = mdp.states();
        let unique: HashSet<_> = states.iter().collect();
        assert_eq!(unique.len(), states.len());
        assert!(
            states
                .iter()
                .all(|s| s.to_move == Player::X || s.is_terminal())
        );
        assert_eq!(states[0], BoardState::new());
    }

    #[test]
    fn test_states_include_both_openings() {
        let states = TicTacToeMdp::default().states();
        let o_opened = BoardState::from_string("....O...._X").unwrap();
        let x_opened = BoardState::from_string("X...O....").unwrap();
        assert!(states.contains(&o_opened));
        assert!(states.contains(&x_opened));
    }

    #[test]
    fn test_transition_successors_are_enumerated() {
        let mdp = TicTacToeMdp::default();
        let states: HashSet<_> = mdp.states().into_iter().collect();
        for state in states.iter().filter(|s| !s.is_terminal()).take(200) {
            for action in state.legal_actions() {
                let transitions = mdp.transitions(state, &action);
                let total: f64 = transitions.iter().map(|t| t.probability).sum();
                assert!((total - 1.0).abs() < 1e-9);
                for t in &transitions {
                    assert!(states.contains(&t.outcome.next));
                }
            }
        }
    }

    #[test]
    fn test_winning_move_is_certain() {
        let mdp = TicTacToeMdp::default();
        let state = BoardState::from_string("XX.OO....").unwrap();
        let transitions = mdp.transitions(&state, &x_move(2));
        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].probability, 1.0);
        assert_eq!(transitions[0].outcome.reward, 10.0);
        assert!(transitions[0].outcome.next.is_terminal());
    }

    #[test]
    fn test_opponent_replies_are_uniform() {
        let mdp = TicTacToeMdp::default();
        let state = BoardState::from_string("XX.OO....").unwrap();
        let transitions = mdp.transitions(&state, &x_move(8));
        assert_eq!(transitions.len(), 4);
        assert!(transitions.iter().all(|t| t.probability == 0.25));

        let losing: Vec<_> = transitions
            .iter()
            .filter(|t| t.outcome.reward == -10.0)
            .collect();
        assert_eq!(losing.len(), 1);
        assert_eq!(losing[0].outcome.next.winner(), Some(Player::O));
    }

    #[test]
    fn test_illegal_moves_are_undefined() {
        let mdp = TicTacToeMdp::default();
        let state = BoardState::from_string("XX.OO....").unwrap();
        assert!(mdp.transitions(&state, &x_move(0)).is_empty());
        let o_move = Move {
            position: 2,
            player: Player::O,
        };
        assert!(mdp.transitions(&state, &o_move).is_empty());
        let finished = BoardState::from_string("XXXOO....").unwrap();
        assert!(mdp.transitions(&finished, &x_move(5)).is_empty());
    }

    #[test]
    fn test_custom_rewards() {
        let rewards = Rewards {
            living: -1.0,
            ..Rewards::default()
        };
        let mdp = TicTacToeMdp::new(rewards);
        let transitions = mdp.transitions(&BoardState::new(), &x_move(4));
        assert_eq!(transitions.len(), 8);
        assert!(transitions.iter().all(|t| t.outcome.reward == -1.0));
        assert_eq!(mdp.rewards().max_magnitude(), 10.0);
    }
}
