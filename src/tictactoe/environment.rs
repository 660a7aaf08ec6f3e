//! Live Tic-Tac-Toe episodes for learning from experience

use serde::{Deserialize, Serialize};

use super::{
    board::{BoardState, Player},
    game::{Game, Move},
    mdp::Rewards,
    opponent::{Opponent, RandomOpponent},
};
use crate::{
    Error, Result,
    mdp::{Environment, Outcome},
};

/// Who opens each episode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstMover {
    #[default]
    Agent,
    Opponent,
}

/// Episode simulator: X is the agent, O is played by `opponent`.
///
/// Rewards follow the same scheme as [`super::TicTacToeMdp`].
#[derive(Debug, Clone)]
pub struct TicTacToeEnvironment<O: Opponent = RandomOpponent> {
    rewards: Rewards,
    opponent: O,
    first_mover: FirstMover,
    game: Game,
    state: BoardState,
}

impl TicTacToeEnvironment<RandomOpponent> {
    /// Environment against a uniformly random opponent.
    pub fn random(rewards: Rewards, seed: Option<u64>) -> Self {
        Self::new(rewards, RandomOpponent::new(seed))
    }
}

impl<O: Opponent> TicTacToeEnvironment<O> {
    pub fn new(rewards: Rewards, opponent: O) -> Self {
        Self {
            rewards,
            opponent,
            first_mover: FirstMover::Agent,
            game: Game::new(),
            state: BoardState::new(),
        }
    }

    pub fn with_first_mover(mut self, first_mover: FirstMover) -> Self {
        self.first_mover = first_mover;
        self
    }

    /// The episode played so far.
    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn opponent(&self) -> &O {
        &self.opponent
    }

    fn illegal(&self, action: &Move) -> Error {
        Error::IllegalAction {
            action: format!("{action:?}"),
            state: format!("{:?}", self.state),
        }
    }
}

impl<O: Opponent> Environment for TicTacToeEnvironment<O> {
    type State = BoardState;

    fn reset(&mut self) -> Result<BoardState> {
        self.game = match self.first_mover {
            FirstMover::Agent => Game::starting_with(Player::X),
            FirstMover::Opponent => Game::starting_with(Player::O),
        };
        self.state = self.game.current_state()?;
        if self.first_mover == FirstMover::Opponent {
            let reply = self.opponent.select_move(&self.state)?;
            self.state = self.game.play(reply)?;
        }
        Ok(self.state)
    }

    fn step(&mut self, action: &Move) -> Result<Outcome<BoardState>> {
        let legal = !self.state.is_terminal()
            && self.state.to_move == Player::X
            && action.player == Player::X
            && action.position < 9
            && self.state.is_empty(action.position);
        if !legal {
            return Err(self.illegal(action));
        }

        let source = self.state;
        let mut next = self.game.play(action.position)?;
        if !next.is_terminal() {
            let reply = self.opponent.select_move(&next)?;
            next = self.game.play(reply)?;
        }
        self.state = next;

        let reward = self.rewards.for_board(&next);
        Ok(Outcome::new(source, *action, reward, next))
    }

    fn current_state(&self) -> &BoardState {
        &self.state
    }
}
