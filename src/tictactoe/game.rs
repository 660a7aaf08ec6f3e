//! Game records

use serde::{Deserialize, Serialize};

use super::board::{BoardState, Player};
use crate::{Error, Result};

/// A move in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub position: usize,
    pub player: Player,
}

/// Outcome of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    Win(Player),
    Draw,
}

impl GameOutcome {
    /// Outcome of a finished board, `None` while the game is running.
    pub fn of(board: &BoardState) -> Option<Self> {
        if let Some(winner) = board.winner() {
            Some(GameOutcome::Win(winner))
        } else if board.is_draw() {
            Some(GameOutcome::Draw)
        } else {
            None
        }
    }
}

/// A complete game with history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub initial: BoardState,
    pub moves: Vec<Move>,
    pub outcome: Option<GameOutcome>,
}

impl Game {
    /// Create a new game from the empty board with X to move
    pub fn new() -> Self {
        Self::starting_with(Player::X)
    }

    /// Create a new game from the empty board with `first` to move
    pub fn starting_with(first: Player) -> Self {
        Game {
            initial: BoardState::new_with_player(first),
            moves: Vec::new(),
            outcome: None,
        }
    }

    /// Play a move for whoever is to move and return the new board.
    pub fn play(&mut self, position: usize) -> Result<BoardState> {
        if self.outcome.is_some() {
            return Err(Error::GameOver);
        }

        let current = self.current_state()?;
        let new_state = current.make_move(position)?;

        self.moves.push(Move {
            position,
            player: current.to_move,
        });
        self.outcome = GameOutcome::of(&new_state);

        Ok(new_state)
    }

    /// Get current board state by replaying the history
    ///
    /// # Errors
    ///
    /// Returns error if any move in the history is invalid, which means the
    /// record was edited by hand.
    pub fn current_state(&self) -> Result<BoardState> {
        self.moves
            .iter()
            .try_fold(self.initial, |state, m| state.make_move(m.position))
    }

    /// True once the game has a winner or the board is full
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_records_moves_and_outcome() {
        let mut game = Game::new();
        for position in [0, 3, 1, 4] {
            game.play(position).unwrap();
            assert!(!game.is_over());
        }
        let last = game.play(2).unwrap();

        assert_eq!(last.winner(), Some(Player::X));
        assert_eq!(game.outcome, Some(GameOutcome::Win(Player::X)));
        assert_eq!(game.moves.len(), 5);
        assert_eq!(game.moves[1].player, Player::O);
        assert_eq!(game.current_state().unwrap(), last);
        assert!(matches!(game.play(5), Err(Error::GameOver)));
    }

    #[test]
    fn test_opponent_can_open() {
        let mut game = Game::starting_with(Player::O);
        let board = game.play(4).unwrap();
        assert_eq!(board.to_move, Player::X);
        assert_eq!(game.moves[0].player, Player::O);
    }

    #[test]
    fn test_draw_outcome() {
        let mut game = Game::new();
        for position in [0, 1, 2, 4, 3, 5, 7, 6, 8] {
            game.play(position).unwrap();
        }
        assert_eq!(game.outcome, Some(GameOutcome::Draw));
    }
}
