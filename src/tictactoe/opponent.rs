//! Fixed opponents the designated player trains against

use rand::{Rng, rngs::StdRng};

use super::board::BoardState;
use crate::{Error, Result, utils::build_rng};

/// Policy of the player the agent does not control.
pub trait Opponent {
    /// Pick a cell for the player to move in `state`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GameOver`] when `state` has no legal moves.
    fn select_move(&mut self, state: &BoardState) -> Result<usize>;

    fn name(&self) -> &str;
}

/// Opponent that plays uniformly at random among the empty cells
#[derive(Debug, Clone)]
pub struct RandomOpponent {
    rng: StdRng,
}

impl RandomOpponent {
    /// Create a random opponent; `None` seeds from the thread RNG
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            rng: build_rng(seed),
        }
    }
}

impl Default for RandomOpponent {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Opponent for RandomOpponent {
    fn select_move(&mut self, state: &BoardState) -> Result<usize> {
        let moves = state.legal_moves();
        if moves.is_empty() {
            return Err(Error::GameOver);
        }
        let index = self.rng.random_range(0..moves.len());
        Ok(moves[index])
    }

    fn name(&self) -> &str {
        "random"
    }
}

impl<O: Opponent + ?Sized> Opponent for Box<O> {
    fn select_move(&mut self, state: &BoardState) -> Result<usize> {
        (**self).select_move(state)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
