//! Board state representation and basic operations

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{game::Move, lines::has_won};
use crate::{Error, Result, mdp::MdpState};

/// A cell on the Tic-Tac-Toe board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    X,
    O,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | ' ' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::X),
            'O' | 'o' | '0' => Some(Cell::O),
            _ => None,
        }
    }
}

/// A player in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Convert player to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }

    fn to_char(self) -> char {
        self.to_cell().to_char()
    }
}

/// Complete board state including cells and whose turn it is
///
/// Equality and hashing are by content, so a position reached through
/// different move orders is a single state. The same cells with a different
/// player to move are different states.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardState {
    pub cells: [Cell; 9],
    pub to_move: Player,
}

impl BoardState {
    /// Create a new empty board with X to move
    pub fn new() -> Self {
        Self::new_with_player(Player::X)
    }

    /// Create a new empty board with a specified player to move first.
    ///
    /// ```
    /// use tictactoe_mdp::tictactoe::{BoardState, Player};
    ///
    /// let o_first = BoardState::new_with_player(Player::O);
    /// let after_move = o_first.make_move(4).unwrap();
    /// assert_eq!(after_move.to_move, Player::X);
    /// ```
    pub fn new_with_player(first_player: Player) -> Self {
        BoardState {
            cells: [Cell::Empty; 9],
            to_move: first_player,
        }
    }

    /// Create a board from a string representation.
    ///
    /// The string holds 9 cell characters (whitespace is ignored) and may end
    /// with `_X` or `_O` to set the player to move. Without the suffix the
    /// player is inferred from the piece counts with X moving first.
    ///
    /// # Errors
    ///
    /// Fails on fewer than 9 cells, an unknown cell character, piece counts
    /// that no legal game produces, or a suffix that contradicts the counts.
    pub fn from_string(s: &str) -> Result<Self> {
        let cleaned: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let (board_part, specified_turn) = match cleaned.split_once('_') {
            Some((board, suffix)) => (board, Some(parse_player(suffix, &cleaned)?)),
            None => (cleaned.as_str(), None),
        };

        let chars: Vec<char> = board_part.chars().collect();
        if chars.len() < 9 {
            return Err(Error::InvalidBoardLength {
                expected: 9,
                got: chars.len(),
                context: s.to_string(),
            });
        }
        let mut cells = [Cell::Empty; 9];
        for (i, &c) in chars.iter().take(9).enumerate() {
            cells[i] = Cell::from_char(c).ok_or_else(|| Error::InvalidCellCharacter {
                character: c,
                position: i,
                context: s.to_string(),
            })?;
        }

        let x_count = cells.iter().filter(|&&c| c == Cell::X).count();
        let o_count = cells.iter().filter(|&&c| c == Cell::O).count();
        if x_count.abs_diff(o_count) > 1 {
            return Err(Error::InvalidPieceCounts { x_count, o_count });
        }

        let to_move = match specified_turn {
            Some(Player::X) if x_count > o_count => {
                return Err(turn_conflict(x_count, o_count, Player::X, s));
            }
            Some(Player::O) if o_count > x_count => {
                return Err(turn_conflict(x_count, o_count, Player::O, s));
            }
            Some(player) => player,
            None if x_count == o_count => Player::X,
            None if x_count == o_count + 1 => Player::O,
            None => return Err(Error::InvalidPieceCounts { x_count, o_count }),
        };

        Ok(BoardState { cells, to_move })
    }

    /// Count the number of occupied cells on the board.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != Cell::Empty).count()
    }

    /// Get cell at position (0-8)
    pub fn get(&self, pos: usize) -> Cell {
        self.cells[pos]
    }

    /// Check if a position is empty
    pub fn is_empty(&self, pos: usize) -> bool {
        self.cells[pos] == Cell::Empty
    }

    /// Get all empty positions
    pub fn empty_positions(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    /// Make a move and return a new board state
    #[must_use = "make_move returns a new board state; the original is unchanged"]
    pub fn make_move(&self, pos: usize) -> Result<BoardState> {
        if self.is_terminal() {
            return Err(Error::GameOver);
        }
        if pos >= 9 || !self.is_empty(pos) {
            return Err(Error::InvalidMove { position: pos });
        }

        let mut new_state = *self;
        new_state.cells[pos] = self.to_move.to_cell();
        new_state.to_move = self.to_move.opponent();
        Ok(new_state)
    }

    /// Get legal moves in this position (empty cells when game not terminal)
    pub fn legal_moves(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.empty_positions()
    }

    /// Check if a player has won
    pub fn has_won(&self, player: Player) -> bool {
        has_won(&self.cells, player)
    }

    /// Check if the game is over (win or draw)
    pub fn is_terminal(&self) -> bool {
        self.has_won(Player::X) || self.has_won(Player::O) || !self.cells.contains(&Cell::Empty)
    }

    /// Check if the position is a draw (all cells filled, no winner)
    pub fn is_draw(&self) -> bool {
        !self.cells.contains(&Cell::Empty) && self.winner().is_none()
    }

    /// Get the winner if there is one
    pub fn winner(&self) -> Option<Player> {
        if self.has_won(Player::X) {
            Some(Player::X)
        } else if self.has_won(Player::O) {
            Some(Player::O)
        } else {
            None
        }
    }

    /// Get a canonical string representation for use as a key
    pub fn encode(&self) -> String {
        format!(
            "{}_{}",
            self.cells.iter().map(|&c| c.to_char()).collect::<String>(),
            self.to_move.to_char()
        )
    }
}

fn parse_player(player_str: &str, context: &str) -> Result<Player> {
    match player_str {
        "X" => Ok(Player::X),
        "O" => Ok(Player::O),
        _ => Err(Error::InvalidPlayerString {
            player: player_str.to_string(),
            label: context.to_string(),
        }),
    }
}

fn turn_conflict(x_count: usize, o_count: usize, player: Player, context: &str) -> Error {
    Error::InvalidConfiguration {
        message: format!(
            "piece counts (X={x_count}, O={o_count}) are inconsistent with {} to move in '{context}'",
            player.to_char()
        ),
    }
}

impl MdpState for BoardState {
    type Action = Move;

    fn is_terminal(&self) -> bool {
        BoardState::is_terminal(self)
    }

    /// Moves for the player to move, in ascending cell order.
    fn legal_actions(&self) -> Vec<Move> {
        self.legal_moves()
            .into_iter()
            .map(|position| Move {
                position,
                player: self.to_move,
            })
            .collect()
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &cell) in self.cells.iter().enumerate() {
            write!(f, "{}", cell.to_char())?;
            if (i + 1).is_multiple_of(3) && i < 8 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoardState({})", self.encode())
    }
}
