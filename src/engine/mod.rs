//! Board state and the pure 2048 rules: sliding/merging, legality, spawning
//! and terminal detection.
//!
//! Everything here works on a [`Board`] of tile exponents and carries no
//! episode bookkeeping; [`crate::env::Game2048`] sequences these operations
//! into turns.
//!
//! ```
//! use gym_2048::engine::{self, Board, Move};
//!
//! let mut b = Board::from_rows(&[[1, 1, 1, 0], [0; 4], [0; 4], [0; 4]]);
//! let merged = engine::apply_move(&mut b, Move::Left);
//! assert_eq!(merged, vec![4]);
//! assert_eq!(b.line(Move::Left, 0), vec![2, 1, 0, 0]);
//! ```

use serde::Serialize;
use std::fmt;

mod board;
mod legal;
mod merge;
mod spawn;

pub use board::{exponent_value, Board, BoardError, Exponent, Value};
pub use legal::{compute_legal_moves, is_legal, slide_possible, LegalMoves};
pub use merge::{apply_move, merge_line, LineMerge};
pub use spawn::{random_exponent, spawn, Spawn};

/// A direction to move/merge tiles.
///
/// Discriminants follow the action indices exposed to controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Move {
    Left = 0,
    Right = 1,
    Up = 2,
    Down = 3,
}

/// Orientation of the lines a move operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Left/Right: each row is a line.
    Row,
    /// Up/Down: each column is a line.
    Column,
}

impl Move {
    /// All directions in action-index order.
    pub const ALL: [Move; 4] = [Move::Left, Move::Right, Move::Up, Move::Down];

    #[inline]
    pub fn index(self) -> usize { self as usize }

    #[inline]
    pub fn axis(self) -> Axis {
        match self {
            Move::Left | Move::Right => Axis::Row,
            Move::Up | Move::Down => Axis::Column,
        }
    }

    /// Index along a line that tiles pile up against on a board of side `size`.
    #[inline]
    pub fn compaction_edge(self, size: usize) -> usize {
        match self {
            Move::Left | Move::Up => 0,
            Move::Right | Move::Down => size.saturating_sub(1),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Move::Left => "LEFT",
            Move::Right => "RIGHT",
            Move::Up => "UP",
            Move::Down => "DOWN",
        };
        f.write_str(s)
    }
}

/// Raw action index that does not name a direction.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionError {
    #[error("action index {0} is out of range (expected 0..=3)")]
    OutOfRange(u8),
}

impl TryFrom<u8> for Move {
    type Error = ActionError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Move::Left),
            1 => Ok(Move::Right),
            2 => Ok(Move::Up),
            3 => Ok(Move::Down),
            other => Err(ActionError::OutOfRange(other)),
        }
    }
}

impl From<Move> for u8 {
    fn from(m: Move) -> Self { m as u8 }
}

/// True iff some tile has reached the goal exponent.
pub fn reached_goal(board: &Board, board_goal: Exponent) -> bool {
    board.cells().iter().any(|&e| e == board_goal)
}

/// True iff the board is full and no two neighbouring tiles can merge.
pub fn is_game_over(board: &Board) -> bool {
    !board.has_empty()
        && !board.has_adjacent_equal(Axis::Row)
        && !board.has_adjacent_equal(Axis::Column)
}
