use rand::Rng;
use serde::Serialize;

use super::board::{Board, Exponent};

/// A tile placed by [`spawn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Spawn {
    pub row: usize,
    pub col: usize,
    pub exponent: Exponent,
}

/// Place a 2 (90%) or 4 (10%) on a uniformly chosen empty cell.
///
/// Exactly two draws are taken from `rng` per call (cell, then exponent), so
/// a seeded source replays the same spawns for the same sequence of boards.
///
/// Panics if the board has no empty cell; callers only spawn after a move
/// that was checked to leave the episode running.
///
/// ```
/// use gym_2048::engine::{spawn, Board};
/// use rand::{rngs::StdRng, SeedableRng};
/// let mut rng = StdRng::seed_from_u64(123);
/// let mut b = Board::empty(4);
/// let s = spawn(&mut b, &mut rng);
/// assert_eq!(b.get(s.row, s.col), s.exponent);
/// assert!(s.exponent == 1 || s.exponent == 2);
/// ```
pub fn spawn<R: Rng + ?Sized>(board: &mut Board, rng: &mut R) -> Spawn {
    let empty = board.empty_cells();
    assert!(!empty.is_empty(), "spawn on a full board: no empty cell for a new tile");
    let (row, col) = empty[rng.gen_range(0..empty.len())];
    let exponent = random_exponent(rng);
    board.set(row, col, exponent);
    Spawn { row, col, exponent }
}

/// 1 with probability 0.9, otherwise 2.
pub fn random_exponent<R: Rng + ?Sized>(rng: &mut R) -> Exponent {
    if rng.gen_range(0..10) < 9 { 1 } else { 2 }
}
