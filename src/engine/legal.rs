use serde::Serialize;

use super::board::Board;
use super::{Axis, Move};

/// Per-direction legality, indexed by [`Move::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LegalMoves(pub [bool; 4]);

impl LegalMoves {
    #[inline]
    pub fn contains(&self, dir: Move) -> bool { self.0[dir.index()] }

    pub fn any(&self) -> bool { self.0.iter().any(|&l| l) }

    /// Legal directions in action-index order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Move> + '_ {
        Move::ALL.into_iter().filter(move |&m| self.contains(m))
    }

    /// Action mask as 0/1 flags.
    pub fn mask(&self) -> [u8; 4] { self.0.map(u8::from) }
}

/// Decide for each direction whether applying it would change the board,
/// without performing any move.
///
/// ```
/// use gym_2048::engine::{compute_legal_moves, Board, Move};
/// let b = Board::from_rows(&[[1, 0], [0, 0]]);
/// let legal = compute_legal_moves(&b);
/// assert!(legal.contains(Move::Right) && legal.contains(Move::Down));
/// assert!(!legal.contains(Move::Left) && !legal.contains(Move::Up));
/// ```
pub fn compute_legal_moves(board: &Board) -> LegalMoves {
    let rows = board.has_adjacent_equal(Axis::Row);
    let cols = board.has_adjacent_equal(Axis::Column);
    let mut legal = [false; 4];
    for dir in Move::ALL {
        let adjacent = match dir.axis() {
            Axis::Row => rows,
            Axis::Column => cols,
        };
        legal[dir.index()] = adjacent || slide_possible(board, dir);
    }
    LegalMoves(legal)
}

/// Legality of a single direction.
pub fn is_legal(board: &Board, dir: Move) -> bool {
    board.has_adjacent_equal(dir.axis()) || slide_possible(board, dir)
}

/// True if some tile has an empty cell between it and the compaction edge of `dir`.
///
/// Walks the slices perpendicular to `dir` from the far edge toward the
/// compaction edge, OR-ing their occupancy into `beyond`. A slice with an
/// empty cell in a lane where `beyond` is already set means a tile can slide.
pub fn slide_possible(board: &Board, dir: Move) -> bool {
    let n = board.size();
    if n == 0 {
        return false;
    }
    let mut beyond = board.slice_occupancy(dir, n - 1);
    for depth in (0..n - 1).rev() {
        let slice = board.slice_occupancy(dir, depth);
        if beyond.iter().zip(&slice).any(|(&far, &here)| far && !here) {
            return true;
        }
        for (b, &here) in beyond.iter_mut().zip(&slice) {
            *b |= here;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_board_has_no_moves() {
        assert!(!compute_legal_moves(&Board::empty(4)).any());
    }

    #[test]
    fn gap_behind_an_occupied_edge_is_detected() {
        // Left: the tile at column 2 can slide into column 1.
        let b = Board::from_rows(&[[1, 0, 2, 0], [0; 4], [0; 4], [0; 4]]);
        assert!(slide_possible(&b, Move::Left));
        assert!(slide_possible(&b, Move::Right));
        assert!(slide_possible(&b, Move::Down));
        assert!(!slide_possible(&b, Move::Up));
    }

    #[test]
    fn packed_line_only_moves_through_merges() {
        let b = Board::from_rows(&[[1, 2, 3], [0, 0, 0], [0, 0, 0]]);
        let legal = compute_legal_moves(&b);
        assert_eq!(legal.0, [false, false, false, true]);

        let b = Board::from_rows(&[[1, 1, 3], [2, 3, 1], [3, 1, 2]]);
        let legal = compute_legal_moves(&b);
        assert_eq!(legal.0, [true, true, false, false]);
    }

    #[test]
    fn full_board_without_pairs_is_stuck() {
        let b = Board::from_rows(&[[1, 2, 1, 2], [2, 1, 2, 1], [1, 2, 1, 2], [2, 1, 2, 1]]);
        assert_eq!(compute_legal_moves(&b).0, [false; 4]);
    }

    #[test]
    fn is_legal_agrees_with_vector() {
        let b = Board::from_rows(&[[0, 2, 0], [2, 0, 0], [0, 0, 1]]);
        let legal = compute_legal_moves(&b);
        for dir in Move::ALL {
            assert_eq!(is_legal(&b, dir), legal.contains(dir));
        }
    }

    #[test]
    fn mask_and_iter() {
        let legal = LegalMoves([true, false, false, true]);
        assert_eq!(legal.mask(), [1, 0, 0, 1]);
        assert_eq!(legal.iter().collect::<Vec<_>>(), vec![Move::Left, Move::Down]);
    }
}
