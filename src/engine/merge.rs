use super::board::{exponent_value, Board, Exponent, Value};
use super::Move;

/// Result of compacting one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMerge {
    /// New line, same orientation as the input.
    pub line: Vec<Exponent>,
    /// Numeric value of each tile produced by a merge, in scan order.
    pub merged: Vec<Value>,
}

/// Slide and merge one line toward index 0.
///
/// Tiles are taken from the compaction edge outward. A tile joins the most
/// recently placed tile when both hold the same exponent and the placed tile
/// has not already absorbed another this move; otherwise it takes the next
/// free slot. Tiles at [`Exponent::MAX`] have no larger exponent to become and
/// never merge.
///
/// ```
/// use gym_2048::engine::merge_line;
/// let m = merge_line(&[1, 1, 1, 0]);
/// assert_eq!(m.line, vec![2, 1, 0, 0]);
/// assert_eq!(m.merged, vec![4]);
/// ```
pub fn merge_line(line: &[Exponent]) -> LineMerge {
    let mut out = vec![0; line.len()];
    let mut merged_slot = vec![false; line.len()];
    let mut merged = Vec::new();
    // Next free slot; `cursor - 1` is the last tile placed.
    let mut cursor = 0;

    for &tile in line.iter().filter(|&&e| e != 0) {
        if cursor > 0 && out[cursor - 1] == tile && tile < Exponent::MAX && !merged_slot[cursor - 1] {
            out[cursor - 1] = tile + 1;
            merged_slot[cursor - 1] = true;
            merged.push(exponent_value(out[cursor - 1]));
        } else {
            out[cursor] = tile;
            cursor += 1;
        }
    }
    LineMerge { line: out, merged }
}

/// Apply `dir` to every line of `board` in place and return the merged tile values.
///
/// Legality is the caller's concern: an illegal direction simply leaves the
/// board as it was and returns no merges.
pub fn apply_move(board: &mut Board, dir: Move) -> Vec<Value> {
    let mut merged = Vec::new();
    for idx in 0..board.size() {
        let result = merge_line(&board.line(dir, idx));
        board.set_line(dir, idx, &result.line);
        merged.extend(result.merged);
    }
    merged
}
