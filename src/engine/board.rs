use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Axis, Move};

/// Tile exponent: `0` is empty, `e >= 1` is a tile worth `2^e`.
pub type Exponent = u8;
/// Numeric tile value or score amount.
pub type Value = u64;

/// Square N x N grid of tile exponents, stored row-major.
///
/// Lines are read and written through owned vectors oriented from a move's
/// compaction edge outward (see [`Board::line`]), so the merge and legality
/// routines never alias the grid while they compute.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawBoard")]
pub struct Board {
    size: usize,
    cells: Vec<Exponent>,
}

/// Unchecked wire form of [`Board`].
#[derive(Deserialize)]
struct RawBoard {
    size: usize,
    cells: Vec<Exponent>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("a {size}x{size} board needs {} cells, got {len}", .size * .size)]
    CellCount { size: usize, len: usize },
}

impl TryFrom<RawBoard> for Board {
    type Error = BoardError;

    fn try_from(raw: RawBoard) -> Result<Self, Self::Error> {
        if raw.size.checked_mul(raw.size) != Some(raw.cells.len()) {
            return Err(BoardError::CellCount { size: raw.size, len: raw.cells.len() });
        }
        Ok(Board { size: raw.size, cells: raw.cells })
    }
}

impl Board {
    /// An empty `size` x `size` board.
    pub fn empty(size: usize) -> Self {
        Board { size, cells: vec![0; size * size] }
    }

    /// Build a board from rows of exponents.
    ///
    /// Panics if `rows` is not square.
    ///
    /// ```
    /// use gym_2048::engine::Board;
    /// let b = Board::from_rows(&[[1, 0], [0, 2]]);
    /// assert_eq!(b.get(1, 1), 2);
    /// assert_eq!(b.count_empty(), 2);
    /// ```
    pub fn from_rows<const N: usize>(rows: &[[Exponent; N]]) -> Self {
        assert_eq!(rows.len(), N, "board rows must form a square grid");
        Board { size: N, cells: rows.iter().flatten().copied().collect() }
    }

    /// Build a board from row-major exponents. Panics unless `cells.len() == size * size`.
    pub fn from_cells(size: usize, cells: Vec<Exponent>) -> Self {
        assert_eq!(cells.len(), size * size, "cell count must be size * size");
        Board { size, cells }
    }

    /// Side length N.
    #[inline]
    pub fn size(&self) -> usize { self.size }

    /// Row-major exponents.
    #[inline]
    pub fn cells(&self) -> &[Exponent] { &self.cells }

    /// Copy of the row-major exponents.
    pub fn to_vec(&self) -> Vec<Exponent> { self.cells.clone() }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Exponent { self.cells[row * self.size + col] }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, exponent: Exponent) {
        self.cells[row * self.size + col] = exponent;
    }

    /// Numeric value of the tile at (row, col), 0 when empty.
    #[inline]
    pub fn tile_value(&self, row: usize, col: usize) -> Value { exponent_value(self.get(row, col)) }

    pub fn count_empty(&self) -> usize { self.cells.iter().filter(|&&e| e == 0).count() }

    pub fn has_empty(&self) -> bool { self.cells.contains(&0) }

    /// Largest exponent on the board (0 for an empty board).
    pub fn max_exponent(&self) -> Exponent { self.cells.iter().copied().max().unwrap_or(0) }

    /// Sum of the numeric values of all tiles.
    pub fn total_value(&self) -> Value {
        self.cells.iter().fold(0, |acc: Value, &e| acc.saturating_add(exponent_value(e)))
    }

    /// Empty cells as (row, col), in row-major order.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &e)| e == 0)
            .map(|(idx, _)| (idx / self.size, idx % self.size))
            .collect()
    }

    /// Board coordinates of the `pos`-th cell of line `idx` for `dir`, where
    /// position 0 sits on the compaction edge.
    #[inline]
    fn coord(&self, dir: Move, idx: usize, pos: usize) -> (usize, usize) {
        let along = dir.compaction_edge(self.size).abs_diff(pos);
        match dir.axis() {
            Axis::Row => (idx, along),
            Axis::Column => (along, idx),
        }
    }

    /// Extract line `idx` (a row for Left/Right, a column for Up/Down) as an
    /// owned vector ordered from the compaction edge of `dir` outward.
    ///
    /// ```
    /// use gym_2048::engine::{Board, Move};
    /// let b = Board::from_rows(&[[1, 2, 3], [0, 0, 0], [4, 5, 6]]);
    /// assert_eq!(b.line(Move::Right, 0), vec![3, 2, 1]);
    /// assert_eq!(b.line(Move::Down, 1), vec![5, 0, 2]);
    /// ```
    pub fn line(&self, dir: Move, idx: usize) -> Vec<Exponent> {
        (0..self.size)
            .map(|pos| {
                let (r, c) = self.coord(dir, idx, pos);
                self.get(r, c)
            })
            .collect()
    }

    /// Write back a line produced for `dir`, using the same orientation as [`Board::line`].
    pub fn set_line(&mut self, dir: Move, idx: usize, line: &[Exponent]) {
        debug_assert_eq!(line.len(), self.size);
        for (pos, &e) in line.iter().enumerate() {
            let (r, c) = self.coord(dir, idx, pos);
            self.set(r, c, e);
        }
    }

    /// Occupancy of the `depth`-th slice perpendicular to `dir`, counted from
    /// the compaction edge. Entry `i` belongs to line `i`.
    pub fn slice_occupancy(&self, dir: Move, depth: usize) -> Vec<bool> {
        (0..self.size)
            .map(|idx| {
                let (r, c) = self.coord(dir, idx, depth);
                self.get(r, c) != 0
            })
            .collect()
    }

    /// True if two neighbouring non-empty tiles along `axis` hold the same exponent.
    pub fn has_adjacent_equal(&self, axis: Axis) -> bool {
        let dir = match axis {
            Axis::Row => Move::Left,
            Axis::Column => Move::Up,
        };
        (0..self.size).any(|idx| {
            self.line(dir, idx)
                .windows(2)
                .any(|pair| pair[0] != 0 && pair[0] != Exponent::MAX && pair[0] == pair[1])
        })
    }
}

/// `2^e` for a tile exponent, 0 for empty. Saturates at `u64::MAX`.
#[inline]
pub fn exponent_value(e: Exponent) -> Value {
    match e {
        0 => 0,
        e if (e as u32) < Value::BITS => 1 << e,
        _ => Value::MAX,
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<&[Exponent]> = self.cells.chunks(self.size.max(1)).collect();
        write!(f, "Board{:?}", rows)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(self.size * 8);
        for (r, row) in self.cells.chunks(self.size.max(1)).enumerate() {
            if r > 0 {
                writeln!(f, "{}", rule)?;
            }
            let cells: Vec<String> = row.iter().map(format_val).collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}

fn format_val(val: &Exponent) -> String {
    match val {
        0 => String::from("       "),
        &x if x < 20 => format!("{:^7}", exponent_value(x)),
        &x => format!("{:^7}", format!("2^{}", x)),
    }
}
