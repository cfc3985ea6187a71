use gym_2048::engine::{self, apply_move, compute_legal_moves, merge_line, Board, Exponent, Move};
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

/// Legality by trying the move.
fn brute_force_legal(board: &Board, dir: Move) -> bool {
    let mut next = board.clone();
    apply_move(&mut next, dir);
    next != *board
}

/// Compact, then merge equal neighbours pairwise from the front.
fn reference_merge(line: &[Exponent]) -> Vec<Exponent> {
    let tiles: Vec<Exponent> = line.iter().copied().filter(|&e| e != 0).collect();
    let mut out = Vec::with_capacity(line.len());
    let mut i = 0;
    while i < tiles.len() {
        if i + 1 < tiles.len() && tiles[i] == tiles[i + 1] {
            out.push(tiles[i] + 1);
            i += 2;
        } else {
            out.push(tiles[i]);
            i += 1;
        }
    }
    out.resize(line.len(), 0);
    out
}

fn tile_count(board: &Board) -> usize { board.cells().iter().filter(|&&e| e != 0).count() }

/// Every board of side `size` with exponents in `0..=max_exp`.
fn all_boards(size: usize, max_exp: Exponent) -> impl Iterator<Item = Board> {
    let cells = size * size;
    let base = max_exp as u64 + 1;
    (0..base.pow(cells as u32)).map(move |mut code| {
        let mut v = Vec::with_capacity(cells);
        for _ in 0..cells {
            v.push((code % base) as Exponent);
            code /= base;
        }
        Board::from_cells(size, v)
    })
}

fn assert_legality_matches_brute_force(size: usize, max_exp: Exponent) {
    for board in all_boards(size, max_exp) {
        let legal = compute_legal_moves(&board);
        for dir in Move::ALL {
            assert_eq!(
                legal.contains(dir),
                brute_force_legal(&board, dir),
                "{dir} on {board:?}"
            );
        }
    }
}

#[test]
fn legality_exhaustive_2x2() {
    assert_legality_matches_brute_force(2, 4);
}

#[test]
fn legality_exhaustive_3x3() {
    assert_legality_matches_brute_force(3, 2);
}

#[test]
fn legality_exhaustive_4x4_binary() {
    assert_legality_matches_brute_force(4, 1);
}

fn arb_board() -> impl Strategy<Value = Board> {
    (2usize..=6).prop_flat_map(|size| {
        prop::collection::vec(prop_oneof![3 => Just(0u8), 5 => 1u8..=6], size * size)
            .prop_map(move |cells| Board::from_cells(size, cells))
    })
}

proptest! {
    #[test]
    fn legality_is_sound(board in arb_board()) {
        let legal = compute_legal_moves(&board);
        for dir in Move::ALL {
            prop_assert_eq!(legal.contains(dir), brute_force_legal(&board, dir));
        }
    }

    #[test]
    fn merge_matches_pairwise_reference(line in prop::collection::vec(0u8..=4, 2..=8)) {
        let merged = merge_line(&line);
        prop_assert_eq!(&merged.line, &reference_merge(&line));
        let tiles_in = line.iter().filter(|&&e| e != 0).count();
        let tiles_out = merged.line.iter().filter(|&&e| e != 0).count();
        // Each merge consumes exactly two tiles and yields one.
        prop_assert_eq!(merged.merged.len(), tiles_in - tiles_out);
    }

    #[test]
    fn moves_conserve_value(board in arb_board(), idx in 0usize..4) {
        let dir = Move::ALL[idx];
        let mut next = board.clone();
        let merged = apply_move(&mut next, dir);
        prop_assert_eq!(next.total_value(), board.total_value());
        prop_assert_eq!(merged.len(), tile_count(&board) - tile_count(&next));
        for v in merged {
            prop_assert!(v >= 4 && v.is_power_of_two());
        }
    }

    #[test]
    fn moves_are_idempotent_once_applied(board in arb_board(), idx in 0usize..4) {
        // After a move, repeating it can only merge, never slide.
        let dir = Move::ALL[idx];
        let mut next = board.clone();
        apply_move(&mut next, dir);
        prop_assert!(!engine::slide_possible(&next, dir));
    }

    #[test]
    fn spawn_targets_an_empty_cell(board in arb_board(), seed in any::<u64>()) {
        prop_assume!(board.has_empty());
        let mut rng = StdRng::seed_from_u64(seed);
        let mut next = board.clone();
        let s = engine::spawn(&mut next, &mut rng);
        prop_assert_eq!(board.get(s.row, s.col), 0);
        prop_assert!(s.exponent == 1 || s.exponent == 2);
        prop_assert_eq!(next.count_empty(), board.count_empty() - 1);
    }

    #[test]
    fn game_over_iff_full_and_stuck(board in arb_board()) {
        let stuck = !compute_legal_moves(&board).any();
        prop_assert_eq!(engine::is_game_over(&board), !board.has_empty() && stuck);
    }
}
