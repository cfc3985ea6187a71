//! Simple move-selection policies for driving [`crate::env::Game2048`] in
//! rollouts and benches.
//!
//! Policies only read the board and the legal-move vector; they never touch
//! the engine's random source, so a seeded episode stays reproducible for a
//! given policy seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::engine::{self, Board, LegalMoves, Move, Value};

pub trait Policy {
    /// Pick a direction, or `None` when nothing is legal.
    fn get_next_move(&mut self, board: &Board, legal: LegalMoves) -> Option<Move>;
}

/// Uniform choice among the legal directions.
#[derive(Debug, Clone)]
pub struct RandomLegal {
    rng: StdRng,
}

impl RandomLegal {
    pub fn new(seed: u64) -> Self { RandomLegal { rng: StdRng::seed_from_u64(seed) } }
}

impl Policy for RandomLegal {
    fn get_next_move(&mut self, _board: &Board, legal: LegalMoves) -> Option<Move> {
        let moves: Vec<Move> = legal.iter().collect();
        if moves.is_empty() {
            return None;
        }
        Some(moves[self.rng.gen_range(0..moves.len())])
    }
}

/// One-ply lookahead: the legal move with the largest immediate merge total,
/// ties broken by the most empty cells, then action order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Greedy;

impl Policy for Greedy {
    fn get_next_move(&mut self, board: &Board, legal: LegalMoves) -> Option<Move> {
        legal
            .iter()
            .map(|dir| {
                let mut next = board.clone();
                let gain = engine::apply_move(&mut next, dir)
                    .iter()
                    .fold(0, |acc: Value, &v| acc.saturating_add(v));
                (dir, gain, next.count_empty())
            })
            // max_by_key keeps the last maximum; reverse so earlier actions win ties.
            .rev()
            .max_by_key(|&(_, gain, empty)| (gain, empty))
            .map(|(dir, _, _)| dir)
    }
}
