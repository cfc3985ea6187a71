use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use gym_2048::config::GameConfig;
use gym_2048::engine::{self, Board, Move};
use gym_2048::env::Game2048;
use gym_2048::policy::{Greedy, Policy};
use rand::{rngs::StdRng, SeedableRng};
use std::hint::black_box;

fn corpus() -> Vec<Board> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut boards = Vec::new();
    // Empty and two-tile starts
    boards.push(Board::empty(4));
    let mut b = Board::empty(4);
    engine::spawn(&mut b, &mut rng);
    engine::spawn(&mut b, &mut rng);
    boards.push(b.clone());
    // Derive a variety of densities deterministically
    let seq = [Move::Left, Move::Up, Move::Right, Move::Down];
    for i in 0..40 {
        let dir = seq[i % seq.len()];
        if engine::is_legal(&b, dir) {
            engine::apply_move(&mut b, dir);
            if b.has_empty() { engine::spawn(&mut b, &mut rng); }
        }
        boards.push(b.clone());
    }
    boards
}

fn bench_apply_move(c: &mut Criterion) {
    let boards = corpus();
    for dir in Move::ALL {
        c.bench_function(&format!("apply_move/{dir}"), |bch| {
            bch.iter(|| {
                let mut acc = 0u64;
                for bd in &boards {
                    let mut next = bd.clone();
                    acc ^= engine::apply_move(&mut next, dir).len() as u64;
                    acc ^= next.max_exponent() as u64;
                }
                black_box(acc)
            })
        });
    }
}

fn bench_legality(c: &mut Criterion) {
    let boards = corpus();
    c.bench_function("legal/compute_legal_moves", |bch| {
        bch.iter(|| {
            let mut acc = 0u8;
            for bd in &boards { acc ^= engine::compute_legal_moves(bd).mask()[0]; }
            black_box(acc)
        })
    });
    c.bench_function("legal/brute_force", |bch| {
        bch.iter(|| {
            let mut acc = 0usize;
            for bd in &boards {
                for dir in Move::ALL {
                    let mut next = bd.clone();
                    engine::apply_move(&mut next, dir);
                    acc += (next != *bd) as usize;
                }
            }
            black_box(acc)
        })
    });
}

fn bench_spawn_and_episode(c: &mut Criterion) {
    c.bench_function("board/spawn_fill", |bch| {
        bch.iter_batched(
            || (Board::empty(4), StdRng::seed_from_u64(7)),
            |(mut bd, mut rng)| {
                for _ in 0..16 { engine::spawn(&mut bd, &mut rng); }
                black_box(bd)
            },
            BatchSize::SmallInput,
        )
    });
    c.bench_function("env/greedy_episode", |bch| {
        bch.iter_batched(
            || Game2048::<StdRng>::from_seed(GameConfig::default(), 9).expect("default config is valid"),
            |mut game| {
                game.reset(None);
                let mut policy = Greedy;
                while let Some(dir) = policy.get_next_move(game.board(), game.legal_moves()) {
                    if game.step(dir).map(|s| s.terminated).unwrap_or(true) { break; }
                }
                black_box(game.score())
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(engine_ops, bench_apply_move, bench_legality, bench_spawn_and_episode);
criterion_main!(engine_ops);
