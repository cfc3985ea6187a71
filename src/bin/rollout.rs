use anyhow::Context;
use clap::{Parser, ValueEnum};
use gym_2048::config::GameConfig;
use gym_2048::engine::Exponent;
use gym_2048::env::{Game2048, Outcome};
use gym_2048::logging;
use gym_2048::policy::{Greedy, Policy, RandomLegal};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "rollout", about = "Run many independent seeded 2048 episodes in parallel")]
struct Args {
    /// Number of episodes
    #[arg(short = 'n', long, default_value_t = 1000)]
    episodes: u64,
    /// Board side length
    #[arg(long, default_value_t = 4)]
    size: usize,
    /// Winning tile value (power of two, 8 ..= 2^63)
    #[arg(long, default_value_t = 2048)]
    goal: u64,
    /// Seed of the first episode; episode i uses seed + i
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long, value_enum, default_value_t = PolicyKind::Random)]
    policy: PolicyKind,
    /// Worker threads (defaults to rayon's choice)
    #[arg(long)]
    threads: Option<usize>,
    /// Emit one JSON object per episode plus a final summary object
    #[arg(long)]
    json: bool,
    /// Suppress progress bar
    #[arg(long)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyKind {
    Random,
    Greedy,
}

#[derive(Debug, Serialize)]
struct EpisodeSummary {
    seed: u64,
    outcome: Outcome,
    score: u64,
    max_exponent: Exponent,
    steps: u64,
}

#[derive(Debug, Serialize)]
struct RolloutSummary {
    episodes: u64,
    wins: u64,
    losses: u64,
    mean_score: f64,
    max_score: u64,
    /// Best score over lost episodes.
    best_lost_score: u64,
    max_tile_histogram: BTreeMap<u64, u64>,
    elapsed_s: f64,
}

fn main() -> anyhow::Result<()> {
    logging::init("warn");
    let args = Args::parse();
    let config = GameConfig::new(args.size, args.goal).context("invalid game configuration")?;
    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure the rayon thread pool")?;
    }

    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(args.episodes);
        pb.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} episodes | {elapsed_precise} | eta {eta}")
                .context("invalid progress template")?,
        );
        pb
    };

    let start = Instant::now();
    let results: Vec<EpisodeSummary> = (0..args.episodes)
        .into_par_iter()
        .map(|i| {
            let summary = run_episode(config, args.seed.wrapping_add(i), args.policy);
            pb.inc(1);
            summary
        })
        .collect::<anyhow::Result<_>>()?;
    pb.finish_and_clear();

    let summary = summarize(&results, start.elapsed().as_secs_f64());
    info!(episodes = summary.episodes, wins = summary.wins, "rollout complete");

    if args.json {
        for r in &results {
            println!("{}", serde_json::to_string(r)?);
        }
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        println!(
            "Episodes: {} | wins: {} | losses: {} | mean score: {:.1} | max score: {} | {:.2}s",
            summary.episodes,
            summary.wins,
            summary.losses,
            summary.mean_score,
            summary.max_score,
            summary.elapsed_s
        );
        for (tile, count) in &summary.max_tile_histogram {
            println!("{:>8}: {}", tile, count);
        }
    }
    Ok(())
}

/// One engine and one policy per episode; nothing is shared between workers.
fn run_episode(config: GameConfig, seed: u64, kind: PolicyKind) -> anyhow::Result<EpisodeSummary> {
    let mut game: Game2048 = Game2048::from_seed(config, seed)?;
    let mut policy: Box<dyn Policy> = match kind {
        PolicyKind::Random => Box::new(RandomLegal::new(seed ^ 0x9e37_79b9_7f4a_7c15)),
        PolicyKind::Greedy => Box::new(Greedy),
    };
    let (mut board, mut info) = game.reset(None);
    let mut outcome = Outcome::Continue;
    while let Some(dir) = policy.get_next_move(&board, info.legal_moves) {
        let step = game.step(dir).with_context(|| format!("episode with seed {seed}"))?;
        outcome = step.outcome;
        if step.terminated {
            break;
        }
        board = step.board;
        info = step.info;
    }
    Ok(EpisodeSummary {
        seed,
        outcome,
        score: game.score(),
        max_exponent: game.max_tile_exponent(),
        steps: game.steps(),
    })
}

fn summarize(results: &[EpisodeSummary], elapsed_s: f64) -> RolloutSummary {
    let mut histogram = BTreeMap::new();
    for r in results {
        let tile = 1u64.checked_shl(r.max_exponent as u32).unwrap_or(u64::MAX);
        *histogram.entry(tile).or_insert(0) += 1;
    }
    let total: f64 = results.iter().map(|r| r.score as f64).sum();
    RolloutSummary {
        episodes: results.len() as u64,
        wins: results.iter().filter(|r| r.outcome == Outcome::Won).count() as u64,
        losses: results.iter().filter(|r| r.outcome == Outcome::Lost).count() as u64,
        mean_score: if results.is_empty() { 0.0 } else { total / results.len() as f64 },
        max_score: results.iter().map(|r| r.score).max().unwrap_or(0),
        best_lost_score: results
            .iter()
            .filter(|r| r.outcome == Outcome::Lost)
            .map(|r| r.score)
            .max()
            .unwrap_or(0),
        max_tile_histogram: histogram,
        elapsed_s,
    }
}
