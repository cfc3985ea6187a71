use anyhow::Context;
use clap::Parser;
use gym_2048::config::GameConfig;
use gym_2048::env::Game2048;
use gym_2048::logging;
use gym_2048::policy::{Policy, RandomLegal};

/// Play one seeded episode with a random legal policy, printing every board.
#[derive(Parser, Debug)]
#[command(name = "gym-2048", version)]
struct Args {
    /// Board side length
    #[arg(long, default_value_t = 4)]
    size: usize,
    /// Winning tile value (power of two, 8 ..= 2^63)
    #[arg(long, default_value_t = 2048)]
    goal: u64,
    /// Seed for tile spawns; the policy uses seed + 1
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    logging::init("warn");
    let args = Args::parse();
    let config = GameConfig::new(args.size, args.goal).context("invalid game configuration")?;
    let mut game: Game2048 = Game2048::from_seed(config, args.seed)?;
    let mut policy = RandomLegal::new(args.seed.wrapping_add(1));

    let (mut board, mut info) = game.reset(None);
    println!("{}", game);
    let mut move_count = 0;
    while let Some(direction) = policy.get_next_move(&board, info.legal_moves) {
        let step = game.step(direction)?;
        move_count += 1;
        println!("{} -> {:?}\n{}", direction, step.outcome, game);
        if step.terminated {
            break;
        }
        board = step.board;
        info = step.info;
    }
    println!(
        "Moves made: {}, Score: {}, Highest tile: 2^{}",
        move_count,
        game.score(),
        game.max_tile_exponent()
    );
    Ok(())
}
