//! gym-2048: a deterministic, steppable 2048 engine for agents and controllers
//!
//! This crate provides:
//! - A square `Board` of tile exponents with line-oriented accessors (`engine` module)
//! - The pure rules: `apply_move`, `compute_legal_moves`, `spawn`, goal/loss checks
//! - `Game2048`, the turn controller with seeded spawns, rewards and best score (`env` module)
//! - Validated configuration (`config`) and simple rollout policies (`policy`)
//!
//! Quick start:
//! ```
//! use gym_2048::config::GameConfig;
//! use gym_2048::env::{Game2048, Outcome};
//! use gym_2048::policy::{Policy, RandomLegal};
//!
//! let mut game: Game2048 = Game2048::from_seed(GameConfig::default(), 42).unwrap();
//! let mut policy = RandomLegal::new(7);
//! let (mut board, mut info) = game.reset(None);
//!
//! // Play until the episode ends (random play on 4x4 always does).
//! while let Some(dir) = policy.get_next_move(&board, info.legal_moves) {
//!     let step = game.step(dir).unwrap();
//!     if step.terminated {
//!         assert!(matches!(step.outcome, Outcome::Won | Outcome::Lost));
//!         break;
//!     }
//!     board = step.board;
//!     info = step.info;
//! }
//! assert!(game.is_done());
//! ```
//!
pub mod config;
pub mod engine;
pub mod env;
pub mod logging;
pub mod policy;
