//! Turn sequencing for one 2048 episode at a time.
//!
//! [`Game2048`] owns the board, the score, and a seeded random source. Each
//! accepted [`Game2048::step`] runs: legality gate, move/merge, score update,
//! goal check, spawn, loss check, legality refresh. Rendering and agent
//! adapters sit outside and only read the snapshots returned here.
//!
//! ```
//! use gym_2048::config::GameConfig;
//! use gym_2048::engine::Move;
//! use gym_2048::env::Game2048;
//!
//! let mut game: Game2048 = Game2048::from_seed(GameConfig::default(), 42).unwrap();
//! let (board, info) = game.reset(None);
//! assert_eq!(board.count_empty(), 14);
//! assert_eq!(info.score, 0);
//!
//! let dir = info.legal_moves.iter().next().unwrap();
//! let step = game.step(dir).unwrap();
//! assert!(step.info.is_legal);
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, trace};

use crate::config::{ConfigError, GameConfig};
use crate::engine::{self, ActionError, Board, Exponent, LegalMoves, Move, Spawn, Value};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvError {
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error("no episode in progress; call reset first")]
    EpisodeOver,
    #[error("board is {actual}x{actual} but the game is configured for {expected}x{expected}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("tile exponent {exponent} exceeds the goal exponent {board_goal}")]
    ExponentOutOfRange { exponent: Exponent, board_goal: Exponent },
}

/// How a step resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// Accepted move, episode continues.
    Continue,
    /// Goal tile reached; no tile was spawned this turn.
    Won,
    /// Board full with no merge left after the spawn.
    Lost,
    /// Direction would not change the board; nothing happened.
    Illegal,
}

impl Outcome {
    /// +1 on a win, -1 on a loss, 0 otherwise.
    pub fn reward(self) -> i8 {
        match self {
            Outcome::Won => 1,
            Outcome::Lost => -1,
            Outcome::Continue | Outcome::Illegal => 0,
        }
    }

    pub fn is_terminal(self) -> bool { matches!(self, Outcome::Won | Outcome::Lost) }
}

/// Side information reported with every reset and step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Info {
    /// Values of the tiles produced by merges during the last step.
    pub merged: Vec<Value>,
    pub score: Value,
    pub max_exponent: Exponent,
    /// Legality for the next action.
    pub legal_moves: LegalMoves,
    /// Whether the last attempted action was legal (true after reset).
    pub is_legal: bool,
    /// Tile placed during the last step, if any.
    pub spawned: Option<Spawn>,
    /// 1-based episode counter.
    pub episode: u64,
    /// Steps attempted in this episode, illegal ones included.
    pub steps: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub board: Board,
    pub reward: i8,
    pub terminated: bool,
    /// Always false: the engine imposes no step limit.
    pub truncated: bool,
    pub outcome: Outcome,
    pub info: Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Ready,
    Done,
}

/// A 2048 episode runner with an owned, seedable random source.
///
/// Not shareable across threads mid-step; run one instance per concurrent episode.
pub struct Game2048<R = StdRng> {
    config: GameConfig,
    board: Board,
    rng: R,
    score: Value,
    best_score: Value,
    legal_moves: LegalMoves,
    last_action_legal: bool,
    last_merged: Vec<Value>,
    last_spawn: Option<Spawn>,
    phase: Phase,
    episode: u64,
    steps: u64,
}

impl<R: Rng + SeedableRng> Game2048<R> {
    /// Engine seeded from OS entropy. Call [`Game2048::reset`] before stepping.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, R::from_entropy())
    }

    pub fn from_seed(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, R::seed_from_u64(seed))
    }

    pub fn with_rng(config: GameConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Game2048 {
            board: Board::empty(config.size),
            config,
            rng,
            score: 0,
            best_score: 0,
            legal_moves: LegalMoves::default(),
            last_action_legal: true,
            last_merged: Vec::new(),
            last_spawn: None,
            phase: Phase::Done,
            episode: 0,
            steps: 0,
        })
    }

    /// Start a new episode: reseed if `seed` is given, clear the board and
    /// score, then spawn two tiles.
    pub fn reset(&mut self, seed: Option<u64>) -> (Board, Info) {
        if let Some(seed) = seed {
            self.rng = R::seed_from_u64(seed);
        }
        let mut board = Board::empty(self.config.size);
        engine::spawn(&mut board, &mut self.rng);
        engine::spawn(&mut board, &mut self.rng);
        self.begin_episode(board);
        debug!(episode = self.episode, ?seed, board = ?self.board, "reset");
        (self.board.clone(), self.info())
    }

    /// Start a new episode from a given position, without spawning.
    ///
    /// The random source is left as is. A position that is already won or
    /// lost starts in the finished state.
    pub fn reset_to(&mut self, board: Board) -> Result<Info, EnvError> {
        let board_goal = self.config.board_goal();
        if board.size() != self.config.size {
            return Err(EnvError::SizeMismatch { expected: self.config.size, actual: board.size() });
        }
        if let Some(&exponent) = board.cells().iter().find(|&&e| e > board_goal) {
            return Err(EnvError::ExponentOutOfRange { exponent, board_goal });
        }
        self.begin_episode(board);
        if engine::reached_goal(&self.board, board_goal) || engine::is_game_over(&self.board) {
            self.phase = Phase::Done;
        }
        debug!(episode = self.episode, board = ?self.board, "reset to position");
        Ok(self.info())
    }

    fn begin_episode(&mut self, board: Board) {
        self.board = board;
        self.score = 0;
        self.steps = 0;
        self.episode += 1;
        self.last_action_legal = true;
        self.last_merged.clear();
        self.last_spawn = None;
        self.legal_moves = engine::compute_legal_moves(&self.board);
        self.phase = Phase::Ready;
    }

    /// Play one turn.
    ///
    /// An illegal direction is not an error: it yields [`Outcome::Illegal`] and
    /// leaves board, score and best score untouched. Errors only when no
    /// episode is running.
    pub fn step(&mut self, dir: Move) -> Result<Step, EnvError> {
        if self.phase != Phase::Ready {
            return Err(EnvError::EpisodeOver);
        }
        self.steps += 1;
        self.last_merged.clear();
        self.last_spawn = None;

        if !self.legal_moves.contains(dir) {
            self.last_action_legal = false;
            trace!(step = self.steps, %dir, "illegal move ignored");
            return Ok(self.make_step(Outcome::Illegal));
        }
        self.last_action_legal = true;

        self.last_merged = engine::apply_move(&mut self.board, dir);
        let gain = self.last_merged.iter().fold(0, |acc: Value, &v| acc.saturating_add(v));
        self.score = self.score.saturating_add(gain);

        let outcome = if engine::reached_goal(&self.board, self.config.board_goal()) {
            Outcome::Won
        } else {
            self.last_spawn = Some(engine::spawn(&mut self.board, &mut self.rng));
            if engine::is_game_over(&self.board) {
                self.best_score = self.best_score.max(self.score);
                Outcome::Lost
            } else {
                Outcome::Continue
            }
        };
        self.legal_moves = engine::compute_legal_moves(&self.board);
        trace!(step = self.steps, %dir, gain, score = self.score, "move applied");

        if outcome.is_terminal() {
            self.phase = Phase::Done;
            info!(
                episode = self.episode,
                ?outcome,
                score = self.score,
                best_score = self.best_score,
                max_exponent = self.board.max_exponent(),
                steps = self.steps,
                "episode finished"
            );
        }
        Ok(self.make_step(outcome))
    }

    /// [`Game2048::step`] from a raw action index (Left=0, Right=1, Up=2, Down=3).
    pub fn step_index(&mut self, action: u8) -> Result<Step, EnvError> {
        let dir = Move::try_from(action)?;
        self.step(dir)
    }
}

impl<R> Game2048<R> {
    fn make_step(&self, outcome: Outcome) -> Step {
        Step {
            board: self.board.clone(),
            reward: outcome.reward(),
            terminated: outcome.is_terminal(),
            truncated: false,
            outcome,
            info: self.info(),
        }
    }

    pub fn info(&self) -> Info {
        Info {
            merged: self.last_merged.clone(),
            score: self.score,
            max_exponent: self.board.max_exponent(),
            legal_moves: self.legal_moves,
            is_legal: self.last_action_legal,
            spawned: self.last_spawn,
            episode: self.episode,
            steps: self.steps,
        }
    }

    pub fn config(&self) -> &GameConfig { &self.config }

    /// Read-only view of the current board.
    pub fn board(&self) -> &Board { &self.board }

    /// Row-major exponents, the `1 x N x N` observation flattened.
    pub fn observation(&self) -> Vec<Exponent> { self.board.to_vec() }

    pub fn legal_moves(&self) -> LegalMoves { self.legal_moves }

    pub fn score(&self) -> Value { self.score }

    /// Highest score over all lost episodes of this instance.
    pub fn best_score(&self) -> Value { self.best_score }

    pub fn max_tile_exponent(&self) -> Exponent { self.board.max_exponent() }

    pub fn is_last_action_legal(&self) -> bool { self.last_action_legal }

    /// True once the current episode has ended (or before the first reset).
    pub fn is_done(&self) -> bool { self.phase == Phase::Done }

    pub fn episode(&self) -> u64 { self.episode }

    pub fn steps(&self) -> u64 { self.steps }
}

impl<R> fmt::Display for Game2048<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "score: {}  best: {}", self.score, self.best_score)?;
        write!(f, "{}", self.board)
    }
}
