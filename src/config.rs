//! Validated game configuration.
//!
//! A [`GameConfig`] can only be built through checked constructors (or
//! deserialized and then passed through [`GameConfig::validate`], which
//! [`crate::env::Game2048`] always does), so an engine never runs with a goal
//! that is not a power of two or a board too small to hold its first tiles.

use serde::{Deserialize, Serialize};

use crate::engine::Exponent;

/// Smallest supported board side: two starting tiles must fit.
pub const MIN_SIZE: usize = 2;
pub const DEFAULT_SIZE: usize = 4;
pub const DEFAULT_GOAL: u64 = 2048;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("goal {0} is not a power of two")]
    NotPowerOfTwo(u64),
    #[error("goal exponent {0} is out of range (must satisfy 2 < exponent < 256)")]
    GoalOutOfRange(u32),
    #[error("board size {0} is too small (minimum 2)")]
    BoardTooSmall(usize),
}

/// Winning tile, stored as its exponent (`board_goal = log2(goal)`).
///
/// Goals run from 8 up to 2^255; values beyond `u64` are only reachable
/// through [`Goal::from_exponent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Goal(Exponent);

impl Goal {
    /// ```
    /// use gym_2048::config::{ConfigError, Goal};
    /// assert_eq!(Goal::from_value(2048).unwrap().exponent(), 11);
    /// assert_eq!(Goal::from_value(1000), Err(ConfigError::NotPowerOfTwo(1000)));
    /// assert_eq!(Goal::from_value(4), Err(ConfigError::GoalOutOfRange(2)));
    /// ```
    pub fn from_value(goal: u64) -> Result<Self, ConfigError> {
        if !goal.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo(goal));
        }
        Self::from_exponent(goal.trailing_zeros())
    }

    pub fn from_exponent(exponent: u32) -> Result<Self, ConfigError> {
        if exponent <= 2 || exponent >= 256 {
            return Err(ConfigError::GoalOutOfRange(exponent));
        }
        Ok(Goal(exponent as Exponent))
    }

    /// `board_goal`: the exponent a tile must reach to win.
    #[inline]
    pub fn exponent(self) -> Exponent { self.0 }

    /// Numeric goal value, `None` when it does not fit in `u64`.
    pub fn value(self) -> Option<u64> { 1u64.checked_shl(self.0 as u32) }
}

impl Default for Goal {
    fn default() -> Self { Goal(DEFAULT_GOAL.trailing_zeros() as Exponent) }
}

impl TryFrom<u32> for Goal {
    type Error = ConfigError;
    fn try_from(exponent: u32) -> Result<Self, Self::Error> { Goal::from_exponent(exponent) }
}

impl From<Goal> for u32 {
    fn from(g: Goal) -> Self { g.0 as u32 }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Board side length N.
    pub size: usize,
    /// Serialized as the goal exponent.
    pub goal: Goal,
}

impl GameConfig {
    /// Checked constructor from a board side and a numeric goal.
    ///
    /// ```
    /// use gym_2048::config::GameConfig;
    /// let cfg = GameConfig::new(4, 2048).unwrap();
    /// assert_eq!(cfg.board_goal(), 11);
    /// assert!(GameConfig::new(4, 3000).is_err());
    /// assert!(GameConfig::new(1, 2048).is_err());
    /// ```
    pub fn new(size: usize, goal: u64) -> Result<Self, ConfigError> {
        let cfg = GameConfig { size, goal: Goal::from_value(goal)? };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn with_goal(size: usize, goal: Goal) -> Result<Self, ConfigError> {
        let cfg = GameConfig { size, goal };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size < MIN_SIZE {
            return Err(ConfigError::BoardTooSmall(self.size));
        }
        // Re-check in case the struct was assembled field by field.
        Goal::from_exponent(self.goal.0 as u32)?;
        Ok(())
    }

    #[inline]
    pub fn board_goal(&self) -> Exponent { self.goal.exponent() }
}

impl Default for GameConfig {
    fn default() -> Self { GameConfig { size: DEFAULT_SIZE, goal: Goal::default() } }
}
