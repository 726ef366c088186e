//! Game and relay configuration.
//!
//! Sessions are configured at construction by providing:
//! - `GameConfig`: which colors play, dice seed, optional loaded die
//! - `RelayConfig`: room defaults for the relay registry
//!
//! Both deserialize from JSON with defaults for missing fields.

use serde::{Deserialize, Serialize};

use super::color::Color;
use super::rng::{is_die_face, DiceRng};
use crate::error::ConfigError;

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Colors taking turns, in rotation order.
    pub active_colors: Vec<Color>,

    /// Dice seed. Same seed and inputs replay the same game.
    pub seed: u64,

    /// Always roll this value. Debugging aid.
    pub fixed_dice: Option<u8>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            active_colors: Color::ALL.to_vec(),
            seed: 42,
            fixed_dice: None,
        }
    }
}

impl GameConfig {
    /// Four-color local game.
    pub fn new() -> Self {
        Self::default()
    }

    /// Game for the first `seats` colors in turn order, as a relay room
    /// seats them.
    pub fn for_seats(seats: usize) -> Self {
        Self {
            active_colors: Color::ALL.iter().copied().take(seats).collect(),
            ..Self::default()
        }
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the dice seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the active colors.
    #[must_use]
    pub fn with_colors(mut self, colors: impl IntoIterator<Item = Color>) -> Self {
        self.active_colors = colors.into_iter().collect();
        self
    }

    /// Load the die with a fixed value.
    #[must_use]
    pub fn with_fixed_dice(mut self, value: u8) -> Self {
        self.fixed_dice = Some(value);
        self
    }

    /// Check the configuration is playable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.active_colors.is_empty() {
            return Err(ConfigError::NoActiveColors);
        }
        for (i, color) in self.active_colors.iter().enumerate() {
            if self.active_colors[..i].contains(color) {
                return Err(ConfigError::DuplicateColor(*color));
            }
        }
        if let Some(value) = self.fixed_dice {
            if !is_die_face(value) {
                return Err(ConfigError::InvalidDiceValue(value));
            }
        }
        Ok(())
    }

    /// Build the die described by this configuration.
    pub fn dice(&self) -> Result<DiceRng, ConfigError> {
        match self.fixed_dice {
            Some(value) => {
                DiceRng::fixed(self.seed, value).ok_or(ConfigError::InvalidDiceValue(value))
            }
            None => Ok(DiceRng::new(self.seed)),
        }
    }
}

/// Relay room defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Capacity used when a create request names none.
    pub default_capacity: usize,

    /// Length of generated room ids.
    pub room_id_len: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            default_capacity: 4,
            room_id_len: 8,
        }
    }
}

impl RelayConfig {
    /// Largest room the board can seat.
    pub const MAX_CAPACITY: usize = 4;

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: RelayConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the default capacity.
    #[must_use]
    pub fn with_default_capacity(mut self, capacity: usize) -> Self {
        self.default_capacity = capacity;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=Self::MAX_CAPACITY).contains(&self.default_capacity) {
            return Err(ConfigError::InvalidCapacity(self.default_capacity));
        }
        // A v4 UUID renders 32 hex digits once the hyphens are dropped.
        if !(4..=32).contains(&self.room_id_len) {
            return Err(ConfigError::InvalidRoomIdLength(self.room_id_len));
        }
        Ok(())
    }
}
