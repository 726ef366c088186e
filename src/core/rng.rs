//! Deterministic dice.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces the same sequence of rolls
//! - **Serializable**: O(1) state capture and restore
//! - **Fixed mode**: Optionally always roll one value (debugging, tests)
//!
//! ```
//! use ludo_engine::core::DiceRng;
//!
//! let mut a = DiceRng::new(7);
//! let mut b = DiceRng::new(7);
//! assert_eq!(a.roll(), b.roll());
//!
//! let mut loaded = DiceRng::fixed(7, 6).unwrap();
//! assert_eq!(loaded.roll(), 6);
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Smallest face of the die.
pub const DIE_MIN: u8 = 1;
/// Largest face of the die; rolling it grants an extra turn.
pub const DIE_MAX: u8 = 6;

/// Whether a value is a face of the die.
#[must_use]
pub const fn is_die_face(value: u8) -> bool {
    value >= DIE_MIN && value <= DIE_MAX
}

/// Seeded six-sided die.
///
/// Uses ChaCha8 so a room can replay a game from its seed.
#[derive(Clone, Debug)]
pub struct DiceRng {
    inner: ChaCha8Rng,
    seed: u64,
    fixed: Option<u8>,
}

impl DiceRng {
    /// Create a die with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fixed: None,
        }
    }

    /// Create a die that always shows `value`.
    ///
    /// Returns `None` if `value` is not a die face.
    #[must_use]
    pub fn fixed(seed: u64, value: u8) -> Option<Self> {
        is_die_face(value).then(|| Self {
            fixed: Some(value),
            ..Self::new(seed)
        })
    }

    /// Roll the die.
    pub fn roll(&mut self) -> u8 {
        match self.fixed {
            Some(value) => value,
            None => self.inner.gen_range(DIE_MIN..=DIE_MAX),
        }
    }

    /// The fixed face, if this die is loaded.
    #[must_use]
    pub fn fixed_value(&self) -> Option<u8> {
        self.fixed
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> DiceRngState {
        DiceRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
            fixed: self.fixed,
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &DiceRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
            fixed: state.fixed,
        }
    }
}

/// Serializable dice state for checkpointing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRngState {
    /// Seed the dice were created with
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
    /// Loaded face, if any
    pub fixed: Option<u8>,
}
