//! Seat colors and per-color data storage.
//!
//! ## Color
//!
//! The four Ludo colors in fixed turn order: red, blue, green, yellow.
//!
//! ## ColorMap
//!
//! Per-color storage backed by a fixed array for O(1) access.
//! Supports iteration and indexing by `Color`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use crate::error::ParseColorError;

/// Number of colors on the board.
pub const COLOR_COUNT: usize = 4;

/// A seat color.
///
/// Discriminants are the fixed turn-order index (0-3).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red = 0,
    Blue = 1,
    Green = 2,
    Yellow = 3,
}

impl Color {
    /// All colors in turn order.
    pub const ALL: [Color; COLOR_COUNT] = [Color::Red, Color::Blue, Color::Green, Color::Yellow];

    /// Turn-order index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Color at a turn-order index.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Color> {
        match index {
            0 => Some(Color::Red),
            1 => Some(Color::Blue),
            2 => Some(Color::Green),
            3 => Some(Color::Yellow),
            _ => None,
        }
    }

    /// Clockwise quarter turns applied to the reference path.
    ///
    /// Blue owns the unrotated path; the others are rotated about the centre.
    ///
    /// ```
    /// use ludo_engine::core::Color;
    ///
    /// assert_eq!(Color::Blue.rotation_steps(), 0);
    /// assert_eq!(Color::Red.rotation_steps(), 1);
    /// assert_eq!(Color::Yellow.rotation_steps(), 2);
    /// assert_eq!(Color::Green.rotation_steps(), 3);
    /// ```
    #[must_use]
    pub const fn rotation_steps(self) -> u8 {
        match self {
            Color::Blue => 0,
            Color::Red => 1,
            Color::Yellow => 2,
            Color::Green => 3,
        }
    }

    /// Lowercase wire name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Yellow => "yellow",
        }
    }

    /// Display label, as shown to players.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Color::Red => "Red",
            Color::Blue => "Blue",
            Color::Green => "Green",
            Color::Yellow => "Yellow",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "red" => Ok(Color::Red),
            "blue" => Ok(Color::Blue),
            "green" => Ok(Color::Green),
            "yellow" => Ok(Color::Yellow),
            other => Err(ParseColorError(other.to_string())),
        }
    }
}

/// Per-color data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use ludo_engine::core::{Color, ColorMap};
///
/// let mut finished: ColorMap<u8> = ColorMap::with_value(0);
/// finished[Color::Green] += 1;
///
/// assert_eq!(finished[Color::Green], 1);
/// assert_eq!(finished[Color::Red], 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorMap<T> {
    data: [T; COLOR_COUNT],
}

impl<T> ColorMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(factory: impl Fn(Color) -> T) -> Self {
        Self {
            data: Color::ALL.map(factory),
        }
    }

    /// Create a map with all entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Get a reference to a color's data.
    #[must_use]
    pub fn get(&self, color: Color) -> &T {
        &self.data[color.index()]
    }

    /// Get a mutable reference to a color's data.
    pub fn get_mut(&mut self, color: Color) -> &mut T {
        &mut self.data[color.index()]
    }

    /// Iterate over (Color, &T) pairs in turn order.
    pub fn iter(&self) -> impl Iterator<Item = (Color, &T)> {
        Color::ALL.into_iter().zip(self.data.iter())
    }

    /// Iterate over (Color, &mut T) pairs in turn order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Color, &mut T)> {
        Color::ALL.into_iter().zip(self.data.iter_mut())
    }
}

impl<T: Default> Default for ColorMap<T> {
    fn default() -> Self {
        Self::new(|_| T::default())
    }
}

impl<T> Index<Color> for ColorMap<T> {
    type Output = T;

    fn index(&self, color: Color) -> &Self::Output {
        self.get(color)
    }
}

impl<T> IndexMut<Color> for ColorMap<T> {
    fn index_mut(&mut self, color: Color) -> &mut Self::Output {
        self.get_mut(color)
    }
}
