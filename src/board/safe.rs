//! Safe-zone table: cells where pieces cannot be captured.

use serde::{Deserialize, Serialize};

use super::path::entry_square;
use crate::core::{Color, Coord, CENTER};

/// The four star squares.
pub const STAR_SQUARES: [Coord; 4] = [
    Coord::new(2, 6),
    Coord::new(8, 2),
    Coord::new(6, 12),
    Coord::new(12, 8),
];

/// Capture-relevant classification of a cell. Derived, never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    Normal,
    /// A color's entry square.
    SafeStart(Color),
    SafeStar,
    Center,
}

impl CellKind {
    #[must_use]
    pub const fn is_safe(self) -> bool {
        !matches!(self, CellKind::Normal)
    }
}

/// Classify a cell.
#[must_use]
pub fn classify(cell: Coord) -> CellKind {
    if cell == CENTER {
        return CellKind::Center;
    }
    if let Some(color) = Color::ALL.into_iter().find(|&c| entry_square(c) == cell) {
        return CellKind::SafeStart(color);
    }
    if STAR_SQUARES.contains(&cell) {
        return CellKind::SafeStar;
    }
    CellKind::Normal
}

/// Whether a piece on this cell is immune to capture.
#[must_use]
pub fn is_safe(cell: Coord) -> bool {
    classify(cell).is_safe()
}
