//! Home-yard slots, one fixed cell per piece.

use crate::core::{Color, Coord, PieceId, PIECES_PER_COLOR};

/// Yard cells per color, slot order.
pub const HOME_SLOTS: [[Coord; PIECES_PER_COLOR]; 4] = [
    // red, top left
    [Coord::new(1, 10), Coord::new(1, 13), Coord::new(4, 10), Coord::new(4, 13)],
    // blue, bottom left
    [Coord::new(1, 1), Coord::new(1, 4), Coord::new(4, 1), Coord::new(4, 4)],
    // green, bottom right
    [Coord::new(10, 1), Coord::new(10, 4), Coord::new(13, 1), Coord::new(13, 4)],
    // yellow, top right
    [Coord::new(10, 10), Coord::new(10, 13), Coord::new(13, 10), Coord::new(13, 13)],
];

/// The yard cell a piece starts on and returns to after capture.
///
/// Returns `None` for a slot outside 0-3.
#[must_use]
pub fn home_slot(id: PieceId) -> Option<Coord> {
    HOME_SLOTS[id.color.index()].get(id.slot as usize).copied()
}

/// Whether a cell lies in a color's yard quadrant.
#[must_use]
pub fn in_yard(color: Color, cell: Coord) -> bool {
    let (xs, ys) = match color {
        Color::Red => (0..6, 9..15),
        Color::Blue => (0..6, 0..6),
        Color::Green => (9..15, 0..6),
        Color::Yellow => (9..15, 9..15),
    };
    xs.contains(&cell.x) && ys.contains(&cell.y)
}
