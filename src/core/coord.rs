//! Board coordinates.
//!
//! The board is a 15x15 grid with `(0, 0)` at the bottom-left corner
//! and the centre cell at `(7, 7)`.

use serde::{Deserialize, Serialize};

/// Width and height of the board in cells.
pub const BOARD_SIZE: i32 = 15;

/// The board's geometric centre (also the goal cell).
pub const CENTER: Coord = Coord::new(7, 7);

/// A board cell coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Rotate clockwise about `center` by `times` quarter turns.
    ///
    /// Each turn maps `(x, y)` to `(cx + dy, cy - dx)`.
    ///
    /// ```
    /// use ludo_engine::core::{Coord, CENTER};
    ///
    /// assert_eq!(Coord::new(6, 1).rotate_cw(CENTER, 1), Coord::new(1, 8));
    /// assert_eq!(Coord::new(6, 1).rotate_cw(CENTER, 4), Coord::new(6, 1));
    /// ```
    #[must_use]
    pub const fn rotate_cw(self, center: Coord, times: u8) -> Self {
        let mut x = self.x;
        let mut y = self.y;
        let mut i = 0;
        while i < times % 4 {
            let dx = x - center.x;
            let dy = y - center.y;
            x = center.x + dy;
            y = center.y - dx;
            i += 1;
        }
        Self { x, y }
    }

    /// Whether the cell lies on the board.
    #[must_use]
    pub const fn in_bounds(self) -> bool {
        self.x >= 0 && self.x < BOARD_SIZE && self.y >= 0 && self.y < BOARD_SIZE
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_is_fixed_point() {
        for times in 0..4 {
            assert_eq!(CENTER.rotate_cw(CENTER, times), CENTER);
        }
    }

    #[test]
    fn test_four_turns_is_identity() {
        let c = Coord::new(3, 11);
        assert_eq!(c.rotate_cw(CENTER, 1).rotate_cw(CENTER, 3), c);
        assert_eq!(c.rotate_cw(CENTER, 2).rotate_cw(CENTER, 2), c);
    }

    #[test]
    fn test_rotation_stays_on_board() {
        for x in 0..BOARD_SIZE {
            for y in 0..BOARD_SIZE {
                let c = Coord::new(x, y);
                assert!(c.rotate_cw(CENTER, 1).in_bounds());
            }
        }
        assert!(!Coord::new(15, 0).in_bounds());
        assert!(!Coord::new(0, -1).in_bounds());
    }
}
