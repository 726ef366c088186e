//! Path geometry.
//!
//! Every color travels the same 58-cell route, rotated about the centre:
//! 51 shared ring cells starting at the color's entry square, then its own
//! six-cell home stretch, ending on the centre cell. Blue owns the unrotated route.

use once_cell::sync::Lazy;

use crate::core::{Color, ColorMap, Coord, CENTER};

/// Cells on each color's path.
pub const PATH_LEN: usize = 58;

/// Step at which a piece finishes. Reaching it exactly moves the piece to
/// the goal; anything past it is an overshoot.
pub const FINISH_STEP: u8 = 56;

/// Index of the goal cell (the centre) where finished pieces rest.
pub const GOAL_INDEX: usize = PATH_LEN - 1;

/// Shared ring cells before a path turns into its home stretch.
pub const RING_LEN: usize = 51;

const fn c(x: i32, y: i32) -> Coord {
    Coord::new(x, y)
}

/// Blue's route from its entry square (6, 1) to the centre.
#[rustfmt::skip]
const BASE_PATH: [Coord; PATH_LEN] = [
    c(6, 1), c(6, 2), c(6, 3), c(6, 4), c(6, 5),
    c(5, 6), c(4, 6), c(3, 6), c(2, 6), c(1, 6), c(0, 6),
    c(0, 7), c(0, 8),
    c(1, 8), c(2, 8), c(3, 8), c(4, 8), c(5, 8),
    c(6, 9), c(6, 10), c(6, 11), c(6, 12), c(6, 13), c(6, 14),
    c(7, 14), c(8, 14),
    c(8, 13), c(8, 12), c(8, 11), c(8, 10), c(8, 9),
    c(9, 8), c(10, 8), c(11, 8), c(12, 8), c(13, 8), c(14, 8),
    c(14, 7), c(14, 6),
    c(13, 6), c(12, 6), c(11, 6), c(10, 6), c(9, 6),
    c(8, 5), c(8, 4), c(8, 3), c(8, 2), c(8, 1), c(8, 0),
    c(7, 0),
    c(7, 1), c(7, 2), c(7, 3), c(7, 4), c(7, 5), c(7, 6),
    c(7, 7),
];

static PATHS: Lazy<ColorMap<[Coord; PATH_LEN]>> = Lazy::new(|| ColorMap::new(build_path));

fn build_path(color: Color) -> [Coord; PATH_LEN] {
    let steps = color.rotation_steps();
    BASE_PATH.map(|cell| cell.rotate_cw(CENTER, steps))
}

/// The ordered cells a color's pieces travel. Built once per color.
#[must_use]
pub fn path_for(color: Color) -> &'static [Coord; PATH_LEN] {
    &PATHS[color]
}

/// Cell at `step` on a color's path, if the step is on the path.
#[must_use]
pub fn coord_at(color: Color, step: usize) -> Option<Coord> {
    path_for(color).get(step).copied()
}

/// A color's entry square (step 0).
#[must_use]
pub fn entry_square(color: Color) -> Coord {
    path_for(color)[0]
}

/// First step at which `cell` appears on a color's path.
#[must_use]
pub fn step_of(color: Color, cell: Coord) -> Option<usize> {
    path_for(color).iter().position(|&c| c == cell)
}
