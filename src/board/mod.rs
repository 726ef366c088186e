//! Board geometry: paths, safe squares, and home yards.
//!
//! Everything here is a pure function of coordinates; no game state lives
//! on the board.

pub mod home;
pub mod path;
pub mod safe;

pub use home::{home_slot, in_yard, HOME_SLOTS};
pub use path::{
    coord_at, entry_square, path_for, step_of, FINISH_STEP, GOAL_INDEX, PATH_LEN, RING_LEN,
};
pub use safe::{classify, is_safe, CellKind, STAR_SQUARES};
