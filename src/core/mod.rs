//! Core types: colors, coordinates, pieces, dice, configuration, actions.
//!
//! These are the building blocks shared by the board geometry, the rules
//! engine, and the session layer.

pub mod action;
pub mod color;
pub mod config;
pub mod coord;
pub mod piece;
pub mod rng;
pub mod state;

pub use action::{Action, ActionRecord};
pub use color::{Color, ColorMap, COLOR_COUNT};
pub use config::{GameConfig, RelayConfig};
pub use coord::{Coord, BOARD_SIZE, CENTER};
pub use piece::{Location, Piece, PieceId, FINISH_WIRE, PIECES_PER_COLOR, WIRE_HOME};
pub use rng::{is_die_face, DiceRng, DiceRngState, DIE_MAX, DIE_MIN};
pub use state::TurnState;
