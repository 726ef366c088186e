//! Player actions and the action history.
//!
//! A turn is built from two kinds of input: rolling the die and selecting a
//! piece to move. Accepted inputs are recorded in order for replay and for
//! debugging desynced relay sessions.

use serde::{Deserialize, Serialize};

use super::color::Color;
use super::piece::PieceId;

/// An input submitted by (or on behalf of) the active color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Action {
    /// The die showed this value.
    Roll(u8),
    /// Move this piece by the pending roll.
    Select(PieceId),
}

/// A recorded action with metadata for history tracking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The color that took this action.
    pub color: Color,

    /// The action taken.
    pub action: Action,

    /// Turn number when action was taken (starts at 1).
    pub turn: u32,

    /// Position in the whole game's history, counting from 0.
    pub sequence: u32,
}

impl ActionRecord {
    #[must_use]
    pub fn new(color: Color, action: Action, turn: u32, sequence: u32) -> Self {
        Self {
            color,
            action,
            turn,
            sequence,
        }
    }
}
