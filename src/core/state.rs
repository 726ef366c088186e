//! Observable turn state.
//!
//! `TurnState` is the flat view of whose turn it is and what they may do,
//! in the shape the relay mirrors for each room.

use serde::{Deserialize, Serialize};

use super::color::Color;
use super::piece::PieceId;

/// Flat turn state.
///
/// Invariants: `pending_roll` is set only between a roll and the move (or
/// turn end) that consumes it; `can_move` is true only while a pending roll
/// has at least one legal piece.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnState {
    /// Index into the active color list.
    pub current_player: usize,

    /// Color at `current_player`, if the game is running.
    pub active_color: Option<Color>,

    /// Roll waiting to be spent, if any.
    pub pending_roll: Option<u8>,

    /// Whether a piece may be selected now.
    pub can_move: bool,

    /// Last piece selected this turn.
    pub selected_piece: Option<PieceId>,
}

impl TurnState {
    /// State with `current_player` to roll.
    #[must_use]
    pub fn awaiting_roll(current_player: usize, color: Color) -> Self {
        Self {
            current_player,
            active_color: Some(color),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_pending_roll() {
        let state = TurnState::default();
        assert_eq!(state.pending_roll, None);
        assert!(!state.can_move);
    }

    #[test]
    fn test_camel_case_wire_shape() {
        let state = TurnState::awaiting_roll(2, Color::Green);
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["currentPlayer"], 2);
        assert_eq!(json["activeColor"], "green");
        assert_eq!(json["canMove"], false);
    }
}
