//! Serializable game snapshots.
//!
//! JSON is the shape the relay mirrors in its `gameState` payload; bincode
//! is the compact form for saving a game.

use serde::{Deserialize, Serialize};

use crate::core::{Color, PieceId, TurnState};
use crate::error::SnapshotError;

/// One piece, position in wire form (-1 home, step, 56 finished).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceSnapshot {
    pub id: PieceId,
    pub position: i32,
}

/// Board and turn state of a game at one moment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub active_colors: Vec<Color>,
    pub turn: TurnState,
    pub turn_number: u32,
    pub pieces: Vec<PieceSnapshot>,
}

impl GameSnapshot {
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(bincode::deserialize(bytes)?)
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GameSnapshot {
        GameSnapshot {
            active_colors: vec![Color::Red, Color::Blue],
            turn: TurnState {
                current_player: 1,
                active_color: Some(Color::Blue),
                pending_roll: Some(4),
                can_move: true,
                selected_piece: Some(PieceId::new(Color::Blue, 2)),
            },
            turn_number: 7,
            pieces: vec![
                PieceSnapshot {
                    id: PieceId::new(Color::Red, 0),
                    position: -1,
                },
                PieceSnapshot {
                    id: PieceId::new(Color::Blue, 2),
                    position: 30,
                },
            ],
        }
    }

    #[test]
    fn test_bincode_and_json_forms_agree() {
        let snapshot = sample();
        let from_bytes = GameSnapshot::from_bytes(&snapshot.to_bytes().unwrap()).unwrap();
        let from_json = GameSnapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(from_bytes, snapshot);
        assert_eq!(from_json, snapshot);
    }

    #[test]
    fn test_json_uses_wire_piece_ids() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["pieces"][1]["id"], "blue2");
        assert_eq!(json["turn"]["selectedPiece"], "blue2");
        assert_eq!(json["turnNumber"], 7);
    }

    #[test]
    fn test_truncated_bytes_fail() {
        let bytes = sample().to_bytes().unwrap();
        assert!(matches!(
            GameSnapshot::from_bytes(&bytes[..bytes.len() / 2]),
            Err(SnapshotError::Binary(_))
        ));
    }
}
