//! Relay wire format.
//!
//! Every message is a JSON object `{ "event": <name>, "data": { ... } }`
//! with camelCase field names. Piece ids and colors travel as plain
//! strings and positions as integers (-1 home, 0..=55 on the path, 56
//! finished); they are only checked when a client turns a server message
//! into a [`RemoteEvent`].

use serde::{Deserialize, Serialize};

use crate::core::{Color, Location, PieceId, FINISH_WIRE, WIRE_HOME};
use crate::error::RemoteEventError;

pub mod remote;

pub use remote::RemoteEvent;

/// Messages a client sends to the relay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientMessage {
    #[serde(rename_all = "camelCase")]
    JoinRoom { room_id: String, player_name: String },
    #[serde(rename_all = "camelCase")]
    RollDice {
        room_id: String,
        dice_value: u8,
        player_index: usize,
    },
    #[serde(rename_all = "camelCase")]
    MovePiece {
        room_id: String,
        piece_id: String,
        color: String,
        new_position: i32,
        current_player: usize,
    },
    #[serde(rename_all = "camelCase")]
    PieceCaptured {
        room_id: String,
        captured_piece_id: String,
        captured_color: String,
        attacker_color: String,
    },
    #[serde(rename_all = "camelCase")]
    EndTurn {
        room_id: String,
        next_player_index: usize,
    },
}

impl ClientMessage {
    /// The room a message is addressed to.
    #[must_use]
    pub fn room_id(&self) -> &str {
        match self {
            ClientMessage::JoinRoom { room_id, .. }
            | ClientMessage::RollDice { room_id, .. }
            | ClientMessage::MovePiece { room_id, .. }
            | ClientMessage::PieceCaptured { room_id, .. }
            | ClientMessage::EndTurn { room_id, .. } => room_id,
        }
    }

    /// Wire event name.
    #[must_use]
    pub fn event_name(&self) -> &'static str {
        match self {
            ClientMessage::JoinRoom { .. } => "joinRoom",
            ClientMessage::RollDice { .. } => "rollDice",
            ClientMessage::MovePiece { .. } => "movePiece",
            ClientMessage::PieceCaptured { .. } => "pieceCaptured",
            ClientMessage::EndTurn { .. } => "endTurn",
        }
    }

    pub fn roll_dice(room_id: &str, dice_value: u8, player_index: usize) -> Self {
        ClientMessage::RollDice {
            room_id: room_id.to_string(),
            dice_value,
            player_index,
        }
    }

    pub fn move_piece(room_id: &str, piece: PieceId, to: Location, current_player: usize) -> Self {
        ClientMessage::MovePiece {
            room_id: room_id.to_string(),
            piece_id: piece.to_string(),
            color: piece.color.to_string(),
            new_position: to.to_wire(),
            current_player,
        }
    }

    pub fn piece_captured(room_id: &str, captured: PieceId, attacker: Color) -> Self {
        ClientMessage::PieceCaptured {
            room_id: room_id.to_string(),
            captured_piece_id: captured.to_string(),
            captured_color: captured.color.to_string(),
            attacker_color: attacker.to_string(),
        }
    }

    pub fn end_turn(room_id: &str, next_player_index: usize) -> Self {
        ClientMessage::EndTurn {
            room_id: room_id.to_string(),
            next_player_index,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, RemoteEventError> {
        serde_json::from_str(json).map_err(|e| RemoteEventError::Decode(e.to_string()))
    }
}

/// A seated player as the relay lists them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub name: String,
    pub color: Color,
}

/// One piece in the relay's mirrored state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PiecePosition {
    pub id: String,
    pub position: i32,
    pub in_home: bool,
    pub finished: bool,
}

impl PiecePosition {
    /// Store a reported position as is.
    pub fn set_position(&mut self, position: i32) {
        self.position = position;
        self.in_home = position == WIRE_HOME;
        self.finished = position == FINISH_WIRE;
    }
}

/// Messages the relay broadcasts to a room.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    #[serde(rename_all = "camelCase")]
    PlayerJoined {
        player_name: String,
        color: Color,
        total_players: usize,
        max_players: usize,
    },
    #[serde(rename_all = "camelCase")]
    GameStart { game_state: serde_json::Value },
    #[serde(rename_all = "camelCase")]
    DiceRolled { dice_value: u8, player_index: usize },
    #[serde(rename_all = "camelCase")]
    PieceMoved {
        piece_id: String,
        color: String,
        new_position: i32,
        current_player: usize,
    },
    #[serde(rename_all = "camelCase")]
    PieceCaptured {
        captured_piece_id: String,
        captured_color: String,
        attacker_color: String,
    },
    #[serde(rename_all = "camelCase")]
    TurnEnded { next_player_index: usize },
}

impl ServerMessage {
    /// Wire event name.
    #[must_use]
    pub fn event_name(&self) -> &'static str {
        match self {
            ServerMessage::PlayerJoined { .. } => "playerJoined",
            ServerMessage::GameStart { .. } => "gameStart",
            ServerMessage::DiceRolled { .. } => "diceRolled",
            ServerMessage::PieceMoved { .. } => "pieceMoved",
            ServerMessage::PieceCaptured { .. } => "pieceCaptured",
            ServerMessage::TurnEnded { .. } => "turnEnded",
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, RemoteEventError> {
        serde_json::from_str(json).map_err(|e| RemoteEventError::Decode(e.to_string()))
    }
}

/// Reply to a `joinRoom` request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_state: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub players: Vec<PlayerSummary>,
}

impl JoinResponse {
    pub fn failure(error: impl ToString) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            player_index: None,
            color: None,
            game_state: None,
            players: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_message_wire_shape() {
        let msg = ClientMessage::move_piece(
            "ab12cd34",
            PieceId::new(Color::Green, 2),
            Location::OnPath(17),
            2,
        );
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            value,
            json!({
                "event": "movePiece",
                "data": {
                    "roomId": "ab12cd34",
                    "pieceId": "green2",
                    "color": "green",
                    "newPosition": 17,
                    "currentPlayer": 2
                }
            })
        );
        assert_eq!(msg.event_name(), "movePiece");
        assert_eq!(msg.room_id(), "ab12cd34");
    }

    #[test]
    fn test_finished_and_home_positions_on_wire() {
        let finished =
            ClientMessage::move_piece("r", PieceId::new(Color::Red, 0), Location::Finished, 0);
        assert!(matches!(finished, ClientMessage::MovePiece { new_position: 56, .. }));

        let home = ClientMessage::move_piece("r", PieceId::new(Color::Red, 0), Location::AtHome, 0);
        assert!(matches!(home, ClientMessage::MovePiece { new_position: -1, .. }));
    }

    #[test]
    fn test_server_message_round_trip_from_json() {
        let json = r#"{"event":"diceRolled","data":{"diceValue":4,"playerIndex":1}}"#;
        let msg = ServerMessage::from_json(json).unwrap();
        assert_eq!(
            msg,
            ServerMessage::DiceRolled {
                dice_value: 4,
                player_index: 1
            }
        );
        assert_eq!(msg.to_json().unwrap(), json);
    }

    #[test]
    fn test_undecodable_message() {
        assert!(matches!(
            ServerMessage::from_json(r#"{"event":"teleport","data":{}}"#),
            Err(RemoteEventError::Decode(_))
        ));
    }

    #[test]
    fn test_join_failure_shape() {
        let value = serde_json::to_value(JoinResponse::failure("Room is full")).unwrap();
        assert_eq!(value, json!({"success": false, "error": "Room is full"}));
    }
}
