//! Typed view of inbound relay broadcasts.

use crate::core::{is_die_face, Color, Location, PieceId};
use crate::error::RemoteEventError;

use super::ServerMessage;

/// A relay broadcast with its ids and positions parsed.
///
/// Seat indices are not range-checked here; only the session knows how
/// many seats the game has.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemoteEvent {
    PlayerJoined {
        name: String,
        color: Color,
        seated: usize,
        capacity: usize,
    },
    GameStarted,
    DiceRolled { seat: usize, value: u8 },
    PieceMoved { piece: PieceId, to: Location, seat: usize },
    PieceCaptured { piece: PieceId, attacker: Color },
    TurnEnded { next_seat: usize },
}

impl RemoteEvent {
    /// Parse a broadcast, rejecting ids, colors and positions that make no
    /// sense on this board.
    pub fn decode(msg: &ServerMessage) -> Result<Self, RemoteEventError> {
        Ok(match msg {
            ServerMessage::PlayerJoined {
                player_name,
                color,
                total_players,
                max_players,
            } => RemoteEvent::PlayerJoined {
                name: player_name.clone(),
                color: *color,
                seated: *total_players,
                capacity: *max_players,
            },
            ServerMessage::GameStart { .. } => RemoteEvent::GameStarted,
            ServerMessage::DiceRolled {
                dice_value,
                player_index,
            } => {
                if !is_die_face(*dice_value) {
                    return Err(RemoteEventError::InvalidDiceValue(*dice_value));
                }
                RemoteEvent::DiceRolled {
                    seat: *player_index,
                    value: *dice_value,
                }
            }
            ServerMessage::PieceMoved {
                piece_id,
                color,
                new_position,
                current_player,
            } => {
                let piece = parse_owned_piece(piece_id, color)?;
                let to = Location::from_wire(*new_position)
                    .ok_or(RemoteEventError::PositionOutOfRange(*new_position))?;
                RemoteEvent::PieceMoved {
                    piece,
                    to,
                    seat: *current_player,
                }
            }
            ServerMessage::PieceCaptured {
                captured_piece_id,
                captured_color,
                attacker_color,
            } => RemoteEvent::PieceCaptured {
                piece: parse_owned_piece(captured_piece_id, captured_color)?,
                attacker: parse_color(attacker_color)?,
            },
            ServerMessage::TurnEnded { next_player_index } => RemoteEvent::TurnEnded {
                next_seat: *next_player_index,
            },
        })
    }
}

fn parse_color(color: &str) -> Result<Color, RemoteEventError> {
    color
        .parse()
        .map_err(|e: crate::error::ParseColorError| RemoteEventError::Decode(e.to_string()))
}

fn parse_owned_piece(piece_id: &str, color: &str) -> Result<PieceId, RemoteEventError> {
    let piece: PieceId = piece_id
        .parse()
        .map_err(|_| RemoteEventError::UnknownPiece(piece_id.to_string()))?;
    let color = parse_color(color)?;
    if piece.color != color {
        return Err(RemoteEventError::ColorMismatch { piece, color });
    }
    Ok(piece)
}
