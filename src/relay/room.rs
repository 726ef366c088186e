//! A relay room and its mirrored game state.
//!
//! The mirror is memory, not authority: it records whatever clients report
//! so late joiners receive the latest picture.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{Color, PieceId, WIRE_HOME};
use crate::protocol::{PiecePosition, PlayerSummary};

/// Room lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Waiting,
    Playing,
    /// Reserved for a win condition; no transition reaches it yet.
    Finished,
}

/// A seated player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeatedPlayer {
    pub connection: String,
    pub name: String,
    pub color: Color,
    pub index: usize,
}

impl SeatedPlayer {
    #[must_use]
    pub fn summary(&self) -> PlayerSummary {
        PlayerSummary {
            name: self.name.clone(),
            color: self.color,
        }
    }
}

/// The room's copy of the game, in the shape sent as `gameState`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomState {
    pub current_player: usize,
    pub players: Vec<String>,
    pub colors: Vec<Color>,
    pub can_move: bool,
    pub selected_piece: Option<PieceId>,
    pub dice_value: Option<u8>,
    pub pieces: BTreeMap<Color, Vec<PiecePosition>>,
}

impl Default for RoomState {
    fn default() -> Self {
        Self {
            current_player: 0,
            players: Color::ALL.iter().map(|c| c.label().to_string()).collect(),
            colors: Color::ALL.to_vec(),
            can_move: false,
            selected_piece: None,
            dice_value: None,
            pieces: Color::ALL.iter().map(|&c| (c, Vec::new())).collect(),
        }
    }
}

impl RoomState {
    /// Put a newly seated color's pieces in its yard.
    pub fn seat_color(&mut self, color: Color) {
        let pieces = PieceId::all_of(color)
            .map(|id| PiecePosition {
                id: id.to_string(),
                position: WIRE_HOME,
                in_home: true,
                finished: false,
            })
            .collect();
        self.pieces.insert(color, pieces);
    }

    /// Look a piece up by its reported color and id.
    pub fn piece_mut(&mut self, color: &str, piece_id: &str) -> Option<&mut PiecePosition> {
        let color: Color = color.parse().ok()?;
        self.pieces
            .get_mut(&color)?
            .iter_mut()
            .find(|p| p.id == piece_id)
    }
}

/// A room: capacity, seats and mirrored state.
#[derive(Clone, Debug)]
pub struct GameRoom {
    room_id: String,
    capacity: usize,
    players: Vec<SeatedPlayer>,
    status: RoomStatus,
    pub(crate) state: RoomState,
}

impl GameRoom {
    pub fn new(room_id: impl Into<String>, capacity: usize) -> Self {
        Self {
            room_id: room_id.into(),
            capacity,
            players: Vec::with_capacity(capacity),
            status: RoomStatus::Waiting,
            state: RoomState::default(),
        }
    }

    #[must_use]
    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn players(&self) -> &[SeatedPlayer] {
        &self.players
    }

    #[must_use]
    pub fn status(&self) -> RoomStatus {
        self.status
    }

    #[must_use]
    pub fn state(&self) -> &RoomState {
        &self.state
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.players.len() >= self.capacity
    }

    /// Seat a player in the next free seat. Returns the seat, or `None` if
    /// the room is full.
    pub fn add_player(&mut self, connection: &str, name: &str) -> Option<&SeatedPlayer> {
        if self.is_full() {
            return None;
        }
        let index = self.players.len();
        let color = Color::from_index(index)?;
        self.state.seat_color(color);
        self.players.push(SeatedPlayer {
            connection: connection.to_string(),
            name: name.to_string(),
            color,
            index,
        });
        self.players.last()
    }

    pub(crate) fn set_status(&mut self, status: RoomStatus) {
        self.status = status;
    }

    /// Player summaries in seat order.
    #[must_use]
    pub fn summaries(&self) -> Vec<PlayerSummary> {
        self.players.iter().map(SeatedPlayer::summary).collect()
    }
}
