//! Room registry: creation, joins, and blind relaying.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::room::{GameRoom, RoomStatus};
use crate::core::{Color, RelayConfig};
use crate::error::{ConfigError, RelayError};
use crate::protocol::{ClientMessage, JoinResponse, PlayerSummary, ServerMessage};

/// A message for every connection in a room.
#[derive(Clone, Debug, PartialEq)]
pub struct Broadcast {
    pub room_id: String,
    pub message: ServerMessage,
}

/// Lobby listing for one room.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomInfo {
    pub room_id: String,
    pub max_players: usize,
    pub current_players: usize,
    pub status: RoomStatus,
    pub players: Vec<PlayerSummary>,
}

/// A successful join.
#[derive(Clone, Debug, PartialEq)]
pub struct JoinAccepted {
    pub player_index: usize,
    pub color: Color,
    pub game_state: serde_json::Value,
    pub players: Vec<PlayerSummary>,
}

impl From<JoinAccepted> for JoinResponse {
    fn from(accepted: JoinAccepted) -> Self {
        JoinResponse {
            success: true,
            error: None,
            player_index: Some(accepted.player_index),
            color: Some(accepted.color),
            game_state: Some(accepted.game_state),
            players: accepted.players,
        }
    }
}

/// What a client message produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dispatch {
    /// Answer to the sender, for requests that expect one.
    pub reply: Option<JoinResponse>,
    pub broadcasts: Vec<Broadcast>,
}

/// Every room the relay knows about.
///
/// Performs no rule checks: whatever a seated client reports is stored in
/// the room mirror and echoed to the room.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    config: RelayConfig,
    rooms: FxHashMap<String, GameRoom>,
    connections: FxHashMap<String, String>,
}

impl RoomRegistry {
    /// Draws allowed before `create_room` gives up on finding a free id.
    const ROOM_ID_ATTEMPTS: usize = 16;

    pub fn new(config: RelayConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            rooms: FxHashMap::default(),
            connections: FxHashMap::default(),
        })
    }

    /// Open a room. `None` uses the configured default capacity.
    pub fn create_room(&mut self, capacity: Option<usize>) -> Result<String, RelayError> {
        let capacity = capacity.unwrap_or(self.config.default_capacity);
        if !(1..=RelayConfig::MAX_CAPACITY).contains(&capacity) {
            return Err(RelayError::InvalidCapacity(capacity));
        }
        let room_id = (0..Self::ROOM_ID_ATTEMPTS)
            .map(|_| self.generate_room_id())
            .find(|candidate| !self.rooms.contains_key(candidate))
            .ok_or_else(|| {
                warn!(rooms = self.rooms.len(), "No free room id");
                RelayError::RoomIdsExhausted(Self::ROOM_ID_ATTEMPTS)
            })?;
        info!(%room_id, capacity, "Room created");
        self.rooms
            .insert(room_id.clone(), GameRoom::new(room_id.clone(), capacity));
        Ok(room_id)
    }

    fn generate_room_id(&self) -> String {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(self.config.room_id_len);
        id
    }

    #[must_use]
    pub fn room(&self, room_id: &str) -> Option<&GameRoom> {
        self.rooms.get(room_id)
    }

    /// Lobby listing, ordered by room id.
    #[must_use]
    pub fn list_rooms(&self) -> Vec<RoomInfo> {
        let mut rooms: Vec<_> = self
            .rooms
            .values()
            .map(|room| RoomInfo {
                room_id: room.room_id().to_string(),
                max_players: room.capacity(),
                current_players: room.players().len(),
                status: room.status(),
                players: room.summaries(),
            })
            .collect();
        rooms.sort_by(|a, b| a.room_id.cmp(&b.room_id));
        rooms
    }

    /// Seat `connection` in a room.
    ///
    /// Everyone in the room hears `playerJoined`; the join that fills the
    /// room also starts the game.
    pub fn join(
        &mut self,
        connection: &str,
        room_id: &str,
        player_name: &str,
    ) -> Result<(JoinAccepted, Vec<Broadcast>), RelayError> {
        let Some(room) = self.rooms.get_mut(room_id) else {
            warn!(%room_id, connection, "Join rejected: room not found");
            return Err(RelayError::RoomNotFound(room_id.to_string()));
        };
        let Some(seat) = room.add_player(connection, player_name) else {
            warn!(%room_id, connection, "Join rejected: room full");
            return Err(RelayError::RoomFull(room_id.to_string()));
        };
        let (player_index, color) = (seat.index, seat.color);
        info!(%room_id, player_name, %color, player_index, "Player joined");

        let game_state = match serde_json::to_value(room.state()) {
            Ok(value) => value,
            Err(err) => {
                warn!(%room_id, %err, "Room state did not serialize, sending null");
                serde_json::Value::Null
            }
        };
        let accepted = JoinAccepted {
            player_index,
            color,
            game_state: game_state.clone(),
            players: room.summaries(),
        };

        let mut broadcasts = vec![Broadcast {
            room_id: room_id.to_string(),
            message: ServerMessage::PlayerJoined {
                player_name: player_name.to_string(),
                color,
                total_players: room.players().len(),
                max_players: room.capacity(),
            },
        }];
        if room.is_full() {
            room.set_status(RoomStatus::Playing);
            info!(%room_id, players = room.players().len(), "Game started");
            broadcasts.push(Broadcast {
                room_id: room_id.to_string(),
                message: ServerMessage::GameStart { game_state },
            });
        }

        self.connections
            .insert(connection.to_string(), room_id.to_string());
        Ok((accepted, broadcasts))
    }

    /// Record a gameplay message in the room mirror and echo it.
    ///
    /// Messages for unknown rooms or pieces are dropped.
    pub fn relay(&mut self, message: &ClientMessage) -> Option<Broadcast> {
        let room_id = message.room_id();
        let Some(room) = self.rooms.get_mut(room_id) else {
            debug!(%room_id, event = message.event_name(), "Dropped message for unknown room");
            return None;
        };
        let state = &mut room.state;

        let echoed = match message {
            ClientMessage::JoinRoom { .. } => {
                debug!(%room_id, "Join requests are not relayed");
                return None;
            }
            ClientMessage::RollDice {
                dice_value,
                player_index,
                ..
            } => {
                state.dice_value = Some(*dice_value);
                state.current_player = *player_index;
                ServerMessage::DiceRolled {
                    dice_value: *dice_value,
                    player_index: *player_index,
                }
            }
            ClientMessage::MovePiece {
                piece_id,
                color,
                new_position,
                current_player,
                ..
            } => {
                let piece = state.piece_mut(color, piece_id)?;
                piece.set_position(*new_position);
                ServerMessage::PieceMoved {
                    piece_id: piece_id.clone(),
                    color: color.clone(),
                    new_position: *new_position,
                    current_player: *current_player,
                }
            }
            ClientMessage::PieceCaptured {
                captured_piece_id,
                captured_color,
                attacker_color,
                ..
            } => {
                let piece = state.piece_mut(captured_color, captured_piece_id)?;
                piece.set_position(crate::core::WIRE_HOME);
                ServerMessage::PieceCaptured {
                    captured_piece_id: captured_piece_id.clone(),
                    captured_color: captured_color.clone(),
                    attacker_color: attacker_color.clone(),
                }
            }
            ClientMessage::EndTurn {
                next_player_index, ..
            } => {
                state.current_player = *next_player_index;
                state.dice_value = None;
                state.can_move = false;
                ServerMessage::TurnEnded {
                    next_player_index: *next_player_index,
                }
            }
        };

        debug!(%room_id, event = echoed.event_name(), "Relayed");
        Some(Broadcast {
            room_id: room_id.to_string(),
            message: echoed,
        })
    }

    /// Route any client message: joins get a reply, the rest are relayed.
    pub fn dispatch(&mut self, connection: &str, message: &ClientMessage) -> Dispatch {
        match message {
            ClientMessage::JoinRoom {
                room_id,
                player_name,
            } => match self.join(connection, room_id, player_name) {
                Ok((accepted, broadcasts)) => Dispatch {
                    reply: Some(accepted.into()),
                    broadcasts,
                },
                Err(err) => Dispatch {
                    reply: Some(JoinResponse::failure(err)),
                    broadcasts: Vec::new(),
                },
            },
            _ => Dispatch {
                reply: None,
                broadcasts: self.relay(message).into_iter().collect(),
            },
        }
    }

    /// Forget a connection. Its seat and the room stay as they are.
    pub fn disconnect(&mut self, connection: &str) -> bool {
        let known = self.connections.remove(connection).is_some();
        info!(connection, known, "Connection closed");
        known
    }

    /// Room a connection joined, if it is still connected.
    #[must_use]
    pub fn room_of(&self, connection: &str) -> Option<&str> {
        self.connections.get(connection).map(String::as_str)
    }
}
