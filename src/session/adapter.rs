//! Session strategies: local play and relay-backed play.
//!
//! Both strategies drive the same [`Game`]. The local one calls straight
//! into it. The networked one also tells the relay about every local
//! action and applies other seats' broadcasts as they arrive.

use std::sync::mpsc::Sender;

use tracing::{debug, warn};

use super::event::GameEvent;
use super::game::Game;
use crate::core::{is_die_face, Color, Location, PieceId};
use crate::error::{RemoteEventError, TurnError};
use crate::protocol::{ClientMessage, RemoteEvent, ServerMessage};

/// The input boundary of a session.
pub trait SessionAdapter: std::fmt::Debug {
    /// The color this side of the session plays, or `None` if it plays all.
    fn seat(&self) -> Option<Color>;

    /// Submit a die value for the active color.
    fn submit_roll(&mut self, game: &mut Game, value: u8) -> Result<Vec<GameEvent>, TurnError>;

    /// Submit a piece selection for the pending roll.
    fn submit_select(&mut self, game: &mut Game, piece: PieceId) -> Result<Vec<GameEvent>, TurnError>;

    /// Apply a broadcast from the relay.
    fn on_remote_event(&mut self, game: &mut Game, message: &ServerMessage) -> Vec<GameEvent>;
}

/// Every color plays on this device.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalAdapter;

impl SessionAdapter for LocalAdapter {
    fn seat(&self) -> Option<Color> {
        None
    }

    fn submit_roll(&mut self, game: &mut Game, value: u8) -> Result<Vec<GameEvent>, TurnError> {
        game.roll(value)
    }

    fn submit_select(&mut self, game: &mut Game, piece: PieceId) -> Result<Vec<GameEvent>, TurnError> {
        game.select(piece)
    }

    fn on_remote_event(&mut self, _game: &mut Game, message: &ServerMessage) -> Vec<GameEvent> {
        debug!(event = message.event_name(), "Local session ignores relay traffic");
        Vec::new()
    }
}

/// Outbound side of the relay connection.
///
/// Sends are fire-and-forget; nothing waits for the relay to answer.
pub trait RelayTransport: std::fmt::Debug {
    fn send(&mut self, message: ClientMessage);
}

impl RelayTransport for Sender<ClientMessage> {
    fn send(&mut self, message: ClientMessage) {
        if Sender::send(&*self, message).is_err() {
            warn!("Relay channel closed, message dropped");
        }
    }
}

impl RelayTransport for Vec<ClientMessage> {
    fn send(&mut self, message: ClientMessage) {
        self.push(message);
    }
}

/// One seat of a relay room.
///
/// Local actions are applied immediately and announced to the relay in the
/// same call. Broadcasts from other seats are applied without any rule
/// checks; echoes of our own rolls, moves and captures are skipped.
#[derive(Debug)]
pub struct NetworkedAdapter {
    room_id: String,
    seat_index: usize,
    color: Color,
    transport: Box<dyn RelayTransport + Send>,
}

impl NetworkedAdapter {
    pub fn new(
        room_id: impl Into<String>,
        seat_index: usize,
        color: Color,
        transport: Box<dyn RelayTransport + Send>,
    ) -> Self {
        Self {
            room_id: room_id.into(),
            seat_index,
            color,
            transport,
        }
    }

    #[must_use]
    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    #[must_use]
    pub fn seat_index(&self) -> usize {
        self.seat_index
    }

    /// Announce what a local action did.
    fn forward(&mut self, events: &[GameEvent]) {
        for event in events {
            let message = match *event {
                GameEvent::PieceEntered { piece, .. } => self.move_message(piece, Location::OnPath(0)),
                GameEvent::PieceMoved { piece, to, .. } => self.move_message(piece, to),
                GameEvent::PieceFinished { piece, .. } => self.move_message(piece, Location::Finished),
                GameEvent::PieceCaptured { piece, by, .. } => {
                    ClientMessage::piece_captured(&self.room_id, piece, by)
                }
                GameEvent::TurnEnded { next_index, .. } => {
                    ClientMessage::end_turn(&self.room_id, next_index)
                }
                _ => continue,
            };
            self.transport.send(message);
        }
    }

    fn move_message(&self, piece: PieceId, to: Location) -> ClientMessage {
        ClientMessage::move_piece(&self.room_id, piece, to, self.seat_index)
    }

    fn is_echo(&self, event: &RemoteEvent) -> bool {
        match event {
            RemoteEvent::PieceMoved { piece, .. } => piece.color == self.color,
            RemoteEvent::DiceRolled { seat, .. } => *seat == self.seat_index,
            RemoteEvent::PieceCaptured { attacker, .. } => *attacker == self.color,
            _ => false,
        }
    }

    /// Drop unusable peer data and end the turn locally.
    fn discard(&self, game: &mut Game, reason: RemoteEventError) -> Vec<GameEvent> {
        warn!(room_id = %self.room_id, %reason, "Discarding relay event");
        let mut events = vec![GameEvent::RemoteEventDiscarded { reason }];
        events.extend(game.end_turn());
        events
    }
}

impl SessionAdapter for NetworkedAdapter {
    fn seat(&self) -> Option<Color> {
        Some(self.color)
    }

    fn submit_roll(&mut self, game: &mut Game, value: u8) -> Result<Vec<GameEvent>, TurnError> {
        game.check_roll(Some(self.color))?;
        if !is_die_face(value) {
            return Err(TurnError::InvalidRoll(value));
        }
        self.transport
            .send(ClientMessage::roll_dice(&self.room_id, value, self.seat_index));

        let events = game.roll(value)?;
        self.forward(&events);
        Ok(events)
    }

    fn submit_select(&mut self, game: &mut Game, piece: PieceId) -> Result<Vec<GameEvent>, TurnError> {
        if let Some(active) = game.turns().active_color() {
            if active != self.color {
                return Err(TurnError::NotYourTurn {
                    color: self.color,
                    active,
                });
            }
        }
        let events = game.select(piece)?;
        self.forward(&events);
        Ok(events)
    }

    fn on_remote_event(&mut self, game: &mut Game, message: &ServerMessage) -> Vec<GameEvent> {
        let event = match RemoteEvent::decode(message) {
            Ok(event) => event,
            Err(reason) => return self.discard(game, reason),
        };
        if self.is_echo(&event) {
            debug!(event = message.event_name(), "Skipping own echo");
            return Vec::new();
        }
        match game.apply_remote(event) {
            Ok(events) => events,
            Err(reason) => self.discard(game, reason),
        }
    }
}
