//! Game sessions.
//!
//! A [`GameSession`] owns one game: its pieces, turn sequence, dice and
//! the strategy that connects it to the outside world. Sessions share
//! nothing, so any number can run side by side.
//!
//! ## Example
//!
//! ```
//! use ludo_engine::core::{Color, GameConfig, PieceId};
//! use ludo_engine::session::{GameEvent, GameSession};
//!
//! let mut session = GameSession::local(GameConfig::new().with_fixed_dice(6)).unwrap();
//!
//! // Four pieces at home and a six: red must choose.
//! let events = session.roll_dice().unwrap();
//! assert!(matches!(events.last(), Some(GameEvent::AwaitingSelection { .. })));
//!
//! session.select(PieceId::new(Color::Red, 0));
//! assert_eq!(session.turn_state().active_color, Some(Color::Red));
//! ```

pub mod adapter;
pub mod event;
pub mod game;
pub mod snapshot;

pub use adapter::{LocalAdapter, NetworkedAdapter, RelayTransport, SessionAdapter};
pub use event::GameEvent;
pub use game::Game;
pub use snapshot::{GameSnapshot, PieceSnapshot};

use im::Vector;
use tracing::{debug, info, warn};

use crate::core::{
    ActionRecord, Color, Coord, DiceRng, DiceRngState, GameConfig, PieceId, TurnState,
};
use crate::error::{ConfigError, MoveRejection, SnapshotError, TurnError};
use crate::protocol::ServerMessage;
use crate::rules::LegalMoves;

/// One game and everything it needs to run.
#[derive(Debug)]
pub struct GameSession {
    game: Game,
    adapter: Box<dyn SessionAdapter + Send>,
    dice: DiceRng,
}

impl GameSession {
    /// A hot-seat game: every active color plays on this device.
    pub fn local(config: GameConfig) -> Result<Self, ConfigError> {
        let game = Game::new(&config)?;
        info!(colors = config.active_colors.len(), seed = config.seed, "Local session created");
        Ok(Self {
            game,
            adapter: Box::new(LocalAdapter),
            dice: config.dice()?,
        })
    }

    /// One seat of a relay room. Nobody may act until the relay reports
    /// `gameStart`.
    pub fn networked(
        config: GameConfig,
        room_id: impl Into<String>,
        seat: usize,
        transport: Box<dyn RelayTransport + Send>,
    ) -> Result<Self, ConfigError> {
        let game = Game::idle(&config)?;
        let color = *config
            .active_colors
            .get(seat)
            .ok_or(ConfigError::InvalidSeat {
                seat,
                seats: config.active_colors.len(),
            })?;
        let adapter = NetworkedAdapter::new(room_id, seat, color, transport);
        info!(
            room_id = adapter.room_id(),
            seat = adapter.seat_index(),
            %color,
            "Networked session created"
        );
        Ok(Self {
            game,
            adapter: Box::new(adapter),
            dice: config.dice()?,
        })
    }

    /// Resume a local game from a snapshot and a saved die.
    pub fn resume_local(snapshot: &GameSnapshot, dice: &DiceRngState) -> Result<Self, SnapshotError> {
        Ok(Self {
            game: Game::restore(snapshot)?,
            adapter: Box::new(LocalAdapter),
            dice: DiceRng::from_state(dice),
        })
    }

    // === Input ===

    /// Roll this session's die for the active color.
    ///
    /// The die is only rolled if the roll would be accepted.
    pub fn roll_dice(&mut self) -> Result<Vec<GameEvent>, TurnError> {
        self.game.check_roll(self.adapter.seat())?;
        let value = self.dice.roll();
        self.adapter.submit_roll(&mut self.game, value)
    }

    /// Submit a die value rolled elsewhere.
    pub fn submit_roll(&mut self, value: u8) -> Result<Vec<GameEvent>, TurnError> {
        self.adapter.submit_roll(&mut self.game, value)
    }

    /// Select a piece for the pending roll.
    ///
    /// A refused selection changes nothing and comes back as a single
    /// `SelectionRejected` event.
    pub fn select(&mut self, piece: PieceId) -> Vec<GameEvent> {
        match self.adapter.submit_select(&mut self.game, piece) {
            Ok(events) => events,
            Err(reason) => {
                debug!(%piece, %reason, "Selection rejected");
                vec![GameEvent::SelectionRejected { piece, reason }]
            }
        }
    }

    /// Apply a relay broadcast.
    pub fn on_remote_event(&mut self, message: &ServerMessage) -> Vec<GameEvent> {
        self.adapter.on_remote_event(&mut self.game, message)
    }

    /// Apply a relay broadcast in its JSON form.
    ///
    /// Undecodable text is treated like any other malformed peer data.
    pub fn on_remote_json(&mut self, json: &str) -> Vec<GameEvent> {
        match ServerMessage::from_json(json) {
            Ok(message) => self.on_remote_event(&message),
            Err(reason) if self.adapter.seat().is_some() => {
                warn!(%reason, "Discarding relay message");
                let mut events = vec![GameEvent::RemoteEventDiscarded { reason }];
                events.extend(self.game.end_turn());
                events
            }
            Err(reason) => {
                debug!(%reason, "Local session ignores relay traffic");
                Vec::new()
            }
        }
    }

    /// Place a piece on a cell of its path without rule checks.
    ///
    /// Debugging aid. Nothing is sent to the relay.
    pub fn debug_place(&mut self, piece: PieceId, cell: Coord) -> Result<GameEvent, MoveRejection> {
        self.game.debug_place(piece, cell)
    }

    /// Stop play, as when the relay connection drops.
    pub fn disconnect(&mut self) {
        info!("Session disconnected");
        self.game.halt();
    }

    // === Queries ===

    #[must_use]
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// The color played on this side, `None` for a local session.
    #[must_use]
    pub fn seat(&self) -> Option<Color> {
        self.adapter.seat()
    }

    #[must_use]
    pub fn turn_state(&self) -> TurnState {
        self.game.turn_state()
    }

    /// Cell a piece is drawn on.
    #[must_use]
    pub fn display_coord(&self, piece: PieceId) -> Option<Coord> {
        self.game.display_coord(piece)
    }

    /// Pieces that may be selected now.
    #[must_use]
    pub fn selectable(&self) -> LegalMoves {
        let turns = self.game.turns();
        match (turns.active_color(), turns.pending_roll()) {
            (Some(color), Some(roll)) => self.game.engine().legal_moves(color, roll),
            _ => LegalMoves::new(),
        }
    }

    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        self.game.history()
    }

    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        self.game.snapshot()
    }

    #[must_use]
    pub fn dice_state(&self) -> DiceRngState {
        self.dice.state()
    }
}
