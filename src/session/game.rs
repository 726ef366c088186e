//! The game core shared by every session strategy.
//!
//! `Game` couples a [`RulesEngine`] with a [`TurnController`], records
//! accepted actions and turns outcomes into [`GameEvent`]s. It knows
//! nothing about dice, transports or which seat is local.

use im::Vector;
use tracing::{debug, info};

use super::event::GameEvent;
use super::snapshot::{GameSnapshot, PieceSnapshot};
use crate::board::{coord_at, step_of, FINISH_STEP, GOAL_INDEX};
use crate::core::{
    Action, ActionRecord, Color, Coord, GameConfig, Location, PieceId, TurnState,
};
use crate::error::{ConfigError, MoveRejection, RemoteEventError, SnapshotError, TurnError};
use crate::protocol::RemoteEvent;
use crate::rules::{AppliedMove, Continuation, MoveKind, RulesEngine};
use crate::turn::{RollResolution, TurnController, TurnPhase};

/// Pieces, turn sequence, and the action history of one game.
#[derive(Clone, Debug)]
pub struct Game {
    engine: RulesEngine,
    turns: TurnController,
    history: Vector<ActionRecord>,
    sequence: u32,
}

impl Game {
    /// A running game: the first active color may roll.
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(RulesEngine::new(), TurnController::new(&config.active_colors)?))
    }

    /// A game waiting for `start`, as a networked client waits for the
    /// room to fill.
    pub fn idle(config: &GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(RulesEngine::new(), TurnController::idle(&config.active_colors)?))
    }

    fn from_parts(engine: RulesEngine, turns: TurnController) -> Self {
        Self {
            engine,
            turns,
            history: Vector::new(),
            sequence: 0,
        }
    }

    // === Queries ===

    #[must_use]
    pub fn engine(&self) -> &RulesEngine {
        &self.engine
    }

    #[must_use]
    pub fn turns(&self) -> &TurnController {
        &self.turns
    }

    #[must_use]
    pub fn turn_state(&self) -> TurnState {
        self.turns.turn_state()
    }

    /// Accepted actions, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.history
    }

    #[must_use]
    pub fn display_coord(&self, piece: PieceId) -> Option<Coord> {
        self.engine.display_coord(piece)
    }

    /// Check that `seat` (or anyone, for `None`) may roll now.
    ///
    /// Returns the color that would roll.
    pub fn check_roll(&self, seat: Option<Color>) -> Result<Color, TurnError> {
        let color = match self.turns.phase() {
            TurnPhase::AwaitingRoll { color } => color,
            TurnPhase::AwaitingMove { roll, .. } => return Err(TurnError::RollPending(roll)),
            TurnPhase::TurnOver => return Err(TurnError::NotRunning),
        };
        match seat {
            Some(seat) if seat != color => Err(TurnError::NotYourTurn {
                color: seat,
                active: color,
            }),
            _ => Ok(color),
        }
    }

    // === Local input ===

    /// Spend a die value for the active color.
    pub fn roll(&mut self, value: u8) -> Result<Vec<GameEvent>, TurnError> {
        let color = self.check_roll(None)?;
        let turn = self.turns.turn_number();
        let resolution = self.turns.roll(&mut self.engine, value)?;
        self.record(color, Action::Roll(value), turn);

        let mut events = vec![GameEvent::DiceRolled { color, value }];
        match resolution {
            RollResolution::NoLegalMove { next } => {
                debug!(%color, roll = value, "No legal move");
                events.push(GameEvent::NoLegalMove { color, roll: value });
                events.push(self.turn_ended(color, next));
            }
            RollResolution::AwaitingSelection(legal) => {
                events.push(GameEvent::AwaitingSelection {
                    color,
                    roll: value,
                    legal,
                });
            }
            RollResolution::AutoMoved(applied) => {
                self.record(color, Action::Select(applied.piece), turn);
                self.push_move_events(&applied, &mut events);
            }
        }
        Ok(events)
    }

    /// Move `piece` by the pending roll.
    pub fn select(&mut self, piece: PieceId) -> Result<Vec<GameEvent>, TurnError> {
        let turn = self.turns.turn_number();
        let applied = self.turns.select(&mut self.engine, piece)?;
        self.record(piece.color, Action::Select(piece), turn);

        let mut events = Vec::with_capacity(4);
        self.push_move_events(&applied, &mut events);
        Ok(events)
    }

    /// Start the turn sequence if it is not running.
    pub fn start(&mut self) -> Option<GameEvent> {
        if self.turns.is_running() {
            return None;
        }
        self.turns.start();
        let first = self.turns.current_color();
        info!(%first, "Game started");
        Some(GameEvent::GameStarted { first })
    }

    /// Stop accepting input.
    pub fn halt(&mut self) {
        self.turns.halt();
    }

    /// Pass the turn without a move, as after unusable peer data.
    ///
    /// Does nothing while the game is not running.
    pub fn end_turn(&mut self) -> Option<GameEvent> {
        if !self.turns.is_running() {
            return None;
        }
        let from = self.turns.current_color();
        let next = self.turns.advance();
        Some(self.turn_ended(from, next))
    }

    /// Put `piece` on `cell` of its own path, ignoring every rule.
    ///
    /// Debugging aid: no capture check, no turn change, nothing recorded.
    /// The goal cell and the last home-stretch cell both count as finished.
    pub fn debug_place(&mut self, piece: PieceId, cell: Coord) -> Result<GameEvent, MoveRejection> {
        if self.engine.piece(piece).is_none() {
            return Err(MoveRejection::UnknownPiece(piece));
        }
        let step = step_of(piece.color, cell).ok_or(MoveRejection::OffPath { piece, cell })?;
        let to = match u8::try_from(step) {
            Ok(step) if step < FINISH_STEP => Location::OnPath(step),
            _ => Location::Finished,
        };
        let from = self.engine.set_location(piece, to);
        info!(%piece, %cell, ?to, "Debug placement");
        Ok(self.placement_event(piece, from, to))
    }

    // === Peer input ===

    /// Apply a peer's event directly, without checking it against the rules.
    pub fn apply_remote(&mut self, event: RemoteEvent) -> Result<Vec<GameEvent>, RemoteEventError> {
        let seats = self.turns.order().len();
        let events = match event {
            RemoteEvent::PlayerJoined {
                name,
                color,
                seated,
                capacity,
            } => vec![GameEvent::PlayerJoined {
                name,
                color,
                seated,
                capacity,
            }],
            RemoteEvent::GameStarted => self.start().into_iter().collect(),
            RemoteEvent::DiceRolled { seat, value } => {
                let running = self.turns.is_running();
                let color = self
                    .turns
                    .observe_roll(seat, value)
                    .ok_or(RemoteEventError::PlayerIndexOutOfRange(seat))?;
                if !running {
                    debug!(%color, "Peer roll while stopped, seat noted");
                    return Ok(Vec::new());
                }
                vec![GameEvent::DiceRolled { color, value }]
            }
            RemoteEvent::PieceMoved { piece, to, .. } => {
                self.require_seated(piece.color)?;
                let from = self.engine.set_location(piece, to);
                vec![self.placement_event(piece, from, to)]
            }
            RemoteEvent::PieceCaptured { piece, attacker } => {
                self.require_seated(piece.color)?;
                self.engine.send_home(piece);
                vec![GameEvent::PieceCaptured {
                    piece,
                    by: attacker,
                    home: self.home_of(piece),
                }]
            }
            RemoteEvent::TurnEnded { next_seat } => {
                if next_seat >= seats {
                    return Err(RemoteEventError::PlayerIndexOutOfRange(next_seat));
                }
                let from = self.turns.current_color();
                let running = self.turns.is_running();
                let already_there = self.turns.current_index() == next_seat
                    && matches!(self.turns.phase(), TurnPhase::AwaitingRoll { .. });
                let next = self
                    .turns
                    .jump_to(next_seat)
                    .ok_or(RemoteEventError::PlayerIndexOutOfRange(next_seat))?;
                if !running {
                    debug!(%next, "Peer turn change while stopped, seat noted");
                    Vec::new()
                } else if already_there {
                    Vec::new()
                } else {
                    vec![self.turn_ended(from, next)]
                }
            }
        };
        Ok(events)
    }

    fn require_seated(&self, color: Color) -> Result<(), RemoteEventError> {
        match self.turns.seat_of(color) {
            Some(_) => Ok(()),
            None => Err(RemoteEventError::InactiveColor(color)),
        }
    }

    // === Snapshots ===

    /// Capture pieces and turn state.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            active_colors: self.turns.order().to_vec(),
            turn: self.turns.turn_state(),
            turn_number: self.turns.turn_number(),
            pieces: self
                .engine
                .all_pieces()
                .map(|p| PieceSnapshot {
                    id: p.id(),
                    position: p.location.to_wire(),
                })
                .collect(),
        }
    }

    /// Rebuild a game from a snapshot. History starts empty.
    pub fn restore(snapshot: &GameSnapshot) -> Result<Self, SnapshotError> {
        let config = GameConfig::new().with_colors(snapshot.active_colors.iter().copied());
        config
            .validate()
            .map_err(|e| SnapshotError::Invalid(e.to_string()))?;

        let mut engine = RulesEngine::new();
        for piece in &snapshot.pieces {
            let location = Location::from_wire(piece.position).ok_or_else(|| {
                SnapshotError::Invalid(format!("{} at position {}", piece.id, piece.position))
            })?;
            engine.set_location(piece.id, location);
        }
        let turns = TurnController::restore(
            &snapshot.active_colors,
            &snapshot.turn,
            snapshot.turn_number,
        )
        .ok_or_else(|| SnapshotError::Invalid("turn state does not fit active colors".into()))?;

        Ok(Self::from_parts(engine, turns))
    }

    // === Internals ===

    fn record(&mut self, color: Color, action: Action, turn: u32) {
        let record = ActionRecord::new(color, action, turn, self.sequence);
        self.sequence += 1;
        self.history.push_back(record);
    }

    fn turn_ended(&self, from: Color, next: Color) -> GameEvent {
        debug!(%from, %next, "Turn ended");
        GameEvent::TurnEnded {
            from,
            next,
            next_index: self.turns.current_index(),
        }
    }

    fn home_of(&self, piece: PieceId) -> Coord {
        self.engine
            .piece(piece)
            .map_or(crate::core::CENTER, |p| p.home())
    }

    fn placement_event(&self, piece: PieceId, from: Location, to: Location) -> GameEvent {
        match to {
            Location::AtHome => GameEvent::PieceMoved {
                piece,
                from,
                to,
                cell: self.home_of(piece),
            },
            Location::OnPath(0) if from == Location::AtHome => GameEvent::PieceEntered {
                piece,
                cell: coord_at(piece.color, 0).unwrap_or(crate::core::CENTER),
            },
            Location::OnPath(step) => GameEvent::PieceMoved {
                piece,
                from,
                to,
                cell: coord_at(piece.color, step as usize).unwrap_or(crate::core::CENTER),
            },
            Location::Finished => GameEvent::PieceFinished {
                piece,
                cell: coord_at(piece.color, GOAL_INDEX).unwrap_or(crate::core::CENTER),
            },
        }
    }

    fn push_move_events(&self, applied: &AppliedMove, events: &mut Vec<GameEvent>) {
        let piece = applied.piece;
        events.push(match applied.kind {
            MoveKind::Entered | MoveKind::Finished => {
                self.placement_event(piece, applied.from, applied.to)
            }
            MoveKind::Advanced => GameEvent::PieceMoved {
                piece,
                from: applied.from,
                to: applied.to,
                cell: self.engine.display_coord(piece).unwrap_or(crate::core::CENTER),
            },
        });
        for &captured in &applied.captured {
            events.push(GameEvent::PieceCaptured {
                piece: captured,
                by: piece.color,
                home: self.home_of(captured),
            });
        }
        match applied.continuation {
            Continuation::ExtraTurn(reason) => events.push(GameEvent::ExtraTurn {
                color: piece.color,
                reason,
            }),
            Continuation::AdvanceTurn => {
                events.push(self.turn_ended(piece.color, self.turns.current_color()));
            }
        }
    }
}
