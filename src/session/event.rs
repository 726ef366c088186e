//! Outbound game events.
//!
//! Every input returns the events it caused, in order. A presentation
//! layer animates them at whatever pace it likes; the game has already
//! moved on by the time it sees them.

use crate::core::{Color, Coord, Location, PieceId};
use crate::error::{RemoteEventError, TurnError};
use crate::rules::{ExtraTurnReason, LegalMoves};

/// Something that happened in a game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    DiceRolled {
        color: Color,
        value: u8,
    },
    /// The roll could not be used. A `TurnEnded` follows.
    NoLegalMove {
        color: Color,
        roll: u8,
    },
    /// Several pieces may move; the player must pick one.
    AwaitingSelection {
        color: Color,
        roll: u8,
        legal: LegalMoves,
    },
    PieceEntered {
        piece: PieceId,
        cell: Coord,
    },
    PieceMoved {
        piece: PieceId,
        from: Location,
        to: Location,
        cell: Coord,
    },
    /// `piece` was sent back to `home` by `by`.
    PieceCaptured {
        piece: PieceId,
        by: Color,
        home: Coord,
    },
    PieceFinished {
        piece: PieceId,
        cell: Coord,
    },
    ExtraTurn {
        color: Color,
        reason: ExtraTurnReason,
    },
    TurnEnded {
        from: Color,
        next: Color,
        next_index: usize,
    },
    /// A selection was refused; nothing changed.
    SelectionRejected {
        piece: PieceId,
        reason: TurnError,
    },
    PlayerJoined {
        name: String,
        color: Color,
        seated: usize,
        capacity: usize,
    },
    GameStarted {
        first: Color,
    },
    /// Inbound relay data was unusable and dropped.
    RemoteEventDiscarded {
        reason: RemoteEventError,
    },
}
