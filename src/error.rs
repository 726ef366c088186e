//! Error types.
//!
//! None of these are fatal: each one is reported to the caller and leaves
//! the game in the state it had before the failed call.

use thiserror::Error;

use crate::core::{Color, Coord, PieceId};

/// Unrecognized color name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown color: {0:?}")]
pub struct ParseColorError(pub String);

/// Unrecognized piece id (expected e.g. `"red0"`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown piece id: {0:?}")]
pub struct ParsePieceIdError(pub String);

/// Invalid game or relay configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("at least one color must be active")]
    NoActiveColors,
    #[error("color {0} is listed twice")]
    DuplicateColor(Color),
    #[error("fixed dice value {0} is not a die face")]
    InvalidDiceValue(u8),
    #[error("room capacity {0} is outside 1..=4")]
    InvalidCapacity(usize),
    #[error("room id length {0} is outside 4..=32")]
    InvalidRoomIdLength(usize),
    #[error("seat {seat} is not one of the {seats} active colors")]
    InvalidSeat { seat: usize, seats: usize },
    #[error("invalid config: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Why the rules engine refused a move. State is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveRejection {
    #[error("no such piece: {0}")]
    UnknownPiece(PieceId),
    #[error("{piece} does not belong to {active}")]
    NotActiveColor { piece: PieceId, active: Color },
    #[error("{0} has already finished")]
    PieceFinished(PieceId),
    #[error("{piece} needs a 6 to leave home, rolled {roll}")]
    NeedsSix { piece: PieceId, roll: u8 },
    #[error("{piece} at step {step} cannot move {roll}: roll too high to finish")]
    Overshoot { piece: PieceId, step: u8, roll: u8 },
    #[error("{0} is not a die face")]
    InvalidRoll(u8),
    #[error("{cell} is not on {piece}'s path")]
    OffPath { piece: PieceId, cell: Coord },
}

/// An action the turn controller would not accept. State is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TurnError {
    #[error("no turn is in progress")]
    NotRunning,
    #[error("it is {active}'s turn, not {color}'s")]
    NotYourTurn { color: Color, active: Color },
    #[error("roll the dice first")]
    NoPendingRoll,
    #[error("a roll of {0} is waiting for a move")]
    RollPending(u8),
    #[error("{0} is not a die face")]
    InvalidRoll(u8),
    #[error(transparent)]
    Move(#[from] MoveRejection),
}

/// Inbound relay data that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteEventError {
    #[error("unknown piece id {0:?}")]
    UnknownPiece(String),
    #[error("piece {piece} reported with color {color}")]
    ColorMismatch { piece: PieceId, color: Color },
    #[error("position {0} is off the path")]
    PositionOutOfRange(i32),
    #[error("player index {0} is not seated")]
    PlayerIndexOutOfRange(usize),
    #[error("dice value {0} is not a die face")]
    InvalidDiceValue(u8),
    #[error("color {0} is not playing")]
    InactiveColor(Color),
    #[error("undecodable relay message: {0}")]
    Decode(String),
}

/// Relay room failures, reported to the requester.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    #[error("Room not found")]
    RoomNotFound(String),
    #[error("Room is full")]
    RoomFull(String),
    #[error("room capacity {0} is outside 1..=4")]
    InvalidCapacity(usize),
    #[error("no free room id after {0} attempts")]
    RoomIdsExhausted(usize),
}

/// Snapshot encode/decode failure.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("binary snapshot: {0}")]
    Binary(#[from] bincode::Error),
    #[error("json snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("inconsistent snapshot: {0}")]
    Invalid(String),
}
