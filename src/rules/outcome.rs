//! Results of applying a move.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Coord, Location, PieceId};

/// Pieces sent home by one move. Usually zero or one.
pub type Captured = SmallVec<[PieceId; 4]>;

/// Why the mover rolls again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraTurnReason {
    /// A piece left home.
    Entered,
    /// A piece reached the goal.
    Finished,
    /// At least one opponent was sent home.
    Captured,
    /// The roll was a six.
    RolledSix,
}

/// What happens after a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Continuation {
    /// Same color rolls again.
    ExtraTurn(ExtraTurnReason),
    /// Pass to the next active color.
    AdvanceTurn,
}

impl Continuation {
    #[must_use]
    pub const fn is_extra_turn(self) -> bool {
        matches!(self, Continuation::ExtraTurn(_))
    }
}

/// Kind of move that was applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    Entered,
    Advanced,
    Finished,
}

/// Result of a capture check at the mover's destination.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CaptureOutcome {
    /// Destination cell, if the mover is on the path.
    pub cell: Option<Coord>,
    /// Whether the cell was a safe square.
    pub safe: bool,
    /// Opponent pieces returned home, scan order.
    pub captured: Captured,
}

impl CaptureOutcome {
    #[must_use]
    pub fn any(&self) -> bool {
        !self.captured.is_empty()
    }
}

/// A move the engine accepted and applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppliedMove {
    pub piece: PieceId,
    pub roll: u8,
    pub from: Location,
    pub to: Location,
    pub kind: MoveKind,
    pub captured: Captured,
    pub continuation: Continuation,
}
