//! The rules engine: legal moves, move application, capture, continuation.
//!
//! The engine owns every piece on the board and nothing else. It does not
//! know whose turn it is; callers pass the active color with each move, so
//! the same engine can sit behind a local game, a networked client, or an
//! authoritative server.
//!
//! ## Move rules
//!
//! - A finished piece never moves.
//! - A piece at home moves only on a 6, onto step 0 of its path.
//! - A piece on the path at step `s` moves only if `s + roll <= FINISH_STEP`.
//!
//! ## Continuation
//!
//! Entering or finishing always grants another roll. Otherwise a capture
//! grants another roll, then a 6 does, and anything else passes the turn.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, info};

use super::outcome::{
    AppliedMove, CaptureOutcome, Captured, Continuation, ExtraTurnReason, MoveKind,
};
use crate::board::{coord_at, is_safe, FINISH_STEP, GOAL_INDEX, HOME_SLOTS};
use crate::core::{
    is_die_face, Color, ColorMap, Coord, Location, Piece, PieceId, DIE_MAX, PIECES_PER_COLOR,
};
use crate::error::MoveRejection;

/// Pieces a color may move for a roll. At most four.
pub type LegalMoves = SmallVec<[PieceId; PIECES_PER_COLOR]>;

/// Per-color piece state and the move rules over it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesEngine {
    pieces: ColorMap<[Piece; PIECES_PER_COLOR]>,
}

impl Default for RulesEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RulesEngine {
    /// All sixteen pieces in their home slots.
    #[must_use]
    pub fn new() -> Self {
        let pieces = ColorMap::new(|color| {
            std::array::from_fn(|slot| {
                Piece::new(PieceId::new(color, slot as u8), HOME_SLOTS[color.index()][slot])
            })
        });
        Self { pieces }
    }

    // === Queries ===

    /// Look up a piece.
    #[must_use]
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces[id.color].get(id.slot as usize)
    }

    /// A color's pieces, slot order.
    #[must_use]
    pub fn pieces(&self, color: Color) -> &[Piece; PIECES_PER_COLOR] {
        &self.pieces[color]
    }

    /// Iterate over every piece, turn order then slot order.
    pub fn all_pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter().flat_map(|(_, pieces)| pieces.iter())
    }

    #[must_use]
    pub fn location(&self, id: PieceId) -> Option<Location> {
        self.piece(id).map(|p| p.location)
    }

    /// Board cell the piece is drawn on: its yard slot, path cell, or goal.
    #[must_use]
    pub fn display_coord(&self, id: PieceId) -> Option<Coord> {
        let piece = self.piece(id)?;
        match piece.location {
            Location::AtHome => Some(piece.home()),
            Location::OnPath(step) => coord_at(id.color, step as usize),
            Location::Finished => coord_at(id.color, GOAL_INDEX),
        }
    }

    /// Number of a color's pieces that reached the goal.
    #[must_use]
    pub fn finished_count(&self, color: Color) -> usize {
        self.pieces[color].iter().filter(|p| p.is_finished()).count()
    }

    /// Whether `piece` may move `roll` steps.
    #[must_use]
    pub fn is_legal(piece: &Piece, roll: u8) -> bool {
        Self::destination(piece, roll).is_ok()
    }

    /// Destination of a legal move, or why it is illegal.
    fn destination(piece: &Piece, roll: u8) -> Result<Location, MoveRejection> {
        match piece.location {
            Location::Finished => Err(MoveRejection::PieceFinished(piece.id())),
            Location::AtHome if roll == DIE_MAX => Ok(Location::OnPath(0)),
            Location::AtHome => Err(MoveRejection::NeedsSix {
                piece: piece.id(),
                roll,
            }),
            Location::OnPath(step) => match step.checked_add(roll) {
                Some(FINISH_STEP) => Ok(Location::Finished),
                Some(next) if next < FINISH_STEP => Ok(Location::OnPath(next)),
                _ => Err(MoveRejection::Overshoot {
                    piece: piece.id(),
                    step,
                    roll,
                }),
            },
        }
    }

    /// Pieces of `color` that may move `roll`, slot order.
    #[must_use]
    pub fn legal_moves(&self, color: Color, roll: u8) -> LegalMoves {
        if !is_die_face(roll) {
            return LegalMoves::new();
        }
        self.pieces[color]
            .iter()
            .filter(|p| Self::is_legal(p, roll))
            .map(Piece::id)
            .collect()
    }

    /// Whether `color` can use `roll` at all. If not, the roll is wasted.
    #[must_use]
    pub fn has_any_legal_move(&self, color: Color, roll: u8) -> bool {
        is_die_face(roll) && self.pieces[color].iter().any(|p| Self::is_legal(p, roll))
    }

    /// Check every precondition of `apply_move` without mutating.
    ///
    /// Returns the location the piece would move to.
    pub fn check_move(
        &self,
        active: Color,
        id: PieceId,
        roll: u8,
    ) -> Result<Location, MoveRejection> {
        if !is_die_face(roll) {
            return Err(MoveRejection::InvalidRoll(roll));
        }
        let piece = self.piece(id).ok_or(MoveRejection::UnknownPiece(id))?;
        if piece.color() != active {
            return Err(MoveRejection::NotActiveColor { piece: id, active });
        }
        Self::destination(piece, roll)
    }

    // === Mutation ===

    /// Move a piece of the active color by `roll`.
    ///
    /// A rejected move leaves every piece untouched.
    pub fn apply_move(
        &mut self,
        active: Color,
        id: PieceId,
        roll: u8,
    ) -> Result<AppliedMove, MoveRejection> {
        let to = self.check_move(active, id, roll).inspect_err(|reason| {
            debug!(piece = %id, roll, %reason, "Move rejected");
        })?;
        let from = self.set_location(id, to);

        let (kind, captured, continuation) = match to {
            Location::OnPath(0) if from == Location::AtHome => (
                MoveKind::Entered,
                Captured::new(),
                Continuation::ExtraTurn(ExtraTurnReason::Entered),
            ),
            Location::Finished => {
                info!(piece = %id, "Piece finished");
                (
                    MoveKind::Finished,
                    Captured::new(),
                    Continuation::ExtraTurn(ExtraTurnReason::Finished),
                )
            }
            _ => {
                let capture = self.check_capture(id, active);
                if capture.safe {
                    debug!(piece = %id, cell = ?capture.cell, "Landed on a safe square");
                }
                let continuation = if capture.any() {
                    Continuation::ExtraTurn(ExtraTurnReason::Captured)
                } else if roll == DIE_MAX {
                    Continuation::ExtraTurn(ExtraTurnReason::RolledSix)
                } else {
                    Continuation::AdvanceTurn
                };
                (MoveKind::Advanced, capture.captured, continuation)
            }
        };

        debug!(piece = %id, roll, ?from, ?to, ?continuation, "Move applied");
        Ok(AppliedMove {
            piece: id,
            roll,
            from,
            to,
            kind,
            captured,
            continuation,
        })
    }

    /// Send home every opponent of `attacker` sharing the mover's cell.
    ///
    /// Safe squares never capture. All matching pieces are captured, not
    /// just the first.
    pub fn check_capture(&mut self, mover: PieceId, attacker: Color) -> CaptureOutcome {
        let Some(cell) = self.display_coord_on_path(mover) else {
            return CaptureOutcome::default();
        };
        if is_safe(cell) {
            return CaptureOutcome {
                cell: Some(cell),
                safe: true,
                captured: Captured::new(),
            };
        }

        let mut captured = Captured::new();
        for (color, pieces) in self.pieces.iter_mut() {
            if color == attacker {
                continue;
            }
            for piece in pieces.iter_mut() {
                let Location::OnPath(step) = piece.location else {
                    continue;
                };
                if coord_at(color, step as usize) == Some(cell) {
                    piece.send_home();
                    info!(captured = %piece.id(), %attacker, %cell, "Piece captured");
                    captured.push(piece.id());
                }
            }
        }

        CaptureOutcome {
            cell: Some(cell),
            safe: false,
            captured,
        }
    }

    fn display_coord_on_path(&self, id: PieceId) -> Option<Coord> {
        match self.location(id)? {
            Location::OnPath(step) => coord_at(id.color, step as usize),
            _ => None,
        }
    }

    /// Overwrite a piece's location without any rule checks.
    ///
    /// Used for relay mirrors and inbound peer events, which are trusted.
    /// Returns the previous location (`AtHome` for an unknown piece, which
    /// is left untouched).
    pub fn set_location(&mut self, id: PieceId, location: Location) -> Location {
        match self.pieces[id.color].get_mut(id.slot as usize) {
            Some(piece) => std::mem::replace(&mut piece.location, location),
            None => Location::AtHome,
        }
    }

    /// Return a piece to its yard. Returns false for an unknown piece.
    pub fn send_home(&mut self, id: PieceId) -> bool {
        match self.pieces[id.color].get_mut(id.slot as usize) {
            Some(piece) => {
                piece.send_home();
                true
            }
            None => false,
        }
    }
}
