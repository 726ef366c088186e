//! The turn state machine.
//!
//! ```text
//!            roll (no legal move) ─────────────────────┐
//!            ┌─────────────────────┐                   ▼
//! AwaitingRoll(c) ──roll──▶ AwaitingMove(c, r) ──select──▶ AwaitingRoll(next or c)
//!            ▲                                     (auto when one piece is legal)
//!   start ───┘        halt ──▶ TurnOver
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::core::{is_die_face, Color, PieceId, TurnState, COLOR_COUNT};
use crate::error::{ConfigError, TurnError};
use crate::rules::{AppliedMove, LegalMoves, RulesEngine};

/// Seated colors in rotation order.
pub type TurnOrder = SmallVec<[Color; COLOR_COUNT]>;

/// Where the turn machine is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum TurnPhase {
    /// `color` must roll.
    AwaitingRoll { color: Color },
    /// `color` rolled `roll` and must pick a piece.
    AwaitingMove { color: Color, roll: u8 },
    /// Nobody may act: before the game starts or after it is halted.
    TurnOver,
}

/// What a roll led to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RollResolution {
    /// Nothing could move; the turn passed to `next`.
    NoLegalMove { next: Color },
    /// More than one piece may move; waiting for `select`.
    AwaitingSelection(LegalMoves),
    /// Exactly one piece could move and was moved.
    AutoMoved(AppliedMove),
}

/// Sequences turns over a fixed list of active colors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnController {
    order: TurnOrder,
    current: usize,
    phase: TurnPhase,
    turn: u32,
    selected: Option<PieceId>,
}

impl TurnController {
    /// A controller with the first color to roll.
    pub fn new(order: &[Color]) -> Result<Self, ConfigError> {
        let mut controller = Self::idle(order)?;
        controller.start();
        Ok(controller)
    }

    /// A controller in `TurnOver`, waiting for `start`.
    pub fn idle(order: &[Color]) -> Result<Self, ConfigError> {
        if order.is_empty() {
            return Err(ConfigError::NoActiveColors);
        }
        Ok(Self {
            order: order.iter().copied().collect(),
            current: 0,
            phase: TurnPhase::TurnOver,
            turn: 0,
            selected: None,
        })
    }

    /// Rebuild a controller from a saved turn state.
    ///
    /// Returns `None` if the state does not fit `order`.
    #[must_use]
    pub fn restore(order: &[Color], state: &TurnState, turn: u32) -> Option<Self> {
        let color = *order.get(state.current_player)?;
        let phase = match (state.active_color, state.pending_roll) {
            (None, _) => TurnPhase::TurnOver,
            (Some(active), _) if active != color => return None,
            (Some(_), None) => TurnPhase::AwaitingRoll { color },
            (Some(_), Some(roll)) if is_die_face(roll) => TurnPhase::AwaitingMove { color, roll },
            (Some(_), Some(_)) => return None,
        };
        Some(Self {
            order: order.iter().copied().collect(),
            current: state.current_player,
            phase,
            turn,
            selected: state.selected_piece,
        })
    }

    // === Queries ===

    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    #[must_use]
    pub fn order(&self) -> &[Color] {
        &self.order
    }

    /// Index of the current color in the rotation.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Color at the current index, whether or not a turn is running.
    #[must_use]
    pub fn current_color(&self) -> Color {
        self.order[self.current]
    }

    /// Color allowed to act, if any.
    #[must_use]
    pub fn active_color(&self) -> Option<Color> {
        match self.phase {
            TurnPhase::AwaitingRoll { color } | TurnPhase::AwaitingMove { color, .. } => {
                Some(color)
            }
            TurnPhase::TurnOver => None,
        }
    }

    #[must_use]
    pub fn pending_roll(&self) -> Option<u8> {
        match self.phase {
            TurnPhase::AwaitingMove { roll, .. } => Some(roll),
            _ => None,
        }
    }

    /// Turn counter, starting at 1 once the game starts.
    #[must_use]
    pub fn turn_number(&self) -> u32 {
        self.turn
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.phase != TurnPhase::TurnOver
    }

    /// Position of `color` in the rotation.
    #[must_use]
    pub fn seat_of(&self, color: Color) -> Option<usize> {
        self.order.iter().position(|&c| c == color)
    }

    /// Flat view of the turn.
    #[must_use]
    pub fn turn_state(&self) -> TurnState {
        TurnState {
            current_player: self.current,
            active_color: self.active_color(),
            pending_roll: self.pending_roll(),
            can_move: matches!(self.phase, TurnPhase::AwaitingMove { .. }),
            selected_piece: self.selected,
        }
    }

    // === Transitions ===

    /// Let the current color roll. No effect if a turn is already running.
    pub fn start(&mut self) {
        if self.phase == TurnPhase::TurnOver {
            self.begin_turn(self.current);
        }
    }

    /// Stop accepting input until `start` is called again.
    pub fn halt(&mut self) {
        self.phase = TurnPhase::TurnOver;
    }

    /// Consume a die value for the active color.
    pub fn roll(&mut self, engine: &mut RulesEngine, value: u8) -> Result<RollResolution, TurnError> {
        let color = match self.phase {
            TurnPhase::AwaitingRoll { color } => color,
            TurnPhase::AwaitingMove { roll, .. } => return Err(TurnError::RollPending(roll)),
            TurnPhase::TurnOver => return Err(TurnError::NotRunning),
        };
        if !is_die_face(value) {
            return Err(TurnError::InvalidRoll(value));
        }

        let legal = engine.legal_moves(color, value);
        debug!(%color, roll = value, legal = legal.len(), "Dice rolled");

        match legal.as_slice() {
            [] => {
                let next = self.advance();
                Ok(RollResolution::NoLegalMove { next })
            }
            [only] => {
                let only = *only;
                self.phase = TurnPhase::AwaitingMove { color, roll: value };
                self.select(engine, only).map(RollResolution::AutoMoved)
            }
            _ => {
                self.phase = TurnPhase::AwaitingMove { color, roll: value };
                Ok(RollResolution::AwaitingSelection(legal))
            }
        }
    }

    /// Move `piece` by the pending roll.
    ///
    /// A rejected selection keeps the roll pending.
    pub fn select(&mut self, engine: &mut RulesEngine, piece: PieceId) -> Result<AppliedMove, TurnError> {
        let (color, roll) = match self.phase {
            TurnPhase::AwaitingMove { color, roll } => (color, roll),
            TurnPhase::AwaitingRoll { .. } => return Err(TurnError::NoPendingRoll),
            TurnPhase::TurnOver => return Err(TurnError::NotRunning),
        };
        if piece.color != color {
            debug!(%piece, active = %color, "Selection rejected");
            return Err(TurnError::NotYourTurn {
                color: piece.color,
                active: color,
            });
        }

        let applied = engine.apply_move(color, piece, roll)?;
        self.selected = Some(piece);
        if applied.continuation.is_extra_turn() {
            self.phase = TurnPhase::AwaitingRoll { color };
        } else {
            self.advance();
        }
        Ok(applied)
    }

    /// Pass the turn to the next color in the rotation.
    pub fn advance(&mut self) -> Color {
        let next = (self.current + 1) % self.order.len();
        self.begin_turn(next);
        self.current_color()
    }

    /// Jump to the seat at `index`, as a peer's end-of-turn reports.
    ///
    /// Returns `None` for an index outside the rotation. Jumping to the
    /// seat that is already waiting to roll is a no-op. While stopped only
    /// the index moves; the controller stays in `TurnOver`.
    pub fn jump_to(&mut self, index: usize) -> Option<Color> {
        let color = *self.order.get(index)?;
        if !self.is_running() {
            self.current = index;
        } else if self.phase != (TurnPhase::AwaitingRoll { color }) || self.current != index {
            self.begin_turn(index);
        }
        Some(color)
    }

    /// Record a peer's roll: the seat at `index` now holds `value`.
    ///
    /// No legality check runs; the peer decides what to do with it. While
    /// stopped only the index moves.
    pub fn observe_roll(&mut self, index: usize, value: u8) -> Option<Color> {
        let color = *self.order.get(index)?;
        if !self.is_running() {
            self.current = index;
            return Some(color);
        }
        if self.current != index {
            self.begin_turn(index);
        }
        self.phase = TurnPhase::AwaitingMove { color, roll: value };
        Some(color)
    }

    fn begin_turn(&mut self, index: usize) {
        self.current = index;
        self.turn += 1;
        self.selected = None;
        self.phase = TurnPhase::AwaitingRoll {
            color: self.order[index],
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Location;
    use crate::error::MoveRejection;

    fn four() -> TurnController {
        TurnController::new(&Color::ALL).unwrap()
    }

    #[test]
    fn test_starts_with_first_color() {
        let turns = four();
        assert_eq!(turns.phase(), TurnPhase::AwaitingRoll { color: Color::Red });
        assert_eq!(turns.turn_number(), 1);
        assert!(TurnController::new(&[]).is_err());
    }

    #[test]
    fn test_idle_rejects_input() {
        let mut engine = RulesEngine::new();
        let mut turns = TurnController::idle(&Color::ALL).unwrap();
        assert_eq!(turns.roll(&mut engine, 6), Err(TurnError::NotRunning));
        assert_eq!(
            turns.select(&mut engine, PieceId::new(Color::Red, 0)),
            Err(TurnError::NotRunning)
        );
        turns.start();
        assert_eq!(turns.active_color(), Some(Color::Red));
    }

    #[test]
    fn test_no_legal_move_advances() {
        let mut engine = RulesEngine::new();
        let mut turns = four();

        let result = turns.roll(&mut engine, 4).unwrap();

        assert_eq!(result, RollResolution::NoLegalMove { next: Color::Blue });
        assert_eq!(turns.phase(), TurnPhase::AwaitingRoll { color: Color::Blue });
        assert_eq!(turns.pending_roll(), None);
    }

    #[test]
    fn test_six_with_four_home_pieces_awaits_selection() {
        let mut engine = RulesEngine::new();
        let mut turns = four();

        let result = turns.roll(&mut engine, 6).unwrap();

        assert!(matches!(result, RollResolution::AwaitingSelection(ref legal) if legal.len() == 4));
        assert_eq!(
            turns.phase(),
            TurnPhase::AwaitingMove {
                color: Color::Red,
                roll: 6
            }
        );
        assert!(turns.turn_state().can_move);
        assert_eq!(turns.roll(&mut engine, 3), Err(TurnError::RollPending(6)));
    }

    #[test]
    fn test_single_legal_piece_is_auto_moved() {
        let mut engine = RulesEngine::new();
        engine.set_location(PieceId::new(Color::Red, 2), Location::OnPath(5));
        let mut turns = four();

        let result = turns.roll(&mut engine, 2).unwrap();

        let RollResolution::AutoMoved(applied) = result else {
            panic!("expected auto move, got {result:?}");
        };
        assert_eq!(applied.piece, PieceId::new(Color::Red, 2));
        assert_eq!(applied.to, Location::OnPath(7));
        assert_eq!(turns.active_color(), Some(Color::Blue));
    }

    #[test]
    fn test_wrong_color_selection_keeps_roll() {
        let mut engine = RulesEngine::new();
        let mut turns = four();
        turns.roll(&mut engine, 6).unwrap();

        let err = turns.select(&mut engine, PieceId::new(Color::Blue, 0));
        assert_eq!(
            err,
            Err(TurnError::NotYourTurn {
                color: Color::Blue,
                active: Color::Red
            })
        );
        assert_eq!(turns.pending_roll(), Some(6));
    }

    #[test]
    fn test_illegal_selection_keeps_roll() {
        let mut engine = RulesEngine::new();
        engine.set_location(PieceId::new(Color::Red, 0), Location::OnPath(3));
        engine.set_location(PieceId::new(Color::Red, 1), Location::OnPath(54));
        let mut turns = four();
        turns.roll(&mut engine, 1).unwrap();

        // Both are legal for a 1; a home piece is not.
        let err = turns.select(&mut engine, PieceId::new(Color::Red, 2));
        assert!(matches!(err, Err(TurnError::Move(MoveRejection::NeedsSix { .. }))));
        assert_eq!(turns.pending_roll(), Some(1));
    }

    #[test]
    fn test_select_without_roll() {
        let mut engine = RulesEngine::new();
        let mut turns = four();
        assert_eq!(
            turns.select(&mut engine, PieceId::new(Color::Red, 0)),
            Err(TurnError::NoPendingRoll)
        );
    }

    #[test]
    fn test_rotation_wraps_over_seated_colors() {
        let mut turns = TurnController::new(&[Color::Red, Color::Blue]).unwrap();
        assert_eq!(turns.advance(), Color::Blue);
        assert_eq!(turns.advance(), Color::Red);
        assert_eq!(turns.turn_number(), 3);
    }

    #[test]
    fn test_jump_and_observe() {
        let mut turns = four();
        assert_eq!(turns.jump_to(2), Some(Color::Green));
        let turn = turns.turn_number();
        assert_eq!(turns.jump_to(2), Some(Color::Green));
        assert_eq!(turns.turn_number(), turn);
        assert_eq!(turns.jump_to(4), None);

        assert_eq!(turns.observe_roll(3, 5), Some(Color::Yellow));
        assert_eq!(turns.pending_roll(), Some(5));
        assert_eq!(turns.turn_state().current_player, 3);
    }

    #[test]
    fn test_peer_turns_do_not_restart_a_stopped_controller() {
        let mut turns = TurnController::idle(&Color::ALL).unwrap();
        assert_eq!(turns.jump_to(2), Some(Color::Green));
        assert_eq!(turns.observe_roll(1, 4), Some(Color::Blue));
        assert_eq!(turns.phase(), TurnPhase::TurnOver);
        assert_eq!(turns.current_index(), 1);
        assert_eq!(turns.turn_number(), 0);

        // Started later, the seat the peers last named rolls first.
        turns.start();
        assert_eq!(turns.active_color(), Some(Color::Blue));

        turns.halt();
        turns.jump_to(3);
        assert!(!turns.is_running());
        assert_eq!(turns.current_color(), Color::Yellow);
    }

    #[test]
    fn test_restore_from_turn_state() {
        let mut engine = RulesEngine::new();
        let mut turns = four();
        turns.roll(&mut engine, 6).unwrap();

        let restored =
            TurnController::restore(&Color::ALL, &turns.turn_state(), turns.turn_number()).unwrap();
        assert_eq!(restored.phase(), turns.phase());

        let mut bad = turns.turn_state();
        bad.current_player = 9;
        assert!(TurnController::restore(&Color::ALL, &bad, 1).is_none());
    }

    #[test]
    fn test_halt() {
        let mut turns = four();
        turns.halt();
        assert!(!turns.is_running());
        assert_eq!(turns.turn_state().active_color, None);
    }
}
