//! Game rules over the board geometry.
//!
//! `RulesEngine` answers which pieces may move and applies moves,
//! including captures and the extra-turn decision. It never tracks whose
//! turn it is; see [`crate::turn`] for that.

pub mod engine;
pub mod outcome;

pub use engine::{LegalMoves, RulesEngine};
pub use outcome::{
    AppliedMove, CaptureOutcome, Captured, Continuation, ExtraTurnReason, MoveKind,
};
