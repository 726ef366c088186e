//! # ludo-engine
//!
//! A four-player Ludo rules engine, playable on one device or across a
//! relay that echoes each client's actions to the others.
//!
//! ## Design Principles
//!
//! 1. **One Engine, Two Sessions**: Local and networked play drive the same
//!    `RulesEngine` and `TurnController`. Only the `SessionAdapter` differs.
//!
//! 2. **Rejections Are Values**: Illegal moves, stale selections and
//!    malformed peer data come back as typed errors or events and leave the
//!    game untouched. Nothing here panics on bad input.
//!
//! 3. **Events, Not Timers**: Every input returns the ordered list of
//!    things it caused. Presentation decides how long to show them.
//!
//! ## Modules
//!
//! - `core`: Colors, coordinates, pieces, dice, configuration, actions
//! - `board`: Path geometry, safe squares, home yards
//! - `rules`: Legal moves, move application, capture, extra turns
//! - `turn`: The turn state machine
//! - `session`: Game sessions, local and networked strategies, events
//! - `protocol`: Relay wire messages
//! - `relay`: Room registry and blind message echo
//!
//! ## Example
//!
//! ```
//! use ludo_engine::{Color, GameConfig, GameSession, PieceId};
//!
//! let mut session = GameSession::local(GameConfig::new()).unwrap();
//! session.submit_roll(6).unwrap();
//! session.select(PieceId::new(Color::Red, 0));
//!
//! assert_eq!(
//!     session.display_coord(PieceId::new(Color::Red, 0)),
//!     Some(ludo_engine::Coord::new(1, 8))
//! );
//! ```

pub mod board;
pub mod core;
pub mod error;
pub mod protocol;
pub mod relay;
pub mod rules;
pub mod session;
pub mod turn;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionRecord, Color, ColorMap, Coord, DiceRng, DiceRngState, GameConfig, Location,
    Piece, PieceId, RelayConfig, TurnState,
};

pub use crate::board::{coord_at, is_safe, path_for, CellKind, FINISH_STEP, PATH_LEN};

pub use crate::rules::{
    AppliedMove, CaptureOutcome, Continuation, ExtraTurnReason, LegalMoves, MoveKind, RulesEngine,
};

pub use crate::turn::{RollResolution, TurnController, TurnPhase};

pub use crate::session::{
    Game, GameEvent, GameSession, GameSnapshot, LocalAdapter, NetworkedAdapter, RelayTransport,
    SessionAdapter,
};

pub use crate::protocol::{ClientMessage, RemoteEvent, ServerMessage};

pub use crate::relay::{Broadcast, RoomRegistry, RoomStatus};

pub use crate::error::{
    ConfigError, MoveRejection, RelayError, RemoteEventError, SnapshotError, TurnError,
};
