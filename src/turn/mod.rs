//! Turn sequencing: whose turn it is and which input they may give.

pub mod controller;

pub use controller::{RollResolution, TurnController, TurnOrder, TurnPhase};
