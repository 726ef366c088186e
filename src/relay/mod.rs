//! The relay: rooms, seats, and message echo.
//!
//! This is the in-process model of the multiplayer server. It seats
//! players, keeps a mirror of what they report, and tells the caller which
//! broadcasts to deliver. Sockets and HTTP stay outside.

pub mod registry;
pub mod room;

pub use registry::{Broadcast, Dispatch, JoinAccepted, RoomInfo, RoomRegistry};
pub use room::{GameRoom, RoomState, RoomStatus, SeatedPlayer};
