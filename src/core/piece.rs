//! Pieces: identity, location, and fixed home slot.
//!
//! Each color owns four pieces, identified by `(color, slot)` and written
//! on the wire as `"red0"`..`"yellow3"`.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::color::Color;
use super::coord::Coord;
use crate::board::FINISH_STEP;
use crate::error::ParsePieceIdError;

/// Pieces owned by each color.
pub const PIECES_PER_COLOR: usize = 4;

/// Wire position for a piece sitting in its home yard.
pub const WIRE_HOME: i32 = -1;

/// Wire position for a finished piece.
pub const FINISH_WIRE: i32 = FINISH_STEP as i32;

/// Piece identity: owning color plus slot 0-3.
///
/// Serializes as its wire string, e.g. `"red0"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PieceId {
    pub color: Color,
    pub slot: u8,
}

impl PieceId {
    #[must_use]
    pub const fn new(color: Color, slot: u8) -> Self {
        Self { color, slot }
    }

    /// All piece ids of a color, slot order.
    pub fn all_of(color: Color) -> impl Iterator<Item = PieceId> {
        (0..PIECES_PER_COLOR as u8).map(move |slot| PieceId::new(color, slot))
    }

    /// Whether the slot refers to an existing piece.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        (self.slot as usize) < PIECES_PER_COLOR
    }
}

impl std::fmt::Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.color, self.slot)
    }
}

impl FromStr for PieceId {
    type Err = ParsePieceIdError;

    /// Parse the wire form, e.g. `"green2"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let split = s
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| ParsePieceIdError(s.to_string()))?;
        let (color, slot) = s.split_at(split);
        let color: Color = color.parse().map_err(|_| ParsePieceIdError(s.to_string()))?;
        let slot: u8 = slot.parse().map_err(|_| ParsePieceIdError(s.to_string()))?;
        let id = PieceId::new(color, slot);
        if id.is_valid() {
            Ok(id)
        } else {
            Err(ParsePieceIdError(s.to_string()))
        }
    }
}

impl From<PieceId> for String {
    fn from(id: PieceId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for PieceId {
    type Error = ParsePieceIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Where a piece currently is. Exactly one variant holds at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "step", rename_all = "snake_case")]
pub enum Location {
    /// In the home yard, waiting for a six.
    #[default]
    AtHome,
    /// On the color's path at a step offset (0 = entry square).
    OnPath(u8),
    /// Reached the goal. Terminal.
    Finished,
}

impl Location {
    #[must_use]
    pub const fn step(self) -> Option<u8> {
        match self {
            Location::OnPath(step) => Some(step),
            _ => None,
        }
    }

    /// Encode as a relay position: -1 home, path step, or the finish step.
    #[must_use]
    pub const fn to_wire(self) -> i32 {
        match self {
            Location::AtHome => WIRE_HOME,
            Location::OnPath(step) => step as i32,
            Location::Finished => FINISH_WIRE,
        }
    }

    /// Decode a relay position. Returns `None` outside `-1..=FINISH_STEP`.
    #[must_use]
    pub const fn from_wire(position: i32) -> Option<Location> {
        if position == WIRE_HOME {
            Some(Location::AtHome)
        } else if position == FINISH_STEP as i32 {
            Some(Location::Finished)
        } else if position >= 0 && position < FINISH_STEP as i32 {
            Some(Location::OnPath(position as u8))
        } else {
            None
        }
    }
}

/// A piece with its mutable location and immutable home slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    id: PieceId,
    home: Coord,
    pub location: Location,
}

impl Piece {
    /// Create a piece in its home yard.
    #[must_use]
    pub const fn new(id: PieceId, home: Coord) -> Self {
        Self {
            id,
            home,
            location: Location::AtHome,
        }
    }

    #[must_use]
    pub const fn id(&self) -> PieceId {
        self.id
    }

    #[must_use]
    pub const fn color(&self) -> Color {
        self.id.color
    }

    /// Home-yard cell this piece returns to after capture.
    #[must_use]
    pub const fn home(&self) -> Coord {
        self.home
    }

    #[must_use]
    pub const fn is_at_home(&self) -> bool {
        matches!(self.location, Location::AtHome)
    }

    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(self.location, Location::Finished)
    }

    /// Reset to the pre-game state.
    pub fn send_home(&mut self) {
        self.location = Location::AtHome;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_id_display_and_parse() {
        let id = PieceId::new(Color::Green, 2);
        assert_eq!(id.to_string(), "green2");
        assert_eq!("green2".parse::<PieceId>().unwrap(), id);
    }

    #[test]
    fn test_piece_id_serializes_as_wire_string() {
        let id = PieceId::new(Color::Yellow, 3);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"yellow3\"");
        assert!(serde_json::from_str::<PieceId>("\"yellow7\"").is_err());
    }

    #[test]
    fn test_piece_id_parse_rejects_garbage() {
        assert!("green".parse::<PieceId>().is_err());
        assert!("green4".parse::<PieceId>().is_err());
        assert!("pink0".parse::<PieceId>().is_err());
        assert!("0red".parse::<PieceId>().is_err());
        assert!("".parse::<PieceId>().is_err());
    }

    #[test]
    fn test_all_of_yields_four_slots() {
        let ids: Vec<_> = PieceId::all_of(Color::Blue).collect();
        assert_eq!(ids.len(), PIECES_PER_COLOR);
        assert!(ids.iter().all(|id| id.color == Color::Blue && id.is_valid()));
    }

    #[test]
    fn test_location_wire_encoding() {
        assert_eq!(Location::AtHome.to_wire(), -1);
        assert_eq!(Location::OnPath(12).to_wire(), 12);
        assert_eq!(Location::Finished.to_wire(), FINISH_STEP as i32);

        assert_eq!(Location::from_wire(-1), Some(Location::AtHome));
        assert_eq!(Location::from_wire(0), Some(Location::OnPath(0)));
        assert_eq!(Location::from_wire(55), Some(Location::OnPath(55)));
        assert_eq!(Location::from_wire(56), Some(Location::Finished));
        assert_eq!(Location::from_wire(57), None);
        assert_eq!(Location::from_wire(-2), None);
    }

    #[test]
    fn test_send_home_restores_initial_state() {
        let fresh = Piece::new(PieceId::new(Color::Red, 1), Coord::new(1, 13));
        let mut piece = fresh;
        piece.location = Location::OnPath(30);
        piece.send_home();
        assert_eq!(piece, fresh);
    }
}
