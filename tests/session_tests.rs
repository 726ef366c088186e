//! Networked sessions talking through an in-process relay.
//!
//! Each seat gets a `GameSession` whose outbound messages land on a
//! channel. `Table::pump` plays the relay: it drains the channels, runs
//! each message through the `RoomRegistry`, and delivers the broadcasts to
//! every seat, the sender included.

mod common;

use std::sync::mpsc::{channel, Receiver};

use common::{init_logging, piece};
use ludo_engine::{
    ClientMessage, Color, GameConfig, GameEvent, GameSession, Location, RemoteEventError,
    RoomRegistry, ServerMessage, TurnError,
};

struct Table {
    registry: RoomRegistry,
    room_id: String,
    seats: Vec<(GameSession, Receiver<ClientMessage>)>,
}

impl Table {
    /// A full room of `count` seats, with join broadcasts delivered.
    fn new(count: usize) -> Self {
        init_logging();
        let mut registry = RoomRegistry::default();
        let room_id = registry.create_room(Some(count)).unwrap();

        let mut broadcasts = Vec::new();
        let mut seats = Vec::new();
        for index in 0..count {
            let (accepted, sent) = registry
                .join(&format!("conn-{index}"), &room_id, &format!("player {index}"))
                .unwrap();
            assert_eq!(accepted.player_index, index);
            broadcasts.extend(sent);

            let (tx, rx) = channel();
            let session =
                GameSession::networked(GameConfig::for_seats(count), &room_id, index, Box::new(tx))
                    .unwrap();
            seats.push((session, rx));
        }

        let mut table = Self {
            registry,
            room_id,
            seats,
        };
        for broadcast in broadcasts {
            table.deliver(&broadcast.message);
        }
        table
    }

    fn session(&mut self, index: usize) -> &mut GameSession {
        &mut self.seats[index].0
    }

    fn deliver(&mut self, message: &ServerMessage) -> Vec<Vec<GameEvent>> {
        self.seats
            .iter_mut()
            .map(|(session, _)| session.on_remote_event(message))
            .collect()
    }

    /// Relay everything the seats have sent. Returns what each seat saw.
    fn pump(&mut self) -> Vec<Vec<GameEvent>> {
        let mut seen = vec![Vec::new(); self.seats.len()];
        loop {
            let outbound: Vec<ClientMessage> = self
                .seats
                .iter()
                .flat_map(|(_, rx)| rx.try_iter().collect::<Vec<_>>())
                .collect();
            if outbound.is_empty() {
                return seen;
            }
            for message in outbound {
                if let Some(broadcast) = self.registry.relay(&message) {
                    for (i, events) in self.deliver(&broadcast.message).into_iter().enumerate() {
                        seen[i].extend(events);
                    }
                }
            }
        }
    }
}

/// The join that fills the room starts everyone's game on red.
#[test]
fn test_game_starts_when_room_fills() {
    let mut table = Table::new(2);

    for index in 0..2 {
        let state = table.session(index).turn_state();
        assert_eq!(state.active_color, Some(Color::Red));
    }
    let room = table.registry.room(&table.room_id).unwrap();
    assert_eq!(room.status(), ludo_engine::RoomStatus::Playing);
}

/// Only the seated color may act, and only on its turn.
#[test]
fn test_only_active_seat_may_roll() {
    let mut table = Table::new(2);

    assert_eq!(
        table.session(1).submit_roll(4),
        Err(TurnError::NotYourTurn {
            color: Color::Blue,
            active: Color::Red
        })
    );
    assert!(table.seats[1].1.try_recv().is_err());
}

/// Red enters and moves; blue's mirror follows and gets the dice.
#[test]
fn test_moves_propagate_to_other_seat() {
    let mut table = Table::new(2);
    let red0 = piece(Color::Red, 0);

    table.session(0).submit_roll(6).unwrap();
    let seen = table.pump();
    // Red skips its own echo; blue sees the roll.
    assert!(seen[0].is_empty());
    assert_eq!(
        seen[1],
        vec![GameEvent::DiceRolled {
            color: Color::Red,
            value: 6
        }]
    );

    table.session(0).select(red0);
    table.session(0).submit_roll(3).unwrap();
    table.pump();

    for index in 0..2 {
        let session = table.session(index);
        assert_eq!(
            session.game().engine().location(red0),
            Some(Location::OnPath(3))
        );
        assert_eq!(session.turn_state().active_color, Some(Color::Blue));
    }
    assert_eq!(
        table.seats[0].0.game().engine(),
        table.seats[1].0.game().engine()
    );

    let room = table.registry.room(&table.room_id).unwrap();
    assert_eq!(room.state().current_player, 1);
    assert_eq!(room.state().dice_value, None);
    let mirrored = &room.state().pieces[&Color::Red][0];
    assert_eq!((mirrored.id.as_str(), mirrored.position), ("red0", 3));
}

/// The relay echoes our own moves back; they are not applied twice.
#[test]
fn test_own_echo_is_skipped() {
    init_logging();
    let mut session = GameSession::networked(
        GameConfig::for_seats(2),
        "room1",
        1,
        Box::new(Vec::<ClientMessage>::new()),
    )
    .unwrap();
    session.on_remote_event(&ServerMessage::GameStart {
        game_state: serde_json::Value::Null,
    });

    let events = session.on_remote_event(&ServerMessage::PieceMoved {
        piece_id: "blue0".into(),
        color: "blue".into(),
        new_position: 14,
        current_player: 1,
    });
    assert!(events.is_empty());
    assert!(session
        .game()
        .engine()
        .piece(piece(Color::Blue, 0))
        .unwrap()
        .is_at_home());

    let events = session.on_remote_event(&ServerMessage::PieceMoved {
        piece_id: "red0".into(),
        color: "red".into(),
        new_position: 3,
        current_player: 0,
    });
    assert_eq!(events.len(), 1);
    assert_eq!(
        session.game().engine().location(piece(Color::Red, 0)),
        Some(Location::OnPath(3))
    );
}

/// A seat whose own piece is placed directly can capture and announce it.
#[test]
fn test_capture_is_announced_in_order() {
    init_logging();
    let (tx, rx) = channel();
    let mut session =
        GameSession::networked(GameConfig::for_seats(2), "room1", 0, Box::new(tx)).unwrap();
    session.on_remote_event(&ServerMessage::GameStart {
        game_state: serde_json::Value::Null,
    });
    // Blue at its step 16, which is red step 3.
    session.on_remote_event(&ServerMessage::PieceMoved {
        piece_id: "blue2".into(),
        color: "blue".into(),
        new_position: 16,
        current_player: 1,
    });

    session.submit_roll(6).unwrap();
    session.select(piece(Color::Red, 0));
    let events = session.submit_roll(3).unwrap();

    assert!(events.contains(&GameEvent::PieceCaptured {
        piece: piece(Color::Blue, 2),
        by: Color::Red,
        home: ludo_engine::board::home_slot(piece(Color::Blue, 2)).unwrap(),
    }));
    let sent: Vec<_> = rx.try_iter().map(|m| m.event_name()).collect();
    assert_eq!(
        sent,
        vec!["rollDice", "movePiece", "rollDice", "movePiece", "pieceCaptured"]
    );
    // Capture grants another roll, so the turn stays with red.
    assert_eq!(session.turn_state().active_color, Some(Color::Red));
}

/// Garbage from the relay ends the turn locally instead of failing.
#[test]
fn test_malformed_remote_event_ends_turn() {
    let mut table = Table::new(2);

    let events = table.session(1).on_remote_event(&ServerMessage::PieceMoved {
        piece_id: "red0".into(),
        color: "red".into(),
        new_position: 99,
        current_player: 0,
    });
    assert_eq!(
        events,
        vec![
            GameEvent::RemoteEventDiscarded {
                reason: RemoteEventError::PositionOutOfRange(99)
            },
            GameEvent::TurnEnded {
                from: Color::Red,
                next: Color::Blue,
                next_index: 1
            },
        ]
    );

    let events = table.session(0).on_remote_json("{\"event\":\"pieceMoved\"");
    assert!(matches!(
        events.first(),
        Some(GameEvent::RemoteEventDiscarded {
            reason: RemoteEventError::Decode(_)
        })
    ));
}

/// After a disconnect nobody on that side can act.
#[test]
fn test_disconnect_halts_session() {
    let mut table = Table::new(2);
    table.session(0).disconnect();
    assert_eq!(table.session(0).roll_dice(), Err(TurnError::NotRunning));
    assert_eq!(table.session(0).turn_state().active_color, None);
}

/// Peer turn traffic does not revive a halted seat.
#[test]
fn test_disconnected_seat_stays_halted() {
    let mut table = Table::new(2);
    table.session(0).disconnect();

    let events = table.deliver(&ServerMessage::TurnEnded {
        next_player_index: 0,
    });
    assert!(events[0].is_empty());
    let events = table.deliver(&ServerMessage::DiceRolled {
        dice_value: 4,
        player_index: 1,
    });
    assert!(events[0].is_empty());

    assert_eq!(table.session(0).turn_state().active_color, None);
    assert_eq!(table.session(0).roll_dice(), Err(TurnError::NotRunning));
    assert_eq!(table.session(0).submit_roll(2), Err(TurnError::NotRunning));
    assert!(table.seats[0].1.try_recv().is_err());
}

/// Before the room fills, relayed turn changes only note the seat.
#[test]
fn test_turn_traffic_before_game_start_keeps_seat_idle() {
    init_logging();
    let (tx, rx) = channel();
    let mut session =
        GameSession::networked(GameConfig::for_seats(2), "room1", 0, Box::new(tx)).unwrap();

    let events = session.on_remote_event(&ServerMessage::TurnEnded {
        next_player_index: 0,
    });
    assert!(events.is_empty());
    assert_eq!(session.turn_state().active_color, None);
    assert_eq!(session.roll_dice(), Err(TurnError::NotRunning));
    assert!(rx.try_recv().is_err());

    session.on_remote_event(&ServerMessage::GameStart {
        game_state: serde_json::Value::Null,
    });
    assert_eq!(session.turn_state().active_color, Some(Color::Red));
}

/// A local session ignores relay traffic entirely.
#[test]
fn test_local_session_ignores_relay() {
    let mut session = GameSession::local(GameConfig::new()).unwrap();
    let events = session.on_remote_event(&ServerMessage::TurnEnded {
        next_player_index: 2,
    });
    assert!(events.is_empty());
    assert_eq!(session.turn_state().active_color, Some(Color::Red));
}
