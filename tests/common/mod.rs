//! Shared helpers for integration tests.

#![allow(dead_code)]

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

use ludo_engine::{Color, Location, PieceId, RulesEngine};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Install a test subscriber once per test binary.
///
/// Level comes from `TEST_LOG`, then `RUST_LOG`, then defaults to `warn`.
pub fn init_logging() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

pub fn piece(color: Color, slot: u8) -> PieceId {
    PieceId::new(color, slot)
}

/// An engine with the given pieces placed, everything else at home.
pub fn engine_with(placements: &[(PieceId, Location)]) -> RulesEngine {
    let mut engine = RulesEngine::new();
    for &(id, location) in placements {
        engine.set_location(id, location);
    }
    engine
}
