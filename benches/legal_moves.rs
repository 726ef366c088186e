//! Benchmarks for move generation and application.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ludo_engine::{Color, GameConfig, GameSession, Location, PieceId, RulesEngine};

/// Every piece spread along its path, one quarter apart.
fn crowded_board() -> RulesEngine {
    let mut engine = RulesEngine::new();
    for color in Color::ALL {
        for id in PieceId::all_of(color) {
            let step = u8::from(id.slot) * 13 + color.index() as u8;
            engine.set_location(id, Location::OnPath(step));
        }
    }
    engine
}

fn bench_legal_moves(c: &mut Criterion) {
    let mut group = c.benchmark_group("legal_moves");
    let boards = [("home", RulesEngine::new()), ("crowded", crowded_board())];

    for (name, engine) in &boards {
        for roll in [1u8, 6] {
            group.bench_with_input(BenchmarkId::new(*name, roll), &roll, |b, &roll| {
                b.iter(|| engine.legal_moves(black_box(Color::Blue), black_box(roll)))
            });
        }
    }

    group.finish();
}

fn bench_apply_move(c: &mut Criterion) {
    let engine = crowded_board();
    let mover = PieceId::new(Color::Blue, 0);

    c.bench_function("apply_move_with_capture_scan", |b| {
        b.iter(|| {
            let mut trial = engine.clone();
            trial.apply_move(Color::Blue, black_box(mover), black_box(5))
        })
    });
}

fn bench_local_game(c: &mut Criterion) {
    c.bench_function("local_game_200_rolls", |b| {
        b.iter(|| {
            let mut session = GameSession::local(GameConfig::new().with_seed(7)).ok()?;
            for _ in 0..200 {
                let legal = session.selectable();
                match legal.first() {
                    Some(&piece) => {
                        session.select(piece);
                    }
                    None => {
                        session.roll_dice().ok()?;
                    }
                }
            }
            Some(session.history().len())
        })
    });
}

criterion_group!(benches, bench_legal_moves, bench_apply_move, bench_local_game);
criterion_main!(benches);
