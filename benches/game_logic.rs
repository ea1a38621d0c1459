use criterion::{black_box, criterion_group, criterion_main, Criterion};

use blox::core::{resolve_full_rows, try_transform, Grid, PieceCatalog, PieceInstance};
use blox::engine::{GameSession, SessionConfig};
use blox::types::{BlockId, GameCommand, KindId, Vec2};

fn bench_tick(c: &mut Criterion) {
    let mut session =
        GameSession::new(SessionConfig::default(), PieceCatalog::standard()).unwrap();
    session.start().unwrap();

    c.bench_function("session_tick_16ms", |b| {
        b.iter(|| {
            session.tick(black_box(16));
            session.take_events();
        })
    });
}

fn bench_resolve_4_rows(c: &mut Criterion) {
    c.bench_function("resolve_4_rows", |b| {
        b.iter(|| {
            let mut grid = Grid::new(10, 20);
            for y in 0..4 {
                for x in 0..10 {
                    grid.set(
                        x,
                        y,
                        BlockId {
                            piece: 1,
                            cell: 0,
                            kind: KindId(0),
                        },
                    );
                }
            }
            resolve_full_rows(&mut grid, 0, 3)
        })
    });
}

fn bench_try_transform(c: &mut Criterion) {
    let grid = Grid::new(10, 20);
    let catalog = PieceCatalog::standard();
    let template = catalog.template(KindId(0));
    let mut instance = PieceInstance::new(KindId(0), Vec2::new(5.0, 10.0));

    c.bench_function("try_transform_spin", |b| {
        b.iter(|| try_transform(&grid, template, &mut instance, Vec2::ZERO, black_box(90)))
    });
}

fn bench_hard_drop_cycle(c: &mut Criterion) {
    let mut session =
        GameSession::new(SessionConfig::default(), PieceCatalog::standard()).unwrap();
    session.start().unwrap();

    c.bench_function("hard_drop_cycle", |b| {
        b.iter(|| {
            session.command(GameCommand::HardDrop);
            session.tick(0);
            session.take_events();
        })
    });
}

criterion_group!(
    benches,
    bench_tick,
    bench_resolve_4_rows,
    bench_try_transform,
    bench_hard_drop_cycle
);
criterion_main!(benches);
