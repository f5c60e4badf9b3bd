use criterion::{black_box, criterion_group, criterion_main, Criterion};
use blockfall::game::test_helpers::{empty_board, fill_row};
use blockfall::{Game, ROWS};

fn bench_tick(c: &mut Criterion) {
    let mut game = Game::with_seed(12345);

    c.bench_function("game_tick", |b| {
        b.iter(|| {
            if game.is_game_over() {
                game.start();
            }
            game.tick();
            black_box(game.take_events());
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    c.bench_function("clear_4_lines", |b| {
        b.iter(|| {
            let mut board = empty_board();
            for row in (ROWS - 4)..ROWS {
                fill_row(&mut board, row);
            }
            black_box(board.clear_completed_lines());
        })
    });
}

fn bench_hard_drop(c: &mut Criterion) {
    let mut game = Game::with_seed(12345);

    c.bench_function("hard_drop", |b| {
        b.iter(|| {
            if game.is_game_over() {
                game.start();
            }
            game.hard_drop();
            black_box(game.take_events());
        })
    });
}

fn bench_move_and_rotate(c: &mut Criterion) {
    let mut game = Game::with_seed(12345);

    c.bench_function("move_and_rotate", |b| {
        b.iter(|| {
            game.move_right();
            game.rotate();
            game.move_left();
            black_box(game.take_events());
        })
    });
}

criterion_group!(
    benches,
    bench_tick,
    bench_line_clear,
    bench_hard_drop,
    bench_move_and_rotate
);
criterion_main!(benches);
