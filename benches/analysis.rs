use chess_analysis::{all_moves, forks, hanging_pieces, Board, EvaluatePosition, Side, POSITION_EVALUATOR};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const BENCHMARK_FENS: &[(&str, &str)] = &[
    (
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1",
        "starting position",
    ),
    (
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w - - 0 1",
        "middlegame",
    ),
    ("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", "endgame"),
];

fn boards() -> Vec<(Board, &'static str)> {
    BENCHMARK_FENS
        .iter()
        .map(|(fen, name)| (Board::from_fen(fen).unwrap(), *name))
        .collect()
}

pub fn benchmark_all_moves(c: &mut Criterion) {
    let mut group = c.benchmark_group("all_moves");

    for (board, name) in boards() {
        group.bench_function(name, |b| {
            b.iter(|| {
                let white = all_moves(black_box(&board), Side::White);
                let black = all_moves(black_box(&board), Side::Black);
                white.len() + black.len()
            })
        });
    }
    group.finish();
}

pub fn benchmark_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    for (board, name) in boards() {
        group.bench_function(name, |b| {
            b.iter(|| POSITION_EVALUATOR.evaluate(black_box(&board), board.to_move).unwrap())
        });
    }
    group.finish();
}

pub fn benchmark_tactics(c: &mut Criterion) {
    let mut group = c.benchmark_group("tactics");

    for (board, name) in boards() {
        group.bench_function(name, |b| {
            b.iter(|| {
                let side = board.to_move;
                forks(black_box(&board), side).len() + hanging_pieces(black_box(&board), side).len()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_all_moves, benchmark_evaluate, benchmark_tactics);
criterion_main!(benches);
