//! Micro-benchmarks for the per-iteration hot path.
//!
//! The decision loop runs extraction, scoring, and planning on every
//! captured frame, so these paths bound the playable frame rate.

use block_pilot::board::{BoardExtractor, ColorClassifier, Grid};
use block_pilot::capture::Frame;
use block_pilot::decide::Planner;
use block_pilot::score::{BoardScorer, ClusterScorer, StackFeatures, StrategyKind};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

const ROWS: usize = 12;
const COLS: usize = 6;

/// Board with mixed groups of several colors.
fn busy_grid() -> Grid {
    let mut grid = Grid::new(ROWS, COLS);
    for row in 0..ROWS {
        for col in 0..COLS {
            grid.set(row, col, ((row * 7 + col * 13) % 5) as u32);
        }
    }
    grid
}

/// Frame that samples back into `busy_grid`, at 8x8 pixels per cell.
fn busy_frame() -> Frame {
    let grid = busy_grid();
    let mut frame = Frame::filled((COLS * 8) as u32, (ROWS * 8) as u32, (0, 0, 0), 1);
    for row in 0..ROWS {
        for col in 0..COLS {
            let id = grid.at(row, col) as u8;
            frame.set_pixel(
                (col * 8 + 4) as u32,
                (row * 8 + 4) as u32,
                (50 * id, 30 * id, 20 * id),
            );
        }
    }
    frame
}

fn bench_extract(c: &mut Criterion) {
    let frame = busy_frame();
    let extractor = BoardExtractor::new(ROWS, COLS);

    c.bench_function("board.extract.12x6", |b| {
        b.iter_batched(
            // Pre-warm the classifier so the steady state is measured,
            // not first-seen registration
            || {
                let mut classifier = ColorClassifier::new();
                extractor.extract(&frame, &mut classifier);
                classifier
            },
            |mut classifier| {
                black_box(extractor.extract(&frame, &mut classifier));
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_scorers(c: &mut Criterion) {
    let grid = busy_grid();

    c.bench_function("score.clusters.12x6", |b| {
        let scorer = ClusterScorer::new();
        b.iter(|| black_box(scorer.score(black_box(&grid))));
    });

    c.bench_function("score.stack_features.12x6", |b| {
        b.iter(|| black_box(StackFeatures::measure(black_box(&grid))));
    });
}

fn bench_plan(c: &mut Criterion) {
    let grid = busy_grid();
    let planner = Planner::new(StrategyKind::Clusters.build());

    c.bench_function("decide.plan.12x6", |b| {
        b.iter(|| black_box(planner.plan(black_box(&grid))));
    });
}

criterion_group!(core_benches, bench_extract, bench_scorers, bench_plan);
criterion_main!(core_benches);
