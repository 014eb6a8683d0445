// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for a full pointer-driven drag through `understory_drag_drop`.

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Point;

use understory_drag_drop::{Board, DragSession, Geometry, Offset, Surface};

/// Nodes are dense indices into `rects`; clones are appended.
struct Layout {
    rects: Vec<(Offset, f64, f64)>,
}

impl Geometry for Layout {
    type Node = usize;

    fn offset(&self, node: usize) -> Offset {
        self.rects[node].0
    }

    fn width(&self, node: usize) -> f64 {
        self.rects[node].1
    }

    fn height(&self, node: usize) -> f64 {
        self.rects[node].2
    }
}

impl Surface for Layout {
    fn clone_node(&mut self, node: usize) -> usize {
        self.rects.push(self.rects[node]);
        self.rects.len() - 1
    }

    fn append_to_root(&mut self, _node: usize) {}

    fn remove_node(&mut self, _node: usize) {}

    fn set_absolute_position(&mut self, node: usize, offset: Offset) {
        self.rects[node].0 = offset;
    }

    fn set_opacity(&mut self, _node: usize, _opacity: f64) {}
}

/// One 20×20 card and a row of `zones` 40×40 drop zones, all observing it.
fn setup(zones: usize) -> (Layout, Board<usize>) {
    let mut layout = Layout {
        rects: vec![(Offset::new(0.0, 0.0), 20.0, 20.0)],
    };
    let mut board = Board::new();
    let card = board.add_source(0);
    for i in 0..zones {
        layout
            .rects
            .push((Offset::new(i as f64 * 50.0, 100.0), 40.0, 40.0));
        let zone = board.add_target(i + 1);
        board.listen(zone, card);
    }
    (layout, board)
}

fn bench_drag_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("drag_cycle");
    for &zones in &[4_usize, 64, 512] {
        let span = zones as f64 * 50.0;
        group.bench_function(BenchmarkId::new("sweep_and_drop", zones), |b| {
            b.iter_batched(
                || setup(zones),
                |(mut layout, mut board)| {
                    let mut session = DragSession::new(());
                    session
                        .pointer_down_on(&mut board, &mut layout, 0, Point::new(10.0, 10.0))
                        .ok();
                    let mut x = 10.0;
                    while x < span {
                        session
                            .pointer_move(&mut board, &mut layout, Point::new(x, 120.0))
                            .ok();
                        x += 25.0;
                    }
                    session
                        .pointer_up(&mut board, &mut layout, black_box(Point::new(x, 120.0)))
                        .ok();
                    board
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_drag_cycle);
criterion_main!(benches);
