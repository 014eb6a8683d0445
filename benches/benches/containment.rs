// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for the containment predicates in `understory_drag_drop`.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect};

use understory_drag_drop::containment::{contains_point, overlap_ratio};
use understory_drag_drop::{Containment, EdgeMode, Probe, Threshold};

/// A `side × side` grid of 40×40 zones on a 50px pitch.
fn zones(side: u32) -> Vec<Rect> {
    (0..side * side)
        .map(|i| {
            let x = f64::from(i % side) * 50.0;
            let y = f64::from(i / side) * 50.0;
            Rect::new(x, y, x + 40.0, y + 40.0)
        })
        .collect()
}

fn bench_predicates(c: &mut Criterion) {
    let mut group = c.benchmark_group("containment");
    for &side in &[8_u32, 32, 64] {
        let zones = zones(side);
        let moving = Rect::new(95.0, 95.0, 125.0, 125.0);
        let point = Point::new(110.0, 110.0);

        group.bench_with_input(BenchmarkId::new("point", zones.len()), &zones, |b, zones| {
            b.iter(|| {
                zones
                    .iter()
                    .filter(|z| contains_point(**z, black_box(point), EdgeMode::Legacy))
                    .count()
            });
        });

        group.bench_with_input(
            BenchmarkId::new("overlap_ratio", zones.len()),
            &zones,
            |b, zones| {
                b.iter(|| {
                    zones
                        .iter()
                        .filter_map(|z| overlap_ratio(black_box(moving), *z).ok())
                        .sum::<f64>()
                });
            },
        );

        let policies = [
            Containment::Point(EdgeMode::Inclusive),
            Containment::Overlap(Threshold::DEFAULT),
        ];
        let probe = Probe {
            point,
            handle: Ok(moving),
        };
        group.bench_with_input(
            BenchmarkId::new("evaluate_mixed", zones.len()),
            &zones,
            |b, zones| {
                b.iter(|| {
                    zones
                        .iter()
                        .enumerate()
                        .filter(|(i, z)| {
                            policies[i % 2]
                                .evaluate(**z, black_box(&probe))
                                .unwrap_or(false)
                        })
                        .count()
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_predicates);
criterion_main!(benches);
