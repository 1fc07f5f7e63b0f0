// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use kurbo::Point;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use understory_lasso::Lasso;
use understory_quadtree::{Accessor, QuadTree};

type Rec = (f64, f64);

fn gen_points(n: usize, seed: u64) -> Vec<Rec> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| (rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)))
        .collect()
}

fn accessor() -> Accessor<Rec> {
    Accessor::new(|r: &Rec| r.0, |r: &Rec| r.1)
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree/build");
    for n in [1_000usize, 10_000, 100_000] {
        let points = gen_points(n, 7);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &points, |b, points| {
            b.iter_batched(
                || points.clone(),
                |points| black_box(QuadTree::build(accessor(), points)),
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_radius(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree/find_all");

    // A click-sized radius touches a handful of cells; the scan touches everything.
    for n in [10_000usize, 100_000] {
        let points = gen_points(n, 11);
        let tree = QuadTree::build(accessor(), points.iter().copied()).unwrap();
        let (x, y, r) = (42.0, 58.0, 1.5);

        group.bench_with_input(BenchmarkId::new("tree", n), &tree, |b, tree| {
            b.iter(|| black_box(tree.find_all(black_box(x), black_box(y), r).len()));
        });
        group.bench_with_input(BenchmarkId::new("scan", n), &points, |b, points| {
            b.iter(|| {
                black_box(
                    points
                        .iter()
                        .filter(|p| (p.0 - x).hypot(p.1 - y) <= r)
                        .count(),
                )
            });
        });
    }
    group.finish();
}

fn bench_lasso(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree/find_by_tester");

    let mut lasso = Lasso::new();
    lasso.start(Point::new(20.0, 20.0));
    for p in [(60.0, 15.0), (70.0, 55.0), (35.0, 65.0), (15.0, 40.0)] {
        lasso.drag(Point::from(p));
    }
    let tester = lasso.tester(|x| x, |y| y).unwrap();

    for n in [10_000usize, 100_000] {
        let points = gen_points(n, 13);
        let tree = QuadTree::build(accessor(), points.iter().copied()).unwrap();
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("hull", n), &tree, |b, tree| {
            b.iter(|| black_box(tree.find_by_tester(&tester).len()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_radius, bench_lasso);
criterion_main!(benches);
