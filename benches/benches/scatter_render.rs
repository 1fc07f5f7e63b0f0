// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Size;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use understory_scatter::{RecordingSurface, RenderReason, Scatterplot, ScatterplotOptions};
use understory_view2d::ZoomTransform;

type Rec = (u32, u32);

fn plot(n: usize) -> Scatterplot<Rec, RecordingSurface> {
    let mut rng = StdRng::seed_from_u64(3);
    let records: Vec<Rec> = (0..n)
        .map(|_| (rng.random_range(0..10_000), rng.random_range(0..10_000)))
        .collect();
    let size = Size::new(800.0, 600.0);
    let options = ScatterplotOptions {
        x_scale: understory_view2d::LinearScale::new((0.0, 10_000.0), (0.0, 1.0)),
        y_scale: understory_view2d::LinearScale::new((0.0, 10_000.0), (0.0, 1.0)),
        ..ScatterplotOptions::default()
    };
    Scatterplot::new(
        records,
        |r: &Rec| f64::from(r.0),
        |r: &Rec| f64::from(r.1),
        [RecordingSurface::new(0, size), RecordingSurface::new(1, size)],
        options,
    )
    .unwrap()
}

fn bench_full_redraw(c: &mut Criterion) {
    let mut group = c.benchmark_group("scatter/full_redraw");

    // Zoomed out, aggregation collapses dense cells; zoomed in, culling prunes most of the tree.
    for k in [0.5, 1.0, 4.0] {
        let mut p = plot(50_000);
        p.resized();
        p.on_zoom_start();
        p.on_zoom(ZoomTransform::new(-200.0 * (k - 1.0), -150.0 * (k - 1.0), k), 0);
        p.on_zoom_end(0);
        group.bench_function(BenchmarkId::from_parameter(k), |b| {
            b.iter(|| {
                p.render(RenderReason::AfterScale, None, 0);
                black_box(p.last_stats().rendered)
            });
        });
    }
    group.finish();
}

fn bench_pan_step(c: &mut Criterion) {
    let mut p = plot(50_000);
    p.resized();
    p.on_zoom_start();
    let mut x = 0.0;
    c.bench_function("scatter/pan_step", |b| {
        b.iter(|| {
            x += 1.0;
            p.on_zoom(ZoomTransform::new(x, 0.0, 1.0), 0);
        });
    });
}

criterion_group!(benches, bench_full_redraw, bench_pan_step);
criterion_main!(benches);
