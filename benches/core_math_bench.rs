use criterion::{Criterion, criterion_group, criterion_main};
use orchart::api::ChartEngine;
use orchart::core::{Finder, linear_map, nice_ticks};
use orchart::render::NullSurface;
use std::hint::black_box;

fn bench_linear_map_round_trip(c: &mut Criterion) {
    let domain = (0.0, 10_000.0);
    let range = (80.0, 1_840.0);

    c.bench_function("linear_map_round_trip", |b| {
        b.iter(|| {
            let pixel = linear_map(black_box(4_321.123), domain, range);
            let _ = linear_map(pixel, range, domain);
        })
    });
}

fn bench_nice_ticks(c: &mut Criterion) {
    c.bench_function("nice_ticks_0_97_5", |b| {
        b.iter(|| nice_ticks(black_box(0.0), black_box(97.0), black_box(5)))
    });
}

fn bench_batch_transform_10k(c: &mut Criterion) {
    let mut engine = ChartEngine::new(NullSurface::default(), 1920.0, 1080.0).expect("engine init");
    engine
        .set_option_json(r#"{"xAxis": {"min": 0, "max": 10000}, "yAxis": {"min": -1, "max": 1}}"#)
        .expect("axes configured");

    let points: Vec<[f64; 2]> = (0..10_000)
        .map(|i| {
            let t = i as f64;
            [t, (t * 0.01).sin()]
        })
        .collect();
    let finder = Finder::x_axis(0).with_y_axis(0);

    c.bench_function("batch_transform_10k_points", |b| {
        b.iter(|| {
            let transform = engine.batch_transform(black_box(&finder));
            let x = transform.x.expect("x transform");
            let y = transform.y.expect("y transform");
            let mut acc = 0.0;
            for point in &points {
                acc += x.to_pixel(point[0]) + y.to_pixel(point[1]);
            }
            black_box(acc)
        })
    });
}

criterion_group!(
    benches,
    bench_linear_map_round_trip,
    bench_nice_ticks,
    bench_batch_transform_10k
);
criterion_main!(benches);
