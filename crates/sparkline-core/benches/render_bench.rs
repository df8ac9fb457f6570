use anyhow::Result;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sparkline_core::types::values;
use sparkline_core::{BarOptions, ChartOptions, Dimension, LineOptions, Sparkline};

fn series(n: usize) -> Vec<f64> {
    (0..n).map(|i| (i as f64 * 0.1).sin() * 10.0 + (i % 7) as f64).collect()
}

fn build(kind: &str, n: usize) -> Sparkline {
    let data = values(&series(n));
    let mut options = match kind {
        "bar" => ChartOptions::Bar(BarOptions::default()),
        _ => ChartOptions::Line(LineOptions::default()),
    };
    options.common_mut().width = Dimension::Px(300);
    options.common_mut().height = Dimension::Px(40);
    Sparkline::new(&data, options, (300, 40), 2.0).expect("valid series")
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    for kind in ["line", "bar"] {
        for &n in &[50usize, 500usize] {
            group.bench_function(format!("{kind}_{n}"), |b| {
                let mut spark = build(kind, n);
                b.iter(|| -> Result<()> {
                    spark.render();
                    black_box(spark.pixels_rgba8()?);
                    Ok(())
                });
            });
        }
    }
    group.finish();
}

fn bench_pointer(c: &mut Criterion) {
    let mut group = c.benchmark_group("pointer_sweep");
    for kind in ["line", "bar"] {
        group.bench_function(kind, |b| {
            let mut spark = build(kind, 100);
            spark.render();
            b.iter(|| {
                for x in 0..300 {
                    black_box(spark.pointer_moved(x as f64, 20.0));
                }
                spark.pointer_left()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_render, bench_pointer);
criterion_main!(benches);
