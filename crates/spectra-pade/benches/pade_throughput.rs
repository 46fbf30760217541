use std::f64::consts::PI;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use num_complex::Complex64;
use spectra_pade::fit;

fn samples(count: usize) -> (Vec<Complex64>, Vec<Complex64>) {
    let beta = 20.0;
    let nodes: Vec<Complex64> = (0..count)
        .map(|k| Complex64::new(0.0, (2 * k + 1) as f64 * PI / beta))
        .collect();
    let values = nodes
        .iter()
        .map(|&z| {
            (0..12)
                .map(|j| {
                    let energy = -1.5 + 0.27 * j as f64;
                    Complex64::new(1.0 / 12.0, 0.0) / (z - Complex64::new(energy, 0.0))
                })
                .sum::<Complex64>()
        })
        .collect();
    (nodes, values)
}

fn bench_fit(c: &mut Criterion) {
    let (nodes, values) = samples(64);
    c.bench_function("pade_fit_64", |b| {
        b.iter(|| {
            // Deep rows of a long table may legitimately break down.
            let _ = black_box(fit(black_box(&nodes), black_box(&values)));
        });
    });
}

fn bench_broadening(c: &mut Criterion) {
    let (nodes, values) = samples(16);
    let approximant = fit(&nodes, &values).expect("fit");
    let omegas: Vec<f64> = (0..1000).map(|i| -3.0 + 0.006 * i as f64).collect();
    c.bench_function("pade_broadening_1000", |b| {
        b.iter(|| approximant.evaluate_with_broadening(black_box(&omegas), 0.02));
    });
}

criterion_group!(benches, bench_fit, bench_broadening);
criterion_main!(benches);
