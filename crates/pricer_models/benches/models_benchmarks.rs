//! Criterion benchmarks for Black-Scholes pricing and implied volatility.
//!
//! Measures single-option pricing, the full Greeks snapshot, and the
//! Newton-Raphson solver across a strike ladder.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pricer_core::types::OptionType;
use pricer_models::analytical::{greeks, price, BlackScholes, ImpliedVolSolver};

/// Benchmark price and Greeks for a single ATM option.
fn bench_black_scholes(c: &mut Criterion) {
    let mut group = c.benchmark_group("black_scholes");
    let t = 30.0 / 365.0;

    group.bench_function("price_call", |b| {
        b.iter(|| {
            price(
                black_box(22_000.0),
                black_box(22_000.0),
                black_box(t),
                0.07,
                0.20,
                OptionType::Call,
            )
        });
    });

    group.bench_function("greeks_put", |b| {
        b.iter(|| {
            greeks(
                black_box(22_000.0),
                black_box(21_800.0),
                black_box(t),
                0.07,
                0.20,
                OptionType::Put,
            )
        });
    });

    group.finish();
}

/// Benchmark the implied volatility solver across ladder sizes.
fn bench_implied_vol(c: &mut Criterion) {
    let mut group = c.benchmark_group("implied_vol");
    let t = 30.0 / 365.0;
    let solver = ImpliedVolSolver::default();

    for size in [10, 50, 100] {
        let ladder: Vec<(f64, f64)> = (0..size)
            .map(|i| {
                let strike = 20_000.0 + 4_000.0 * i as f64 / size as f64;
                let vol = 0.12 + 0.10 * (strike - 22_000.0).abs() / 2_000.0;
                let model = BlackScholes::new(22_000.0, 0.07, vol).unwrap();
                (strike, model.price(strike, t, OptionType::Call))
            })
            .collect();

        group.bench_with_input(BenchmarkId::new("ladder", size), &ladder, |b, ladder| {
            b.iter(|| {
                for &(strike, premium) in ladder {
                    let _ = solver.solve(
                        black_box(premium),
                        22_000.0,
                        strike,
                        t,
                        0.07,
                        OptionType::Call,
                    );
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_black_scholes, bench_implied_vol);
criterion_main!(benches);
