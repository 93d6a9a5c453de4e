//! Criterion benchmarks for path generation and backtesting.

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pricer_core::types::OptionType;
use pricer_models::instruments::{StrategyLeg, TradeAction};
use pricer_pricing::backtest::{run_backtest, run_backtest_batch, BacktestConfig};
use pricer_pricing::mc::{generate_daily_bars, BarJitter, GbmParams};
use pricer_pricing::rng::PricerRng;

fn iron_condor() -> Vec<StrategyLeg> {
    let expiry = NaiveDate::from_ymd_opt(2024, 6, 27).unwrap();
    vec![
        StrategyLeg::new(OptionType::Put, TradeAction::Buy, 21_500.0, 40.0, 1, expiry).unwrap(),
        StrategyLeg::new(OptionType::Put, TradeAction::Sell, 21_800.0, 90.0, 1, expiry).unwrap(),
        StrategyLeg::new(OptionType::Call, TradeAction::Sell, 22_200.0, 95.0, 1, expiry).unwrap(),
        StrategyLeg::new(OptionType::Call, TradeAction::Buy, 22_500.0, 45.0, 1, expiry).unwrap(),
    ]
}

fn bench_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("daily_bars");
    let params = GbmParams::daily(22_000.0, 0.05, 0.15);
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    for days in [30_usize, 90, 252] {
        group.bench_with_input(BenchmarkId::from_parameter(days), &days, |b, &days| {
            b.iter(|| {
                let mut rng = PricerRng::from_seed(42);
                generate_daily_bars(
                    black_box(&params),
                    start,
                    days,
                    0.15,
                    &BarJitter::default(),
                    &mut rng,
                )
            })
        });
    }
    group.finish();
}

fn bench_backtest(c: &mut Criterion) {
    let legs = iron_condor();
    let config = BacktestConfig {
        spot: Some(22_000.0),
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
        ..BacktestConfig::default()
    };

    c.bench_function("backtest_iron_condor_90d", |b| {
        b.iter(|| {
            let mut rng = PricerRng::from_seed(7);
            run_backtest(black_box(&legs), 500_000.0, &config, &mut rng)
        })
    });

    let seeds: Vec<u64> = (0..64).collect();
    c.bench_function("backtest_batch_64_seeds", |b| {
        b.iter(|| run_backtest_batch(black_box(&legs), 500_000.0, &config, &seeds))
    });
}

criterion_group!(benches, bench_paths, bench_backtest);
criterion_main!(benches);
