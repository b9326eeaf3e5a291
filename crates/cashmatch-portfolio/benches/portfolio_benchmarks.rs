//! Benchmarks for cashflow aggregation and weight solving.
//!
//! Run with: cargo bench -p cashmatch-portfolio
//! Parallel schedule generation: cargo bench -p cashmatch-portfolio --features parallel

use std::collections::HashMap;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nalgebra::{DMatrix, DVector};

use cashmatch_bonds::Instrument;
use cashmatch_core::{BusinessDayCalendar, Date};
use cashmatch_portfolio::prelude::*;

// =============================================================================
// TEST DATA GENERATORS
// =============================================================================

fn create_calendar() -> BusinessDayCalendar {
    let holidays = [
        (2026, 1, 1),
        (2026, 4, 3),
        (2026, 4, 6),
        (2026, 5, 4),
        (2026, 5, 25),
        (2026, 8, 31),
        (2026, 12, 25),
        (2026, 12, 28),
    ]
    .into_iter()
    .map(|(y, m, d)| Date::from_ymd(y, m, d).unwrap());
    BusinessDayCalendar::new("UK", holidays)
}

/// Bonds with maturities spread monthly from 2026 onwards.
fn create_universe(n: usize) -> Vec<Instrument> {
    let issue = Date::from_ymd(2020, 3, 7).unwrap();
    let first_maturity = Date::from_ymd(2026, 1, 7).unwrap();
    (0..n)
        .map(|i| {
            Instrument::builder()
                .id(format!("GB{i:04}"))
                .issue_date(issue)
                .maturity_date(first_maturity.add_months(i as i32).unwrap())
                .coupon_rate(1.0 + (i % 40) as f64 / 10.0)
                .build()
                .unwrap()
        })
        .collect()
}

fn create_prices(bonds: &[Instrument]) -> HashMap<String, f64> {
    bonds.iter().map(|b| (b.id.clone(), 98.5)).collect()
}

// =============================================================================
// AGGREGATION BENCHMARKS
// =============================================================================

fn bench_build_matrix(c: &mut Criterion) {
    let calendar = create_calendar();
    let config = PortfolioConfig::new(WeightConvention::Nominal);
    let mut group = c.benchmark_group("build_matrix");

    for size in [10, 100, 500] {
        let bonds = create_universe(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &bonds, |b, bonds| {
            b.iter(|| build_matrix(black_box(bonds), Some(&calendar), &config).unwrap());
        });
    }
    group.finish();
}

fn bench_unify_and_accumulate(c: &mut Criterion) {
    let calendar = create_calendar();
    let config = PortfolioConfig::new(WeightConvention::Nominal);
    let bonds = create_universe(60);
    let matrix = build_matrix(&bonds, Some(&calendar), &config).unwrap();
    let target = build_target_schedule(
        Date::from_ymd(2026, 1, 15).unwrap(),
        Date::from_ymd(2030, 12, 15).unwrap(),
        TargetFrequency::Monthly,
        1_000.0,
    )
    .unwrap();
    let settlement = Date::from_ymd(2025, 6, 17).unwrap();

    c.bench_function("unify_timeline_60", |b| {
        b.iter(|| unify_timeline(black_box(&target), &matrix, Some(settlement), true).unwrap());
    });

    let unified = unify_timeline(&target, &matrix, Some(settlement), true).unwrap();
    c.bench_function("running_totals_60", |b| {
        b.iter(|| running_totals(black_box(&unified)).unwrap());
    });
}

// =============================================================================
// OPTIMIZER BENCHMARKS
// =============================================================================

fn bench_solve_weights(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve_portfolio_weights");

    for n_bonds in [5, 20, 60] {
        let periods = n_bonds * 4;
        let cm = DMatrix::from_fn(periods, n_bonds, |i, j| {
            let maturity = (j + 1) * 4 - 1;
            let coupons = 2.0 * (i.min(maturity) + 1) as f64;
            if i >= maturity {
                coupons + 100.0
            } else {
                coupons
            }
        });
        let y = DVector::from_fn(periods, |i, _| 50.0 * (i + 1) as f64);

        group.bench_with_input(
            BenchmarkId::from_parameter(n_bonds),
            &(cm, y),
            |b, (cm, y)| {
                b.iter(|| {
                    solve_portfolio_weights(black_box(cm), y, WeightConvention::Nominal, 1e-14)
                        .unwrap()
                });
            },
        );
    }
    group.finish();
}

fn bench_build_portfolio(c: &mut Criterion) {
    let calendar = create_calendar();
    let config = PortfolioConfig::new(WeightConvention::Nominal);
    let bonds = create_universe(60);
    let prices = create_prices(&bonds);
    let request = PortfolioRequest::new(
        Date::from_ymd(2026, 1, 15).unwrap(),
        Date::from_ymd(2030, 12, 15).unwrap(),
        Date::from_ymd(2025, 6, 17).unwrap(),
    )
    .with_budget(1_000_000.0);

    c.bench_function("build_portfolio_60", |b| {
        b.iter(|| {
            build_portfolio(
                black_box(&request),
                &bonds,
                &prices,
                Some(&calendar),
                &config,
            )
            .unwrap()
        });
    });
}

// =============================================================================
// CRITERION GROUPS
// =============================================================================

criterion_group!(aggregation, bench_build_matrix, bench_unify_and_accumulate,);

criterion_group!(optimizer, bench_solve_weights, bench_build_portfolio,);

criterion_main!(aggregation, optimizer);
