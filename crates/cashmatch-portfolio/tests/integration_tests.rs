//! Integration tests for cashmatch-portfolio.
//!
//! These tests run the full flow from instrument records and a UK holiday
//! calendar through schedule generation, timeline alignment and weight
//! solving.

use std::collections::HashMap;

use approx::assert_relative_eq;
use cashmatch_bonds::{BondPricer, Instrument, PricingConfig};
use cashmatch_core::{BusinessDayCalendar, Calendar, Date, Frequency};
use cashmatch_math::linear_algebra::SolveMethod;
use cashmatch_portfolio::prelude::*;
use tracing_subscriber::EnvFilter;

// =============================================================================
// TEST FIXTURES
// =============================================================================

fn d(y: i32, m: u32, day: u32) -> Date {
    Date::from_ymd(y, m, day).unwrap()
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// England and Wales bank holidays, 2025-2027.
fn uk_calendar() -> BusinessDayCalendar {
    let holidays = [
        (2025, 1, 1),
        (2025, 4, 18),
        (2025, 4, 21),
        (2025, 5, 5),
        (2025, 5, 26),
        (2025, 8, 25),
        (2025, 12, 25),
        (2025, 12, 26),
        (2026, 1, 1),
        (2026, 4, 3),
        (2026, 4, 6),
        (2026, 5, 4),
        (2026, 5, 25),
        (2026, 8, 31),
        (2026, 12, 25),
        (2026, 12, 28),
        (2027, 1, 1),
        (2027, 3, 26),
        (2027, 3, 29),
        (2027, 5, 3),
        (2027, 5, 31),
        (2027, 8, 30),
        (2027, 12, 27),
        (2027, 12, 28),
    ]
    .into_iter()
    .map(|(y, m, day)| d(y, m, day));
    BusinessDayCalendar::new("UK", holidays)
}

fn gilt(id: &str, issue: Date, maturity: Date, coupon: f64) -> Instrument {
    Instrument::builder()
        .id(id)
        .short_code(id.replace("GB-", "T"))
        .name(format!("{coupon}% Treasury Gilt {}", maturity.year()))
        .issue_date(issue)
        .maturity_date(maturity)
        .coupon_rate(coupon)
        .build()
        .unwrap()
}

/// A gilt universe with bonds inside and outside a 2026-2030 window.
fn universe() -> Vec<Instrument> {
    let mut equity = gilt("EQ-1", d(2020, 1, 1), d(2028, 1, 1), 0.0);
    equity.instrument_type = "Equity".to_string();

    vec![
        gilt("GB-2032", d(2021, 6, 7), d(2032, 6, 7), 4.25),
        gilt("GB-2024", d(2019, 9, 7), d(2024, 9, 7), 2.75),
        gilt("GB-2027A", d(2020, 1, 22), d(2027, 1, 22), 1.25),
        gilt("GB-2026", d(2021, 3, 7), d(2026, 3, 7), 0.50),
        gilt("GB-2030", d(2022, 10, 22), d(2030, 10, 22), 4.75),
        gilt("GB-2027B", d(2022, 9, 7), d(2027, 9, 7), 3.50),
        gilt("GB-2029", d(2019, 1, 31), d(2029, 1, 31), 0.875),
        gilt("GB-2028", d(2023, 6, 7), d(2028, 6, 7), 4.125),
        equity,
    ]
}

fn request() -> PortfolioRequest {
    PortfolioRequest::new(d(2026, 1, 15), d(2030, 12, 15), d(2025, 6, 17))
        .with_frequency(TargetFrequency::Monthly)
        .with_target_cashflow(1_000.0)
        .with_budget(50_000.0)
}

/// Dirty prices at a flat 4% yield.
fn flat_yield_prices(
    instruments: &[Instrument],
    calendar: &dyn Calendar,
    settlement: Date,
) -> HashMap<String, f64> {
    let pricing = PricingConfig::default();
    instruments
        .iter()
        .filter(|inst| inst.is_bond())
        .filter(|inst| inst.maturity_date.is_some_and(|m| m > settlement))
        .map(|inst| {
            let pricer =
                BondPricer::from_instrument(inst, Frequency::SemiAnnual, &pricing, Some(calendar))
                    .unwrap();
            let dirty = pricer
                .dirty_price_from_yield(0.04, settlement, pricing.ex_div_business_days)
                .unwrap();
            (inst.id.clone(), dirty)
        })
        .collect()
}

// =============================================================================
// FULL FLOW
// =============================================================================

#[test]
fn test_nominal_portfolio_end_to_end() {
    init_tracing();
    let calendar = uk_calendar();
    let instruments = universe();
    let request = request();
    let prices = flat_yield_prices(&instruments, &calendar, request.settlement);
    let config = PortfolioConfig::new(WeightConvention::Nominal);

    let solution =
        build_portfolio(&request, &instruments, &prices, Some(&calendar), &config).unwrap();

    // Only bonds maturing between settlement and the window end
    assert_eq!(solution.num_bonds, 6);
    let ids: Vec<&str> = solution
        .holdings
        .iter()
        .map(|h| h.instrument_id.as_str())
        .collect();
    assert_eq!(
        ids,
        vec!["GB-2026", "GB-2027A", "GB-2027B", "GB-2028", "GB-2029", "GB-2030"]
    );

    // Budget is fully invested at the supplied prices
    let total = solution.total_invested.unwrap();
    assert_relative_eq!(total, 50_000.0, max_relative = 1e-9);
    let summed: f64 = solution
        .holdings
        .iter()
        .map(|h| h.value_invested.unwrap())
        .sum();
    assert_relative_eq!(summed, total, max_relative = 1e-12);
    for holding in &solution.holdings {
        let price = holding.price.unwrap();
        assert_relative_eq!(
            holding.value_invested.unwrap(),
            holding.scaled_weight.unwrap() * price,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            holding.scaled_weight.unwrap(),
            holding.nominal_weight * solution.scale.unwrap(),
            max_relative = 1e-12
        );
    }

    // Fit statistics are consistent with the residuals
    let n = solution.residuals.len();
    assert_eq!(n, solution.running_totals.nrows());
    let mse = solution.residuals.iter().map(|r| r * r).sum::<f64>() / n as f64;
    assert_relative_eq!(solution.mse, mse, max_relative = 1e-12);
    assert!(solution.r_squared <= 1.0);
    assert!(solution.diagnostics.rank <= solution.diagnostics.max_rank);
    assert_eq!(solution.diagnostics.method, SolveMethod::Direct);
}

#[test]
fn test_timeline_shape() {
    init_tracing();
    let calendar = uk_calendar();
    let instruments = universe();
    let request = request();
    let prices = flat_yield_prices(&instruments, &calendar, request.settlement);

    let solution = build_portfolio(
        &request,
        &instruments,
        &prices,
        Some(&calendar),
        &PortfolioConfig::new(WeightConvention::Nominal),
    )
    .unwrap();

    let cashflows = &solution.cashflows;
    assert_eq!(cashflows.columns()[0], TARGET_COLUMN);
    assert_eq!(cashflows.ncols(), 7);
    assert!(cashflows.dates().iter().all(|&date| date > request.settlement));
    assert!(cashflows
        .rows()
        .iter()
        .all(|row| row.iter().any(|&v| v != 0.0)));

    // 60 monthly liabilities from Jan 2026 to Dec 2030
    let target = solution.running_totals.column(TARGET_COLUMN).unwrap();
    assert!(target.windows(2).all(|w| w[0] <= w[1]));
    assert_relative_eq!(*target.last().unwrap(), 60_000.0);

    let last = solution.portfolio_total.last().unwrap();
    assert_eq!(last.date, *solution.running_totals.dates().last().unwrap());
    assert_relative_eq!(last.target, 60_000.0);
    assert_eq!(
        solution.predicted_running.len(),
        solution.portfolio_total.len()
    );
}

#[test]
fn test_fraction_portfolio() {
    init_tracing();
    let calendar = uk_calendar();
    let config = PortfolioConfig::sequential(WeightConvention::Fraction);
    let no_prices: HashMap<String, f64> = HashMap::new();

    let solution =
        build_portfolio(&request(), &universe(), &no_prices, Some(&calendar), &config).unwrap();

    let sum: f64 = solution.holdings.iter().map(|h| h.nominal_weight).sum();
    assert_relative_eq!(sum, 1.0, epsilon = 1e-10);
    assert!(solution.total_invested.is_none());
    assert!(solution.scale.is_none());
}

#[test]
fn test_missing_price_reported() {
    let calendar = uk_calendar();
    let instruments = universe();
    let request = request();
    let mut prices = flat_yield_prices(&instruments, &calendar, request.settlement);
    prices.remove("GB-2029");

    let result = build_portfolio(
        &request,
        &instruments,
        &prices,
        Some(&calendar),
        &PortfolioConfig::new(WeightConvention::Nominal),
    );
    assert!(matches!(
        result,
        Err(PortfolioError::MissingPrice { instrument_id, as_of })
            if instrument_id == "GB-2029" && as_of == request.settlement
    ));
}

// =============================================================================
// AGGREGATION WITH A HOLIDAY CALENDAR
// =============================================================================

#[test]
fn test_matrix_dates_are_business_days() {
    let calendar = uk_calendar();
    let instruments = universe();
    let selected = filter_bonds_by_maturity(&instruments, d(2025, 6, 17), d(2030, 12, 15));
    let config = PortfolioConfig::new(WeightConvention::Nominal);

    let matrix = build_matrix(&selected, Some(&calendar), &config).unwrap();
    assert!(matrix
        .dates()
        .iter()
        .all(|&date| calendar.is_business_day(date)));

    // 2026-03-07 is a Saturday; the final GB-2026 payment rolls to Monday
    let last = matrix.value(d(2026, 3, 9), "GB-2026").unwrap();
    assert_relative_eq!(last, 100.25, epsilon = 1e-10);
    assert!(matrix.row_for(d(2026, 3, 7)).is_none());

    // Equity record was skipped, outside-window bonds were filtered
    assert_eq!(matrix.ncols(), 6);
    assert!(matrix.column_index("EQ-1").is_none());
}

#[test]
fn test_records_match_matrix_totals() {
    let calendar = uk_calendar();
    let instruments = universe();
    let config = PortfolioConfig::new(WeightConvention::Nominal);

    let records = cashflow_records(&instruments, Some(&calendar), &config).unwrap();
    let matrix = build_matrix(&instruments, Some(&calendar), &config).unwrap();

    let record_total: f64 = records.iter().map(|r| r.amount).sum();
    let matrix_total: f64 = matrix.rows().iter().flatten().sum();
    assert_relative_eq!(record_total, matrix_total, max_relative = 1e-12);
    assert!(records.iter().all(|r| r.instrument_id != "EQ-1"));
}

#[test]
fn test_config_from_toml() {
    let config = PortfolioConfig::from_toml_str(
        r#"
        weight_convention = "nominal"
        coupon_frequency = 2
        drop_zero_rows = true

        [pricing]
        ex_div_business_days = 7
        convention = "modified_following"
        "#,
    )
    .unwrap();

    assert_eq!(config, PortfolioConfig::new(WeightConvention::Nominal));
}
