//! Long-format cashflow records and the date × bond matrix.

use serde::Serialize;
use std::borrow::Borrow;
use std::collections::{BTreeSet, HashMap};

use cashmatch_bonds::cashflows::cashflows_from_instrument;
use cashmatch_bonds::{BondError, Instrument};
use cashmatch_core::{Calendar, Date};

use super::parallel::maybe_parallel_map;
use crate::error::PortfolioResult;
use crate::types::{CashflowTable, PortfolioConfig};

/// One bond cashflow on its adjusted payment date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashflowRecord {
    /// Instrument identifier.
    pub instrument_id: String,
    /// Short code, if any.
    pub short_code: Option<String>,
    /// Bond maturity.
    pub maturity_date: Date,
    /// Business-day adjusted payment date.
    pub cashflow_date: Date,
    /// Coupon paid.
    pub coupon: f64,
    /// Principal repaid.
    pub principal: f64,
    /// Coupon plus principal.
    pub amount: f64,
    /// Irregular period.
    pub is_stub: bool,
    /// Fraction of a regular period accrued.
    pub accrual_factor: f64,
}

/// Schedules every bond in `instruments`, returning records in input order.
///
/// Non-bond instruments yield no records.
fn records_per_instrument<I>(
    instruments: &[I],
    calendar: Option<&dyn Calendar>,
    config: &PortfolioConfig,
) -> PortfolioResult<Vec<Vec<CashflowRecord>>>
where
    I: Borrow<Instrument> + Sync,
{
    maybe_parallel_map(instruments, config, |inst| {
        instrument_records(<I as Borrow<Instrument>>::borrow(inst), calendar, config)
    })
    .into_iter()
    .collect()
}

fn instrument_records(
    instrument: &Instrument,
    calendar: Option<&dyn Calendar>,
    config: &PortfolioConfig,
) -> PortfolioResult<Vec<CashflowRecord>> {
    if !instrument.is_bond() {
        tracing::debug!(
            instrument = %instrument.id,
            instrument_type = %instrument.instrument_type,
            "skipping non-bond instrument"
        );
        return Ok(Vec::new());
    }

    let rows = cashflows_from_instrument(
        instrument,
        config.coupon_frequency,
        &config.pricing,
        calendar,
    )?;
    let maturity = instrument
        .maturity_date
        .ok_or_else(|| BondError::invalid_instrument(&instrument.id, "missing maturity date"))?;

    Ok(rows
        .iter()
        .map(|row| CashflowRecord {
            instrument_id: instrument.id.clone(),
            short_code: instrument.short_code.clone(),
            maturity_date: maturity,
            cashflow_date: row.adjusted_date,
            coupon: row.coupon_amount,
            principal: row.principal_amount,
            amount: row.amount(),
            is_stub: row.is_stub,
            accrual_factor: row.accrual_factor,
        })
        .collect())
}

/// Long-format cashflows for a set of instruments.
///
/// Records are sorted by payment date, then by maturity. Non-bond
/// instruments are skipped; a bond whose terms are invalid fails the whole
/// call.
pub fn cashflow_records<I>(
    instruments: &[I],
    calendar: Option<&dyn Calendar>,
    config: &PortfolioConfig,
) -> PortfolioResult<Vec<CashflowRecord>>
where
    I: Borrow<Instrument> + Sync,
{
    let mut records: Vec<CashflowRecord> = records_per_instrument(instruments, calendar, config)?
        .into_iter()
        .flatten()
        .collect();
    records.sort_by(|a, b| {
        a.cashflow_date
            .cmp(&b.cashflow_date)
            .then(a.maturity_date.cmp(&b.maturity_date))
    });
    Ok(records)
}

/// Pivots bond cashflows into a date × instrument-id table.
///
/// Amounts falling on the same date for the same instrument are summed and
/// missing combinations are zero. Columns are ordered by ascending maturity,
/// ties keeping input order.
pub fn build_matrix<I>(
    instruments: &[I],
    calendar: Option<&dyn Calendar>,
    config: &PortfolioConfig,
) -> PortfolioResult<CashflowTable>
where
    I: Borrow<Instrument> + Sync,
{
    let mut per_bond: Vec<Vec<CashflowRecord>> =
        records_per_instrument(instruments, calendar, config)?
            .into_iter()
            .filter(|records| !records.is_empty())
            .collect();
    per_bond.sort_by_key(|records| records[0].maturity_date);

    let mut columns: Vec<String> = Vec::new();
    let mut column_of: HashMap<&str, usize> = HashMap::new();
    for records in &per_bond {
        let id = records[0].instrument_id.as_str();
        if !column_of.contains_key(id) {
            column_of.insert(id, columns.len());
            columns.push(id.to_string());
        }
    }

    let dates: Vec<Date> = per_bond
        .iter()
        .flatten()
        .map(|r| r.cashflow_date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let row_of: HashMap<Date, usize> = dates.iter().enumerate().map(|(i, &d)| (d, i)).collect();

    let mut rows = vec![vec![0.0; columns.len()]; dates.len()];
    for record in per_bond.iter().flatten() {
        let i = row_of[&record.cashflow_date];
        let j = column_of[record.instrument_id.as_str()];
        rows[i][j] += record.amount;
    }

    tracing::debug!(
        bonds = columns.len(),
        dates = dates.len(),
        "built cashflow matrix"
    );
    CashflowTable::new(dates, columns, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cashmatch_core::BusinessDayCalendar;
    use crate::types::WeightConvention;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn bond(id: &str, issue: Date, maturity: Date, coupon: f64) -> Instrument {
        Instrument::builder()
            .id(id)
            .issue_date(issue)
            .maturity_date(maturity)
            .coupon_rate(coupon)
            .build()
            .unwrap()
    }

    fn config() -> PortfolioConfig {
        PortfolioConfig::sequential(WeightConvention::Nominal)
    }

    #[test]
    fn test_records_sorted_by_date_then_maturity() {
        let bonds = vec![
            bond("LONG", d(2020, 6, 1), d(2030, 6, 1), 4.0),
            bond("SHORT", d(2020, 6, 1), d(2026, 6, 1), 2.0),
        ];
        let records = cashflow_records(&bonds, None, &config()).unwrap();

        assert_eq!(records.len(), 12 + 20);
        assert!(records
            .windows(2)
            .all(|w| (w[0].cashflow_date, w[0].maturity_date)
                <= (w[1].cashflow_date, w[1].maturity_date)));
        // Same payment date: shorter maturity first
        assert_eq!(records[0].instrument_id, "SHORT");
        assert_eq!(records[1].instrument_id, "LONG");
        assert_eq!(records[0].cashflow_date, records[1].cashflow_date);
    }

    #[test]
    fn test_record_amounts() {
        let bonds = vec![bond("A", d(2020, 1, 1), d(2022, 1, 1), 5.0)];
        let records = cashflow_records(&bonds, None, &config()).unwrap();

        assert_eq!(records.len(), 4);
        let last = records.last().unwrap();
        assert_relative_eq!(last.coupon, 2.5);
        assert_relative_eq!(last.principal, 100.0);
        assert_relative_eq!(last.amount, 102.5);
        assert!(!last.is_stub);
    }

    #[test]
    fn test_matrix_columns_by_maturity() {
        let bonds = vec![
            bond("B2030", d(2020, 3, 1), d(2030, 3, 1), 3.0),
            bond("B2027", d(2020, 3, 1), d(2027, 3, 1), 2.0),
            bond("B2028", d(2021, 9, 1), d(2028, 9, 1), 1.0),
        ];
        let table = build_matrix(&bonds, None, &config()).unwrap();

        assert_eq!(table.columns(), &["B2027", "B2028", "B2030"]);
        // Mar/Sep dates from 2020-09 through 2030-03
        assert_eq!(table.nrows(), 20);

        let last = table.row_for(d(2030, 3, 1)).unwrap();
        assert_eq!(last, &[0.0, 0.0, 101.5]);
        let first = table.row_for(d(2020, 9, 1)).unwrap();
        assert_relative_eq!(first[0], 1.0);
        assert_eq!(first[1], 0.0);
        assert_relative_eq!(first[2], 1.5);
    }

    #[test]
    fn test_matrix_uses_adjusted_dates() {
        // 2025-11-30 is a Sunday; modified following rolls back to Friday 28th
        let bonds = vec![bond("A", d(2024, 5, 31), d(2025, 11, 30), 4.0)];
        let calendar = BusinessDayCalendar::new("UK", std::iter::empty::<Date>());
        let table = build_matrix(&bonds, Some(&calendar), &config()).unwrap();

        assert!(table.row_for(d(2025, 11, 28)).is_some());
        assert!(table.row_for(d(2025, 11, 30)).is_none());
        assert!(table.dates().iter().all(|&date| calendar.is_business_day(date)));
    }

    #[test]
    fn test_duplicate_ids_summed() {
        let bonds = vec![
            bond("A", d(2020, 1, 1), d(2022, 1, 1), 5.0),
            bond("A", d(2020, 1, 1), d(2022, 1, 1), 5.0),
        ];
        let table = build_matrix(&bonds, None, &config()).unwrap();
        assert_eq!(table.ncols(), 1);
        assert_relative_eq!(table.value(d(2022, 1, 1), "A").unwrap(), 205.0);
    }

    #[test]
    fn test_non_bond_skipped() {
        let mut equity = bond("EQ", d(2020, 1, 1), d(2022, 1, 1), 5.0);
        equity.instrument_type = "Equity".to_string();
        let bonds = vec![equity, bond("A", d(2020, 1, 1), d(2022, 1, 1), 5.0)];

        let table = build_matrix(&bonds, None, &config()).unwrap();
        assert_eq!(table.columns(), &["A"]);
    }

    #[test]
    fn test_invalid_bond_fails() {
        let mut broken = bond("X", d(2020, 1, 1), d(2022, 1, 1), 5.0);
        broken.coupon_rate = None;
        let result = build_matrix(&[broken], None, &config());
        assert!(matches!(
            result,
            Err(crate::error::PortfolioError::Bond(BondError::InvalidInstrument { .. }))
        ));
    }

    #[test]
    fn test_empty_input() {
        let table = build_matrix::<Instrument>(&[], None, &config()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.ncols(), 0);
    }

    #[test]
    fn test_accepts_references() {
        let bonds = vec![bond("A", d(2020, 1, 1), d(2022, 1, 1), 5.0)];
        let refs: Vec<&Instrument> = bonds.iter().collect();
        let table = build_matrix(&refs, None, &config()).unwrap();
        assert_eq!(table.nrows(), 4);
    }
}
