//! Unified timelines and running totals.

use std::collections::BTreeSet;

use cashmatch_core::Date;

use crate::error::{PortfolioError, PortfolioResult};
use crate::types::CashflowTable;

/// Aligns a target schedule and a bond matrix on one timeline.
///
/// The result holds the union of both date sets, restricted to dates
/// strictly after `settlement` when one is given. Target columns come first,
/// then bond columns; missing values are zero. With `drop_zero_rows`, rows
/// where every column is zero are removed.
///
/// # Errors
///
/// Returns `PortfolioError::NoDatesAfterSettlement` if no date lies after
/// `settlement`.
pub fn unify_timeline(
    target: &CashflowTable,
    bonds: &CashflowTable,
    settlement: Option<Date>,
    drop_zero_rows: bool,
) -> PortfolioResult<CashflowTable> {
    let dates: Vec<Date> = target
        .dates()
        .iter()
        .chain(bonds.dates())
        .copied()
        .filter(|&date| settlement.map_or(true, |s| date > s))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    if let Some(settlement) = settlement {
        if dates.is_empty() {
            return Err(PortfolioError::NoDatesAfterSettlement { settlement });
        }
    }

    let columns: Vec<String> = target
        .columns()
        .iter()
        .chain(bonds.columns())
        .cloned()
        .collect();

    let mut kept_dates = Vec::with_capacity(dates.len());
    let mut rows = Vec::with_capacity(dates.len());
    for date in dates {
        let mut row = Vec::with_capacity(columns.len());
        extend_row(&mut row, target, date);
        extend_row(&mut row, bonds, date);

        if drop_zero_rows && row.iter().all(|&v| v == 0.0) {
            continue;
        }
        kept_dates.push(date);
        rows.push(row);
    }

    CashflowTable::new(kept_dates, columns, rows)
}

fn extend_row(row: &mut Vec<f64>, table: &CashflowTable, date: Date) {
    match table.row_for(date) {
        Some(values) => row.extend_from_slice(values),
        None => row.extend(std::iter::repeat(0.0).take(table.ncols())),
    }
}

/// Column-wise cumulative sums in date order.
pub fn running_totals(table: &CashflowTable) -> PortfolioResult<CashflowTable> {
    let mut acc = vec![0.0; table.ncols()];
    let rows = table
        .rows()
        .iter()
        .map(|row| {
            for (total, v) in acc.iter_mut().zip(row) {
                *total += v;
            }
            acc.clone()
        })
        .collect();

    CashflowTable::new(table.dates().to_vec(), table.columns().to_vec(), rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TARGET_COLUMN;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn target() -> CashflowTable {
        CashflowTable::new(
            vec![d(2025, 1, 1), d(2025, 2, 1), d(2025, 3, 1)],
            vec![TARGET_COLUMN.to_string()],
            vec![vec![10.0], vec![10.0], vec![10.0]],
        )
        .unwrap()
    }

    fn bonds() -> CashflowTable {
        CashflowTable::new(
            vec![d(2024, 12, 15), d(2025, 2, 1), d(2025, 2, 15), d(2025, 4, 1)],
            vec!["A".to_string(), "B".to_string()],
            vec![
                vec![5.0, 0.0],
                vec![2.0, 3.0],
                vec![0.0, 0.0],
                vec![0.0, 104.0],
            ],
        )
        .unwrap()
    }

    // =========================================================================
    // unify_timeline
    // =========================================================================

    #[test]
    fn test_union_after_settlement() {
        let unified = unify_timeline(&target(), &bonds(), Some(d(2025, 1, 1)), false).unwrap();

        assert_eq!(
            unified.dates(),
            &[d(2025, 2, 1), d(2025, 2, 15), d(2025, 3, 1), d(2025, 4, 1)]
        );
        assert_eq!(unified.columns(), &[TARGET_COLUMN, "A", "B"]);
        assert_eq!(unified.rows()[0], vec![10.0, 2.0, 3.0]);
        assert_eq!(unified.rows()[2], vec![10.0, 0.0, 0.0]);
        assert_eq!(unified.rows()[3], vec![0.0, 0.0, 104.0]);
    }

    #[test]
    fn test_drop_zero_rows() {
        let kept = unify_timeline(&target(), &bonds(), Some(d(2025, 1, 1)), false).unwrap();
        let dropped = unify_timeline(&target(), &bonds(), Some(d(2025, 1, 1)), true).unwrap();

        assert!(kept.row_for(d(2025, 2, 15)).is_some());
        assert!(dropped.row_for(d(2025, 2, 15)).is_none());
        assert_eq!(dropped.nrows(), kept.nrows() - 1);
        assert!(dropped.rows().iter().all(|r| r.iter().any(|&v| v != 0.0)));
    }

    #[test]
    fn test_no_settlement_keeps_all() {
        let unified = unify_timeline(&target(), &bonds(), None, false).unwrap();
        assert_eq!(unified.nrows(), 6);
        assert_eq!(unified.dates()[0], d(2024, 12, 15));
    }

    #[test]
    fn test_settlement_after_everything() {
        let result = unify_timeline(&target(), &bonds(), Some(d(2025, 4, 1)), true);
        assert!(matches!(
            result,
            Err(PortfolioError::NoDatesAfterSettlement { settlement }) if settlement == d(2025, 4, 1)
        ));
    }

    // =========================================================================
    // running_totals
    // =========================================================================

    #[test]
    fn test_running_totals() {
        let unified = unify_timeline(&target(), &bonds(), Some(d(2025, 1, 1)), true).unwrap();
        let totals = running_totals(&unified).unwrap();

        assert_eq!(totals.column(TARGET_COLUMN).unwrap(), vec![10.0, 20.0, 20.0]);
        assert_eq!(totals.column("A").unwrap(), vec![2.0, 2.0, 2.0]);
        assert_eq!(totals.column("B").unwrap(), vec![3.0, 3.0, 107.0]);
        assert_eq!(totals.dates(), unified.dates());
    }

    #[test]
    fn test_running_totals_empty() {
        let totals = running_totals(&CashflowTable::empty(vec!["A".to_string()])).unwrap();
        assert!(totals.is_empty());
        assert_eq!(totals.columns(), &["A"]);
    }
}
