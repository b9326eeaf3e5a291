//! Liability (target) schedules.

use cashmatch_core::Date;

use crate::error::PortfolioResult;
use crate::types::{CashflowTable, TargetFrequency, TARGET_COLUMN};

/// A single-column table paying `amount` on `start + k` periods up to `end`.
///
/// Dates are anchored on `start`, so a schedule starting on the 31st pays
/// on the last day of shorter months and returns to the 31st afterwards.
/// An empty table is returned when `start > end`.
///
/// # Example
///
/// ```rust
/// use cashmatch_core::Date;
/// use cashmatch_portfolio::aggregation::build_target_schedule;
/// use cashmatch_portfolio::types::TargetFrequency;
///
/// let start = Date::from_ymd(2025, 1, 31).unwrap();
/// let end = Date::from_ymd(2025, 4, 30).unwrap();
/// let table = build_target_schedule(start, end, TargetFrequency::Monthly, 100.0).unwrap();
///
/// assert_eq!(table.nrows(), 4);
/// assert_eq!(table.dates()[1], Date::from_ymd(2025, 2, 28).unwrap());
/// assert_eq!(table.dates()[2], Date::from_ymd(2025, 3, 31).unwrap());
/// ```
pub fn build_target_schedule(
    start: Date,
    end: Date,
    frequency: TargetFrequency,
    amount: f64,
) -> PortfolioResult<CashflowTable> {
    let step = frequency.months();
    let mut dates = Vec::new();
    let mut k = 0;
    loop {
        let date = start.add_months(k * step)?;
        if date > end {
            break;
        }
        dates.push(date);
        k += 1;
    }

    let rows = vec![vec![amount]; dates.len()];
    CashflowTable::new(dates, vec![TARGET_COLUMN.to_string()], rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_monthly_inclusive_end() {
        let table =
            build_target_schedule(d(2025, 1, 15), d(2025, 6, 15), TargetFrequency::Monthly, 100.0)
                .unwrap();
        assert_eq!(table.nrows(), 6);
        assert_eq!(table.dates()[5], d(2025, 6, 15));
        assert_eq!(table.columns(), &[TARGET_COLUMN]);
        assert!(table.rows().iter().all(|r| r[0] == 100.0));
    }

    #[test]
    fn test_annual() {
        let table =
            build_target_schedule(d(2024, 2, 29), d(2028, 3, 1), TargetFrequency::Annually, 50.0)
                .unwrap();
        assert_eq!(
            table.dates(),
            &[
                d(2024, 2, 29),
                d(2025, 2, 28),
                d(2026, 2, 28),
                d(2027, 2, 28),
                d(2028, 2, 29)
            ]
        );
    }

    #[test]
    fn test_end_before_next_period() {
        let table =
            build_target_schedule(d(2025, 1, 1), d(2025, 1, 31), TargetFrequency::Monthly, 1.0)
                .unwrap();
        assert_eq!(table.dates(), &[d(2025, 1, 1)]);
    }

    #[test]
    fn test_start_after_end() {
        let table =
            build_target_schedule(d(2026, 1, 1), d(2025, 1, 1), TargetFrequency::Monthly, 1.0)
                .unwrap();
        assert!(table.is_empty());
        assert_eq!(table.ncols(), 1);
    }
}
