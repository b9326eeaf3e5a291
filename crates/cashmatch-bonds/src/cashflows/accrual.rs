//! Accrual fractions.

use cashmatch_core::{Date, Frequency};

/// Fraction of a year accrued between `start` and `end`.
///
/// A full regular period (`start == nominal_start` and `end == quasi_end`)
/// accrues exactly `1/f`. Anything else is prorated on actual days against
/// the regular period `[nominal_start, quasi_end]`, so a long stub accrues
/// more than `1/f` and a partial period less.
///
/// # Example
///
/// ```rust
/// use cashmatch_bonds::cashflows::accrual_factor;
/// use cashmatch_core::{Date, Frequency};
///
/// let start = Date::from_ymd(2025, 1, 1).unwrap();
/// let end = Date::from_ymd(2025, 7, 1).unwrap();
/// let af = accrual_factor(start, end, start, end, Frequency::SemiAnnual);
/// assert_eq!(af, 0.5);
/// ```
pub fn accrual_factor(
    start: Date,
    end: Date,
    nominal_start: Date,
    quasi_end: Date,
    frequency: Frequency,
) -> f64 {
    let f = f64::from(frequency.periods_per_year());
    if start == nominal_start && end == quasi_end {
        return 1.0 / f;
    }

    let actual = start.days_between(&end).max(0) as f64;
    let nominal = nominal_start.days_between(&quasi_end).max(1) as f64;
    (actual / nominal) / f
}
