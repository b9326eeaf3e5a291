use serde::{Deserialize, Serialize};

use cashmatch_core::Date;

/// One coupon period of a bond schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashflowRow {
    /// Accrual start.
    pub period_start: Date,
    /// Accrual end (unadjusted).
    pub period_end: Date,
    /// Unadjusted boundary the coupon is scheduled on.
    pub quasi_date: Date,
    /// Business-day adjusted payment date.
    pub adjusted_date: Date,
    /// Theoretical start of a regular period ending at `quasi_date`.
    pub nominal_start: Date,
    /// Fraction of a year accrued over the period.
    pub accrual_factor: f64,
    /// Coupon paid, rounded to 10 decimal places.
    pub coupon_amount: f64,
    /// Principal repaid (the notional on the final row, else zero).
    pub principal_amount: f64,
    /// True if the period is irregular.
    pub is_stub: bool,
    /// Stub description such as `"Short First"` or `"Last Stub"`.
    pub notes: Option<String>,
}

impl CashflowRow {
    /// Total paid on the row's payment date.
    pub fn amount(&self) -> f64 {
        self.coupon_amount + self.principal_amount
    }

    /// True if `date` falls in `[period_start, period_end)`.
    pub fn contains(&self, date: Date) -> bool {
        self.period_start <= date && date < self.period_end
    }
}
