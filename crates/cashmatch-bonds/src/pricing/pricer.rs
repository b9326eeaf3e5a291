//! Accrued interest and price/yield conversion on a built schedule.

use cashmatch_core::{Calendar, Date, Frequency};

use crate::cashflows::{accrual_factor, CashflowRow, CashflowScheduleBuilder, ScheduleConfig};
use crate::error::{BondError, BondResult};
use crate::pricing::{PricingConfig, YieldResult, YieldSolver};
use crate::types::Instrument;

/// Prices a fixed-coupon bond from its coupon schedule.
///
/// The schedule is built once on construction. Yields are quoted with
/// compounding at the coupon frequency; prices are per the configured
/// notional.
///
/// # Example
///
/// ```rust
/// use cashmatch_bonds::cashflows::ScheduleConfig;
/// use cashmatch_bonds::pricing::BondPricer;
/// use cashmatch_core::{Date, Frequency};
///
/// let config = ScheduleConfig::new(
///     Date::from_ymd(2020, 1, 1).unwrap(),
///     Date::from_ymd(2030, 1, 1).unwrap(),
///     5.0,
///     Frequency::SemiAnnual,
/// );
/// let pricer = BondPricer::new(config, None).unwrap();
/// let settlement = Date::from_ymd(2025, 1, 1).unwrap();
///
/// // At a yield equal to the coupon a bond prices at par on a coupon date
/// let clean = pricer.clean_price_from_yield(0.05, settlement, 0).unwrap();
/// assert!((clean - 100.0).abs() < 1e-9);
/// ```
pub struct BondPricer<'a> {
    rows: Vec<CashflowRow>,
    frequency: Frequency,
    coupon_rate: f64,
    notional: f64,
    maturity: Date,
    calendar: Option<&'a dyn Calendar>,
}

impl<'a> BondPricer<'a> {
    /// Builds the schedule and creates a pricer.
    ///
    /// When `calendar` is given it adjusts payment dates and counts
    /// ex-dividend business days.
    pub fn new(config: ScheduleConfig, calendar: Option<&'a dyn Calendar>) -> BondResult<Self> {
        let coupon_rate = config.coupon_decimal()?;
        let rows = CashflowScheduleBuilder::new(config.clone())
            .with_optional_calendar(calendar)
            .build()?;

        Ok(Self {
            rows,
            frequency: config.frequency,
            coupon_rate,
            notional: config.notional,
            maturity: config.maturity_date,
            calendar,
        })
    }

    /// Creates a pricer for an instrument record.
    ///
    /// Notional, roll convention and coupon unit come from `config`.
    pub fn from_instrument(
        instrument: &Instrument,
        frequency: Frequency,
        config: &PricingConfig,
        calendar: Option<&'a dyn Calendar>,
    ) -> BondResult<Self> {
        let schedule = ScheduleConfig::from_instrument(instrument, frequency)?
            .with_notional(config.notional)
            .with_coupon_unit(config.coupon_unit)
            .with_convention(config.convention);
        Self::new(schedule, calendar)
    }

    /// The coupon schedule.
    pub fn schedule(&self) -> &[CashflowRow] {
        &self.rows
    }

    /// Coupon frequency.
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Coupon rate as a decimal fraction.
    pub fn coupon_rate(&self) -> f64 {
        self.coupon_rate
    }

    /// Maturity date.
    pub fn maturity(&self) -> Date {
        self.maturity
    }

    /// Date the bond goes ex-dividend for a payment on `payment_date`.
    ///
    /// Non-positive `days` means no ex-dividend period. Without a calendar,
    /// calendar days are counted instead of business days.
    pub fn ex_dividend_date(&self, payment_date: Date, days: i32) -> Date {
        if days <= 0 {
            return payment_date;
        }
        match self.calendar {
            Some(cal) => cal.workday(payment_date, -days),
            None => payment_date - i64::from(days),
        }
    }

    fn current_row(&self, settlement: Date) -> Option<&CashflowRow> {
        self.rows.iter().find(|row| row.contains(settlement))
    }

    fn is_ex_dividend(&self, row: &CashflowRow, settlement: Date, days: i32) -> bool {
        settlement >= self.ex_dividend_date(row.adjusted_date, days) && settlement < row.period_end
    }

    fn coupon_for(&self, start: Date, end: Date, row: &CashflowRow) -> f64 {
        let af = accrual_factor(start, end, row.nominal_start, row.quasi_date, self.frequency);
        self.notional * self.coupon_rate * af
    }

    /// Accrued interest at `settlement`.
    ///
    /// Zero outside the bond's life. Inside the ex-dividend window the
    /// result is negative: minus the interest from settlement to the period
    /// end, which the buyer will not receive.
    pub fn accrued_interest(&self, settlement: Date, ex_div_days: i32) -> f64 {
        let Some(row) = self.current_row(settlement) else {
            return 0.0;
        };

        if self.is_ex_dividend(row, settlement, ex_div_days) {
            -self.coupon_for(settlement, row.period_end, row)
        } else {
            self.coupon_for(row.period_start, settlement, row)
        }
    }

    /// Present value of future cash flows at yield `y`.
    ///
    /// Each flow `n` periods ahead is discounted by `(1 + y/f)^-(n - s)`
    /// where `s` is the fraction of the current period already elapsed.
    /// A coupon whose ex-dividend date has passed is excluded.
    ///
    /// # Errors
    ///
    /// Returns `InvalidYield` if `1 + y/f <= 0`.
    pub fn dirty_price_from_yield(
        &self,
        y: f64,
        settlement: Date,
        ex_div_days: i32,
    ) -> BondResult<f64> {
        let f = f64::from(self.frequency.periods_per_year());
        let one_plus = 1.0 + y / f;
        if one_plus.is_nan() || one_plus <= 0.0 {
            return Err(BondError::InvalidYield {
                value: y,
                reason: format!("1 + y/{f} must be positive"),
            });
        }

        let s = self.current_row(settlement).map_or(0.0, |row| {
            let af = accrual_factor(
                row.period_start,
                settlement,
                row.nominal_start,
                row.quasi_date,
                self.frequency,
            );
            (af * f).clamp(0.0, 1.0)
        });

        let mut pv = 0.0;
        let future = self.rows.iter().filter(|row| row.period_end > settlement);
        for (i, row) in future.enumerate() {
            let coupon = if i == 0 && self.is_ex_dividend(row, settlement, ex_div_days) {
                0.0
            } else {
                row.coupon_amount
            };
            let n = (i + 1) as f64;
            pv += (coupon + row.principal_amount) * one_plus.powf(-(n - s));
        }
        Ok(pv)
    }

    /// Dirty price less accrued interest.
    pub fn clean_price_from_yield(
        &self,
        y: f64,
        settlement: Date,
        ex_div_days: i32,
    ) -> BondResult<f64> {
        let dirty = self.dirty_price_from_yield(y, settlement, ex_div_days)?;
        Ok(dirty - self.accrued_interest(settlement, ex_div_days))
    }

    /// Solves for the yield that reproduces `clean_price`.
    ///
    /// See [`YieldSolver`] for the bracketing strategy.
    pub fn yield_from_clean_price(
        &self,
        clean_price: f64,
        settlement: Date,
        ex_div_days: i32,
        solver: &YieldSolver,
    ) -> BondResult<YieldResult> {
        solver.solve(self, clean_price, settlement, ex_div_days)
    }
}

impl std::fmt::Debug for BondPricer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BondPricer")
            .field("rows", &self.rows.len())
            .field("frequency", &self.frequency)
            .field("coupon_rate", &self.coupon_rate)
            .field("notional", &self.notional)
            .field("maturity", &self.maturity)
            .field("calendar", &self.calendar.map(|c| c.name()))
            .finish()
    }
}
