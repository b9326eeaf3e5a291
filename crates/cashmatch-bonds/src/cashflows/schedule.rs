//! Coupon schedule generation.
//!
//! Boundaries are generated backward from maturity as `maturity - k * 12/f`
//! months for `k = 1, 2, ...`, each taken directly from maturity so that a
//! month-end clamp never carries into earlier dates. Explicit first and last
//! coupon dates are then merged in and periods whose start differs from the
//! theoretical start are flagged as stubs.
//!
//! # Example
//!
//! ```rust
//! use cashmatch_bonds::cashflows::{CashflowScheduleBuilder, ScheduleConfig};
//! use cashmatch_core::{Date, Frequency};
//!
//! let config = ScheduleConfig::new(
//!     Date::from_ymd(2020, 1, 1).unwrap(),
//!     Date::from_ymd(2030, 1, 1).unwrap(),
//!     5.0,
//!     Frequency::SemiAnnual,
//! );
//!
//! let rows = CashflowScheduleBuilder::new(config).build().unwrap();
//! assert_eq!(rows.len(), 20);
//! assert_eq!(rows[0].coupon_amount, 2.5);
//! assert_eq!(rows[19].principal_amount, 100.0);
//! ```

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cashmatch_core::{BusinessDayConvention, Calendar, Date, Frequency};

use crate::cashflows::{accrual_factor, CashflowRow};
use crate::error::{BondError, BondResult};
use crate::pricing::PricingConfig;
use crate::types::{CouponUnit, Instrument, StubHint};

/// Terms needed to build a coupon schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Issue date; start of the first accrual period.
    pub issue_date: Date,
    /// Maturity date; end of the last period.
    pub maturity_date: Date,
    /// Quoted coupon rate, interpreted through `coupon_unit`.
    pub coupon_rate: f64,
    /// Coupon frequency.
    pub frequency: Frequency,
    /// Face amount per bond.
    pub notional: f64,
    /// Unit of `coupon_rate`.
    pub coupon_unit: CouponUnit,
    /// Roll convention for payment dates.
    pub convention: BusinessDayConvention,
    /// End of an irregular first period.
    pub first_coupon_date: Option<Date>,
    /// Start of an irregular final period.
    pub last_coupon_date: Option<Date>,
    /// Shape of an irregular first period.
    pub stub_hint: Option<StubHint>,
}

impl ScheduleConfig {
    /// Creates a configuration with notional 100, `Auto` coupon unit and
    /// modified following payment dates.
    #[must_use]
    pub fn new(issue_date: Date, maturity_date: Date, coupon_rate: f64, frequency: Frequency) -> Self {
        Self {
            issue_date,
            maturity_date,
            coupon_rate,
            frequency,
            notional: 100.0,
            coupon_unit: CouponUnit::Auto,
            convention: BusinessDayConvention::ModifiedFollowing,
            first_coupon_date: None,
            last_coupon_date: None,
            stub_hint: None,
        }
    }

    /// Sets the notional.
    #[must_use]
    pub fn with_notional(mut self, notional: f64) -> Self {
        self.notional = notional;
        self
    }

    /// Sets the coupon unit.
    #[must_use]
    pub fn with_coupon_unit(mut self, unit: CouponUnit) -> Self {
        self.coupon_unit = unit;
        self
    }

    /// Sets the payment date convention.
    #[must_use]
    pub fn with_convention(mut self, convention: BusinessDayConvention) -> Self {
        self.convention = convention;
        self
    }

    /// Sets the first coupon date.
    #[must_use]
    pub fn with_first_coupon_date(mut self, date: Date) -> Self {
        self.first_coupon_date = Some(date);
        self
    }

    /// Sets the last regular coupon date.
    #[must_use]
    pub fn with_last_coupon_date(mut self, date: Date) -> Self {
        self.last_coupon_date = Some(date);
        self
    }

    /// Sets the first-period stub hint.
    #[must_use]
    pub fn with_stub_hint(mut self, hint: StubHint) -> Self {
        self.stub_hint = Some(hint);
        self
    }

    /// Coupon rate as a decimal fraction.
    pub fn coupon_decimal(&self) -> BondResult<f64> {
        self.coupon_unit.normalize(self.coupon_rate)
    }

    /// Derives schedule terms from an instrument record.
    ///
    /// The record must be a bond with both dates and a coupon rate.
    pub fn from_instrument(instrument: &Instrument, frequency: Frequency) -> BondResult<Self> {
        instrument.validate()?;
        if !instrument.is_bond() {
            return Err(BondError::invalid_instrument(
                &instrument.id,
                format!("instrument type '{}' is not a bond", instrument.instrument_type),
            ));
        }
        let (Some(issue), Some(maturity)) = (instrument.issue_date, instrument.maturity_date) else {
            return Err(BondError::invalid_instrument(
                &instrument.id,
                "missing issue or maturity date",
            ));
        };
        let Some(coupon_rate) = instrument.coupon_rate else {
            return Err(BondError::invalid_instrument(&instrument.id, "missing coupon rate"));
        };

        Ok(Self {
            first_coupon_date: instrument.first_coupon_date,
            last_coupon_date: instrument.last_coupon_date,
            stub_hint: instrument.stub_hint,
            ..Self::new(issue, maturity, coupon_rate, frequency)
        })
    }
}

/// Builds coupon schedules from a [`ScheduleConfig`].
///
/// Without a calendar, payment dates equal the unadjusted boundaries.
#[derive(Clone)]
pub struct CashflowScheduleBuilder<'a> {
    config: ScheduleConfig,
    calendar: Option<&'a dyn Calendar>,
}

impl<'a> CashflowScheduleBuilder<'a> {
    /// Creates a builder with no calendar.
    #[must_use]
    pub fn new(config: ScheduleConfig) -> Self {
        Self {
            config,
            calendar: None,
        }
    }

    /// Adjusts payment dates on `calendar`.
    #[must_use]
    pub fn with_calendar(mut self, calendar: &'a dyn Calendar) -> Self {
        self.calendar = Some(calendar);
        self
    }

    /// Sets the calendar, or clears it with `None`.
    #[must_use]
    pub fn with_optional_calendar(mut self, calendar: Option<&'a dyn Calendar>) -> Self {
        self.calendar = calendar;
        self
    }

    /// The configuration being built.
    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Generates the schedule.
    ///
    /// # Errors
    ///
    /// - `InvalidCoupon` for a negative or non-finite coupon
    /// - `InvalidScheduleBounds` if issue is not before maturity, or the
    ///   first or last coupon date falls outside the bond's life
    /// - `ScheduleInvariant` if the merged boundaries do not end at maturity
    pub fn build(&self) -> BondResult<Vec<CashflowRow>> {
        let cfg = &self.config;
        let coupon = cfg.coupon_decimal()?;
        let months = cfg.frequency.months_per_period() as i32;
        let issue = cfg.issue_date;
        let maturity = cfg.maturity_date;

        if issue >= maturity {
            return Err(BondError::invalid_bounds(format!(
                "issue date {issue} must precede maturity {maturity}"
            )));
        }

        // grid[k] = maturity - k periods, for every such date after issue
        let back = |k: usize| maturity.add_months(-(k as i32) * months);
        let mut grid = Vec::new();
        loop {
            let date = back(grid.len())?;
            if date <= issue {
                break;
            }
            grid.push(date);
        }

        let mut bounds = grid.clone();
        bounds.push(issue);

        if let Some(last) = cfg.last_coupon_date {
            if !(issue < last && last < maturity) {
                return Err(BondError::invalid_bounds(format!(
                    "last coupon date {last} must lie strictly between {issue} and {maturity}"
                )));
            }
            bounds.push(last);
        }

        let first_end = match (cfg.stub_hint, cfg.first_coupon_date) {
            (Some(StubHint::LongFirst), Some(first)) => Some(first.add_months(months)?),
            (Some(StubHint::LongFirst), None) => {
                // The first regular boundary is grid[n - 1]; the long period
                // absorbs it and ends one grid step later.
                let n = grid.len();
                if n == 0 {
                    return Err(BondError::invariant("no boundary after issue date"));
                }
                Some(if n >= 2 { grid[n - 2] } else { maturity.add_months(months)? })
            }
            (_, first) => first,
        };

        if let Some(first_end) = first_end {
            if !(issue < first_end && first_end <= maturity) {
                return Err(BondError::invalid_bounds(format!(
                    "first coupon period end {first_end} must lie in ({issue}, {maturity}]"
                )));
            }
            bounds.push(first_end);
        }

        bounds.sort_unstable();
        bounds.dedup();
        if let Some(first_end) = first_end {
            bounds.retain(|d| !(issue < *d && *d < first_end));
        }

        if bounds.len() < 2 || bounds.last() != Some(&maturity) {
            return Err(BondError::invariant(format!(
                "{} boundaries generated, final boundary must be maturity {maturity}",
                bounds.len()
            )));
        }

        let mut rows = Vec::with_capacity(bounds.len() - 1);
        for (i, window) in bounds.windows(2).enumerate() {
            let (start, end) = (window[0], window[1]);
            let quasi_date = end;
            let adjusted_date = self
                .calendar
                .map_or(quasi_date, |cal| cal.adjust(quasi_date, cfg.convention));
            let nominal_start = match grid.iter().position(|g| *g == end) {
                Some(k) => back(k + 1)?,
                None => end.add_months(-months)?,
            };
            let irregular = start != nominal_start;

            let mut notes: Option<String> = None;
            if i == 0 && irregular {
                let label = cfg.stub_hint.map_or_else(
                    || {
                        if start > nominal_start {
                            "Short First"
                        } else {
                            "Long First"
                        }
                    },
                    StubHint::label,
                );
                notes = Some(label.to_string());
            }
            if cfg.last_coupon_date == Some(end) && irregular {
                notes = Some(match notes {
                    Some(n) => format!("{n} + Last Stub"),
                    None => "Last Stub".to_string(),
                });
            }
            if irregular && notes.is_none() {
                let label = if start > nominal_start {
                    "Short Stub"
                } else {
                    "Long Stub"
                };
                notes = Some(label.to_string());
            }

            let accrual = accrual_factor(start, end, nominal_start, quasi_date, cfg.frequency);
            let coupon_amount = round_dp10(cfg.notional * coupon * accrual);
            let principal_amount = if end == maturity { cfg.notional } else { 0.0 };

            rows.push(CashflowRow {
                period_start: start,
                period_end: end,
                quasi_date,
                adjusted_date,
                nominal_start,
                accrual_factor: accrual,
                coupon_amount,
                principal_amount,
                is_stub: irregular,
                notes,
            });
        }

        tracing::debug!(
            issue = %issue,
            maturity = %maturity,
            frequency = %cfg.frequency,
            rows = rows.len(),
            stubs = rows.iter().filter(|r| r.is_stub).count(),
            "coupon schedule built"
        );

        Ok(rows)
    }
}

impl std::fmt::Debug for CashflowScheduleBuilder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CashflowScheduleBuilder")
            .field("config", &self.config)
            .field("calendar", &self.calendar.map(|c| c.name()))
            .finish()
    }
}

/// Builds the schedule for an instrument record.
///
/// Notional, roll convention and coupon unit come from `config`.
///
/// # Errors
///
/// Returns `InvalidInstrument` if the record is not a bond or lacks dates,
/// plus any error from [`CashflowScheduleBuilder::build`].
pub fn cashflows_from_instrument(
    instrument: &Instrument,
    frequency: Frequency,
    config: &PricingConfig,
    calendar: Option<&dyn Calendar>,
) -> BondResult<Vec<CashflowRow>> {
    let schedule = ScheduleConfig::from_instrument(instrument, frequency)?
        .with_notional(config.notional)
        .with_coupon_unit(config.coupon_unit)
        .with_convention(config.convention);

    CashflowScheduleBuilder::new(schedule)
        .with_optional_calendar(calendar)
        .build()
}

/// Rounds to 10 decimal places, leaving values `Decimal` cannot hold as-is.
fn round_dp10(value: f64) -> f64 {
    Decimal::from_f64(value)
        .map(|d| d.round_dp(10))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}
