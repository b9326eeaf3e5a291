//! # Cashmatch Bonds
//!
//! Fixed-coupon bond cash flows and pricing:
//!
//! - **Instruments**: reference data records with a validating builder
//! - **Cash Flows**: coupon schedules with short/long first and last stubs,
//!   business-day adjusted payment dates and prorated accrual
//! - **Pricing**: accrued interest with ex-dividend handling, price from
//!   yield and yield from price
//!
//! ## Example
//!
//! ```rust
//! use cashmatch_bonds::prelude::*;
//! use cashmatch_core::{BusinessDayCalendar, Date, Frequency};
//!
//! let calendar = BusinessDayCalendar::new("UK", std::iter::empty::<Date>());
//! let bond = Instrument::builder()
//!     .id("GB00EXAMPLE1")
//!     .issue_date(Date::from_ymd(2021, 6, 7).unwrap())
//!     .maturity_date(Date::from_ymd(2031, 6, 7).unwrap())
//!     .coupon_rate(4.25)
//!     .build()
//!     .unwrap();
//!
//! let config = PricingConfig::default();
//! let pricer =
//!     BondPricer::from_instrument(&bond, Frequency::SemiAnnual, &config, Some(&calendar)).unwrap();
//!
//! let settlement = Date::from_ymd(2025, 2, 14).unwrap();
//! let accrued = pricer.accrued_interest(settlement, config.ex_div_business_days);
//! assert!(accrued > 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::float_cmp)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::similar_names)]

pub mod cashflows;
pub mod error;
pub mod pricing;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::cashflows::{
        accrual_factor, cashflows_from_instrument, CashflowRow, CashflowScheduleBuilder,
        ScheduleConfig,
    };
    pub use crate::error::{BondError, BondResult};
    pub use crate::pricing::{BondPricer, PricingConfig, YieldResult, YieldSolver};
    pub use crate::types::{coupon_frequency, CouponUnit, Instrument, InstrumentBuilder, StubHint};
}

// Re-export commonly used types at crate root
pub use cashflows::{CashflowRow, ScheduleConfig};
pub use error::{BondError, BondResult};
pub use pricing::{BondPricer, PricingConfig, YieldSolver};
pub use types::{CouponUnit, Instrument};
