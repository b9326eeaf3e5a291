//! Cash flow schedules.
//!
//! - [`CashflowScheduleBuilder`]: coupon periods with stub detection and
//!   business-day adjusted payment dates
//! - [`accrual_factor`]: year fraction of a full or partial period

mod accrual;
mod row;
mod schedule;

pub use accrual::accrual_factor;
pub use row::CashflowRow;
pub use schedule::{cashflows_from_instrument, CashflowScheduleBuilder, ScheduleConfig};
