//! Instrument and coupon types.

mod coupon;
mod instrument;
mod stub;

pub use coupon::{coupon_frequency, CouponUnit};
pub use instrument::{Instrument, InstrumentBuilder};
pub use stub::StubHint;
