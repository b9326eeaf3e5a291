//! Bond pricing.
//!
//! - [`BondPricer`]: accrued interest and dirty/clean price from yield
//! - [`YieldSolver`]: yield from clean price by bracketed bisection
//! - [`PricingConfig`]: ex-dividend period, solver tolerances and schedule
//!   defaults

mod config;
mod pricer;
mod yield_solver;

pub use config::PricingConfig;
pub use pricer::BondPricer;
pub use yield_solver::{YieldResult, YieldSolver};
