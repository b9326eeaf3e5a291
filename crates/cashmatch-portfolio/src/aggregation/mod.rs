//! Cashflow aggregation: bond matrices, target schedules and timelines.
//!
//! All functions are pure. Schedules are generated per bond, pivoted into a
//! date × bond table, aligned with a liability schedule on a common
//! timeline and accumulated into running totals for the optimizer.

mod filter;
pub(crate) mod parallel;
mod records;
mod target;
mod timeline;

pub use filter::filter_bonds_by_maturity;
pub use parallel::maybe_parallel_map;
pub use records::{build_matrix, cashflow_records, CashflowRecord};
pub use target::build_target_schedule;
pub use timeline::{running_totals, unify_timeline};
