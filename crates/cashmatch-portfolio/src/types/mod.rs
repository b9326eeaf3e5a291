//! Core types for portfolio construction.

mod config;
mod convention;
mod table;

pub use config::PortfolioConfig;
pub use convention::{TargetFrequency, WeightConvention};
pub use table::{CashflowTable, TARGET_COLUMN};
