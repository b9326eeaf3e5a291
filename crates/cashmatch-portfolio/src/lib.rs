//! # Cashmatch Portfolio
//!
//! Cashflow-matching portfolio construction for fixed income securities.
//!
//! Bond coupon schedules are aggregated into a date × bond matrix, aligned
//! with a liability schedule, accumulated into running totals and matched by
//! least squares.
//!
//! ## Design Philosophy
//!
//! - **Pure functions**: All calculations are stateless with explicit inputs
//! - **Caller-supplied data**: Instruments, holidays and prices are plain values
//! - **Explicit conventions**: Fraction or nominal weights chosen by configuration
//! - **Config-driven parallelism**: Optional rayon support with threshold-based switching
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cashmatch_portfolio::prelude::*;
//!
//! let request = PortfolioRequest::new(start, end, settlement)
//!     .with_frequency(TargetFrequency::Monthly)
//!     .with_budget(1_000_000.0);
//!
//! let config = PortfolioConfig::new(WeightConvention::Nominal);
//! let solution = build_portfolio(&request, &instruments, &prices, Some(&calendar), &config)?;
//!
//! for holding in &solution.holdings {
//!     println!("{} {:.4}", holding.instrument_id, holding.nominal_weight);
//! }
//! println!("R² = {:.4}", solution.r_squared);
//! ```
//!
//! ## Module Overview
//!
//! - [`aggregation`] - Cashflow records, bond matrix, target schedule, timeline, running totals
//! - [`optimizer`] - Weight solving, budget scaling, fit diagnostics, end-to-end build
//! - [`types`] - Configuration, conventions and cashflow tables
//!
//! ## Feature Flags
//!
//! - `parallel`: Enable rayon-based schedule generation for large bond universes

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::module_name_repetitions)]

// Module declarations
pub mod aggregation;
pub mod error;
pub mod optimizer;
pub mod types;

// Re-export error types at crate root
pub use error::{PortfolioError, PortfolioResult};

// Re-export main types
pub use types::{CashflowTable, PortfolioConfig, TargetFrequency, WeightConvention};

// Re-export aggregation and optimizer entry points
pub use aggregation::{build_matrix, running_totals, unify_timeline};
pub use optimizer::{
    build_portfolio, solve_portfolio_weights, Holding, PortfolioRequest, PortfolioSolution,
    PriceProvider,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::aggregation::{
        build_matrix, build_target_schedule, cashflow_records, filter_bonds_by_maturity,
        running_totals, unify_timeline, CashflowRecord,
    };
    pub use crate::error::{PortfolioError, PortfolioResult};
    pub use crate::optimizer::{
        build_portfolio, fit_diagnostics, scale_to_budget, solve_portfolio_weights,
        BudgetScaling, FitDiagnostics, Holding, PortfolioRequest, PortfolioSolution,
        PriceProvider, RunningPoint, SolveDiagnostics, WeightSolution,
    };
    pub use crate::types::{
        CashflowTable, PortfolioConfig, TargetFrequency, WeightConvention, TARGET_COLUMN,
    };
}
